mod server;

#[cfg(test)]
pub(crate) use server::metrics_listener_address;
pub(crate) use server::start_metrics_listener;
