pub mod auth;
pub mod service_util;
pub mod utilization;
