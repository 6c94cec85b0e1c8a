pub mod alert;
pub mod batch;
pub mod product;
pub mod report;
pub mod sensor;
pub mod session;
pub mod user;
pub mod utilization;
pub mod warehouse;
