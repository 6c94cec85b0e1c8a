//! One controller per dashboard view. Each owns a [`Page`](crate::page::Page)
//! and talks to the backend only through the gateway's endpoint traits.

pub mod alerts;
pub mod batches;
pub mod home;
pub mod products;
pub mod report;
pub mod sensors;
pub mod utility;
pub mod warehouse;
