//! Backend API access

pub mod api;
pub mod applications;
pub mod client;
pub mod devices;
