//! Screens that consume device filter queries

pub mod devices;
pub mod scheduling;
