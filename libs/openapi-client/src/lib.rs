//! Ajime backend API models used by the console.

pub mod models;
