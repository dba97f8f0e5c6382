//! Ajime Console Library
//!
//! Device filter queries and the screens built on them: the device list and
//! application scheduling rules.

pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod query;
pub mod screens;
pub mod storage;
pub mod utils;
