//! Console configuration storage

pub mod layout;
pub mod settings;
