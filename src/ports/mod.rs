//! Port traits the adapters implement.

pub mod config_port;
pub mod data_port;
