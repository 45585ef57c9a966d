//! tradesim — REST backend for a trading-simulation application.
//!
//! Hexagonal layout: records and errors in [`domain`], the storage port in
//! [`ports`], concrete SQL stores and the axum HTTP surface in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
