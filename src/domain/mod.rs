//! Row-mapped records, pagination and errors.

pub mod error;
pub(crate) mod flag;
pub mod news;
pub mod page;
pub mod portfolio;
pub mod product;
pub mod symbol;
pub mod user;
