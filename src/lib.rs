//! Month-by-month "what happened in year Y" summaries extracted from
//! Wikipedia year pages.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod server;
pub mod wiki;

pub use error::WikiError;
