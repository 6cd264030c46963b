pub mod config;
pub mod error;
pub mod model;
pub mod mongo;
pub mod workflow;

pub use crate::config::Config;
pub use crate::error::{CatalogError, Result};
