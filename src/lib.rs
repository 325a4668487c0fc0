//! sketchsave - local persistence server for a browser-based drawing tool

pub mod config;
pub mod error;
pub mod types;

pub mod store;
pub mod api;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
