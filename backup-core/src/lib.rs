pub mod alert;
pub mod config;
pub mod constants;
pub mod container;
pub mod details;
pub mod error;
pub mod logs;
pub mod recon;
pub mod retention;
pub mod runner;
pub mod snapshot;
pub mod transfer;
pub mod vars;

pub use error::{Result, VolbackError};
