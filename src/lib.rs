pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod git;
pub mod logging;
pub mod notice;
pub mod output;
pub mod publish;
pub mod resolver;
pub mod ui;

pub use error::{AutoversionError, Result};
