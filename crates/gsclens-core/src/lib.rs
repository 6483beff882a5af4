//! Shared domain types and configuration for gsclens.
//!
//! Everything downstream (the Search Console client, the analytics core, the
//! insight orchestrator and the CLI) speaks in terms of the [`Record`] and
//! [`Dataset`] values defined here.

mod app_config;
mod config;
pub mod error;
pub mod keywords;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use keywords::{load_keywords, KeywordSets};
pub use types::{Dataset, Dimension, QueryWindow, Record};
