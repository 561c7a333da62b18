//! Configuration module for the exhibitor scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; missing keys fall back to the built-in DSEI settings.
//!
//! # Example
//!
//! ```no_run
//! use dsei_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Listing pages start at: {}", config.run.start_page);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DelayConfig, HttpConfig, OutputConfig, ResolverKind, RunConfig, SelectorConfig,
    SiteConfig, WebsiteConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;

pub(crate) use validation::{compile_pattern, compile_selector};
