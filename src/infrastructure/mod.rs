//! Platform-specific locations.

pub mod paths;

pub use paths::{config_file, credentials_file, data_dir, expand_tilde, trace_file};
