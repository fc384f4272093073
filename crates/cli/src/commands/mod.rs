//! Subcommand implementations.

pub mod data;
pub mod recipes;

use std::path::PathBuf;

/// `CHEF_DATA_FILE` (from the environment or `.env`), else `database.json`.
pub fn default_data_file() -> PathBuf {
    dotenvy::dotenv().ok();
    std::env::var_os("CHEF_DATA_FILE")
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from("database.json"), PathBuf::from)
}
