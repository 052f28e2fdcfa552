// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,

    /// When true, each question's four choices are reordered with a seeded
    /// shuffle unique to (version, question). The deployed exams keep the
    /// original A-D order, so this defaults to false.
    pub shuffle_choices: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let shuffle_choices = env::var("SHUFFLE_CHOICES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            database_url,
            rust_log,
            shuffle_choices,
        }
    }
}
