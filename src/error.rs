//! Filepath: src/error.rs
//! Typed error kinds for the user-input boundary.
//!
//! Parse, regex, config, and encoding problems are recovered locally and
//! never reach this type (see the per-module fallback behavior). Only
//! user-input errors propagate to the top-level handler, which maps them
//! to exit code 1.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError
{
    #[error("invalid shape {raw:?}: expected WIDTH:HEIGHT with positive integers")]
    InvalidShape
    {
        raw: String
    },

    #[error("invalid range {raw:?}: expected A:B with A <= B")]
    InvalidRange
    {
        raw: String
    },

    #[error("path not found: {path}")]
    PathNotFound
    {
        path: PathBuf
    },

    #[error("failed to read {path}: {source}")]
    ReadFailed
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("--profile requires a file path")]
    ProfileWithoutPath,
}

pub type Result<T> = std::result::Result<T, AppError>;
