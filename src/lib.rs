//! pq - weighted multi-criteria pose similarity search.
//!
//! Assembles an ordered list of independent, user-weighted search criteria
//! (body direction, yaw, pitch, tags, limb flexion) into a single ranked
//! result set over a SQLite pose database with the sqlite-vec extension.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod criterion;
pub mod error;
pub mod search;
pub mod storage;
pub mod units;
pub mod utils;

pub use error::{PqError, Result};

/// Identifier of one pose record.
pub type PoseId = i64;

/// Identifier of the file a pose record came from.
pub type FileId = i64;
