//! SQL query modules for the PostgreSQL storage backend.
//!
//! This module contains the SQL query implementations organized by table.

pub mod beans;
pub mod selections;
