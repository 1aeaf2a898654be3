//! Nutrilog Library
//!
//! Food diary core: serving normalization, macro aggregation and target
//! calculation, with SQLite storage and MCP tools around it.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
