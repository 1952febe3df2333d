//! Per-version build state of tracked libraries
//!
//! # Modules
//!
//! - [`storer`]: `StateStorer` trait and record types
//! - [`store`]: SQLite-backed `StateStore`
//! - [`planner`]: Compares the natural sequence with stored state

pub mod planner;
pub mod store;
pub mod storer;
