//! Version classification and ordering layer
//!
//! This module decides whether an upstream version string is worth tracking
//! and where it sits on the library's release timeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Profile   │────▶│ Classifier  │────▶│  Sequence   │
//! │ (heuristics)│     │(release tag)│     │  (natural)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   ▲                   │
//!        ▼                   │                   ▼
//! ┌─────────────┐            │            ┌─────────────┐
//! │ Comparator  │────────────┘◀───────────│    sort     │
//! │ (ordering)  │                         │             │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`classifier`]: Release type classification and skip rules
//! - [`comparator`]: Ordering of free-form version strings
//! - [`sequence`]: Natural sequence of versions worth tracking
//! - [`profile`]: Compiled per-library heuristics
//! - [`token`]: Tokenizer used by the comparator
//! - [`error`]: Error types for profile loading and state storage
//! - [`types`]: Common types like `ReleaseType`

pub mod classifier;
pub mod comparator;
pub mod error;
pub mod profile;
pub mod sequence;
pub mod token;
pub mod types;
