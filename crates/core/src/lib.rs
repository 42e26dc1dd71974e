//! Core library for aitools
//!
//! This crate implements the **Functional Core** of the aitools application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`aitools_core`** (this crate): domain types and pure logic, zero I/O
//! - **`aitools`**: HTTP calls, session persistence, the query cache on disk,
//!   and the command line (the Imperative Shell)
//!
//! Functions here are deterministic: the same input always produces the same
//! output. Anything that depends on the clock takes the current time as an
//! argument.
//!
//! # Module Organization
//!
//! - [`types`]: tools, reviews, users, filters, and paginated responses
//! - [`pagination`]: page arithmetic
//! - [`filters`]: the filter store driving the tool listing
//! - [`demo`]: fixture catalog used when the remote API is unreachable
//! - [`query`]: cache keys, freshness, and invalidation rules
//!
//! # Example Usage
//!
//! ```rust
//! use aitools_core::demo::get_demo_tools;
//! use aitools_core::filters::FilterStore;
//!
//! let mut store = FilterStore::new();
//! store.set_category(Some("Images".to_string()));
//!
//! let page = get_demo_tools(store.filters());
//! assert!(page.items.iter().all(|tool| tool.category == "Images"));
//! ```

pub mod demo;
pub mod error;
pub mod filters;
pub mod pagination;
pub mod query;
pub mod types;

pub use error::CoreError;
