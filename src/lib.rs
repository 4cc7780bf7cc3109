//! trk - Time-Boxed Work Item Tracker Library
//!
//! This library provides the core functionality for the trk CLI tool:
//! hierarchical work items (tasks, epics, subtasks) with optional time
//! boxes, a conflict-free schedule, and a bounded recently-viewed history.
//!
//! # Core Concepts
//!
//! - **Work items**: flat tasks, epics, and epic-owned subtasks
//! - **Time boxes**: an optional (start, duration) pair placing an item on
//!   the timeline; admissions are rejected when closed intervals overlap
//! - **Rollup**: an epic's status and time span are always derived from
//!   its live subtasks, never set directly
//! - **Recency history**: the last 10 viewed items with O(1)
//!   dedup-and-promote
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.trk.toml`
//! - `error`: error types and result aliases
//! - `model`: work item types and the status enum
//! - `schedule`: ordered index over time-boxed items, conflict detection
//! - `rollup`: epic aggregation from child snapshots
//! - `history`: bounded recency list
//! - `store`: entity storage and id allocation
//! - `board`: the facade composing all of the above
//! - `persist`: row-oriented file persistence and the history sidecar
//! - `output`: shared human/JSON output formatting

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod output;
pub mod persist;
pub mod rollup;
pub mod schedule;
pub mod store;

pub use error::{Error, Result};
