//! Core library components.
//!
//! Parsing, comparison, selection, merging and backups for `.env` files,
//! plus the cipher backend contract and the reconciler that drives a run.
//! Nothing in here prints; see [`report`].

pub mod backup;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod credential;
pub mod diff;
pub mod merge;
pub mod reconcile;
pub mod report;
pub mod selection;
pub mod snapshot;
