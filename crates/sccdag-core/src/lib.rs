#![forbid(unsafe_code)]
//! sccdag-core library.
//!
//! Strongly connected components, condensation, topological ordering, and
//! DAG path queries over directed weighted graphs.
//!
//! # Conventions
//!
//! - **Errors**: Algorithm entry points return [`error::GraphError`]; the
//!   config layer uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Vertices**: Dense `usize` identifiers in `[0, n)`.

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod metrics;
