#![forbid(unsafe_code)]
//! sccdag-sim library.
//!
//! Deterministic graph fixtures for exercising the sccdag pipeline.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod generator;
pub mod rng;
pub mod suite;

pub use generator::{GeneratorConfig, GraphShape, generate_graph};
pub use rng::DeterministicRng;
pub use suite::{Dataset, standard_suite, write_suite};
