//! # QCFlow Core Library
//!
//! A library for automating batches of quantum-chemistry calculations:
//! generating input decks, driving an external engine as a subprocess, and
//! scraping typed numeric results out of its text output.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Atom`,
//!   `Geometry`, the periodic table), the method registry, and the parsers for
//!   geometry input and engine output formats.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer orchestrates job
//!   execution. It includes the capability-gated [`engine::job::Job`]
//!   lifecycle, the sequential [`engine::runner::Runner`] scheduler with its
//!   scoped working-directory handling, and the engine configuration.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute complete
//!   procedures, such as building a batch of single-point jobs for a set of
//!   systems or aggregating stoichiometric reaction energies.

pub mod core;
pub mod engine;
pub mod workflows;
