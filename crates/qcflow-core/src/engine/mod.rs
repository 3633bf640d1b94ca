//! # Engine Module
//!
//! This module implements the stateful layer that drives the external
//! quantum-chemistry engine: building jobs, sequencing their lifecycle, and
//! executing them one at a time.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Engine executable, file extensions,
//!   and the subprocess timeout
//! - **Jobs** ([`job`]) - The capability-gated unit of work and its
//!   dependency-resolution / post-processing lifecycle
//! - **Scheduling** ([`runner`]) - Strictly sequential FIFO execution with
//!   scoped working-directory handling and per-job failure isolation
//! - **Input Rendering** ([`template`]) - The injected `render(context) →
//!   text` capability used to produce input decks
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress
//!   reporting for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod error;
pub mod job;
pub mod progress;
pub mod runner;
pub mod template;
