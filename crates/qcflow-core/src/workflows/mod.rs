//! High-level procedures built on the core parsers and the engine.
//!
//! These tie finished jobs together into chemistry-level quantities: derived
//! spin-component-scaled energies from a parent MP2 log, and stoichiometric
//! reaction energies over a table of computed species.

pub mod batch;
pub mod derived;
pub mod reaction;

use crate::core::io::FileFormatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A reaction references a species with no computed energy.
    #[error("no energy recorded for species '{0}'")]
    MissingSpecies(String),
    /// A parsed spin-component table lacks one of the three spin pairs.
    #[error("incomplete spin-component table in '{0}'")]
    IncompleteSpinComponents(String),
    #[error(transparent)]
    Format(#[from] FileFormatError),
    #[error("failed to read reaction file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse reaction file: {0}")]
    Json(#[from] serde_json::Error),
}
