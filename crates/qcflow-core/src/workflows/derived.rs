//! Derived spin-component-scaled energies.
//!
//! The scaled MP2 family is never run as independent jobs; one parent MP2
//! calculation yields the reference energy and the spin-resolved correlation
//! components, and every registered derived method is evaluated from those
//! with its own scaling coefficients.

use super::WorkflowError;
use crate::core::io::log::LogFile;
use crate::core::methods::{self, DispersionRegistry, Method};
use crate::core::models::geometry::Geometry;

/// One derived method's total energy, in Hartrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedEnergy {
    pub method: &'static Method,
    pub energy: f64,
}

/// Evaluates every method derived from `parent` against a finished parent
/// log.
///
/// The total is `reference + os * E2(ab) + ss * (E2(aa) + E2(bb))`. When a
/// dispersion correction is registered under the derived method's name and a
/// geometry is supplied, its energy is added; an absent correction leaves
/// the energy uncorrected rather than failing.
pub fn derived_energies(
    log: &LogFile,
    parent: &str,
    geometry: Option<&Geometry>,
    corrections: &DispersionRegistry,
) -> Result<Vec<DerivedEnergy>, WorkflowError> {
    let reference = log.scf_energy()?;
    let components = log.spin_components()?;

    let mut out = Vec::new();
    for method in methods::derived_from(parent) {
        let Some(scaling) = method.correction else {
            continue;
        };
        let correction = methods::scaled_correction(&components, scaling).ok_or_else(|| {
            WorkflowError::IncompleteSpinComponents(log.filename().to_string())
        })?;
        let mut energy = reference + correction;
        if let Some(dispersion) = corrections.get(method.name)
            && let Some(geometry) = geometry
        {
            energy += dispersion.energy(geometry);
        }
        out.push(DerivedEnergy { method, energy });
    }
    Ok(out)
}
