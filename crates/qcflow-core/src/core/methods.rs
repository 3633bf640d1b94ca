//! Static registry of supported computational methods and basis sets.
//!
//! Every method the engine can be asked to run is described by a [`Method`]
//! entry in a compile-time table: its route keyword, category, and — for the
//! spin-component-scaled MP2 variants — a `redundancy` backreference naming
//! the parent method whose parsed output the variant's energy is derived
//! from. A method with `redundancy` set must never be submitted as an
//! independent job.

use crate::core::io::log::SpinComponents;
use crate::core::models::geometry::Geometry;
use phf::{Map, Set, phf_map, phf_set};
use std::collections::HashMap;
use thiserror::Error;

/// Invalid method or basis-set configuration, raised at job construction
/// time before any I/O happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MethodError {
    #[error("unknown method '{0}'")]
    UnknownMethod(String),
    #[error("no such basis set: {0}")]
    InvalidBasisSet(String),
}

/// The broad family a method belongs to, following the usual Jacob's-ladder
/// style classification plus an ab-initio tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodCategory {
    /// Local density approximation functionals.
    Lda,
    /// Generalized gradient approximation functionals.
    Gga,
    /// Meta-GGA functionals.
    MetaGga,
    /// Hybrid GGA functionals.
    HybridGga,
    /// Hybrid meta-GGA functionals.
    HybridMetaGga,
    /// Range-separated functionals.
    RangeSeparated,
    /// Wavefunction-based ab-initio methods (HF, MP2 and derivatives).
    AbInitio,
}

/// Spin-component scaling coefficients for an MP2-derived method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinScaling {
    /// Coefficient for the opposite-spin (alpha-beta) E2 contribution.
    pub opposite_spin: f64,
    /// Coefficient for the two same-spin E2 contributions.
    pub same_spin: f64,
}

/// A registered computational method.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// The registry name (lowercase, e.g. "scs-mp2").
    pub name: &'static str,
    /// The canonical route keyword handed to the engine, also the archive
    /// keyword its energy is stored under for correlated methods.
    pub keywords: &'static str,
    /// Extra route keywords appended to the input deck.
    pub additional_keywords: &'static str,
    /// The method family.
    pub category: MethodCategory,
    /// For derived methods, the parent whose output this method's energy is
    /// computed from instead of an independent run.
    pub redundancy: Option<&'static str>,
    /// Spin-component scaling coefficients for derived methods.
    pub correction: Option<SpinScaling>,
    /// Whether the method already includes an empirical dispersion term.
    pub includes_dispersion: bool,
}

macro_rules! method {
    // the literal-token arm must come before the `$category:expr` arms or
    // `scaled(..)` would be swallowed as a call expression
    ($name:literal, $keywords:literal, scaled($os:expr, $ss:expr)) => {
        method!(
            $name,
            $keywords,
            "",
            MethodCategory::AbInitio,
            Some("mp2"),
            Some(SpinScaling {
                opposite_spin: $os,
                same_spin: $ss,
            }),
            false
        )
    };
    ($name:literal, $keywords:literal, $category:expr) => {
        method!($name, $keywords, "", $category, None, None, false)
    };
    ($name:literal, $keywords:literal, $category:expr, dispersion) => {
        method!($name, $keywords, "", $category, None, None, true)
    };
    ($name:literal, $keywords:literal, $additional:literal, $category:expr,
     $redundancy:expr, $correction:expr, $dispersion:literal) => {
        Method {
            name: $name,
            keywords: $keywords,
            additional_keywords: $additional,
            category: $category,
            redundancy: $redundancy,
            correction: $correction,
            includes_dispersion: $dispersion,
        }
    };
}

static METHODS: Map<&'static str, Method> = phf_map! {
    // wavefunction methods; the scaled MP2 variants are derived from the
    // parent mp2 run and are never submitted on their own
    "hf" => method!("hf", "HF", "scf=tight", MethodCategory::AbInitio, None, None, false),
    "mp2" => method!("mp2", "MP2", "density=current", MethodCategory::AbInitio, None, None, false),
    "scs-mp2" => method!("scs-mp2", "MP2", scaled(1.2, 1.0 / 3.0)),
    "sos-mp2" => method!("sos-mp2", "MP2", scaled(1.3, 0.0)),
    "scs(mi)-mp2" => method!("scs(mi)-mp2", "MP2", scaled(0.40, 1.29)),
    "s2-mp2" => method!("s2-mp2", "MP2", scaled(1.15, 0.75)),
    "scs-mp2-vdw" => method!("scs-mp2-vdw", "MP2", scaled(1.28, 0.50)),
    // LDA
    "svwn" => method!("svwn", "SVWN", MethodCategory::Lda),
    "svwn5" => method!("svwn5", "SVWN5", MethodCategory::Lda),
    // GGA
    "blyp" => method!("blyp", "BLYP", MethodCategory::Gga),
    "bp86" => method!("bp86", "BP86", MethodCategory::Gga),
    "pbepbe" => method!("pbepbe", "PBEPBE", MethodCategory::Gga),
    "hcth407" => method!("hcth407", "HCTH407", MethodCategory::Gga),
    "b97d" => method!("b97d", "B97D", MethodCategory::Gga, dispersion),
    // meta-GGA
    "m06l" => method!("m06l", "M06L", MethodCategory::MetaGga),
    "tpsstpss" => method!("tpsstpss", "TPSSTPSS", MethodCategory::MetaGga),
    // hybrid GGA
    "b3lyp" => method!("b3lyp", "B3LYP", MethodCategory::HybridGga),
    "b3pw91" => method!("b3pw91", "B3PW91", MethodCategory::HybridGga),
    "x3lyp" => method!("x3lyp", "X3LYP", MethodCategory::HybridGga),
    "pbe1pbe" => method!("pbe1pbe", "PBE1PBE", MethodCategory::HybridGga),
    "apfd" => method!("apfd", "APFD", MethodCategory::HybridGga, dispersion),
    // hybrid meta-GGA
    "m06" => method!("m06", "M06", MethodCategory::HybridMetaGga),
    "m062x" => method!("m062x", "M062X", MethodCategory::HybridMetaGga),
    "pw6b95" => method!("pw6b95", "PW6B95", MethodCategory::HybridMetaGga),
    // range-separated
    "cam-b3lyp" => method!("cam-b3lyp", "CAM-B3LYP", MethodCategory::RangeSeparated),
    "lc-wpbe" => method!("lc-wpbe", "LC-wPBE", MethodCategory::RangeSeparated),
    "m11" => method!("m11", "M11", MethodCategory::RangeSeparated),
    "wb97x" => method!("wb97x", "wB97X", MethodCategory::RangeSeparated),
    "wb97xd" => method!("wb97xd", "wB97XD", MethodCategory::RangeSeparated, dispersion),
};

static BASIS_SETS: Set<&'static str> = phf_set! {
    "3-21G", "6-31G", "6-311++G(2d,2p)", "6-311G(d,p)",
    "6-31G(d)", "6-31G(d,p)", "Clementi-Roetti",
    "Coppens", "DZP", "DZP-DKH", "STO-3G", "Sadlej+",
    "Sadlej-PVTZ", "Spackman-DZP+", "TZP-DKH", "Thakkar",
    "VTZ-Ahlrichs", "ahlrichs-polarization", "aug-cc-pVDZ",
    "aug-cc-pVQZ", "aug-cc-pVTZ", "cc-pVDZ", "cc-pVQZ",
    "cc-pVTZ", "def2-SV(P)", "def2-SVP", "def2-TZVP",
    "def2-TZVPP", "def2qzvpp", "pVDZ-Ahlrichs", "vanLenthe-Baerends",
};

impl Method {
    /// Looks up a method by registry name.
    pub fn get(name: &str) -> Option<&'static Method> {
        METHODS.get(name)
    }

    /// Looks up a method, failing fast with [`MethodError::UnknownMethod`].
    pub fn lookup(name: &str) -> Result<&'static Method, MethodError> {
        METHODS
            .get(name)
            .ok_or_else(|| MethodError::UnknownMethod(name.to_string()))
    }

    /// Whether this method's energy is derived from another method's output.
    pub fn is_redundant(&self) -> bool {
        self.redundancy.is_some()
    }

    /// The parent method a redundant method is derived from.
    pub fn parent(&self) -> Option<&'static Method> {
        self.redundancy.and_then(Method::get)
    }
}

/// All registered methods, in no particular order.
pub fn available_methods() -> impl Iterator<Item = &'static Method> {
    METHODS.values()
}

/// The registered methods derived from `parent` (e.g. the scaled MP2 family
/// for "mp2").
pub fn derived_from(parent: &str) -> impl Iterator<Item = &'static Method> {
    METHODS.values().filter(move |m| m.redundancy == Some(parent))
}

/// Validates a basis-set name against the known list.
pub fn validate_basis_set(name: &str) -> Result<(), MethodError> {
    if BASIS_SETS.contains(name) {
        Ok(())
    } else {
        Err(MethodError::InvalidBasisSet(name.to_string()))
    }
}

/// The scaled correlation correction: `os * E2(alpha-beta) + ss *
/// (E2(alpha-alpha) + E2(beta-beta))`, or `None` when a spin pair is missing
/// from the parsed table.
pub fn scaled_correction(components: &SpinComponents, scaling: SpinScaling) -> Option<f64> {
    let opposite = components.get("alpha-beta")?.e2;
    let same = components.get("alpha-alpha")?.e2 + components.get("beta-beta")?.e2;
    Some(scaling.opposite_spin * opposite + scaling.same_spin * same)
}

/// An optional, externally supplied empirical dispersion correction.
///
/// Corrections are queried by method name; a missing entry degrades the
/// feature (the uncorrected energy is used) rather than failing the run.
pub trait DispersionCorrection {
    /// The method name this correction applies to.
    fn name(&self) -> &str;
    /// The correction energy in Hartrees for the given geometry.
    fn energy(&self, geometry: &Geometry) -> f64;
}

/// The set of installed dispersion corrections.
#[derive(Default)]
pub struct DispersionRegistry {
    corrections: HashMap<String, Box<dyn DispersionCorrection>>,
}

impl DispersionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, correction: Box<dyn DispersionCorrection>) {
        self.corrections
            .insert(correction.name().to_string(), correction);
    }

    /// The correction registered for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&dyn DispersionCorrection> {
        self.corrections.get(name).map(|c| c.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::log::SpinComponent;
    use approx::assert_relative_eq;

    #[test]
    fn lookup_known_and_unknown_methods() {
        let mp2 = Method::lookup("mp2").unwrap();
        assert_eq!(mp2.keywords, "MP2");
        assert_eq!(mp2.category, MethodCategory::AbInitio);
        assert!(!mp2.is_redundant());

        let err = Method::lookup("mp17").unwrap_err();
        assert_eq!(err, MethodError::UnknownMethod("mp17".to_string()));
    }

    #[test]
    fn scaled_variants_point_back_at_mp2() {
        for name in ["scs-mp2", "sos-mp2", "scs(mi)-mp2", "s2-mp2"] {
            let method = Method::lookup(name).unwrap();
            assert!(method.is_redundant(), "{name} should be derived");
            assert_eq!(method.parent().unwrap().name, "mp2");
            assert!(method.correction.is_some());
        }
        assert_eq!(derived_from("mp2").count(), 5);
    }

    #[test]
    fn scaling_coefficients_match_the_published_values() {
        let scs = Method::lookup("scs-mp2").unwrap();
        assert_eq!(scs.category, MethodCategory::AbInitio);
        let scaling = scs.correction.unwrap();
        assert_relative_eq!(scaling.opposite_spin, 1.2);
        assert_relative_eq!(scaling.same_spin, 1.0 / 3.0);

        let sos = Method::lookup("sos-mp2").unwrap().correction.unwrap();
        assert_relative_eq!(sos.opposite_spin, 1.3);
        assert_relative_eq!(sos.same_spin, 0.0);
    }

    #[test]
    fn basis_set_validation() {
        assert!(validate_basis_set("cc-pVTZ").is_ok());
        assert_eq!(
            validate_basis_set("cc-pV8Z").unwrap_err(),
            MethodError::InvalidBasisSet("cc-pV8Z".to_string())
        );
    }

    #[test]
    fn scaled_correction_combines_spin_pairs() {
        let mut components = SpinComponents::new();
        components.insert("alpha-beta".into(), SpinComponent { t2: 0.0, e2: -0.020 });
        components.insert("alpha-alpha".into(), SpinComponent { t2: 0.0, e2: -0.005 });
        components.insert("beta-beta".into(), SpinComponent { t2: 0.0, e2: -0.005 });

        let scaling = SpinScaling {
            opposite_spin: 1.2,
            same_spin: 0.333,
        };
        let correction = scaled_correction(&components, scaling).unwrap();
        assert_relative_eq!(correction, -0.02733, epsilon = 1e-12);

        components.remove("beta-beta");
        assert!(scaled_correction(&components, scaling).is_none());
    }

    #[test]
    fn dispersion_registry_degrades_gracefully() {
        struct FixedShift;
        impl DispersionCorrection for FixedShift {
            fn name(&self) -> &str {
                "b3lyp"
            }
            fn energy(&self, _geometry: &Geometry) -> f64 {
                -0.001
            }
        }

        let mut registry = DispersionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("b3lyp").is_none());

        registry.register(Box::new(FixedShift));
        let correction = registry.get("b3lyp").unwrap();
        let geom = Geometry::new(Vec::new(), 0, 1);
        assert_relative_eq!(correction.energy(&geom), -0.001);
        assert!(registry.get("blyp").is_none());
    }
}
