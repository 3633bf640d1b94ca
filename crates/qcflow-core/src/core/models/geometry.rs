use super::atom::Atom;
use super::element::Element;
use crate::core::io::FileFormatError;
use crate::core::io::xyz::XyzFile;
use std::collections::BTreeMap;
use std::path::Path;

/// How atom lines should be rendered when writing an input deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// Gaussian-style: symbol, two spaces, three fixed-width coordinates.
    #[default]
    Gaussian,
    /// Tonto-style: symbol immediately followed by the coordinates.
    Tonto,
}

/// A molecular geometry: an ordered group of atoms plus the total charge and
/// spin multiplicity of the system.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// The atoms, in input order.
    pub atoms: Vec<Atom>,
    /// Total charge of the system.
    pub charge: i32,
    /// Spin multiplicity (2S + 1).
    pub multiplicity: u32,
}

impl Geometry {
    /// Creates a geometry from a list of atoms with the given charge and
    /// multiplicity.
    pub fn new(atoms: Vec<Atom>, charge: i32, multiplicity: u32) -> Self {
        Self {
            atoms,
            charge,
            multiplicity,
        }
    }

    /// Reads a geometry from an XYZ file, taking charge and multiplicity from
    /// the comment line when present (defaulting to 0 and 1 otherwise).
    pub fn from_xyz_file(path: impl AsRef<Path>) -> Result<Self, FileFormatError> {
        let xyz = XyzFile::open(path)?;
        Ok(Self {
            atoms: xyz.atoms,
            charge: xyz.charge,
            multiplicity: xyz.multiplicity,
        })
    }

    /// The number of atoms in this geometry.
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// The elements of this geometry, in atom order.
    pub fn elements(&self) -> Vec<Element> {
        self.atoms.iter().map(|a| a.element).collect()
    }

    /// The molecular formula, with element symbols in alphabetical order
    /// (e.g. "H2O").
    pub fn molecular_formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.symbol).or_insert(0) += 1;
        }
        let mut formula = String::new();
        for (symbol, count) in counts {
            formula.push_str(symbol);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        }
        formula
    }

    /// Renders the atoms line by line in the requested deck format.
    pub fn as_lines(&self, format: LineFormat) -> Vec<String> {
        self.atoms
            .iter()
            .map(|a| match format {
                LineFormat::Gaussian => format!(
                    "{:<2}  {:>12.7}  {:>12.7}  {:>12.7}",
                    a.element.symbol, a.position.x, a.position.y, a.position.z
                ),
                LineFormat::Tonto => format!(
                    "{:<2}{:>12.7}  {:>12.7}  {:>12.7}",
                    a.element.symbol, a.position.x, a.position.y, a.position.z
                ),
            })
            .collect()
    }
}
