use super::element::Element;
use nalgebra::Point3;

/// The length unit a coordinate triple is expressed in.
///
/// Geometries read from XYZ files are in Angstroms; Bohr is provided for
/// engines that emit atomic units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    /// Angstroms (1e-10 m), the default for all file formats handled here.
    #[default]
    Angstrom,
    /// Atomic units of length.
    Bohr,
}

/// An atom: an element identity plus a position in 3D space.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element of this atom.
    pub element: Element,
    /// The position of the atom.
    pub position: Point3<f64>,
    /// The unit the position is expressed in.
    pub unit: DistanceUnit,
}

impl Atom {
    /// Creates a new atom with coordinates in Angstroms.
    pub fn new(element: Element, position: Point3<f64>) -> Self {
        Self {
            element,
            position,
            unit: DistanceUnit::default(),
        }
    }

    /// Creates a new atom from an element symbol, returning `None` for
    /// symbols not present in the periodic table.
    pub fn from_symbol(symbol: &str, position: Point3<f64>) -> Option<Self> {
        Element::from_symbol(symbol).map(|element| Self::new(element, position))
    }

    /// This atom's covalent radius in Angstroms.
    pub fn covalent_radius(&self) -> f64 {
        self.element.covalent_radius
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: [{:.7}, {:.7}, {:.7}]",
            self.element, self.position.x, self.position.y, self.position.z
        )
    }
}
