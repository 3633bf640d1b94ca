use phf::{Map, phf_map};

/// A chemical element as found in the periodic table.
///
/// Elements are interned as `'static` entries of the built-in table, so the
/// type is `Copy` and comparisons are cheap. Covalent radii are the CCDC
/// values in Angstroms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// The element symbol (e.g. "H", "Cl").
    pub symbol: &'static str,
    /// The atomic number.
    pub atomic_number: u8,
    /// The covalent radius in Angstroms.
    pub covalent_radius: f64,
}

macro_rules! element {
    ($symbol:literal, $number:expr, $radius:expr) => {
        Element {
            symbol: $symbol,
            atomic_number: $number,
            covalent_radius: $radius,
        }
    };
}

static PERIODIC_TABLE: Map<&'static str, Element> = phf_map! {
    "H" => element!("H", 1, 0.23),
    "He" => element!("He", 2, 1.50),
    "Li" => element!("Li", 3, 1.28),
    "Be" => element!("Be", 4, 0.96),
    "B" => element!("B", 5, 0.83),
    "C" => element!("C", 6, 0.68),
    "N" => element!("N", 7, 0.68),
    "O" => element!("O", 8, 0.68),
    "F" => element!("F", 9, 0.64),
    "Ne" => element!("Ne", 10, 1.50),
    "Na" => element!("Na", 11, 1.66),
    "Mg" => element!("Mg", 12, 1.41),
    "Al" => element!("Al", 13, 1.21),
    "Si" => element!("Si", 14, 1.20),
    "P" => element!("P", 15, 1.05),
    "S" => element!("S", 16, 1.02),
    "Cl" => element!("Cl", 17, 0.99),
    "Ar" => element!("Ar", 18, 1.51),
    "K" => element!("K", 19, 2.03),
    "Ca" => element!("Ca", 20, 1.76),
    "Sc" => element!("Sc", 21, 1.70),
    "Ti" => element!("Ti", 22, 1.60),
    "V" => element!("V", 23, 1.53),
    "Cr" => element!("Cr", 24, 1.39),
    "Mn" => element!("Mn", 25, 1.61),
    "Fe" => element!("Fe", 26, 1.52),
    "Co" => element!("Co", 27, 1.26),
    "Ni" => element!("Ni", 28, 1.24),
    "Cu" => element!("Cu", 29, 1.32),
    "Zn" => element!("Zn", 30, 1.22),
    "Ga" => element!("Ga", 31, 1.22),
    "Ge" => element!("Ge", 32, 1.17),
    "As" => element!("As", 33, 1.21),
    "Se" => element!("Se", 34, 1.22),
    "Br" => element!("Br", 35, 1.21),
    "Kr" => element!("Kr", 36, 1.50),
    "I" => element!("I", 53, 1.40),
    "Xe" => element!("Xe", 54, 1.50),
};

impl Element {
    /// Looks up an element by its symbol (case-sensitive, e.g. "Na").
    pub fn from_symbol(symbol: &str) -> Option<Element> {
        PERIODIC_TABLE.get(symbol).copied()
    }

    /// Looks up an element by its atomic number.
    pub fn from_atomic_number(number: u8) -> Option<Element> {
        PERIODIC_TABLE
            .values()
            .find(|e| e.atomic_number == number)
            .copied()
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_symbol() {
        let h = Element::from_symbol("H").unwrap();
        assert_eq!(h.atomic_number, 1);
        assert_eq!(h.covalent_radius, 0.23);
        assert!(Element::from_symbol("Xq").is_none());
    }

    #[test]
    fn lookup_by_number() {
        let o = Element::from_atomic_number(8).unwrap();
        assert_eq!(o.symbol, "O");
        assert!(Element::from_atomic_number(200).is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(Element::from_symbol("h").is_none());
        assert!(Element::from_symbol("CL").is_none());
    }
}
