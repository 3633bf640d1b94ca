//! Stoichiometric reaction energies over computed species.

use super::WorkflowError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A named reaction: weighted reactant and product species. Species names
/// refer to entries in a caller-supplied energy table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reaction {
    #[serde(default)]
    pub name: String,
    pub reactants: Vec<(String, f64)>,
    pub products: Vec<(String, f64)>,
}

impl Reaction {
    /// The reaction energy `Σ coeff·E(products) − Σ coeff·E(reactants)`.
    /// A species missing from the table is an error naming the species.
    pub fn energy(&self, energies: &HashMap<String, f64>) -> Result<f64, WorkflowError> {
        let mut total = 0.0;
        for (species, coefficient) in &self.products {
            total += coefficient * lookup(energies, species)?;
        }
        for (species, coefficient) in &self.reactants {
            total -= coefficient * lookup(energies, species)?;
        }
        Ok(total)
    }
}

fn lookup(energies: &HashMap<String, f64>, species: &str) -> Result<f64, WorkflowError> {
    energies
        .get(species)
        .copied()
        .ok_or_else(|| WorkflowError::MissingSpecies(species.to_string()))
}

/// Loads reactions from a JSON file mapping reaction names to their
/// reactant/product stoichiometries.
pub fn load_reactions(path: impl AsRef<Path>) -> Result<Vec<Reaction>, WorkflowError> {
    let contents = std::fs::read_to_string(path)?;
    let table: HashMap<String, Reaction> = serde_json::from_str(&contents)?;
    let mut reactions: Vec<Reaction> = table
        .into_iter()
        .map(|(name, mut reaction)| {
            reaction.name = name;
            reaction
        })
        .collect();
    reactions.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(reactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn energies() -> HashMap<String, f64> {
        HashMap::from([
            ("h2".to_string(), -1.17),
            ("o2".to_string(), -150.32),
            ("h2o".to_string(), -76.42),
        ])
    }

    fn combustion() -> Reaction {
        Reaction {
            name: "combustion".to_string(),
            reactants: vec![("h2".to_string(), 2.0), ("o2".to_string(), 1.0)],
            products: vec![("h2o".to_string(), 2.0)],
        }
    }

    #[test]
    fn products_minus_reactants() {
        let energy = combustion().energy(&energies()).unwrap();
        assert_relative_eq!(
            energy,
            2.0 * -76.42 - (2.0 * -1.17 + -150.32),
            epsilon = 1e-12
        );
    }

    #[test]
    fn missing_species_names_the_offender() {
        let mut table = energies();
        table.remove("o2");
        let err = combustion().energy(&table).unwrap_err();
        assert!(matches!(err, WorkflowError::MissingSpecies(s) if s == "o2"));
    }

    #[test]
    fn loads_reactions_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reactions.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"{{
  "water formation": {{
    "reactants": [["h2", 2.0], ["o2", 1.0]],
    "products": [["h2o", 2.0]]
  }}
}}"#
        )
        .unwrap();

        let reactions = load_reactions(&path).unwrap();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].name, "water formation");
        assert_eq!(reactions[0].products, vec![("h2o".to_string(), 2.0)]);
    }
}
