//! The injected input-rendering capability.
//!
//! Jobs do not know how to write input decks themselves; they carry an
//! [`InputRenderer`] strategy that turns a [`RenderContext`] into the text of
//! the deck. The library ships a Gaussian single-point renderer and a Tonto
//! keyword-block renderer; callers may inject anything else, including a
//! plain closure.

use super::error::EngineError;
use crate::core::methods::Method;
use crate::core::models::geometry::{Geometry, LineFormat};

/// Everything a renderer may draw on when producing an input deck.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The caller-assigned job name, used as the deck title.
    pub name: &'a str,
    /// The method descriptor being run.
    pub method: &'static Method,
    /// The basis-set name.
    pub basis_set: &'a str,
    /// The molecular geometry, when the job carries one.
    pub geometry: Option<&'a Geometry>,
}

/// The external `render(context) → text` collaborator.
pub trait InputRenderer {
    fn render(&self, context: &RenderContext) -> Result<String, EngineError>;
}

impl<F> InputRenderer for F
where
    F: Fn(&RenderContext) -> Result<String, EngineError>,
{
    fn render(&self, context: &RenderContext) -> Result<String, EngineError> {
        self(context)
    }
}

/// Renders a single-point-energy input deck: route line, title, charge and
/// multiplicity, then one line per atom.
#[derive(Debug, Default, Clone, Copy)]
pub struct SinglePointDeck;

impl InputRenderer for SinglePointDeck {
    fn render(&self, context: &RenderContext) -> Result<String, EngineError> {
        let geometry = context.geometry.ok_or_else(|| {
            EngineError::Render(format!(
                "job '{}' has no geometry to render",
                context.name
            ))
        })?;

        let mut route = format!("#P {}/{}", context.method.keywords, context.basis_set);
        if !context.method.additional_keywords.is_empty() {
            route.push(' ');
            route.push_str(context.method.additional_keywords);
        }

        let mut deck = format!(
            "{route}\n\n{title}\n\n{charge} {multiplicity}\n",
            title = context.name,
            charge = geometry.charge,
            multiplicity = geometry.multiplicity,
        );
        for line in geometry.as_lines(LineFormat::Gaussian) {
            deck.push_str(&line);
            deck.push('\n');
        }
        // the engine requires a trailing blank line
        deck.push('\n');
        Ok(deck)
    }
}

/// Renders a Tonto keyword-block input deck.
///
/// Tonto input is a tree of `key= value` pairs and `{ }` blocks. The atoms
/// land in an `atoms=` block, followed by a fixed `scfdata=` block whose
/// `kind=` is the lowercased method keyword, then the `scf` and
/// `delete_scf_archives` directives.
#[derive(Debug, Default, Clone, Copy)]
pub struct TontoDeck;

impl InputRenderer for TontoDeck {
    fn render(&self, context: &RenderContext) -> Result<String, EngineError> {
        let geometry = context.geometry.ok_or_else(|| {
            EngineError::Render(format!(
                "job '{}' has no geometry to render",
                context.name
            ))
        })?;

        let mut deck = format!(
            "name= {name}\n\ncharge= {charge}\nmultiplicity= {multiplicity}\n\nbasis_name= {basis}\n\n",
            name = context.name,
            charge = geometry.charge,
            multiplicity = geometry.multiplicity,
            basis = context.basis_set,
        );

        deck.push_str("atoms= {\n  keys= { label= { axyz= } }\n  data= {\n");
        for line in geometry.as_lines(LineFormat::Tonto) {
            deck.push_str("    ");
            deck.push_str(&line);
            deck.push('\n');
        }
        deck.push_str("  }\n}\n\n");

        deck.push_str("scfdata= {\n  initial_density= promolecule\n");
        deck.push_str(&format!("  kind= {}\n", context.method.keywords.to_lowercase()));
        deck.push_str(
            "  direct= on\n  convergence= 0.00001\n  diis= {\n    convergence_tolerance= 0.00001\n  }\n  output= NO\n  output_results= YES\n}\n",
        );
        deck.push_str("scf\ndelete_scf_archives\n");
        Ok(deck)
    }
}
