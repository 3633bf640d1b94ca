use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use qcflow::core::methods;
use qcflow::core::models::geometry::Geometry;
use qcflow::engine::template::{InputRenderer, RenderContext, SinglePointDeck};
use tracing::{debug, info};

pub fn run(args: GenerateArgs) -> Result<()> {
    methods::validate_basis_set(&args.basis_set)
        .map_err(|e| CliError::Argument(e.to_string()))?;
    let selected = super::selected_methods(&args.methods)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.geometries.clone());
    std::fs::create_dir_all(&output)?;

    let mut written = 0usize;
    for path in super::files_with_extension(&args.geometries, "xyz")? {
        let geometry = Geometry::from_xyz_file(&path).map_err(|source| CliError::FileParsing {
            path: path.clone(),
            source,
        })?;
        let name = super::job_name(&path);
        info!(
            "generating decks for '{}' ({}, {} atoms)",
            name,
            geometry.molecular_formula(),
            geometry.n_atoms()
        );

        for &method in &selected {
            let context = RenderContext {
                name: &name,
                method,
                basis_set: &args.basis_set,
                geometry: Some(&geometry),
            };
            let deck = SinglePointDeck.render(&context)?;
            let file = output.join(format!("{}_{}_{}.gjf", name, method.name, args.basis_set));
            debug!("writing '{}'", file.display());
            std::fs::write(&file, deck)?;
            written += 1;
        }
    }

    println!("wrote {written} input decks to '{}'", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_XYZ: &str = "3\nwater\nO 0.0 0.0 0.11779\nH 0.0 0.75545 -0.47116\nH 0.0 -0.75545 -0.47116\n";

    #[test]
    fn writes_one_deck_per_geometry_and_method() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("h2o.xyz"), WATER_XYZ).unwrap();
        let out = dir.path().join("decks");

        run(GenerateArgs {
            geometries: dir.path().to_path_buf(),
            output: Some(out.clone()),
            methods: vec!["hf".to_string(), "b3lyp".to_string()],
            basis_set: "cc-pVDZ".to_string(),
        })
        .unwrap();

        let deck = std::fs::read_to_string(out.join("h2o_b3lyp_cc-pVDZ.gjf")).unwrap();
        assert!(deck.starts_with("#P B3LYP/cc-pVDZ"));
        assert!(out.join("h2o_hf_cc-pVDZ.gjf").exists());
    }

    #[test]
    fn bad_basis_set_fails_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(GenerateArgs {
            geometries: dir.path().to_path_buf(),
            output: None,
            methods: Vec::new(),
            basis_set: "cc-pV8Z".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
    }

    #[test]
    fn malformed_geometry_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.xyz"), "two\nlines\n").unwrap();
        let err = run(GenerateArgs {
            geometries: dir.path().to_path_buf(),
            output: None,
            methods: vec!["hf".to_string()],
            basis_set: "cc-pVDZ".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }
}
