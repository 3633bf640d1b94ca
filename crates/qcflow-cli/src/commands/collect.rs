use crate::cli::CollectArgs;
use crate::error::{CliError, Result};
use qcflow::core::io::log::LogFile;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One collected calculation, keyed by the log's basename in the table.
#[derive(Debug, Serialize)]
pub(crate) struct EnergyRecord {
    pub energy: f64,
    pub converged: bool,
}

pub fn run(args: CollectArgs) -> Result<()> {
    let table = collect_energies(&args)?;
    let json = serde_json::to_string_pretty(&table)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("wrote {} energies to '{}'", table.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Parses every `.log` file under the directory. Files without a readable
/// energy are skipped with a warning; a malformed file never aborts the
/// collection.
fn collect_energies(args: &CollectArgs) -> Result<BTreeMap<String, EnergyRecord>> {
    let mut table = BTreeMap::new();
    for path in super::files_with_extension(&args.logs, "log")? {
        let name = super::job_name(&path);
        let log = match LogFile::open(&path) {
            Ok(log) => log,
            Err(e) => {
                warn!("skipping '{}': {}", path.display(), e);
                continue;
            }
        };
        match log.scf_energy() {
            Ok(energy) => {
                let converged = log.converged();
                if !converged {
                    info!("'{}' did not converge", name);
                }
                table.insert(name, EnergyRecord { energy, converged });
            }
            Err(e) => warn!("skipping '{}': {}", path.display(), e),
        }
    }
    if table.is_empty() {
        return Err(CliError::Argument(format!(
            "no readable energies under '{}'",
            args.logs.display()
        )));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_LOG: &str =
        " SCF Done:  E(RHF) =  -76.0236441885     A.U. after   11 cycles\n";

    #[test]
    fn collects_energies_keyed_by_basename() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("h2o_hf.log"), GOOD_LOG).unwrap();
        std::fs::write(dir.path().join("empty.log"), "nothing here\n").unwrap();

        let table = collect_energies(&CollectArgs {
            logs: dir.path().to_path_buf(),
            output: None,
        })
        .unwrap();

        assert_eq!(table.len(), 1);
        let record = &table["h2o_hf"];
        assert!(record.converged);
        assert!((record.energy - -76.0236441885).abs() < 1e-12);
    }

    #[test]
    fn writes_the_table_to_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("h2o_hf.log"), GOOD_LOG).unwrap();
        let out = dir.path().join("energies.json");

        run(CollectArgs {
            logs: dir.path().to_path_buf(),
            output: Some(out.clone()),
        })
        .unwrap();

        let json = std::fs::read_to_string(out).unwrap();
        assert!(json.contains("\"h2o_hf\""));
        assert!(json.contains("\"converged\": true"));
    }

    #[test]
    fn all_unreadable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junk.log"), "no markers\n").unwrap();

        let err = collect_energies(&CollectArgs {
            logs: dir.path().to_path_buf(),
            output: None,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
    }
}
