//! Parser for the text logs written by the external engine.
//!
//! A [`LogFile`] owns the raw line sequence and computes each derived result
//! (primary energy, convergence status, spin-component table) lazily, caching
//! the outcome of the first computation. Absence of a required marker is a
//! permanent failure: the cache stores the error itself, so a field that
//! failed once fails identically on every subsequent access without
//! re-scanning the file.

use super::{FileErrorKind, FileFormatError, LineFormatError};
use regex::Regex;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Fixed prefix of a self-consistent-field energy line.
const SCF_DONE: &str = " SCF Done:";
/// Literal substring signalling that the SCF procedure gave up.
const CONVERGENCE_FAILURE: &str = "Convergence criterion not met";
/// Header preceding the three spin-component lines of an MP2 calculation.
const SPIN_COMPONENT_HEADER: &str = "Spin components of T(2) and E(2):";
/// Two SCF checkpoints closer than this (relative) still count as converged
/// even when the failure marker is present.
const CHECKPOINT_TOLERANCE: f64 = 0.30;

/// Archive patterns for the two keywords looked up on every parse: the
/// reference energy and the correlated MP2 energy. Other keywords compile
/// their pattern on demand.
static HF_ARCHIVE: LazyLock<Regex> = LazyLock::new(|| archive_pattern("HF"));
static MP2_ARCHIVE: LazyLock<Regex> = LazyLock::new(|| archive_pattern("MP2"));

/// The `\KEY=value\` pattern for one archive keyword. Escaping makes the
/// pattern valid for any keyword.
fn archive_pattern(keyword: &str) -> Regex {
    Regex::new(&format!(
        r"\\\s*{}\s*=\s*([-+.\d\sEeDd]+?)\\",
        regex::escape(keyword)
    ))
    .expect("escaped archive pattern is always valid")
}

/// One spin-pair entry of the MP2 spin-component decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinComponent {
    /// The T2 amplitude norm for this spin pair.
    pub t2: f64,
    /// The E2 correlation energy contribution in Hartrees.
    pub e2: f64,
}

/// Mapping from spin-pair label ("alpha-beta", ...) to its component entry.
pub type SpinComponents = HashMap<String, SpinComponent>;

/// An engine output log with lazily computed, cached derived fields.
#[derive(Debug)]
pub struct LogFile {
    filename: String,
    lines: Vec<String>,
    scf_energy: OnceCell<Result<f64, FileFormatError>>,
    converged: OnceCell<bool>,
    spin_components: OnceCell<Result<SpinComponents, FileFormatError>>,
    archive_energies: RefCell<HashMap<String, Option<f64>>>,
}

impl LogFile {
    /// Reads a log file from disk. The raw lines are immutable once read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileFormatError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let contents =
            fs::read_to_string(path).map_err(|e| FileFormatError::io(&filename, e))?;
        Ok(Self::from_text(&contents, &filename))
    }

    /// Builds a log from raw text, for outputs captured in memory.
    pub fn from_text(text: &str, filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            lines: text.lines().map(str::to_string).collect(),
            scf_energy: OnceCell::new(),
            converged: OnceCell::new(),
            spin_components: OnceCell::new(),
            archive_energies: RefCell::new(HashMap::new()),
        }
    }

    /// The raw line sequence of this log.
    pub fn contents(&self) -> &[String] {
        &self.lines
    }

    /// The name of the source file.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The primary self-consistent-field energy in Hartrees.
    ///
    /// Looks for the ` SCF Done:` marker line first and falls back to the
    /// `HF=` keyword of an archive record. Computed once; a failure is cached
    /// and returned unchanged on every later call.
    pub fn scf_energy(&self) -> Result<f64, FileFormatError> {
        self.scf_energy
            .get_or_init(|| self.find_scf_energy())
            .clone()
    }

    /// The energy stored in the archive record under `keyword` (e.g. "MP2"),
    /// used for correlated methods whose result never appears on a marker
    /// line. Cached per keyword.
    pub fn correlated_energy(&self, keyword: &str) -> Result<f64, FileFormatError> {
        self.archive_energy(keyword).ok_or_else(|| {
            FileFormatError::new(&self.filename, self.lines.len(), FileErrorKind::MissingEnergy)
        })
    }

    /// Whether the calculation converged.
    ///
    /// Unconditionally true when the failure marker is absent. When present,
    /// the log is still accepted if at least two SCF checkpoints exist and
    /// the two most recent ones agree to within 30% relative difference.
    pub fn converged(&self) -> bool {
        *self.converged.get_or_init(|| {
            if !self
                .lines
                .iter()
                .any(|l| l.contains(CONVERGENCE_FAILURE))
            {
                return true;
            }
            let checkpoints = self.scf_checkpoints();
            let [.., previous, last] = checkpoints[..] else {
                return false;
            };
            ((previous - last) / last).abs() <= CHECKPOINT_TOLERANCE
        })
    }

    /// The MP2 spin-component decomposition, keyed by spin-pair label.
    ///
    /// The three lines following the fixed header each contribute one entry;
    /// a missing header is a permanent file-level failure.
    pub fn spin_components(&self) -> Result<SpinComponents, FileFormatError> {
        self.spin_components
            .get_or_init(|| self.find_spin_components())
            .clone()
    }

    fn find_scf_energy(&self) -> Result<f64, FileFormatError> {
        for (i, line) in self.lines.iter().enumerate() {
            if line.starts_with(SCF_DONE) {
                return parse_scf_energy_line(line).map_err(|e| {
                    FileFormatError::new(&self.filename, i + 1, FileErrorKind::Line(e))
                });
            }
        }
        self.correlated_energy("HF")
    }

    /// Every SCF checkpoint value, in file order. Unparseable marker lines
    /// are skipped here; they only fail hard through [`Self::scf_energy`].
    fn scf_checkpoints(&self) -> Vec<f64> {
        self.lines
            .iter()
            .filter(|l| l.starts_with(SCF_DONE))
            .filter_map(|l| parse_scf_energy_line(l).ok())
            .collect()
    }

    fn find_spin_components(&self) -> Result<SpinComponents, FileFormatError> {
        let header = self
            .lines
            .iter()
            .position(|l| l.contains(SPIN_COMPONENT_HEADER))
            .ok_or_else(|| {
                FileFormatError::new(
                    &self.filename,
                    self.lines.len(),
                    FileErrorKind::MissingSpinComponents,
                )
            })?;

        let mut components = HashMap::with_capacity(3);
        for offset in 1..=3 {
            let number = header + offset + 1;
            let line = self.lines.get(header + offset).ok_or_else(|| {
                FileFormatError::new(
                    &self.filename,
                    self.lines.len(),
                    FileErrorKind::MissingSpinComponents,
                )
            })?;
            let (label, component) = parse_spin_component_line(line).map_err(|e| {
                FileFormatError::new(&self.filename, number, FileErrorKind::Line(e))
            })?;
            components.insert(label, component);
        }
        Ok(components)
    }

    /// Scans the backslash-delimited archive record for `KEY=value`. Line
    /// wrapping may inject whitespace anywhere inside the value, so the
    /// pattern tolerates it and the capture is stripped before conversion.
    fn archive_energy(&self, keyword: &str) -> Option<f64> {
        if let Some(cached) = self.archive_energies.borrow().get(keyword) {
            return *cached;
        }
        let value = match keyword {
            "HF" => self.capture_archive(&HF_ARCHIVE),
            "MP2" => self.capture_archive(&MP2_ARCHIVE),
            other => self.capture_archive(&archive_pattern(other)),
        };
        self.archive_energies
            .borrow_mut()
            .insert(keyword.to_string(), value);
        value
    }

    fn capture_archive(&self, pattern: &Regex) -> Option<f64> {
        let text = self.lines.join("\n");
        let value = pattern
            .captures(&text)
            .map(|c| c[1].split_whitespace().collect::<String>())?;
        parse_fortran_float(&value).ok()
    }
}

/// Parses the ` SCF Done:  E(RHF) =  -76.0236 ...` marker line, returning
/// the energy as the fixed-position fifth token.
fn parse_scf_energy_line(line: &str) -> Result<f64, LineFormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let token = tokens.get(4).ok_or(LineFormatError::TokenCount {
        found: tokens.len(),
        expected: 5,
    })?;
    token.parse().map_err(|_| LineFormatError::InvalidNumber {
        value: token.to_string(),
    })
}

/// Parses one spin-component line, e.g.
/// `alpha-beta  T2 =  0.2005D-01 E2= -0.8960D-01`: the label, the fourth
/// token (T2) and the final token (E2), both in Fortran exponent notation.
fn parse_spin_component_line(line: &str) -> Result<(String, SpinComponent), LineFormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 {
        return Err(LineFormatError::TokenCount {
            found: tokens.len(),
            expected: 6,
        });
    }
    let t2 = parse_fortran_float(tokens[3])?;
    let e2 = parse_fortran_float(tokens[tokens.len() - 1])?;
    Ok((tokens[0].to_string(), SpinComponent { t2, e2 }))
}

/// Parses a float that may use the Fortran exponent letter (`1.0D-02`).
fn parse_fortran_float(token: &str) -> Result<f64, LineFormatError> {
    token
        .replace(['D', 'd'], "E")
        .parse()
        .map_err(|_| LineFormatError::InvalidNumber {
            value: token.to_string(),
        })
}
