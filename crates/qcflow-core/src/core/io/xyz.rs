//! Parser for the XYZ positional geometry format.
//!
//! Line 1 is the decimal atom count, line 2 a free-form comment, and every
//! following non-blank line one atom: an element symbol and three floats.
//! The comment line is additionally tried as dual-purpose metadata (a JSON
//! record or two bare integers giving charge and multiplicity); failure to
//! parse the metadata is silently ignored and never a file error.

use super::{FileErrorKind, FileFormatError, LineFormatError};
use crate::core::models::atom::Atom;
use nalgebra::Point3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The deuterium symbol, normalized to hydrogen before element lookup.
const DEUTERIUM: &str = "D";

#[derive(Debug, Deserialize)]
struct CommentMetadata {
    charge: i32,
    multiplicity: u32,
}

/// An XYZ file: atoms, the verbatim comment line, and the charge and
/// multiplicity recovered from the comment (or their defaults, 0 and 1).
#[derive(Debug, Clone, PartialEq)]
pub struct XyzFile {
    pub filename: String,
    pub atoms: Vec<Atom>,
    pub comment: String,
    pub charge: i32,
    pub multiplicity: u32,
}

impl XyzFile {
    /// Reads and parses an XYZ file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileFormatError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let contents =
            fs::read_to_string(path).map_err(|e| FileFormatError::io(&filename, e))?;
        let lines: Vec<&str> = contents.lines().collect();
        let (atoms, comment) = Self::parse_lines(&lines, &filename)?;
        let (charge, multiplicity) = comment_metadata(&comment).unwrap_or((0, 1));
        Ok(Self {
            filename,
            atoms,
            comment,
            charge,
            multiplicity,
        })
    }

    /// Parses XYZ content line by line, returning the atoms and the verbatim
    /// comment string.
    ///
    /// The number of successfully parsed atom lines must equal the declared
    /// count; blank atom lines are skipped. Line-level failures are wrapped
    /// into a [`FileFormatError`] carrying the offending line number.
    pub fn parse_lines(
        lines: &[&str],
        filename: &str,
    ) -> Result<(Vec<Atom>, String), FileFormatError> {
        if lines.len() < 2 {
            return Err(FileFormatError::new(
                filename,
                lines.len(),
                FileErrorKind::MissingHeader,
            ));
        }
        let declared: usize = lines[0].trim().parse().map_err(|_| {
            FileFormatError::new(
                filename,
                1,
                FileErrorKind::InvalidAtomCount(lines[0].trim().to_string()),
            )
        })?;
        let comment = lines[1].to_string();

        let mut atoms = Vec::with_capacity(declared);
        let mut current_line = 2;
        for (i, line) in lines.iter().enumerate().skip(2) {
            current_line = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            let atom = parse_atom_line(line.trim(), None).map_err(|e| {
                FileFormatError::new(filename, current_line, FileErrorKind::Line(e))
            })?;
            atoms.push(atom);
        }

        if atoms.len() != declared {
            return Err(FileFormatError::new(
                filename,
                current_line,
                FileErrorKind::AtomCount {
                    found: atoms.len(),
                    declared,
                },
            ));
        }
        Ok((atoms, comment))
    }
}

/// Parses a single atom line: an element symbol followed by exactly three
/// floating-point coordinates, separated by whitespace or by `delimiter`
/// when one is given.
///
/// The deuterium symbol `D` is normalized to `H` before element lookup.
pub fn parse_atom_line(line: &str, delimiter: Option<&str>) -> Result<Atom, LineFormatError> {
    let tokens: Vec<&str> = match delimiter {
        Some(sep) => line.split(sep).map(str::trim).collect(),
        None => line.split_whitespace().collect(),
    };
    if tokens.len() != 4 {
        return Err(LineFormatError::TokenCount {
            found: tokens.len(),
            expected: 4,
        });
    }
    let mut coords = [0.0; 3];
    for (slot, token) in coords.iter_mut().zip(&tokens[1..]) {
        *slot = token.parse().map_err(|_| LineFormatError::InvalidNumber {
            value: token.to_string(),
        })?;
    }
    let symbol = if tokens[0] == DEUTERIUM { "H" } else { tokens[0] };
    Atom::from_symbol(symbol, Point3::new(coords[0], coords[1], coords[2])).ok_or_else(|| {
        LineFormatError::UnknownElement {
            symbol: tokens[0].to_string(),
        }
    })
}

fn comment_metadata(comment: &str) -> Option<(i32, u32)> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(meta) = serde_json::from_str::<CommentMetadata>(trimmed) {
        return Some((meta.charge, meta.multiplicity));
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() == 2
        && let (Ok(charge), Ok(multiplicity)) = (tokens[0].parse(), tokens[1].parse())
    {
        return Some((charge, multiplicity));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const WATER: &str = "3\nwater molecule\nO 0.0 0.0 0.11779\nH 0.0 0.75545 -0.47116\nH 0.0 -0.75545 -0.47116\n";

    fn write_xyz(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{}", contents).unwrap();
        path
    }

    #[test]
    fn parses_well_formed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_xyz(&dir, "water.xyz", WATER);
        let xyz = XyzFile::open(&path).unwrap();
        assert_eq!(xyz.atoms.len(), 3);
        assert_eq!(xyz.comment, "water molecule");
        assert_eq!(xyz.atoms[0].element.symbol, "O");
        assert_eq!(xyz.atoms[1].element.symbol, "H");
        assert_eq!((xyz.charge, xyz.multiplicity), (0, 1));
    }

    #[test]
    fn atom_count_mismatch_cites_last_line() {
        let lines = ["2", "comment", "H 0.0 0.0 0.0"];
        let err = XyzFile::parse_lines(&lines, "bad.xyz").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(
            err.kind,
            FileErrorKind::AtomCount {
                found: 1,
                declared: 2
            }
        );
    }

    #[test]
    fn parse_atom_line_requires_four_tokens() {
        let atom = parse_atom_line("H 0.0 0.0 0.0", None).unwrap();
        assert_eq!(atom.element.symbol, "H");
        assert_eq!(atom.position, Point3::new(0.0, 0.0, 0.0));

        let err = parse_atom_line("H 0.0 0.0", None).unwrap_err();
        assert_eq!(
            err,
            LineFormatError::TokenCount {
                found: 3,
                expected: 4
            }
        );
        let err = parse_atom_line("H 0.0 0.0 0.0 0.0", None).unwrap_err();
        assert_eq!(
            err,
            LineFormatError::TokenCount {
                found: 5,
                expected: 4
            }
        );
    }

    #[test]
    fn parse_atom_line_with_custom_delimiter() {
        let atom = parse_atom_line("C, 1.5, 3.2, 5", Some(",")).unwrap();
        assert_eq!(atom.element.symbol, "C");
        assert_eq!(atom.position, Point3::new(1.5, 3.2, 5.0));
    }

    #[test]
    fn deuterium_becomes_hydrogen() {
        let atom = parse_atom_line("D 0.0 0.0 1.0", None).unwrap();
        assert_eq!(atom.element.symbol, "H");
    }

    #[test]
    fn unknown_element_is_a_line_error_wrapped_with_context() {
        let err = parse_atom_line("Qq 0.0 0.0 0.0", None).unwrap_err();
        assert_eq!(
            err,
            LineFormatError::UnknownElement {
                symbol: "Qq".to_string()
            }
        );

        let lines = ["1", "", "Qq 0.0 0.0 0.0"];
        let err = XyzFile::parse_lines(&lines, "bad.xyz").unwrap_err();
        assert_eq!(err.filename, "bad.xyz");
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, FileErrorKind::Line(_)));
    }

    #[test]
    fn json_comment_metadata_sets_charge_and_multiplicity() {
        let contents =
            "1\n{\"charge\": -1, \"multiplicity\": 2}\nH 0.0 0.0 0.0\n";
        let dir = tempfile::tempdir().unwrap();
        let path = write_xyz(&dir, "anion.xyz", contents);
        let xyz = XyzFile::open(&path).unwrap();
        assert_eq!((xyz.charge, xyz.multiplicity), (-1, 2));
    }

    #[test]
    fn two_integer_comment_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_xyz(&dir, "cation.xyz", "1\n1 2\nH 0.0 0.0 0.0\n");
        let xyz = XyzFile::open(&path).unwrap();
        assert_eq!((xyz.charge, xyz.multiplicity), (1, 2));
    }

    #[test]
    fn unparseable_comment_metadata_is_silently_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_xyz(
            &dir,
            "plain.xyz",
            "1\nnot metadata at all\nH 0.0 0.0 0.0\n",
        );
        let xyz = XyzFile::open(&path).unwrap();
        assert_eq!((xyz.charge, xyz.multiplicity), (0, 1));
        assert_eq!(xyz.comment, "not metadata at all");
    }

    #[test]
    fn invalid_atom_count_line() {
        let lines = ["three", "comment"];
        let err = XyzFile::parse_lines(&lines, "bad.xyz").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(
            err.kind,
            FileErrorKind::InvalidAtomCount("three".to_string())
        );
    }

    #[test]
    fn truncated_file_is_a_header_error() {
        let err = XyzFile::parse_lines(&["3"], "tiny.xyz").unwrap_err();
        assert_eq!(err.kind, FileErrorKind::MissingHeader);
    }
}
