//! Common helpers shared by the aligners: the sequence type, the crate error,
//! minimal FASTA parsing and input validation.
//!
//! ## FASTA
//! The parser is permissive and meant for the small sequence sets the
//! center-star method is practical for. Multi-record inputs are supported and
//! residues are uppercased.
//!
//! ## Examples
//! ```rust
//! use centerstar::parse_fasta;
//! let recs = parse_fasta(">copia\nILDFHE\nKLLH\n>RSV\nYPLREA\n");
//! assert_eq!(recs.len(), 2);
//! assert_eq!(recs[0].residues(), "ILDFHEKLLH");
//! ```

use crate::matrix::SubstitutionTable;

/// Symbol inserted into aligned rows for a gap column.
pub const GAP: char = '-';

/// Errors that can be returned by the algorithms in this crate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MsaError {
    /// Returned for malformed sequences (empty name, gap symbols in raw input).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Returned when a residue has no entry in the substitution table.
    #[error("sequence '{sequence}' has residue '{residue}' at position {position} which is not in the substitution table")]
    UnknownResidue { sequence: String, residue: char, position: usize },
    /// Returned when the center-star combiner receives no sequences.
    #[error("no sequences supplied; a center sequence cannot be chosen")]
    EmptyCollection,
    /// Returned when substitution matrix text cannot be parsed or is not symmetric.
    #[error("invalid substitution matrix: {0}")]
    InvalidMatrix(String),
}

/// An immutable named sequence of residue symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    residues: String,
}

impl Sequence {
    /// Create a sequence; residues are uppercased.
    pub fn new(name: impl Into<String>, residues: impl AsRef<str>) -> Self {
        Self { name: name.into(), residues: residues.as_ref().to_ascii_uppercase() }
    }

    /// Identifier of the sequence (FASTA header token).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Residues as an uppercase string.
    pub fn residues(&self) -> &str {
        &self.residues
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.residues.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.residues.chars()
    }
}

/// Parse a FASTA string into a vector of [`Sequence`].
///
/// *Lines starting with `>` start a new record.* The record name is the first
/// whitespace-delimited token of the header. All other lines are appended
/// (trimmed) to the current sequence. Text before the first header is ignored.
pub fn parse_fasta(text: &str) -> Vec<Sequence> {
    let mut out: Vec<Sequence> = vec![];
    let mut current: Option<(String, String)> = None;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix('>') {
            if let Some((id, seq)) = current.take() {
                out.push(Sequence::new(id, seq));
            }
            let id = rest.split_whitespace().next().unwrap_or("").to_string();
            current = Some((id, String::new()));
        } else if let Some((_, seq)) = current.as_mut() {
            seq.push_str(line.trim());
        }
    }
    if let Some((id, seq)) = current {
        out.push(Sequence::new(id, seq));
    }
    out
}

/// Check that a sequence can be aligned with `table`.
///
/// Empty residue strings are accepted; empty names, gap symbols and residues
/// the table does not score are rejected.
pub fn validate_sequence<T: SubstitutionTable + ?Sized>(seq: &Sequence, table: &T) -> Result<(), MsaError> {
    if seq.name().trim().is_empty() {
        return Err(MsaError::InvalidInput("sequence name is empty".to_string()));
    }
    for (position, residue) in seq.chars().enumerate() {
        if residue == GAP {
            return Err(MsaError::InvalidInput(format!(
                "sequence '{}' contains a gap symbol at position {position}",
                seq.name()
            )));
        }
        if !table.contains(residue) {
            return Err(MsaError::UnknownResidue { sequence: seq.name().to_string(), residue, position });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SubstitutionMatrix;

    #[test]
    fn fasta_multi_record() {
        let recs = parse_fasta("junk\n>a desc here\nar\nnd\n\n>b\nAND\n");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].name(), "a");
        assert_eq!(recs[0].residues(), "ARND");
        assert_eq!(recs[1].len(), 3);
    }

    #[test]
    fn fasta_empty_record_kept() {
        let recs = parse_fasta(">empty\n>full\nAC\n");
        assert_eq!(recs.len(), 2);
        assert!(recs[0].is_empty());
    }

    #[test]
    fn validation_rejects_unknown_residue() {
        let table = SubstitutionMatrix::blosum62();
        let err = validate_sequence(&Sequence::new("s", "ARBD"), &table).unwrap_err();
        assert_eq!(err, MsaError::UnknownResidue { sequence: "s".into(), residue: 'B', position: 2 });
    }

    #[test]
    fn validation_rejects_empty_name_and_gaps() {
        let table = SubstitutionMatrix::blosum62();
        assert!(matches!(validate_sequence(&Sequence::new(" ", "AR"), &table), Err(MsaError::InvalidInput(_))));
        assert!(matches!(validate_sequence(&Sequence::new("s", "A-R"), &table), Err(MsaError::InvalidInput(_))));
        assert!(validate_sequence(&Sequence::new("s", ""), &table).is_ok());
    }
}
