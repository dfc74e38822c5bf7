//! Substitution tables used to score aligned residue pairs.
//!
//! [`SubstitutionTable`] is the only capability the aligners need. The
//! provided [`SubstitutionMatrix`] covers the built-in BLOSUM62 table, a DNA
//! match/mismatch scheme and matrices read from NCBI/EMBOSS text files such as
//!
//! ```text
//! # comment lines are skipped
//!    A  C  G  T
//! A  5 -4 -4 -4
//! C -4  5 -4 -4
//! G -4 -4  5 -4
//! T -4 -4 -4  5
//! ```
use std::collections::HashMap;

use crate::common::MsaError;

/// Symmetric score lookup for pairs of residue symbols.
pub trait SubstitutionTable {
    /// Score for aligning `x` against `y`. Lookup is case-insensitive.
    ///
    /// # Panics
    /// Implementations may panic when either symbol fails [`contains`](Self::contains);
    /// callers validate their input first.
    fn score(&self, x: char, y: char) -> i32;

    /// Whether `symbol` is part of the table's alphabet.
    fn contains(&self, symbol: char) -> bool;
}

/// Dense square substitution matrix over an explicit alphabet.
#[derive(Clone, Debug)]
pub struct SubstitutionMatrix {
    alphabet: Vec<char>,
    index: HashMap<char, usize>,
    scores: Vec<i32>,
}

/// Alphabet order of the built-in BLOSUM62 rows and columns.
const BLOSUM62_ALPHABET: &str = "ARNDCQEGHILKMFPSTWYV";

#[rustfmt::skip]
const BLOSUM62: [[i32; 20]; 20] = [
    [ 4,-1,-2,-2, 0,-1,-1, 0,-2,-1,-1,-1,-1,-2,-1, 1, 0,-3,-2, 0], // A
    [-1, 5, 0,-2,-3, 1, 0,-2, 0,-3,-2, 2,-1,-3,-2,-1,-1,-3,-2,-3], // R
    [-2, 0, 6, 1,-3, 0, 0, 0, 1,-3,-3, 0,-2,-3,-2, 1, 0,-4,-2,-3], // N
    [-2,-2, 1, 6,-3, 0, 2,-1,-1,-3,-4,-1,-3,-3,-1, 0,-1,-4,-3,-3], // D
    [ 0,-3,-3,-3, 9,-3,-4,-3,-3,-1,-1,-3,-1,-2,-3,-1,-1,-2,-2,-1], // C
    [-1, 1, 0, 0,-3, 5, 2,-2, 0,-3,-2, 1, 0,-3,-1, 0,-1,-2,-1,-2], // Q
    [-1, 0, 0, 2,-4, 2, 5,-2, 0,-3,-3, 1,-2,-3,-1, 0,-1,-3,-2,-2], // E
    [ 0,-2, 0,-1,-3,-2,-2, 6,-2,-4,-4,-2,-3,-3,-2, 0,-2,-2,-3,-3], // G
    [-2, 0, 1,-1,-3, 0, 0,-2, 8,-3,-3,-1,-2,-1,-2,-1,-2,-2, 2,-3], // H
    [-1,-3,-3,-3,-1,-3,-3,-4,-3, 4, 2,-3, 1, 0,-3,-2,-1,-3,-1, 3], // I
    [-1,-2,-3,-4,-1,-2,-3,-4,-3, 2, 4,-2, 2, 0,-3,-2,-1,-2,-1, 1], // L
    [-1, 2, 0,-1,-3, 1, 1,-2,-1,-3,-2, 5,-1,-3,-1, 0,-1,-3,-2,-2], // K
    [-1,-1,-2,-3,-1, 0,-2,-3,-2, 1, 2,-1, 5, 0,-2,-1,-1,-1,-1, 1], // M
    [-2,-3,-3,-3,-2,-3,-3,-3,-1, 0, 0,-3, 0, 6,-4,-2,-2, 1, 3,-1], // F
    [-1,-2,-2,-1,-3,-1,-1,-2,-2,-3,-3,-1,-2,-4, 7,-1,-1,-4,-3,-2], // P
    [ 1,-1, 1, 0,-1, 0, 0, 0,-1,-2,-2, 0,-1,-2,-1, 4, 1,-3,-2,-2], // S
    [ 0,-1, 0,-1,-1,-1,-1,-2,-2,-1,-1,-1,-1,-2,-1, 1, 5,-2,-2, 0], // T
    [-3,-3,-4,-4,-2,-2,-3,-2,-2,-3,-2,-3,-1, 1,-4,-3,-2,11, 2,-3], // W
    [-2,-2,-2,-3,-2,-1,-2,-3, 2,-1,-1,-2,-1, 3,-3,-2,-2, 2, 7,-1], // Y
    [ 0,-3,-3,-3,-1,-2,-2,-3,-3, 3, 1,-2, 1,-1,-2,-2, 0,-3,-1, 4], // V
];

impl SubstitutionMatrix {
    /// Build from an alphabet and a row-major `n x n` score table.
    fn from_parts(alphabet: Vec<char>, scores: Vec<i32>) -> Result<Self, MsaError> {
        let n = alphabet.len();
        if scores.len() != n * n {
            return Err(MsaError::InvalidMatrix(format!("expected {} cells, found {}", n * n, scores.len())));
        }
        let mut index = HashMap::with_capacity(n);
        for (i, &c) in alphabet.iter().enumerate() {
            if index.insert(c, i).is_some() {
                return Err(MsaError::InvalidMatrix(format!("symbol '{c}' appears twice")));
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if scores[i * n + j] != scores[j * n + i] {
                    return Err(MsaError::InvalidMatrix(format!(
                        "score({}, {}) = {} but score({}, {}) = {}",
                        alphabet[i], alphabet[j], scores[i * n + j], alphabet[j], alphabet[i], scores[j * n + i]
                    )));
                }
            }
        }
        Ok(Self { alphabet, index, scores })
    }

    /// The BLOSUM62 table over the 20 standard amino acids.
    pub fn blosum62() -> Self {
        let alphabet: Vec<char> = BLOSUM62_ALPHABET.chars().collect();
        let scores = BLOSUM62.iter().flatten().copied().collect();
        let index = alphabet.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { alphabet, index, scores }
    }

    /// DNA/RNA match/mismatch scoring over `A C G T U N`. `U` matches `T`.
    pub fn dna(match_score: i32, mismatch: i32) -> Self {
        let alphabet: Vec<char> = "ACGTUN".chars().collect();
        let canon = |c: char| if c == 'U' { 'T' } else { c };
        let scores = alphabet
            .iter()
            .flat_map(|&x| alphabet.iter().map(move |&y| if canon(x) == canon(y) { match_score } else { mismatch }))
            .collect();
        let index = alphabet.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { alphabet, index, scores }
    }

    /// Parse a matrix in NCBI/EMBOSS text format.
    ///
    /// Lines starting with `#` and blank lines are skipped. The first
    /// remaining line lists the column symbols; every following line starts
    /// with a row symbol and holds one integer per column. Rows may come in
    /// any order but every column symbol needs exactly one row, and the
    /// resulting table must be symmetric.
    pub fn from_ncbi_str(text: &str) -> Result<Self, MsaError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));
        let header = lines.next().ok_or_else(|| MsaError::InvalidMatrix("no header row".to_string()))?;
        let alphabet = header
            .split_whitespace()
            .map(single_symbol)
            .collect::<Result<Vec<char>, MsaError>>()?;
        let n = alphabet.len();
        if n == 0 {
            return Err(MsaError::InvalidMatrix("header row is empty".to_string()));
        }

        let mut rows: Vec<Option<Vec<i32>>> = vec![None; n];
        for line in lines {
            let mut fields = line.split_whitespace();
            let label = fields.next().map(single_symbol).transpose()?.unwrap_or(' ');
            let row_idx = alphabet
                .iter()
                .position(|&c| c == label)
                .ok_or_else(|| MsaError::InvalidMatrix(format!("row '{label}' is not in the header")))?;
            let cells = fields
                .map(|f| f.parse::<i32>().map_err(|_| MsaError::InvalidMatrix(format!("row '{label}': '{f}' is not an integer"))))
                .collect::<Result<Vec<i32>, MsaError>>()?;
            if cells.len() != n {
                return Err(MsaError::InvalidMatrix(format!("row '{label}' has {} cells, expected {n}", cells.len())));
            }
            if rows[row_idx].replace(cells).is_some() {
                return Err(MsaError::InvalidMatrix(format!("row '{label}' appears twice")));
            }
        }

        let mut scores = Vec::with_capacity(n * n);
        for (row, &c) in rows.into_iter().zip(alphabet.iter()) {
            let row = row.ok_or_else(|| MsaError::InvalidMatrix(format!("missing row for '{c}'")))?;
            scores.extend(row);
        }
        Self::from_parts(alphabet, scores)
    }

    /// Symbols scored by this matrix, in row order.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    fn position(&self, c: char) -> Option<usize> {
        self.index.get(&c.to_ascii_uppercase()).copied()
    }
}

fn single_symbol(token: &str) -> Result<char, MsaError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c.to_ascii_uppercase()),
        _ => Err(MsaError::InvalidMatrix(format!("'{token}' is not a single symbol"))),
    }
}

impl SubstitutionTable for SubstitutionMatrix {
    fn score(&self, x: char, y: char) -> i32 {
        match (self.position(x), self.position(y)) {
            (Some(i), Some(j)) => self.scores[i * self.alphabet.len() + j],
            _ => panic!("symbol pair ({x}, {y}) is not in the substitution matrix"),
        }
    }

    fn contains(&self, symbol: char) -> bool {
        self.position(symbol).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blosum62_is_symmetric() {
        let m = SubstitutionMatrix::blosum62();
        for &x in m.alphabet() {
            for &y in m.alphabet() {
                assert_eq!(m.score(x, y), m.score(y, x), "{x}{y}");
            }
        }
        assert_eq!(m.score('W', 'W'), 11);
        assert_eq!(m.score('a', 'R'), -1);
        assert!(!m.contains('B'));
    }

    #[test]
    fn dna_treats_u_as_t() {
        let m = SubstitutionMatrix::dna(2, -1);
        assert_eq!(m.score('T', 'U'), 2);
        assert_eq!(m.score('A', 'g'), -1);
        assert_eq!(m.score('N', 'N'), 2);
    }

    #[test]
    fn parse_ncbi_text() {
        let text = "# toy\n   A  C  G  T\nA  5 -4 -4 -4\nC -4  5 -4 -4\nG -4 -4  5 -4\nT -4 -4 -4  5\n";
        let m = SubstitutionMatrix::from_ncbi_str(text).unwrap();
        assert_eq!(m.alphabet(), &['A', 'C', 'G', 'T']);
        assert_eq!(m.score('G', 'G'), 5);
        assert_eq!(m.score('c', 't'), -4);
    }

    #[test]
    fn parse_rejects_asymmetric_and_ragged() {
        let asym = "  A C\nA 1 2\nC 3 1\n";
        assert!(matches!(SubstitutionMatrix::from_ncbi_str(asym), Err(MsaError::InvalidMatrix(_))));
        let ragged = "  A C\nA 1 2\nC 2\n";
        assert!(matches!(SubstitutionMatrix::from_ncbi_str(ragged), Err(MsaError::InvalidMatrix(_))));
        let missing = "  A C\nA 1 2\n";
        assert!(matches!(SubstitutionMatrix::from_ncbi_str(missing), Err(MsaError::InvalidMatrix(_))));
        assert!(SubstitutionMatrix::from_ncbi_str("# only comments\n").is_err());
    }
}
