//! Needleman–Wunsch global alignment with a flat per-column gap penalty.
//!
//! The score grid has `(|a|+1) x (|b|+1)` cells. Every cell keeps a
//! [`Traceback`] tag and the optimal path is recovered by walking the tags
//! back from the bottom-right corner. Tie-breaking is fixed so that the same
//! inputs always produce the same alignment:
//!
//! 1. a match/mismatch step wins whenever it reaches the maximum;
//! 2. if both gap steps tie, the gap goes into `a` when `a` has more residues
//!    left than `b` (`|a| - i > |b| - j`), otherwise into `b`;
//! 3. otherwise the better gap step wins.
//!
//! ## Example
//! ```rust
//! use centerstar::{align, AlignParams, Sequence, SubstitutionMatrix};
//! let table = SubstitutionMatrix::blosum62();
//! let params = AlignParams { gap_penalty: 0, ..Default::default() };
//! let aln = align(&Sequence::new("a", "ARND"), &Sequence::new("b", "AND"), &table, &params).unwrap();
//! assert_eq!(aln.align_a, "ARND");
//! assert_eq!(aln.align_b, "A-ND");
//! assert_eq!(aln.score, 16);
//! ```
use crate::common::{validate_sequence, MsaError, Sequence, GAP};
use crate::matrix::SubstitutionTable;

/// How the first row and column of the score grid are initialised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndGaps {
    /// Border cells are fixed to zero, so gaps before the first aligned
    /// residue are not scored. Used for center-star distances and merging.
    #[default]
    Free,
    /// Border cell `(i, 0)` holds `i * gap_penalty` and `(0, j)` holds
    /// `j * gap_penalty` (classic Needleman–Wunsch).
    Penalized,
}

/// Parameters for pairwise alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignParams {
    /// Added once per gap column. Usually negative; any value is accepted.
    pub gap_penalty: i32,
    /// Border initialisation of the score grid.
    pub end_gaps: EndGaps,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self { gap_penalty: -4, end_gaps: EndGaps::Free }
    }
}

/// Decision recorded for a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traceback {
    /// Row 0 or column 0: consume the remaining prefix against gaps.
    Border,
    /// `b` consumes a residue, `a` gets a gap (move left).
    GapInA,
    /// `a` consumes a residue, `b` gets a gap (move up).
    GapInB,
    /// Both consume a residue (move diagonally).
    Match,
}

/// A global alignment of two sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairwiseAlignment {
    /// Value of the bottom-right grid cell.
    pub score: i32,
    /// Sequence A with gaps inserted.
    pub align_a: String,
    /// Sequence B with gaps inserted; same length as `align_a`.
    pub align_b: String,
}

impl PairwiseAlignment {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.align_a.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.align_a.is_empty()
    }

    /// Percent of columns holding two identical residues (0..=100).
    pub fn identity(&self) -> f64 {
        let ident = self.columns().filter(|&(x, y)| x != GAP && y != GAP && x.eq_ignore_ascii_case(&y)).count();
        percent(ident, self.len())
    }

    /// Percent of columns holding a gap (0..=100).
    pub fn gaps(&self) -> f64 {
        let gaps = self.columns().filter(|&(x, y)| x == GAP || y == GAP).count();
        percent(gaps, self.len())
    }

    /// CIGAR-like run-length operations: `M` aligned pair, `I` gap in A,
    /// `D` gap in B (e.g. `1M1D2M`).
    pub fn cigar(&self) -> String {
        let mut ops: Vec<(char, usize)> = Vec::new();
        for (x, y) in self.columns() {
            let op = if x == GAP { 'I' } else if y == GAP { 'D' } else { 'M' };
            push_cigar(&mut ops, op);
        }
        ops.into_iter().map(|(op, len)| format!("{len}{op}")).collect()
    }

    fn columns(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.align_a.chars().zip(self.align_b.chars())
    }
}

fn percent(count: usize, cols: usize) -> f64 {
    (count as f64) * 100.0 / (cols.max(1) as f64)
}

fn push_cigar(ops: &mut Vec<(char, usize)>, op: char) {
    if let Some(last) = ops.last_mut() {
        if last.0 == op {
            last.1 += 1;
            return;
        }
    }
    ops.push((op, 1));
}

/// Validate both sequences against `table`, then align them.
pub fn align<T: SubstitutionTable + ?Sized>(
    a: &Sequence,
    b: &Sequence,
    table: &T,
    params: &AlignParams,
) -> Result<PairwiseAlignment, MsaError> {
    validate_sequence(a, table)?;
    validate_sequence(b, table)?;
    Ok(align_unchecked(a.residues(), b.residues(), table, params))
}

/// Align two residue strings whose symbols are all known to `table`.
///
/// If either input is empty the other one is aligned against gaps only and the
/// score is `len * gap_penalty`, whatever the [`EndGaps`] mode.
pub fn align_unchecked<T: SubstitutionTable + ?Sized>(
    a: &str,
    b: &str,
    table: &T,
    params: &AlignParams,
) -> PairwiseAlignment {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    let gap = params.gap_penalty;

    if m == 0 || n == 0 {
        let cols = m.max(n);
        let pad = |s: &[char]| -> String {
            if s.is_empty() { std::iter::repeat(GAP).take(cols).collect() } else { s.iter().collect() }
        };
        return PairwiseAlignment { score: cols as i32 * gap, align_a: pad(a.as_slice()), align_b: pad(b.as_slice()) };
    }

    let width = n + 1;
    let at = |i: usize, j: usize| i * width + j;

    // Substitution scores for every residue pair, looked up once.
    let subs: Vec<i32> = a.iter().flat_map(|&x| b.iter().map(move |&y| table.score(x, y))).collect();

    let mut grid = vec![0i32; (m + 1) * width];
    let mut tags = vec![Traceback::Border; (m + 1) * width];
    if params.end_gaps == EndGaps::Penalized {
        for i in 1..=m {
            grid[at(i, 0)] = i as i32 * gap;
        }
        for j in 1..=n {
            grid[at(0, j)] = j as i32 * gap;
        }
    }

    for i in 1..=m {
        for j in 1..=n {
            let gap_in_a = grid[at(i, j - 1)] + gap;
            let gap_in_b = grid[at(i - 1, j)] + gap;
            let diag = grid[at(i - 1, j - 1)] + subs[(i - 1) * n + (j - 1)];
            let best = diag.max(gap_in_a).max(gap_in_b);
            tags[at(i, j)] = if diag == best {
                Traceback::Match
            } else if gap_in_a == gap_in_b {
                if m - i > n - j { Traceback::GapInA } else { Traceback::GapInB }
            } else if gap_in_a == best {
                Traceback::GapInA
            } else {
                Traceback::GapInB
            };
            grid[at(i, j)] = best;
        }
    }

    let (align_a, align_b) = traceback(&a, &b, &tags, width);
    log::trace!("aligned {m}x{n} residues, score {}", grid[at(m, n)]);
    PairwiseAlignment { score: grid[at(m, n)], align_a, align_b }
}

/// Walk the tags from `(|a|, |b|)` to `(0, 0)`, filling both rows right to left.
fn traceback(a: &[char], b: &[char], tags: &[Traceback], width: usize) -> (String, String) {
    let (mut i, mut j) = (a.len(), b.len());
    let mut rev_a = Vec::with_capacity(i + j);
    let mut rev_b = Vec::with_capacity(i + j);
    while i > 0 || j > 0 {
        match tags[i * width + j] {
            Traceback::Match => {
                rev_a.push(a[i - 1]);
                rev_b.push(b[j - 1]);
                i -= 1;
                j -= 1;
            }
            Traceback::GapInA => {
                rev_a.push(GAP);
                rev_b.push(b[j - 1]);
                j -= 1;
            }
            Traceback::GapInB => {
                rev_a.push(a[i - 1]);
                rev_b.push(GAP);
                i -= 1;
            }
            Traceback::Border if j > 0 => {
                rev_a.push(GAP);
                rev_b.push(b[j - 1]);
                j -= 1;
            }
            Traceback::Border => {
                rev_a.push(a[i - 1]);
                rev_b.push(GAP);
                i -= 1;
            }
        }
    }
    (rev_a.into_iter().rev().collect(), rev_b.into_iter().rev().collect())
}
