//! Center-star multiple sequence alignment.
//!
//! Every unordered pair of sequences is aligned to fill a score matrix. The
//! sequence with the largest off-diagonal row sum becomes the *center*; every
//! other sequence is aligned against it and the pairwise alignments are merged
//! column by column so that the center's residues land in the same columns in
//! every row. All pairwise work uses [`EndGaps::Free`].
//!
//! ## Example
//! ```rust
//! use centerstar::{center_star, parse_fasta, SubstitutionMatrix};
//! let seqs = parse_fasta(">a\nACGTAC\n>b\nACGAC\n>c\nTACGTACG\n>d\nACTAC\n");
//! let result = center_star(&seqs, &SubstitutionMatrix::dna(1, -1), -2).unwrap();
//! assert_eq!(result.center, 0);
//! assert_eq!(result.alignment.row(1), Some("-ACG-AC-"));
//! assert_eq!(result.alignment.width(), 8);
//! ```
use std::collections::HashMap;

use crate::common::{validate_sequence, MsaError, Sequence, GAP};
use crate::matrix::SubstitutionTable;
use crate::pairwise::{align_unchecked, AlignParams, EndGaps, PairwiseAlignment};

/// Symmetric matrix of pairwise alignment scores.
///
/// The diagonal holds each sequence's self-score (sum of `score(r, r)` over
/// its residues). Row sums only count off-diagonal cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<i32>,
    sums: Vec<i64>,
}

impl DistanceMatrix {
    fn new(size: usize) -> Self {
        Self { size, cells: vec![0; size * size], sums: vec![0; size] }
    }

    fn set_pair(&mut self, i: usize, j: usize, score: i32) {
        self.cells[i * self.size + j] = score;
        self.cells[j * self.size + i] = score;
        self.sums[i] += i64::from(score);
        self.sums[j] += i64::from(score);
    }

    /// Number of sequences (rows).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Score between sequences `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.cells[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[i32] {
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    /// Sum of the off-diagonal scores of row `i`.
    pub fn row_sum(&self, i: usize) -> i64 {
        self.sums[i]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.cells.chunks(self.size.max(1))
    }
}

/// Gapped rows for every input sequence, all of equal width.
///
/// Rows are indexed like the input; the center's own gapped row is stored at
/// the center index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipleAlignment<'a> {
    sequences: &'a [Sequence],
    center: usize,
    rows: Vec<String>,
}

impl<'a> MultipleAlignment<'a> {
    /// Index of the center sequence.
    pub fn center(&self) -> usize {
        self.center
    }

    pub fn center_sequence(&self) -> &'a Sequence {
        &self.sequences[self.center]
    }

    /// The center's gapped row.
    pub fn center_row(&self) -> &str {
        &self.rows[self.center]
    }

    /// Gapped row of input sequence `i`.
    pub fn row(&self, i: usize) -> Option<&str> {
        self.rows.get(i).map(String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.chars().count())
    }

    /// `(sequence, gapped row)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Sequence, &str)> + '_ {
        self.sequences.iter().zip(self.rows.iter().map(String::as_str))
    }

    /// Majority-rule consensus.
    ///
    /// Each column yields its most frequent residue (ties go to the symbol seen
    /// first from the top row down) when that residue's share of the non-gap
    /// symbols is at least `threshold`, `X` when it is below, and `-` for
    /// columns that only hold gaps.
    pub fn consensus(&self, threshold: f64) -> String {
        let rows: Vec<Vec<char>> = self.rows.iter().map(|r| r.chars().collect()).collect();
        let mut out = String::with_capacity(self.width());
        for col in 0..self.width() {
            let mut counts: HashMap<char, usize> = HashMap::new();
            let mut best = (GAP, 0usize);
            let mut non_gap = 0usize;
            for row in &rows {
                let ch = row[col];
                if ch == GAP {
                    continue;
                }
                non_gap += 1;
                let n = counts.entry(ch).or_insert(0);
                *n += 1;
                if *n > best.1 {
                    best = (ch, *n);
                }
            }
            if non_gap == 0 {
                out.push(GAP);
            } else if (best.1 as f64) / (non_gap as f64) >= threshold {
                out.push(best.0);
            } else {
                out.push('X');
            }
        }
        out
    }

    /// Sum-of-pairs score over all columns and all row pairs.
    ///
    /// A residue pair scores `table.score`, a residue against a gap scores
    /// `gap_penalty` and two gaps score 0.
    pub fn sum_of_pairs<T: SubstitutionTable + ?Sized>(&self, table: &T, gap_penalty: i32) -> i64 {
        let rows: Vec<Vec<char>> = self.rows.iter().map(|r| r.chars().collect()).collect();
        let mut total = 0i64;
        for col in 0..self.width() {
            for (r, upper) in rows.iter().enumerate() {
                for lower in &rows[r + 1..] {
                    total += i64::from(match (upper[col], lower[col]) {
                        (GAP, GAP) => 0,
                        (GAP, _) | (_, GAP) => gap_penalty,
                        (x, y) => table.score(x, y),
                    });
                }
            }
        }
        total
    }
}

/// Output of [`center_star`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CenterStarResult<'a> {
    /// Pairwise score matrix used to choose the center.
    pub distances: DistanceMatrix,
    /// Index of the center sequence.
    pub center: usize,
    /// The merged alignment.
    pub alignment: MultipleAlignment<'a>,
}

fn star_params(gap_penalty: i32) -> AlignParams {
    AlignParams { gap_penalty, end_gaps: EndGaps::Free }
}

/// Validate `sequences`, then compute their pairwise score matrix.
pub fn distance_matrix<T: SubstitutionTable + ?Sized>(
    sequences: &[Sequence],
    table: &T,
    gap_penalty: i32,
) -> Result<DistanceMatrix, MsaError> {
    for seq in sequences {
        validate_sequence(seq, table)?;
    }
    Ok(fill_distances(sequences, table, gap_penalty))
}

fn fill_distances<T: SubstitutionTable + ?Sized>(sequences: &[Sequence], table: &T, gap_penalty: i32) -> DistanceMatrix {
    let mut distances = DistanceMatrix::new(sequences.len());
    for (i, seq) in sequences.iter().enumerate() {
        distances.cells[i * sequences.len() + i] = seq.chars().map(|r| table.score(r, r)).sum();
    }
    let params = star_params(gap_penalty);
    for i in 1..sequences.len() {
        for j in 0..i {
            let score = align_unchecked(sequences[i].residues(), sequences[j].residues(), table, &params).score;
            log::debug!("score({}, {}) = {score}", sequences[i].name(), sequences[j].name());
            distances.set_pair(i, j, score);
        }
    }
    distances
}

/// Row with the largest off-diagonal sum; the lowest index wins ties.
pub fn select_center(distances: &DistanceMatrix) -> Option<usize> {
    (0..distances.len()).reduce(|best, i| if distances.row_sum(i) > distances.row_sum(best) { i } else { best })
}

/// Merge alignments of the center (`align_a`) against other sequences
/// (`align_b`) into `(center row, other row)` pairs of one common width.
///
/// For each center residue, in order, the column it occupies in every
/// alignment is brought up to the right-most such column by inserting gap
/// columns into both rows just before it. Shorter results are then padded
/// with trailing gap columns. The insertions for each alignment are collected
/// first and applied in a single pass.
pub fn merge_star(center: &str, alignments: &[PairwiseAlignment]) -> Vec<(String, String)> {
    let rows: Vec<(Vec<char>, Vec<char>)> =
        alignments.iter().map(|p| (p.align_a.chars().collect(), p.align_b.chars().collect())).collect();
    // Column of every center residue in each row's copy of the center.
    let anchors: Vec<Vec<usize>> = rows
        .iter()
        .map(|(c, _)| c.iter().enumerate().filter(|&(_, &ch)| ch != GAP).map(|(col, _)| col).collect())
        .collect();
    let residues = center.chars().count();
    debug_assert!(anchors.iter().all(|a| a.len() == residues));

    let mut shift = vec![0usize; rows.len()];
    let mut plans: Vec<Vec<(usize, usize)>> = vec![Vec::new(); rows.len()];
    for i in 0..residues {
        let target = anchors.iter().zip(&shift).map(|(a, s)| a[i] + s).fold(i, usize::max);
        for (r, plan) in plans.iter_mut().enumerate() {
            let col = anchors[r][i] + shift[r];
            if col < target {
                plan.push((anchors[r][i], target - col));
                shift[r] += target - col;
            }
        }
    }

    let mut merged: Vec<(String, String)> = rows
        .iter()
        .zip(&plans)
        .map(|((c, o), plan)| (apply_plan(c, plan), apply_plan(o, plan)))
        .collect();

    let width = merged.iter().map(|(c, _)| c.chars().count()).max().unwrap_or(0);
    for (c, o) in merged.iter_mut() {
        while c.chars().count() < width {
            c.push(GAP);
            o.push(GAP);
        }
    }
    log::debug!(
        "merged {} alignments to width {width} ({} gap columns inserted)",
        merged.len(),
        shift.iter().sum::<usize>()
    );
    merged
}

/// Copy `row`, inserting `count` gaps before column `col` for each `(col, count)`.
/// Plan columns are strictly increasing.
fn apply_plan(row: &[char], plan: &[(usize, usize)]) -> String {
    let extra: usize = plan.iter().map(|&(_, n)| n).sum();
    let mut out = String::with_capacity(row.len() + extra);
    let mut next = plan.iter().peekable();
    for (col, &ch) in row.iter().enumerate() {
        if let Some(&&(at, count)) = next.peek() {
            if at == col {
                out.extend(std::iter::repeat(GAP).take(count));
                next.next();
            }
        }
        out.push(ch);
    }
    out
}

/// Align `sequences` with the center-star method.
///
/// All sequences are validated before any alignment starts. A single sequence
/// is returned as is (its matrix only holds the self-score).
pub fn center_star<'a, T: SubstitutionTable + ?Sized>(
    sequences: &'a [Sequence],
    table: &T,
    gap_penalty: i32,
) -> Result<CenterStarResult<'a>, MsaError> {
    if sequences.is_empty() {
        return Err(MsaError::EmptyCollection);
    }
    let distances = distance_matrix(sequences, table, gap_penalty)?;
    let center = select_center(&distances).ok_or(MsaError::EmptyCollection)?;
    let center_seq = &sequences[center];
    log::info!(
        "center sequence: {} (index {center}, row sum {})",
        center_seq.name(),
        distances.row_sum(center)
    );

    let params = star_params(gap_penalty);
    let others: Vec<usize> = (0..sequences.len()).filter(|&i| i != center).collect();
    let star: Vec<PairwiseAlignment> = others
        .iter()
        .map(|&i| align_unchecked(center_seq.residues(), sequences[i].residues(), table, &params))
        .collect();
    let merged = merge_star(center_seq.residues(), &star);

    let mut rows = vec![String::new(); sequences.len()];
    rows[center] = merged.first().map_or_else(|| center_seq.residues().to_string(), |(c, _)| c.clone());
    for (&i, (_, row)) in others.iter().zip(merged) {
        rows[i] = row;
    }

    Ok(CenterStarResult { distances, center, alignment: MultipleAlignment { sequences, center, rows } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::reference_dataset;
    use crate::matrix::SubstitutionMatrix;
    use crate::parse_fasta;
    use rand::Rng;

    fn strip(s: &str) -> String {
        s.chars().filter(|&c| c != GAP).collect()
    }

    #[test]
    fn reference_dataset_run() {
        let seqs = reference_dataset();
        let table = SubstitutionMatrix::blosum62();
        let result = center_star(&seqs, &table, -4).unwrap();

        let expected: [[i32; 6]; 6] = [
            [251, 56, 27, 24, 22, 20],
            [56, 266, 29, 18, 43, 20],
            [27, 29, 229, 48, 39, 51],
            [24, 18, 48, 236, 67, 74],
            [22, 43, 39, 67, 225, 107],
            [20, 20, 51, 74, 107, 240],
        ];
        for (row, want) in result.distances.rows().zip(expected.iter()) {
            assert_eq!(row, want);
        }
        assert_eq!((0..6).map(|i| result.distances.row_sum(i)).collect::<Vec<_>>(), vec![149, 166, 194, 231, 278, 272]);
        assert_eq!(result.center, 4);
        assert_eq!(result.alignment.center_sequence().name(), "MMTV");

        let aln = &result.alignment;
        assert_eq!(aln.width(), 57);
        assert_eq!(aln.center_row(), "--------IHEATQ-AHT-LHH-L-NAHTLRLLYKITREQA-RDIVKACKQCV-VAT");
        assert_eq!(aln.row(0), Some("ILDFHEKLLHPGIQ--KT-T-K-L-FGET--YYFPNSQLLI-QNIINECSICN-LAK"));
        assert_eq!(aln.row(1), Some("LLDFL---LHQLTHLSFSKMKALLERSHS-P-YYMLNRDRTLKNITETCKACA-QVN"));
        assert_eq!(aln.row(2), Some("LQ------LSPA-E-LHS-FTH-C--GQTALTLQGATTTEA-SNILRSCHACR-GGN"));
        assert_eq!(aln.row(3), Some("YP------LREAKD-LHT-ALH-I-GPRALSKACNISMQQA-REVVQTCPHCN-SA-"));
        assert_eq!(aln.row(5), Some("--------LESAQE-SHA-LHH-Q-NAAALRFQFHITREQA-REIVKLCPNCPDWGS"));
        for (seq, row) in aln.iter() {
            assert_eq!(strip(row), seq.residues());
        }
    }

    #[test]
    fn rerun_is_identical() {
        let seqs = reference_dataset();
        let table = SubstitutionMatrix::blosum62();
        let first = center_star(&seqs, &table, -4).unwrap();
        let second = center_star(&seqs, &table, -4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn small_dna_set() {
        let seqs = parse_fasta(">a\nACGTAC\n>b\nACGAC\n>c\nTACGTACG\n>d\nACTAC\n");
        let result = center_star(&seqs, &SubstitutionMatrix::dna(1, -1), -2).unwrap();
        assert_eq!(result.distances.row(0), &[6, 3, 4, 3]);
        assert_eq!(result.center, 0);
        let rows: Vec<&str> = (0..4).filter_map(|i| result.alignment.row(i)).collect();
        assert_eq!(rows, vec!["-ACGTAC-", "-ACG-AC-", "TACGTACG", "-AC-TAC-"]);
        assert_eq!(result.alignment.consensus(0.5), "TACGTACG");
    }

    #[test]
    fn center_ties_pick_lowest_index() {
        let seqs = vec![Sequence::new("x", "ACGT"), Sequence::new("y", "ACGT"), Sequence::new("z", "ACGT")];
        let result = center_star(&seqs, &SubstitutionMatrix::dna(1, -1), -2).unwrap();
        assert_eq!(result.center, 0);
        for i in 0..3 {
            assert_eq!(result.alignment.row(i), Some("ACGT"));
        }
    }

    #[test]
    fn single_sequence() {
        let seqs = vec![Sequence::new("only", "ARND")];
        let table = SubstitutionMatrix::blosum62();
        let result = center_star(&seqs, &table, -4).unwrap();
        assert_eq!(result.center, 0);
        assert_eq!(result.distances.len(), 1);
        assert_eq!(result.distances.get(0, 0), 4 + 5 + 6 + 6);
        assert_eq!(result.alignment.center_row(), "ARND");
        assert_eq!(result.alignment.len(), 1);
    }

    #[test]
    fn errors_surface_before_alignment() {
        let table = SubstitutionMatrix::blosum62();
        assert_eq!(center_star(&[], &table, -4).unwrap_err(), MsaError::EmptyCollection);
        let seqs = vec![Sequence::new("a", "ARND"), Sequence::new("b", "AJND")];
        assert!(matches!(center_star(&seqs, &table, -4), Err(MsaError::UnknownResidue { residue: 'J', .. })));
    }

    #[test]
    fn empty_residue_strings_are_aligned() {
        let seqs = vec![Sequence::new("a", "ACGT"), Sequence::new("b", ""), Sequence::new("c", "ACG")];
        let result = center_star(&seqs, &SubstitutionMatrix::dna(1, -1), -1).unwrap();
        let width = result.alignment.width();
        assert!(result.alignment.iter().all(|(_, row)| row.chars().count() == width));
        assert_eq!(result.alignment.row(1).map(strip), Some(String::new()));
    }

    #[test]
    fn merge_pads_every_short_row() {
        let alignments = vec![
            PairwiseAlignment { score: 0, align_a: "AC".into(), align_b: "AC".into() },
            PairwiseAlignment { score: 0, align_a: "AC---".into(), align_b: "ACGGG".into() },
            PairwiseAlignment { score: 0, align_a: "AC-".into(), align_b: "ACT".into() },
        ];
        let merged = merge_star("AC", &alignments);
        assert_eq!(merged[0], ("AC---".to_string(), "AC---".to_string()));
        assert_eq!(merged[1], ("AC---".to_string(), "ACGGG".to_string()));
        assert_eq!(merged[2], ("AC---".to_string(), "ACT--".to_string()));
    }

    #[test]
    fn merge_inserts_before_anchored_residue() {
        let alignments = vec![
            PairwiseAlignment { score: 0, align_a: "A--C".into(), align_b: "AGGC".into() },
            PairwiseAlignment { score: 0, align_a: "A-C".into(), align_b: "ATC".into() },
        ];
        let merged = merge_star("AC", &alignments);
        assert_eq!(merged[0], ("A--C".to_string(), "AGGC".to_string()));
        assert_eq!(merged[1], ("A--C".to_string(), "AT-C".to_string()));
    }

    #[test]
    fn random_sets_merge_to_equal_width() {
        let mut rng = rand::thread_rng();
        let table = SubstitutionMatrix::dna(2, -1);
        for _ in 0..50 {
            let seqs: Vec<Sequence> = (0..rng.gen_range(1..6))
                .map(|i| {
                    let len = rng.gen_range(0..15);
                    let residues: String = (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)] as char).collect();
                    Sequence::new(format!("s{i}"), residues)
                })
                .collect();
            let result = center_star(&seqs, &table, rng.gen_range(-3..=0)).unwrap();
            let aln = &result.alignment;
            let center_cols: Vec<usize> =
                aln.center_row().chars().enumerate().filter(|&(_, c)| c != GAP).map(|(i, _)| i).collect();
            assert_eq!(center_cols.len(), seqs[result.center].len());
            for (i, (seq, row)) in aln.iter().enumerate() {
                assert_eq!(row.chars().count(), aln.width(), "row {i}");
                assert_eq!(strip(row), seq.residues());
                assert_eq!(result.distances.get(i, i), seq.len() as i32 * 2);
            }
        }
    }

    #[test]
    fn sum_of_pairs_counts_gaps() {
        let seqs = parse_fasta(">a\nACGTAC\n>b\nACGAC\n>c\nTACGTACG\n>d\nACTAC\n");
        let table = SubstitutionMatrix::dna(1, -1);
        let result = center_star(&seqs, &table, -2).unwrap();
        // Columns: -ACGTAC- / -ACG-AC- / TACGTACG / -AC-TAC-
        assert_eq!(result.alignment.sum_of_pairs(&table, -2), -6 + 6 + 6 - 3 - 3 + 6 + 6 - 6);
    }
}
