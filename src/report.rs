//! Text renderings of distance matrices and alignments.
//!
//! Output is meant for people reading a terminal or a report file; it resembles
//! EMBOSS reports without copying them byte for byte.
use std::fmt::Write;

use crate::center_star::{DistanceMatrix, MultipleAlignment};
use crate::common::GAP;
use crate::pairwise::PairwiseAlignment;

/// Columns per block in [`format_pairwise`].
const BLOCK: usize = 60;

/// `score matrix:` followed by one line per row, each cell right-aligned in
/// three characters and followed by a space.
pub fn format_distance_matrix(distances: &DistanceMatrix) -> String {
    let mut out = String::from("score matrix:\n");
    for row in distances.rows() {
        for cell in row {
            let _ = write!(out, "{cell:>3} ");
        }
        out.push('\n');
    }
    out
}

/// The center row first, tagged `(center)`, then every other row in input
/// order. Names are right-aligned in five characters.
///
/// ```text
/// (center)  MMTV: --------IHEATQ-AHT-...
///          copia: ILDFHEKLLHPGIQ--KT-...
/// ```
pub fn format_alignment(alignment: &MultipleAlignment<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "(center) {:>5}: {}", alignment.center_sequence().name(), alignment.center_row());
    for (i, (seq, row)) in alignment.iter().enumerate() {
        if i != alignment.center() {
            let _ = writeln!(out, "         {:>5}: {}", seq.name(), row);
        }
    }
    out
}

/// Gapped FASTA in input order, wrapped at `width` columns (0 disables wrapping).
pub fn format_fasta(alignment: &MultipleAlignment<'_>, width: usize) -> String {
    let mut out = String::new();
    for (seq, row) in alignment.iter() {
        let _ = writeln!(out, ">{}", seq.name());
        if width == 0 || row.is_empty() {
            let _ = writeln!(out, "{row}");
            continue;
        }
        let chars: Vec<char> = row.chars().collect();
        for chunk in chars.chunks(width) {
            out.extend(chunk);
            out.push('\n');
        }
    }
    out
}

/// Human-readable report for one pairwise alignment, in blocks of 60 columns
/// with a match line (`|` identical, `.` mismatch, space for gaps).
pub fn format_pairwise(a_name: &str, b_name: &str, aln: &PairwiseAlignment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# A: {a_name}");
    let _ = writeln!(out, "# B: {b_name}");
    let _ = writeln!(out, "Score: {}", aln.score);
    let _ = writeln!(out, "Length: {}", aln.len());
    let _ = writeln!(out, "Identity: {:.2}%   Gaps: {:.2}%", aln.identity(), aln.gaps());
    let _ = writeln!(out, "CIGAR: {}", aln.cigar());
    out.push('\n');

    let a: Vec<char> = aln.align_a.chars().collect();
    let b: Vec<char> = aln.align_b.chars().collect();
    let label = a_name.chars().count().max(b_name.chars().count());
    for (a_block, b_block) in a.chunks(BLOCK).zip(b.chunks(BLOCK)) {
        let mid: String = a_block
            .iter()
            .zip(b_block)
            .map(|(x, y)| {
                if *x == GAP || *y == GAP {
                    ' '
                } else if x.eq_ignore_ascii_case(y) {
                    '|'
                } else {
                    '.'
                }
            })
            .collect();
        let _ = writeln!(out, "{a_name:<label$} {}", a_block.iter().collect::<String>());
        let _ = writeln!(out, "{:<label$} {mid}", "");
        let _ = writeln!(out, "{b_name:<label$} {}", b_block.iter().collect::<String>());
        out.push('\n');
    }
    out
}
