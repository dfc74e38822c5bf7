//! # centerstar
//!
//! Multiple sequence alignment of small sequence sets with the **center-star**
//! heuristic, built on Needleman–Wunsch pairwise alignment with a flat
//! per-column gap penalty.
//!
//! ## How it works
//! 1. Every unordered pair of sequences is aligned ([`align`]) and the scores
//!    fill a symmetric [`DistanceMatrix`]; the diagonal holds self-scores.
//! 2. The sequence with the largest off-diagonal row sum is the *center*
//!    (lowest index on ties).
//! 3. Every other sequence is aligned against the center and the pairwise
//!    alignments are merged so that each center residue occupies one column
//!    in all rows ([`merge_star`]).
//!
//! Pairwise work for the center-star method uses free leading end gaps
//! ([`EndGaps::Free`]): row 0 and column 0 of the score grid are zero.
//!
//! ### Example
//! ```
//! use centerstar::{center_star, reference_dataset, SubstitutionMatrix};
//! let seqs = reference_dataset();
//! let result = center_star(&seqs, &SubstitutionMatrix::blosum62(), -4).unwrap();
//! assert_eq!(result.alignment.center_sequence().name(), "MMTV");
//! let width = result.alignment.width();
//! assert!(result.alignment.iter().all(|(_, row)| row.len() == width));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod center_star;
pub mod common;
pub mod dataset;
pub mod matrix;
pub mod pairwise;
pub mod report;

pub use center_star::{
    center_star, distance_matrix, merge_star, select_center, CenterStarResult, DistanceMatrix, MultipleAlignment,
};
pub use common::{parse_fasta, validate_sequence, MsaError, Sequence, GAP};
pub use dataset::reference_dataset;
pub use matrix::{SubstitutionMatrix, SubstitutionTable};
pub use pairwise::{align, align_unchecked, AlignParams, EndGaps, PairwiseAlignment, Traceback};
pub use report::{format_alignment, format_distance_matrix, format_fasta, format_pairwise};
