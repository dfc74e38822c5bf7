//! Built-in reference sequences.

use crate::common::Sequence;

/// Six retroviral protein segments (copia, MMULV, HTLV, RSV, MMTV, SMRV).
///
/// Aligned with BLOSUM62 and a gap penalty of -4, MMTV (index 4) is chosen as
/// the center.
pub fn reference_dataset() -> Vec<Sequence> {
    [
        ("copia", "ILDFHEKLLHPGIQKTTKLFGETYYFPNSQLLIQNIINECSICNLAK"),
        ("MMULV", "LLDFLLHQLTHLSFSKMKALLERSHSPYYMLNRDRTLKNITETCKACAQVN"),
        ("HTLV", "LQLSPAELHSFTHCGQTALTLQGATTTEASNILRSCHACRGGN"),
        ("RSV", "YPLREAKDLHTALHIGPRALSKACNISMQQAREVVQTCPHCNSA"),
        ("MMTV", "IHEATQAHTLHHLNAHTLRLLYKITREQARDIVKACKQCVVAT"),
        ("SMRV", "LESAQESHALHHQNAAALRFQFHITREQAREIVKLCPNCPDWGS"),
    ]
    .into_iter()
    .map(|(name, residues)| Sequence::new(name, residues))
    .collect()
}
