use bio_types::strand::Strand;
use tracing::warn;

/// One CIGAR-style alignment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarOp {
    /// Alignment match (M)
    Match,
    /// Sequence match (=)
    Equal,
    /// Sequence mismatch (X)
    Diff,
    /// Insertion to the reference (I)
    Ins,
    /// Deletion from the reference (D)
    Del,
    /// Skipped reference region, i.e. splice (N)
    RefSkip,
    /// Soft clip (S)
    SoftClip,
    /// Hard clip (H)
    HardClip,
    /// Padding (P)
    Pad,
}

/// An aligned read as supplied by the alignment collaborator: leftmost
/// 1-based position, aligned sequence length, and the ordered
/// (operation, length) segments of its alignment.
#[derive(Debug, Clone)]
pub struct AlignedRead {
    pub name: String,
    pub pos: u64,
    pub seq_len: u32,
    pub cigar: Vec<(CigarOp, u32)>,
    pub is_reverse: bool,
    pub mapq: u8,
}

impl AlignedRead {
    pub fn strand(&self) -> Strand {
        if self.is_reverse {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }

    /// Number of reference bases the alignment covers, for overlap tests.
    pub fn reference_span(&self) -> u64 {
        self.cigar
            .iter()
            .filter(|(op, _)| {
                matches!(
                    op,
                    CigarOp::Match | CigarOp::Equal | CigarOp::Diff | CigarOp::Del | CigarOp::RefSkip
                )
            })
            .map(|&(_, len)| len as u64)
            .sum()
    }
}

/// Genomic coordinate of the base at the read's midpoint, walking the
/// alignment segments so insertions, deletions and splices shift the
/// result correctly.
///
/// Match segments advance both the genome coordinate and the walked read
/// length; insertions and splices advance the genome coordinate only;
/// deletions advance the walked read length only. Unsupported operations
/// are logged and skipped, and the walk continues with the state it has.
/// Returns `None` if the walk exhausts the alignment before reaching half
/// the read length.
pub fn alignment_midpoint(read: &AlignedRead) -> Option<f64> {
    let read_half = read.seq_len as f64 / 2.0;
    let mut read_walked = 0.0;
    let mut genome_pos = read.pos as f64;

    for &(op, length) in &read.cigar {
        match op {
            CigarOp::Match | CigarOp::Equal | CigarOp::Diff => {
                if read_walked + length as f64 >= read_half {
                    return Some(genome_pos + (read_half - read_walked));
                }
                genome_pos += length as f64;
                read_walked += length as f64;
            }
            CigarOp::Ins | CigarOp::RefSkip => {
                genome_pos += length as f64;
            }
            CigarOp::Del => {
                read_walked += length as f64;
            }
            other => {
                warn!("unsupported CIGAR operation {:?} in read {}", other, read.name);
            }
        }
    }

    warn!("read {} ended before its midpoint was reached", read.name);
    None
}

/// Collect the midpoints of the reads matching the transcript strand
/// with mapping quality above zero, sorted ascending.
///
/// The sort is required: reads arrive in alignment-position order, and
/// differing alignment lengths can put their midpoints out of order.
pub fn midpoints_for_transcript(reads: &[AlignedRead], strand: Strand) -> Vec<f64> {
    let mut midpoints: Vec<f64> = reads
        .iter()
        .filter(|r| r.strand() == strand && r.mapq > 0)
        .filter_map(alignment_midpoint)
        .collect();
    midpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
    midpoints
}
