use crate::transcript::Expression;

/// Expected per-base read rate over `[start, end]` under the convoluted
/// exon/intron model, denormalized from FPKM units to absolute reads.
///
/// `junctions` holds the first bp of each next exon/intron (see
/// `Transcript::junctions`) and `ji` must index the first junction at or
/// after `start`; the caller locates it, typically with a boundary
/// search. Exonic segments contribute the combined exonic + pre-mRNA
/// rate, intronic segments the pre-mRNA rate alone, weighted by how many
/// bases of the interval each segment covers.
pub fn convolve(
    start: u64,
    end: u64,
    expr: &Expression,
    total_reads: u64,
    junctions: &[u64],
    mut ji: usize,
) -> f64 {
    let exonic = expr.fpkm_exon + expr.fpkm_pre;
    let intronic = expr.fpkm_pre;

    let fpkm_conv = if ji >= junctions.len() {
        // interval lies past every junction
        exonic
    } else if end < junctions[ji] {
        // interval lies wholly inside one segment
        if ji % 2 == 0 {
            exonic
        } else {
            intronic
        }
    } else {
        // interval spans one or more junctions: accumulate
        // length-weighted contributions segment by segment
        let head = (junctions[ji] - start) as f64;
        let mut acc = if ji % 2 == 0 { head * exonic } else { head * intronic };
        ji += 1;

        while ji < junctions.len() && junctions[ji] <= end {
            let seg = (junctions[ji] - junctions[ji - 1]) as f64;
            acc += if ji % 2 == 0 { seg * exonic } else { seg * intronic };
            ji += 1;
        }
        ji -= 1;

        // last junction through the interval end; parity flips because
        // ji now names the segment boundary just crossed
        let tail = (end - junctions[ji] + 1) as f64;
        acc += if ji % 2 == 0 { tail * intronic } else { tail * exonic };

        acc / (end - start + 1) as f64
    };

    fpkm_conv / 1000.0 * (total_reads as f64 / 1_000_000.0)
}
