use crate::scan::{lambda, stat, WindowStat};
use crate::transcript::Expression;
use serde::Serialize;

/// A finished peak call: genomic interval trimmed to actual read
/// support, with its read count and recomputed p-value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    pub start: u64,
    pub end: u64,
    pub count: usize,
    pub p_value: f64,
}

/// Merge runs of significant windows into genomic spans.
///
/// A state machine over the ordered window statistics: a window with
/// p-value below `sig_p` opens or extends a peak, and up to
/// `allowed_gap` consecutive insignificant windows are tolerated before
/// the peak closes at the last significant window. Spans are returned in
/// genomic coordinates, the end extended by the window size.
pub fn merge_significant(
    stats: &[WindowStat],
    window_size: u64,
    sig_p: f64,
    span_start: u64,
    allowed_gap: usize,
) -> Vec<(u64, u64)> {
    let mut merged = Vec::new();
    let mut peak_start: Option<usize> = None;
    let mut insig_gap = 0usize;

    for (i, ws) in stats.iter().enumerate() {
        if ws.p_value < sig_p {
            if peak_start.is_none() {
                peak_start = Some(i);
            }
            insig_gap = 0;
        } else if let Some(start) = peak_start {
            insig_gap += 1;
            if insig_gap > allowed_gap {
                let last_hit = i - insig_gap;
                merged.push((
                    span_start + start as u64,
                    span_start + last_hit as u64 + window_size - 1,
                ));
                peak_start = None;
                insig_gap = 0;
            }
            // otherwise let the gap ride
        }
    }

    if let Some(start) = peak_start {
        let last_hit = stats.len() - 1 - insig_gap;
        merged.push((
            span_start + start as u64,
            span_start + last_hit as u64 + window_size - 1,
        ));
    }

    merged
}

/// Tighten each merged span to the first and last read midpoint it
/// actually contains, carrying the midpoint count.
///
/// Every merged span descends from windows holding three or more reads,
/// so a span with no midpoints left inside it is an upstream bug.
pub fn trim_to_reads(spans: &[(u64, u64)], midpoints: &[f64]) -> Vec<(u64, u64, usize)> {
    let mut trimmed = Vec::with_capacity(spans.len());
    for &(wstart, wend) in spans {
        let lo = midpoints.partition_point(|&m| m < wstart as f64);
        let hi = midpoints.partition_point(|&m| m <= wend as f64);
        let count = hi - lo;
        assert!(
            count > 0,
            "merged span {}..{} lost all read support during trimming",
            wstart,
            wend
        );
        trimmed.push((midpoints[lo] as u64, (midpoints[hi - 1] + 0.5) as u64, count));
    }
    trimmed
}

/// Score each trimmed span at its own exact width and position.
///
/// The merged-and-trimmed interval differs from any single scanning
/// window in both width and expected rate, so the window p-values are
/// discarded and a fresh junction search anchors the convolution at the
/// trimmed start.
pub fn rescore(
    trimmed: &[(u64, u64, usize)],
    junctions: &[u64],
    expr: &Expression,
    total_reads: u64,
    txome_size: u64,
) -> Vec<Peak> {
    trimmed
        .iter()
        .map(|&(start, end, count)| {
            let ji = junctions.partition_point(|&j| j < start);
            let peak_lambda = lambda::convolve(start, end, expr, total_reads, junctions, ji);
            let p_value = stat::scan_pvalue(count, end - start + 1, txome_size, peak_lambda);
            Peak {
                start,
                end,
                count,
                p_value,
            }
        })
        .collect()
}

/// Full window-statistics-to-peaks pass: merge, trim, re-score.
#[allow(clippy::too_many_arguments)]
pub fn assemble_peaks(
    stats: &[WindowStat],
    midpoints: &[f64],
    junctions: &[u64],
    window_size: u64,
    sig_p: f64,
    span_start: u64,
    allowed_gap: usize,
    expr: &Expression,
    total_reads: u64,
    txome_size: u64,
) -> Vec<Peak> {
    let merged = merge_significant(stats, window_size, sig_p, span_start, allowed_gap);
    let trimmed = trim_to_reads(&merged, midpoints);
    rescore(&trimmed, junctions, expr, total_reads, txome_size)
}
