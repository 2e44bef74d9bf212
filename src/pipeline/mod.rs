use crate::align::{midpoints_for_transcript, AlignedRead};
use crate::peaks::{assemble_peaks, Peak};
use crate::scan::scan_transcript;
use crate::transcript::{transcriptome_tests, Expression, Transcript};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Caller-owned knobs for a peak-calling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakCallConfig {
    /// Scan window size in bases.
    pub window_size: u64,
    /// Significance threshold a window must beat to seed a peak.
    pub sig_p: f64,
    /// Minimum exonic FPKM applied before scanning.
    pub min_fpkm_exon: f64,
    /// Minimum pre-mRNA FPKM applied before scanning.
    pub min_fpkm_pre: f64,
    /// Consecutive insignificant windows tolerated inside a peak.
    pub allowed_insig_gap: usize,
}

impl Default for PeakCallConfig {
    fn default() -> Self {
        PeakCallConfig {
            window_size: 50,
            sig_p: 0.001,
            min_fpkm_exon: 0.50,
            min_fpkm_pre: 0.25,
            allowed_insig_gap: 1,
        }
    }
}

/// Per-transcript expression estimates keyed by transcript id, as
/// produced by an external quantification step.
pub type ExpressionTable = HashMap<String, Expression>;

/// Source of aligned reads overlapping a genomic interval. Fetched once
/// per transcript before scanning; implementations must be shareable
/// across worker threads.
pub trait ReadSource: Sync {
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Vec<AlignedRead>;
}

/// Read source over reads already held in memory, grouped by
/// chromosome. Backs tests and the simulator.
#[derive(Debug, Default)]
pub struct InMemoryReads {
    by_chrom: HashMap<String, Vec<AlignedRead>>,
}

impl InMemoryReads {
    pub fn new() -> Self {
        InMemoryReads {
            by_chrom: HashMap::new(),
        }
    }

    pub fn add(&mut self, chrom: &str, read: AlignedRead) {
        self.by_chrom.entry(chrom.to_string()).or_default().push(read);
    }
}

impl ReadSource for InMemoryReads {
    fn fetch(&self, chrom: &str, start: u64, end: u64) -> Vec<AlignedRead> {
        match self.by_chrom.get(chrom) {
            Some(reads) => reads
                .iter()
                .filter(|r| {
                    let ref_end = r.pos + r.reference_span().saturating_sub(1);
                    r.pos <= end && ref_end >= start
                })
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Peaks called on one transcript, before global numbering.
#[derive(Debug, Clone)]
pub struct TranscriptPeaks {
    pub transcript_id: String,
    pub chrom: String,
    pub strand: String,
    pub peaks: Vec<Peak>,
}

/// A globally numbered peak call, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct PeakRecord {
    pub id: u64,
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: String,
    pub transcript_id: String,
    pub count: usize,
    pub p_value: f64,
}

/// Call peaks on a single transcript from its sorted read midpoints.
pub fn call_transcript(
    tx: &Transcript,
    expr: &Expression,
    midpoints: &[f64],
    total_reads: u64,
    txome_size: u64,
    config: &PeakCallConfig,
) -> Vec<Peak> {
    let (span_start, span_end) = tx.span();
    let junctions = tx.junctions();

    let stats = scan_transcript(
        span_start,
        span_end,
        config.window_size,
        midpoints,
        &junctions,
        expr,
        total_reads,
        txome_size,
    );

    assemble_peaks(
        &stats,
        midpoints,
        &junctions,
        config.window_size,
        config.sig_p,
        span_start,
        config.allowed_insig_gap,
        expr,
        total_reads,
        txome_size,
    )
}

/// Call peaks across the whole transcript set.
///
/// Transcripts are scanned on rayon workers with no shared state, then
/// the per-transcript results are ordered by transcript id and numbered
/// in one sequential pass so `PEAK{n}` assignment does not depend on
/// worker scheduling. Transcripts without an expression estimate are
/// skipped. `total_reads` is the count of qualifying reads across the
/// transcriptome, supplied by the alignment collaborator.
pub fn call_peaks<S: ReadSource>(
    transcripts: &[Transcript],
    expression: &ExpressionTable,
    reads: &S,
    total_reads: u64,
    config: &PeakCallConfig,
) -> Vec<PeakRecord> {
    let txome_size = transcriptome_tests(transcripts, config.window_size);
    info!(
        "scanning {} transcripts ({} window tests transcriptome-wide)",
        transcripts.len(),
        txome_size
    );

    let mut results: Vec<TranscriptPeaks> = transcripts
        .par_iter()
        .filter_map(|tx| {
            let expr = match expression.get(&tx.id) {
                Some(e) => e.floored(config.min_fpkm_exon, config.min_fpkm_pre),
                None => {
                    warn!("no expression estimate for transcript {}, skipping", tx.id);
                    return None;
                }
            };

            let (span_start, span_end) = tx.span();
            let fetched = reads.fetch(&tx.chrom, span_start, span_end);
            let midpoints = midpoints_for_transcript(&fetched, tx.strand);

            let peaks = call_transcript(tx, &expr, &midpoints, total_reads, txome_size, config);
            Some(TranscriptPeaks {
                transcript_id: tx.id.clone(),
                chrom: tx.chrom.clone(),
                strand: tx.strand.strand_symbol().to_string(),
                peaks,
            })
        })
        .collect();

    number_peaks(&mut results)
}

/// Deterministic numbering pass: stable transcript order, then
/// sequential ids starting at PEAK1.
fn number_peaks(results: &mut [TranscriptPeaks]) -> Vec<PeakRecord> {
    results.sort_by(|a, b| a.transcript_id.cmp(&b.transcript_id));

    let mut records = Vec::new();
    let mut next_id = 1u64;
    for tp in results.iter() {
        for peak in &tp.peaks {
            records.push(PeakRecord {
                id: next_id,
                chrom: tp.chrom.clone(),
                start: peak.start,
                end: peak.end,
                strand: tp.strand.clone(),
                transcript_id: tp.transcript_id.clone(),
                count: peak.count,
                p_value: peak.p_value,
            });
            next_id += 1;
        }
    }

    info!("called {} peaks", records.len());
    records
}
