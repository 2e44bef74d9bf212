use bio_types::strand::Strand;
use std::collections::HashMap;

/// A single exon interval in 1-based inclusive coordinates.
///
/// The first base of a chromosome is 1 and an interval covers
/// `end - start + 1` bases. Exons order by (start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Exon {
    pub start: u64,
    pub end: u64,
}

impl Exon {
    pub fn new(start: u64, end: u64) -> Self {
        Exon { start, end }
    }

    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Expression rates attached to a transcript by an external
/// quantification step, in FPKM units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression {
    pub fpkm_exon: f64,
    pub fpkm_pre: f64,
}

impl Expression {
    pub fn new(fpkm_exon: f64, fpkm_pre: f64) -> Self {
        Expression { fpkm_exon, fpkm_pre }
    }

    /// Raise low rate estimates to the given minimums before scanning.
    pub fn floored(&self, min_fpkm_exon: f64, min_fpkm_pre: f64) -> Expression {
        Expression {
            fpkm_exon: self.fpkm_exon.max(min_fpkm_exon),
            fpkm_pre: self.fpkm_pre.max(min_fpkm_pre),
        }
    }
}

/// A transcript model: ordered disjoint exons on one strand of one
/// chromosome, plus the annotation attributes that identify it.
///
/// Exons stay sorted by start as they are added. A usable transcript
/// always carries at least one exon.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Required annotation key `transcript_id`.
    pub id: String,
    /// Required annotation key `gene_id`.
    pub gene_id: String,
    pub chrom: String,
    pub strand: Strand,
    /// Any further annotation attributes beyond the two required keys.
    pub attributes: HashMap<String, String>,
    exons: Vec<Exon>,
}

impl Transcript {
    pub fn new(id: &str, gene_id: &str, chrom: &str, strand: Strand) -> Self {
        Transcript {
            id: id.to_string(),
            gene_id: gene_id.to_string(),
            chrom: chrom.to_string(),
            strand,
            attributes: HashMap::new(),
            exons: Vec::new(),
        }
    }

    /// Add an exon, restoring start order if the new exon lands out of
    /// place.
    pub fn add_exon(&mut self, start: u64, end: u64) {
        self.exons.push(Exon::new(start, end));
        let n = self.exons.len();
        if n > 1 && self.exons[n - 2].end > start {
            self.exons.sort_unstable();
        }
    }

    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    /// Genomic span of the transcript: first exon start to last exon end.
    pub fn span(&self) -> (u64, u64) {
        (self.exons[0].start, self.exons[self.exons.len() - 1].end)
    }

    /// Splice junction boundary list.
    ///
    /// Each entry marks the first bp of the next exon or intron, so the
    /// segment before an even-indexed entry is exonic and the segment
    /// before an odd-indexed entry is intronic. Single-exon transcripts
    /// have no junctions.
    pub fn junctions(&self) -> Vec<u64> {
        let mut junctions = Vec::new();
        if self.exons.len() > 1 {
            junctions.push(self.exons[0].end + 1);
            for exon in &self.exons[1..self.exons.len() - 1] {
                junctions.push(exon.start);
                junctions.push(exon.end + 1);
            }
            junctions.push(self.exons[self.exons.len() - 1].start);
        }
        junctions
    }
}

/// Number of window tests a scan over the whole transcript set will
/// perform: the sum of per-transcript span sizes with one window size
/// subtracted from each.
pub fn transcriptome_tests(transcripts: &[Transcript], window_size: u64) -> u64 {
    let mut tests: i64 = 0;
    for tx in transcripts {
        let (start, end) = tx.span();
        tests += end as i64 - start as i64 - window_size as i64 + 1;
    }
    tests.max(0) as u64
}
