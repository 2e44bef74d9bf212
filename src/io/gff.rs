use crate::pipeline::PeakRecord;
use std::fs::File;
use std::io::{BufWriter, Result, Write};

/// Feature source label written into column two of every record.
const SOURCE: &str = "clipcall";

/// Write peak calls as GFF feature lines.
///
/// One line per peak: chromosome, source, feature type `peak`, 1-based
/// inclusive start/end, placeholder score, strand, placeholder frame,
/// and an attribute string carrying the peak id, originating transcript,
/// read count and p-value in scientific notation.
pub fn write_peaks_gff(records: &[PeakRecord], out_path: &str) -> Result<()> {
    let file = File::create(out_path)?;
    let mut writer = BufWriter::new(file);

    for r in records {
        writeln!(
            writer,
            "{}\t{}\tpeak\t{}\t{}\t.\t{}\t.\tid \"PEAK{}\"; transcript_id \"{}\"; count \"{}\"; p \"{:.2e}\"",
            r.chrom, SOURCE, r.start, r.end, r.strand, r.id, r.transcript_id, r.count, r.p_value
        )?;
    }

    Ok(())
}
