use crate::pipeline::PeakRecord;
use std::fs::File;
use std::io;

/// Write peak calls to a JSON file for downstream tooling.
pub fn write_peaks_json(records: &[PeakRecord], out_path: &str) -> io::Result<()> {
    let file = File::create(out_path)?;
    serde_json::to_writer_pretty(file, records)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trips_record_fields() {
        let records = vec![PeakRecord {
            id: 7,
            chrom: "chr2".to_string(),
            start: 100,
            end: 180,
            strand: "-".to_string(),
            transcript_id: "t9".to_string(),
            count: 12,
            p_value: 3.5e-5,
        }];

        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        write_peaks_json(&records, path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed[0]["id"], 7);
        assert_eq!(parsed[0]["chrom"], "chr2");
        assert_eq!(parsed[0]["strand"], "-");
        assert_eq!(parsed[0]["count"], 12);
    }
}
