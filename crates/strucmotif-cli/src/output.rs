use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use strucmotif::engine::scorer::HitSummary;
use strucmotif::engine::state::SearchTimings;

/// One CSV row per hit; list-valued columns are joined into single cells.
#[derive(Debug, Serialize)]
struct HitRecord<'a> {
    structure_id: &'a str,
    rmsd: f64,
    residues: String,
    transformation: String,
}

impl<'a> From<&'a HitSummary> for HitRecord<'a> {
    fn from(summary: &'a HitSummary) -> Self {
        Self {
            structure_id: &summary.structure_id,
            rmsd: summary.rmsd,
            residues: summary.residues.join(";"),
            transformation: summary
                .transformation
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Writes the hit table followed by a `#`-prefixed timing line.
///
/// Readers skip the trailing line with `csv::ReaderBuilder::comment(Some(b'#'))`.
pub fn write_hits(
    summaries: &[HitSummary],
    timings: &SearchTimings,
    mut writer: impl Write,
) -> Result<()> {
    {
        let mut csv_writer = csv::Writer::from_writer(&mut writer);
        if summaries.is_empty() {
            csv_writer.write_record(["structure_id", "rmsd", "residues", "transformation"])?;
        }
        for summary in summaries {
            csv_writer.serialize(HitRecord::from(summary))?;
        }
        csv_writer.flush()?;
    }
    writeln!(
        writer,
        "# assembly_ms={} scoring_ms={} total_ms={}",
        timings.assembly_ms(),
        timings.scoring_ms(),
        timings.total_ms()
    )?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn timings() -> SearchTimings {
        SearchTimings {
            assembly: Duration::from_millis(12),
            scoring: Duration::from_millis(30),
            total: Duration::from_millis(45),
        }
    }

    fn summary() -> HitSummary {
        let mut transformation = [0.0; 16];
        for i in 0..4 {
            transformation[i * 5] = 1.0;
        }
        transformation[3] = 2.5;
        HitSummary {
            structure_id: "1abc".to_string(),
            rmsd: 0.12,
            transformation,
            residues: vec!["A:HIS57".to_string(), "A:SER195".to_string()],
        }
    }

    #[test]
    fn writes_one_row_per_hit_with_joined_columns() {
        let mut buffer = Vec::new();
        write_hits(&[summary()], &timings(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "structure_id,rmsd,residues,transformation");
        assert_eq!(
            lines[1],
            "1abc,0.12,A:HIS57;A:SER195,1 0 0 2.5 0 1 0 0 0 0 1 0 0 0 0 1"
        );
        assert_eq!(lines[2], "# assembly_ms=12 scoring_ms=30 total_ms=45");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_result_still_writes_a_header() {
        let mut buffer = Vec::new();
        write_hits(&[], &SearchTimings::default(), &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "structure_id,rmsd,residues,transformation\n# assembly_ms=0 scoring_ms=0 total_ms=0\n"
        );
    }

    #[test]
    fn timing_line_is_skipped_by_comment_aware_readers() {
        let mut buffer = Vec::new();
        write_hits(&[summary()], &timings(), &mut buffer).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .from_reader(buffer.as_slice());
        let rows: Vec<_> = reader.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "1abc");
    }
}
