use harga_model::PriceRecord;
use std::error::Error;
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "geomean_results.csv";
pub const DEFAULT_COMMODITY_LABEL: &str = "Bawang Merah";

const DATE_COLUMN: &str = "Tanggal";

/// Header plus one `date,geomean` line per record, `\n`-joined, with no
/// trailing newline. Absent values are empty cells.
pub fn render_csv(
    records: &[PriceRecord],
    commodity_label: &str,
) -> Result<String, Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record([DATE_COLUMN, commodity_label])?;
    for record in records {
        let geomean = record.geomean.map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([record.date.as_str(), geomean.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Renders and writes the whole file in one call, replacing any existing one.
pub fn export_csv(
    path: &Path,
    records: &[PriceRecord],
    commodity_label: &str,
) -> Result<(), Box<dyn Error>> {
    let text = render_csv(records, commodity_label)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use harga_model::{DateToken, FetchStatus};

    fn token(s: &str) -> DateToken {
        s.parse().unwrap()
    }

    #[test]
    fn render_csv_pass_values() {
        let records = vec![
            PriceRecord::found(token("01/04/2021"), Some(35000.0)),
            PriceRecord::found(token("02/04/2021"), Some(35125.5)),
        ];
        let text = render_csv(&records, DEFAULT_COMMODITY_LABEL).unwrap();
        assert_eq!(
            text,
            "Tanggal,Bawang Merah\n01/04/2021,35000\n02/04/2021,35125.5"
        );
    }

    #[test]
    fn render_csv_pass_absent_is_empty_cell() {
        let records = vec![
            PriceRecord::absent(token("02/04/2021"), FetchStatus::NotFound),
            PriceRecord::found(token("03/04/2021"), None),
        ];
        let text = render_csv(&records, DEFAULT_COMMODITY_LABEL).unwrap();
        assert_eq!(text, "Tanggal,Bawang Merah\n02/04/2021,\n03/04/2021,");
        assert!(!text.contains("null"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn render_csv_pass_header_only() {
        let text = render_csv(&[], DEFAULT_COMMODITY_LABEL).unwrap();
        assert_eq!(text, "Tanggal,Bawang Merah");
    }

    #[test]
    fn render_csv_pass_custom_label() {
        let text = render_csv(&[], "Cabai Rawit").unwrap();
        assert_eq!(text, "Tanggal,Cabai Rawit");
    }

    #[test]
    fn export_csv_pass_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_PATH);
        std::fs::write(&path, "stale content that is longer than the new file\n").unwrap();

        let records = vec![PriceRecord::found(token("01/04/2021"), Some(1.0))];
        export_csv(&path, &records, DEFAULT_COMMODITY_LABEL).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Tanggal,Bawang Merah\n01/04/2021,1");
    }

    #[test]
    fn export_csv_fail_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(DEFAULT_OUTPUT_PATH);
        assert!(export_csv(&path, &[], DEFAULT_COMMODITY_LABEL).is_err());
    }
}
