use chrono::NaiveDate;
use geomean_sweep::{
    DEFAULT_COMMODITY_LABEL, export_csv, fetch_date_range, render_csv, sort_by_date,
};
use panelharga_api::api::{PanelHargaAPI, Transport};
use std::error::Error;

/// Returns geomean 35000 for province 12 on every date except the listed ones,
/// which get a response without that province.
struct MockPanelHarga {
    missing: Vec<&'static str>,
}

impl Transport for MockPanelHarga {
    async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        if self.missing.iter().any(|segment| url.contains(segment)) {
            return Ok(r#"{"data":[{"province_id":31,"geomean":51000}]}"#.to_string());
        }
        Ok(
            r#"{"data":[{"province_id":31,"geomean":51000},{"province_id":12,"geomean":35000}]}"#
                .to_string(),
        )
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

async fn run(missing: Vec<&'static str>, start: NaiveDate, end: NaiveDate) -> String {
    let api = PanelHargaAPI::new(MockPanelHarga { missing });
    let mut records = fetch_date_range(&api, start, end, 12, None).await;
    sort_by_date(&mut records);
    render_csv(&records, DEFAULT_COMMODITY_LABEL).unwrap()
}

#[tokio::test]
async fn three_days_all_present() {
    let csv = run(vec![], ymd(2021, 4, 1), ymd(2021, 4, 3)).await;
    assert_eq!(
        csv,
        "Tanggal,Bawang Merah\n01/04/2021,35000\n02/04/2021,35000\n03/04/2021,35000"
    );
}

#[tokio::test]
async fn three_days_middle_absent() {
    let csv = run(vec!["02-04-2021"], ymd(2021, 4, 1), ymd(2021, 4, 3)).await;
    assert_eq!(
        csv,
        "Tanggal,Bawang Merah\n01/04/2021,35000\n02/04/2021,\n03/04/2021,35000"
    );
}

#[tokio::test]
async fn one_row_per_day_sorted_across_leap_year() {
    let start = ymd(2023, 12, 1);
    let end = ymd(2024, 3, 31);
    let csv = run(vec![], start, end).await;

    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(rows.len(), 122);

    let dates: Vec<NaiveDate> = rows
        .iter()
        .map(|row| NaiveDate::parse_from_str(row.split(',').next().unwrap(), "%d/%m/%Y").unwrap())
        .collect();
    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(dates.first(), Some(&start));
    assert_eq!(dates.last(), Some(&end));
    assert!(rows.contains(&"29/02/2024,35000"));
}

#[tokio::test]
async fn repeated_runs_write_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geomean_results.csv");
    let mut outputs = vec![];

    for _ in 0..2 {
        let api = PanelHargaAPI::new(MockPanelHarga {
            missing: vec!["05-04-2021"],
        });
        let mut records = fetch_date_range(&api, ymd(2021, 4, 1), ymd(2021, 4, 10), 12, None).await;
        sort_by_date(&mut records);
        export_csv(&path, &records, DEFAULT_COMMODITY_LABEL).unwrap();
        outputs.push(std::fs::read(&path).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
}
