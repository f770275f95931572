//! End-to-end tests driving the pipeline from CSV files on disk.

use std::fs;
use std::io::Write;

use chrono::{Datelike, Duration, NaiveDate};
use tempfile::NamedTempFile;

use tscast::aggregate::Frequency;
use tscast::ingest::DataTable;
use tscast::pipeline::{run, RunConfig};
use tscast::report;
use tscast::PipelineError;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn daily_csv(days: usize) -> String {
    let mut csv = String::from("date,sales\n");
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for i in 0..days {
        let date = base + Duration::days(i as i64);
        let value = 50.0 + i as f64 + 5.0 * ((i % 7) as f64);
        csv.push_str(&format!("{},{}\n", date.format("%d/%m/%Y"), value));
    }
    csv
}

#[test]
fn file_backed_run_produces_history_plus_horizon() {
    let file = write_csv(&daily_csv(40));
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales")
        .with_frequency(Frequency::Daily)
        .with_horizon(14);

    let frame = run(&table, &config).unwrap();
    assert_eq!(frame.len(), 40 + 14);
    assert_eq!(frame.history_len(), 40);
    assert_eq!(frame.horizon(), 14);
}

#[test]
fn bounds_bracket_the_point_estimate_everywhere() {
    let file = write_csv(&daily_csv(60));
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(30);

    let frame = run(&table, &config).unwrap();
    for row in frame.rows() {
        assert!(row.lower <= row.point, "lower above point at {}", row.date);
        assert!(row.point <= row.upper, "point above upper at {}", row.date);
    }
}

#[test]
fn duplicate_timestamps_are_summed_into_one_bucket() {
    let csv = "date,sales\n\
               01/03/2024,10\n\
               01/03/2024,15\n\
               02/03/2024,7\n\
               03/03/2024,3\n";
    let file = write_csv(csv);
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales")
        .with_frequency(Frequency::Daily)
        .with_horizon(1);

    let frame = run(&table, &config).unwrap();
    assert_eq!(frame.history_len(), 3);
    assert_eq!(frame.actuals()[0], 25.0);
    assert_eq!(frame.actuals()[1], 7.0);
}

#[test]
fn weekly_buckets_share_one_sum_per_week() {
    // Mon 2024-03-04 through Sun 2024-03-10 is one week; Mon 2024-03-11
    // starts the next.
    let csv = "date,sales\n\
               04/03/2024,1\n\
               06/03/2024,2\n\
               10/03/2024,3\n\
               11/03/2024,4\n";
    let file = write_csv(csv);
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales")
        .with_frequency(Frequency::Weekly)
        .with_horizon(1);

    let frame = run(&table, &config).unwrap();
    assert_eq!(frame.history_len(), 2);
    assert_eq!(frame.actuals(), &[6.0, 4.0]);
    assert_eq!(
        frame.dates()[0],
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    );
}

#[test]
fn gaps_between_buckets_are_filled_with_zero() {
    let csv = "date,sales\n\
               01/01/2024,5\n\
               04/01/2024,8\n";
    let file = write_csv(csv);
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales")
        .with_frequency(Frequency::Daily)
        .with_horizon(1);

    let frame = run(&table, &config).unwrap();
    assert_eq!(frame.history_len(), 4);
    assert_eq!(frame.actuals(), &[5.0, 0.0, 0.0, 8.0]);
}

#[test]
fn horizon_one_spacing_matches_the_frequency() {
    let cases = [
        (Frequency::Daily, 40usize),
        (Frequency::Weekly, 40),
        (Frequency::MonthStart, 400),
        (Frequency::QuarterStart, 400),
        (Frequency::YearStart, 800),
    ];

    for (frequency, days) in cases {
        let file = write_csv(&daily_csv(days));
        let table = DataTable::from_path(file.path()).unwrap();
        let config = RunConfig::new("date", "sales")
            .with_frequency(frequency)
            .with_horizon(1);

        let frame = run(&table, &config).unwrap();
        let dates = frame.dates();
        let last = dates[frame.history_len() - 1];
        let next = dates[frame.history_len()];

        let expected = match frequency {
            Frequency::Daily => last + Duration::days(1),
            Frequency::Weekly => last + Duration::days(7),
            Frequency::MonthStart => {
                let (y, m) = if last.month() == 12 {
                    (last.year() + 1, 1)
                } else {
                    (last.year(), last.month() + 1)
                };
                NaiveDate::from_ymd_opt(y, m, 1).unwrap()
            }
            Frequency::QuarterStart => {
                let (y, m) = if last.month() >= 10 {
                    (last.year() + 1, 1)
                } else {
                    (last.year(), last.month() + 3)
                };
                NaiveDate::from_ymd_opt(y, m, 1).unwrap()
            }
            Frequency::YearStart => NaiveDate::from_ymd_opt(last.year() + 1, 1, 1).unwrap(),
        };
        assert_eq!(next, expected, "wrong spacing for {frequency}");
    }
}

#[test]
fn malformed_date_aborts_with_no_partial_output() {
    let csv = "date,sales\n\
               01/01/2024,5\n\
               not-a-date,8\n\
               03/01/2024,2\n";
    let file = write_csv(csv);
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(5);

    let err = run(&table, &config).unwrap_err();
    assert!(matches!(err, PipelineError::DateParse { row: 2, .. }));
    assert!(err.to_string().contains("not-a-date"));
}

#[test]
fn non_numeric_value_reports_row_and_text() {
    let csv = "date,sales\n\
               01/01/2024,5\n\
               02/01/2024,lots\n";
    let file = write_csv(csv);
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(5);

    let err = run(&table, &config).unwrap_err();
    assert!(matches!(err, PipelineError::ValueParse { row: 2, .. }));
    assert!(err.to_string().contains("lots"));
}

#[test]
fn literal_nan_cell_aborts_instead_of_poisoning_the_forecast() {
    // Exported CSVs often spell missing values as a literal NaN, which
    // str::parse accepts; the run must fail, not render a NaN chart.
    let csv = "date,sales\n\
               01/01/2024,5\n\
               02/01/2024,NaN\n\
               03/01/2024,7\n";
    let file = write_csv(csv);
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(5);

    let err = run(&table, &config).unwrap_err();
    assert!(matches!(err, PipelineError::ValueParse { row: 2, .. }));
    assert!(err.to_string().contains("NaN"));
}

#[test]
fn rerunning_the_same_input_is_deterministic() {
    let file = write_csv(&daily_csv(50));
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(25);

    let a = run(&table, &config).unwrap();
    let b = run(&table, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn report_round_trips_through_the_filesystem() {
    let file = write_csv(&daily_csv(30));
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(7);
    let frame = run(&table, &config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("forecast.html");
    report::write_html(&frame, &config, &out).unwrap();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("forecast-chart"));
    assert!(html.contains("sales"));
}

#[test]
fn json_export_carries_all_rows() {
    let file = write_csv(&daily_csv(20));
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(10);
    let frame = run(&table, &config).unwrap();

    let json = serde_json::to_value(frame.rows()).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 30);
    assert!(rows[0]["date"].is_string());
    assert!(rows[0]["lower"].as_f64().unwrap() <= rows[0]["upper"].as_f64().unwrap());
}

#[test]
fn iso_dates_are_accepted_alongside_day_first() {
    let csv = "date,sales\n\
               2024-01-01,5\n\
               2024-01-02,8\n\
               2024-01-03,6\n";
    let file = write_csv(csv);
    let table = DataTable::from_path(file.path()).unwrap();
    let config = RunConfig::new("date", "sales").with_horizon(2);

    let frame = run(&table, &config).unwrap();
    assert_eq!(frame.history_len(), 3);
}
