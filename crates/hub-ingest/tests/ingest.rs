//! Tests for CSV discovery, column mapping and project loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataType};
use tempfile::TempDir;

use hub_ingest::polars_utils::{column_f64s, column_i64s, column_strings};
use hub_ingest::{
    CsvTable, DataPaths, IngestError, ModelTable, find_target_data_file, list_model_output_files,
    load_location_reference, load_model_output, load_target_data, map_model_output_tables,
    map_target_table, read_csv_table,
};
use hub_model::{
    ColumnMapping, DashboardConfig, DataFileFormat, DataSourceLinks, ForecastPeriod, ModelConfig,
    ObservationFormat, PredictionInterval, StaticPeriod, TargetConfig,
};

fn table(rows: &[&[(&str, &str)]]) -> CsvTable {
    let records: Vec<BTreeMap<String, String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect()
        })
        .collect();
    CsvTable::from_records(&records)
}

fn target_mapping() -> ColumnMapping {
    ColumnMapping {
        date_col: "week_ending".to_string(),
        observation_col: "count".to_string(),
        location_col: Some("fips".to_string()),
        location_name_col: Some("state".to_string()),
        as_of_col: Some("as_of".to_string()),
        ..ColumnMapping::default()
    }
}

fn config(models: &[&str]) -> DashboardConfig {
    DashboardConfig {
        links: DataSourceLinks::default(),
        forecast_periods: vec![ForecastPeriod::Static(StaticPeriod {
            period_id: "season".to_string(),
            display_string: "Season".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).expect("date"),
            is_default_selected: true,
        })],
        is_single_location: false,
        single_location: None,
        is_single_target: true,
        targets: vec![TargetConfig {
            target_column_in_target_data: "value".to_string(),
            corresponding_key_in_model_output: "wk inc flu hosp".to_string(),
            forecast_periods: vec!["season".to_string()],
            display_name: "value".to_string(),
        }],
        time_unit: 7,
        horizons: vec![0, 1, 2],
        column_mapping: ColumnMapping::default(),
        target_data_observation_format: ObservationFormat::Float,
        target_data_file_format: DataFileFormat::Csv,
        models: models
            .iter()
            .map(|name| ModelConfig {
                model_name: (*name).to_string(),
                color_hex: "#4CAF50".to_string(),
                display_name: (*name).to_string(),
            })
            .collect(),
        prediction_intervals: vec![PredictionInterval::new(
            50,
            ["0.25".to_string(), "0.75".to_string()],
        )],
        evaluation_intervals: Vec::new(),
        model_output_naming_standard: "ISODate".to_string(),
        baseline_model: models.first().map(|name| (*name).to_string()).unwrap_or_default(),
        validation_errors: Vec::new(),
        validation_warnings: Vec::new(),
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, contents).expect("write file");
}

#[test]
fn csv_reader_trims_cells_and_skips_blank_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("data.csv");
    write(
        &path,
        "\u{feff}date , value\n\n2024-01-06, 12 \n,\n2024-01-13,15\n",
    );
    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.headers, vec!["date", "value"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(0, 1), "12");
    assert_eq!(table.cell(1, 0), "2024-01-13");
}

#[test]
fn target_table_maps_and_retypes_columns() {
    let raw = table(&[
        &[("week_ending", "2024-01-06"), ("count", "12"), ("fips", "01"), ("state", "Alabama")],
        &[("week_ending", "2024-01-13T00:00:00"), ("count", "15.0"), ("fips", "01"), ("state", "Alabama")],
    ]);
    let mapping = ColumnMapping {
        as_of_col: None,
        ..target_mapping()
    };

    let data = map_target_table(&raw, &mapping, ObservationFormat::Int).expect("map target");
    let frame = &data.frame;
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["date", "observation", "location", "location_name"]);
    assert_eq!(
        frame.column("observation").expect("observation").dtype(),
        &DataType::Int64
    );
    assert_eq!(
        column_strings(frame, "date").expect("dates"),
        vec![Some("2024-01-06".to_string()), Some("2024-01-13".to_string())]
    );
    assert_eq!(
        column_i64s(frame, "observation").expect("observations"),
        vec![Some(12), Some(15)]
    );
    assert!(data.snapshot.is_none());
}

#[test]
fn missing_required_target_column_is_reported() {
    let raw = table(&[&[("week_ending", "2024-01-06"), ("fips", "01")]]);
    let err = map_target_table(&raw, &target_mapping(), ObservationFormat::Float)
        .expect_err("observation column is missing");
    match err {
        IngestError::RequiredColumnMissing {
            column,
            source_header,
            ..
        } => {
            assert_eq!(column, "observation");
            assert_eq!(source_header, "count");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparseable_date_is_reported_with_row() {
    let raw = table(&[
        &[("week_ending", "2024-01-06"), ("count", "1")],
        &[("week_ending", "last week"), ("count", "2")],
    ]);
    let err = map_target_table(&raw, &target_mapping(), ObservationFormat::Float)
        .expect_err("bad date");
    assert!(matches!(
        err,
        IngestError::InvalidDate { row: 2, ref value, .. } if value == "last week"
    ));
}

#[test]
fn missing_value_markers_become_null_observations() {
    let raw = table(&[
        &[("week_ending", "2024-01-06"), ("count", "12")],
        &[("week_ending", "2024-01-13"), ("count", "NA")],
        &[("week_ending", "NA"), ("count", "nan")],
    ]);
    let mapping = ColumnMapping {
        as_of_col: None,
        ..target_mapping()
    };

    let floats = map_target_table(&raw, &mapping, ObservationFormat::Float).expect("float target");
    assert_eq!(floats.frame.height(), 3);
    assert_eq!(
        column_f64s(&floats.frame, "observation").expect("observations"),
        vec![Some(12.0), None, None]
    );
    assert_eq!(
        column_strings(&floats.frame, "date").expect("dates"),
        vec![Some("2024-01-06".to_string()), Some("2024-01-13".to_string()), None]
    );

    let ints = map_target_table(&raw, &mapping, ObservationFormat::Int).expect("int target");
    assert_eq!(
        column_i64s(&ints.frame, "observation").expect("observations"),
        vec![Some(12), None, None]
    );
}

#[test]
fn malformed_number_is_still_rejected() {
    let raw = table(&[&[("week_ending", "2024-01-06"), ("count", "12abc")]]);
    let mapping = ColumnMapping {
        as_of_col: None,
        ..target_mapping()
    };
    let err = map_target_table(&raw, &mapping, ObservationFormat::Float).expect_err("bad number");
    assert!(matches!(
        err,
        IngestError::InvalidNumber { row: 1, ref value, .. } if value == "12abc"
    ));
}

#[test]
fn same_day_as_of_snapshots_stay_distinct() {
    let raw = table(&[
        &[("week_ending", "2024-01-06"), ("count", "10"), ("as_of", "2024-01-15T08:00:00")],
        &[("week_ending", "2024-01-06"), ("count", "11"), ("as_of", "2024-01-15T17:30:00")],
    ]);
    let data = map_target_table(&raw, &target_mapping(), ObservationFormat::Float)
        .expect("map target");

    assert_eq!(
        column_f64s(&data.frame, "observation").expect("observations"),
        vec![Some(11.0)]
    );
    assert_eq!(
        column_strings(&data.frame, "as_of").expect("as_of"),
        vec![Some("2024-01-15T17:30:00".to_string())]
    );
    let snapshot = data.snapshot.expect("snapshot selection");
    assert_eq!(snapshot.latest_as_of, "2024-01-15T17:30:00");
    assert_eq!(snapshot.snapshot_count, 2);
    assert_eq!(snapshot.dropped_rows, 1);
}

#[test]
fn only_latest_as_of_snapshot_is_kept() {
    let raw = table(&[
        &[("week_ending", "2024-01-06"), ("count", "10"), ("as_of", "2024-01-08")],
        &[("week_ending", "2024-01-06"), ("count", "11"), ("as_of", "2024-01-15")],
        &[("week_ending", "2024-01-13"), ("count", "20"), ("as_of", "2024-01-15")],
    ]);
    let data = map_target_table(&raw, &target_mapping(), ObservationFormat::Float)
        .expect("map target");

    assert_eq!(data.frame.height(), 2);
    assert_eq!(
        column_f64s(&data.frame, "observation").expect("observations"),
        vec![Some(11.0), Some(20.0)]
    );
    let snapshot = data.snapshot.expect("snapshot selection");
    assert_eq!(snapshot.latest_as_of, "2024-01-15");
    assert_eq!(snapshot.snapshot_count, 2);
    assert_eq!(snapshot.dropped_rows, 1);
}

#[test]
fn horizon_is_derived_from_dates() {
    let raw = table(&[&[
        ("reference_date", "2024-08-03"),
        ("target_end_date", "2024-08-17"),
        ("location", "01"),
        ("target", "wk inc flu hosp"),
        ("output_type", "quantile"),
        ("output_type_id", "0.5"),
        ("value", "42"),
    ]]);
    let mapping = ColumnMapping {
        horizon_col: None,
        ..ColumnMapping::default()
    };

    let frame = map_model_output_tables(&[ModelTable::new("hub-ensemble", raw)], &mapping, 7)
        .expect("map model output");
    assert_eq!(column_i64s(&frame, "horizon").expect("horizon"), vec![Some(2)]);
    assert_eq!(
        frame.column("model").expect("model").get(0).expect("row"),
        AnyValue::String("hub-ensemble")
    );
}

#[test]
fn supplied_horizons_are_trusted() {
    let raw = table(&[&[
        ("reference_date", "2024-08-03"),
        ("target_end_date", "2024-08-17"),
        ("horizon", "5"),
        ("output_type", "quantile"),
        ("output_type_id", "0.5"),
        ("value", "1.5"),
    ]]);
    let frame = map_model_output_tables(
        &[ModelTable::new("m", raw)],
        &ColumnMapping::default(),
        0,
    )
    .expect("time unit is not needed when horizons are supplied");
    assert_eq!(column_i64s(&frame, "horizon").expect("horizon"), vec![Some(5)]);
}

#[test]
fn horizon_derivation_needs_positive_time_unit() {
    let raw = table(&[&[
        ("reference_date", "2024-08-03"),
        ("target_end_date", "2024-08-17"),
        ("value", "1"),
    ]]);
    let mapping = ColumnMapping {
        horizon_col: None,
        ..ColumnMapping::default()
    };
    let err = map_model_output_tables(&[ModelTable::new("m", raw)], &mapping, 0)
        .expect_err("time unit 0");
    assert!(matches!(err, IngestError::InvalidTimeUnit { time_unit: 0 }));
}

#[test]
fn model_tables_are_concatenated_in_canonical_order() {
    let first = table(&[&[
        ("reference_date", "2024-08-03"),
        ("target_end_date", "2024-08-10"),
        ("horizon", "1"),
        ("location", "01"),
        ("output_type", "quantile"),
        ("output_type_id", "0.5"),
        ("value", "1"),
        ("notes", "ignored"),
    ]]);
    let second = table(&[&[
        ("reference_date", "2024-08-03"),
        ("target_end_date", "2024-08-10"),
        ("horizon", "1"),
        ("output_type", "quantile"),
        ("output_type_id", "0.5"),
        ("value", "2"),
    ]]);
    let frame = map_model_output_tables(
        &[ModelTable::new("a", first), ModelTable::new("b", second)],
        &ColumnMapping::default(),
        7,
    )
    .expect("map model output");

    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "reference_date",
            "target_end_date",
            "location",
            "horizon",
            "model",
            "output_type",
            "output_type_id",
            "value"
        ]
    );
    assert_eq!(
        column_strings(&frame, "location").expect("location"),
        vec![Some("01".to_string()), None]
    );
    assert_eq!(
        column_strings(&frame, "model").expect("model"),
        vec![Some("a".to_string()), Some("b".to_string())]
    );
}

#[test]
fn discovery_picks_first_csv_by_name() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir.path().join("b.csv"), "date,value\n");
    write(&dir.path().join("a.csv"), "date,value\n");
    write(&dir.path().join("notes.txt"), "hello");
    let found = find_target_data_file(dir.path()).expect("csv present");
    assert_eq!(found.file_name().and_then(|n| n.to_str()), Some("a.csv"));

    let empty = TempDir::new().expect("temp dir");
    assert!(matches!(
        find_target_data_file(empty.path()),
        Err(IngestError::NoDataFound { .. })
    ));
    assert!(matches!(
        find_target_data_file(&empty.path().join("missing")),
        Err(IngestError::DirectoryNotFound { .. })
    ));
}

#[test]
fn missing_model_directory_is_skipped() {
    let dir = TempDir::new().expect("temp dir");
    assert_eq!(
        list_model_output_files(dir.path(), "absent").expect("no io error"),
        None
    );
}

#[test]
fn project_loading_reads_both_families() {
    let root = TempDir::new().expect("temp dir");
    let paths = DataPaths::for_root(root.path(), true);
    assert!(paths.target_data.ends_with("test-data-input/target-data"));

    write(
        &paths.target_data.join("target.csv"),
        "date,value,location\n2024-08-03,10,01\n2024-08-10,12,01\n",
    );
    write(
        &paths.model_output.join("hub-ensemble/2024-08-03-hub-ensemble.csv"),
        "reference_date,target_end_date,horizon,location,output_type,output_type_id,value\n\
         2024-08-03,2024-08-10,1,01,quantile,0.5,11\n",
    );

    let mut cfg = config(&["hub-ensemble", "no-files"]);
    cfg.column_mapping.location_col = Some("location".to_string());

    let target = load_target_data(&cfg, &paths.target_data).expect("target data");
    assert_eq!(target.frame.height(), 2);
    let model = load_model_output(&cfg, &paths.model_output).expect("model output");
    assert_eq!(model.height(), 1);

    let empty = config(&["no-files"]);
    assert!(matches!(
        load_model_output(&empty, &paths.model_output),
        Err(IngestError::NoDataFound { .. })
    ));
}

#[test]
fn parquet_target_data_is_rejected() {
    let root = TempDir::new().expect("temp dir");
    let mut cfg = config(&["m"]);
    cfg.target_data_file_format = DataFileFormat::Parquet;
    assert!(matches!(
        load_target_data(&cfg, root.path()),
        Err(IngestError::UnsupportedFileFormat { .. })
    ));
}

#[test]
fn reference_file_is_loaded_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("locations.json");
    write(&path, r#"{"06": "California", "US": "United States"}"#);
    let reference = load_location_reference(&path).expect("reference");
    assert_eq!(reference.get("6"), Some("California"));

    write(&path, "[1, 2]");
    assert!(matches!(
        load_location_reference(&path),
        Err(IngestError::Reference { .. })
    ));
}
