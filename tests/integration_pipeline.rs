//! End-to-end tests for reading, enriching, summarising and exporting
//! customs trade files.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use trade_enricher::cli::{self, Args};
use trade_enricher::config::ExportFormat;
use trade_enricher::constants::CLEANED_HEADERS;
use trade_enricher::reader::{read_records, read_string_rows, resolve_inputs};
use trade_enricher::writer::{write_records, write_summaries};
use trade_enricher::{
    HsnEntry, HsnTable, RecordEnricher, SubCategory, TradeConfig, TradeSummary, decode_row, enrich,
    parse_description,
};

const HEADER: &str = "PORT CODE,DATE,IEC,HS CODE,GOODS DESCRIPTION,BE NO,Model Name,Model Number,Capacity,ITEM NO,CTH,CHAPTER,ORIGIN,QUANTITY,UNIT,UNIT PRICE_INR,TOTAL VALUE_INR,UNIT PRICE_USD,TOTAL VALUE_USD,DUTY PAID_INR";

/// Helper to create a small customs dataset spread over two files
fn create_dataset(temp_dir: &TempDir) -> PathBuf {
    let data_dir = temp_dir.path().join("imports");
    fs::create_dir_all(&data_dir).unwrap();

    let first = format!(
        "{HEADER}\n\
         INNSA1,2022-04-01,0512345678,73239990,SS SCRUBBER QTY: 100 USD 0.5 MODEL: SC-1,1,,,,1,7323,73,CN,100,PCS,41,4100,0.5,50,738\n\
         INNSA1,2022-09-12,0512345678,73239300,SS LUNCH BOX 2 TIER MODEL: LB-2,2,,,750ML,1,7323,73,CN,40,PCS,300,12000,3.6,144,2160\n"
    );
    let second = format!(
        "{HEADER}\n\
         INMAA1,2023-01-20,0598765432,73211900,HOT PLATE QTY 10,3,HP-9,,,1,7321,73,CN,10,PCS,1500,15000,18,180,2700\n\
         INMAA1,not-a-date,0598765432,39241090,PLASTIC CONTAINER SET,4,,,,1,3924,39,VN,abc,SET,n/a,800,,,\n"
    );

    fs::write(data_dir.join("2022.csv"), first).unwrap();
    fs::write(data_dir.join("2023.csv"), second).unwrap();

    data_dir
}

fn load_all(data_dir: &std::path::Path) -> Vec<trade_enricher::TradeRecord> {
    let pattern = data_dir.join("*.csv").to_string_lossy().to_string();
    let files = resolve_inputs(&[pattern]).unwrap();
    assert_eq!(files.len(), 2);

    let config = TradeConfig::default();
    let enricher = RecordEnricher::default();
    files
        .iter()
        .flat_map(|f| enricher.enrich_all(&read_records(f, &config).unwrap()))
        .collect()
}

#[test]
fn test_read_and_enrich_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = create_dataset(&temp_dir);

    let records = load_all(&data_dir);
    assert_eq!(records.len(), 4);

    let scrubber = &records[0];
    assert_eq!(scrubber.sub_category, Some(SubCategory::Scrubber));
    assert_eq!(scrubber.model_name, "SC-1");
    assert_eq!(scrubber.quantity, 100);
    assert_eq!(scrubber.unit_price_usd, 0.5);
    assert_eq!(scrubber.grand_total_inr, Some(4838.0));
    assert_eq!(scrubber.year, Some(2022));

    let lunch_box = &records[1];
    assert_eq!(lunch_box.sub_category, Some(SubCategory::LunchBox));
    assert_eq!(lunch_box.capacity, "750ML");
    assert_eq!(lunch_box.hsn_description.as_deref(), Some("Kitchen or tableware"));

    let plate = &records[2];
    assert_eq!(plate.model_name, "HP-9");
    assert_eq!(plate.main_category.as_deref(), Some("Steel"));

    let plastic = &records[3];
    assert_eq!(plastic.hsn_description.as_deref(), Some("Unknown"));
    assert_eq!(plastic.main_category.as_deref(), Some("Others"));
    assert_eq!(plastic.sub_category, Some(SubCategory::Container));
    assert_eq!(plastic.quantity, 0);
    assert_eq!(plastic.unit_price_inr, 0.0);
    assert_eq!(plastic.grand_total_inr, Some(800.0));
    assert_eq!(plastic.year, None);
}

#[test]
fn test_custom_lookup_table() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = create_dataset(&temp_dir);
    let lookup = temp_dir.path().join("lookup.csv");
    fs::write(
        &lookup,
        "HS Code,HSN Description,Main Category\n39241090,Plastic tableware,Plastic\n",
    )
    .unwrap();

    let config = TradeConfig::default().with_lookup_table(&lookup);
    config.validate().unwrap();
    let enricher = RecordEnricher::new(config.load_hsn_table().unwrap());

    let records = read_records(&data_dir.join("2023.csv"), &config).unwrap();
    let enriched = enricher.enrich_all(&records);

    assert_eq!(enriched[0].main_category.as_deref(), Some("Others"));
    assert_eq!(enriched[1].main_category.as_deref(), Some("Plastic"));
}

#[test]
fn test_summary_over_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let records = load_all(&create_dataset(&temp_dir));

    let summary = TradeSummary::build(&records);
    assert_eq!(summary.record_count, 4);
    assert_eq!(
        summary.years.iter().map(|y| y.year).collect::<Vec<_>>(),
        vec![2022, 2023]
    );
    assert_eq!(summary.hs_codes.len(), 4);
    assert_eq!(summary.suppliers.len(), 2);
    assert_eq!(summary.grand_total_inr, 37498.0);
    assert_eq!(
        summary.models.iter().map(|m| m.model_name.as_str()).collect::<Vec<_>>(),
        vec!["HP-9", "LB-2", "SC-1"]
    );
}

#[test]
fn test_export_round_trip_csv() {
    let temp_dir = TempDir::new().unwrap();
    let records = load_all(&create_dataset(&temp_dir));
    let output = temp_dir.path().join("out").join("cleaned.csv");

    let written = write_records(&records, &output, &TradeConfig::default()).unwrap();
    assert_eq!(written, 4);

    let rows = read_string_rows(&output, b',', true, CLEANED_HEADERS.len()).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3][4], "Unknown");
    assert_eq!(rows[3][19], "");
}

#[test]
fn test_summary_files_round_trip_csv() {
    let temp_dir = TempDir::new().unwrap();
    let records = load_all(&create_dataset(&temp_dir));
    let summary = TradeSummary::build(&records);
    let dir = temp_dir.path().join("summaries");

    let config = TradeConfig::default().with_export_format(ExportFormat::Csv);
    let paths = write_summaries(&summary, &dir, &config).unwrap();
    assert_eq!(paths.len(), 4);
    assert!(paths.iter().all(|p| p.exists()));

    let years = read_string_rows(&paths[0], b',', true, 5).unwrap();
    assert_eq!(years.len(), 2);
    assert_eq!(years[0][0], "2022");
    assert_eq!(years[0][4], "");
    assert_eq!(years[1][0], "2023");

    let models = read_string_rows(&paths[2], b',', true, 6).unwrap();
    assert_eq!(
        models.iter().map(|m| m[0].as_str()).collect::<Vec<_>>(),
        vec!["HP-9", "LB-2", "SC-1"]
    );
    assert_eq!(models[2][1], "100");

    let suppliers = read_string_rows(&paths[3], b',', true, 4).unwrap();
    assert_eq!(suppliers[0][0], "0512345678");
    assert_eq!(suppliers[1][0], "0598765432");
}

#[test]
fn test_cli_run_writes_summary_dir() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = create_dataset(&temp_dir);
    let summary_dir = temp_dir.path().join("report");

    let args = Args::parse_from([
        "trade-enrich".to_string(),
        data_dir.join("*.csv").to_string_lossy().to_string(),
        "-o".to_string(),
        temp_dir.path().join("cleaned.csv").to_string_lossy().to_string(),
        "--summary-dir".to_string(),
        summary_dir.to_string_lossy().to_string(),
        "--quiet".to_string(),
    ]);

    let stats = cli::run(args).unwrap();
    let names: Vec<String> = stats
        .summary_files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "year_summary.csv",
            "hsn_summary.csv",
            "model_summary.csv",
            "supplier_summary.csv",
            "lookup_table.csv"
        ]
    );

    let lookup = read_string_rows(&summary_dir.join("lookup_table.csv"), b',', true, 3).unwrap();
    assert_eq!(lookup.len(), 4);
    assert_eq!(lookup[0][0], "73211900");
}

#[test]
fn test_cli_run_writes_parquet() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = create_dataset(&temp_dir);
    let output = temp_dir.path().join("cleaned.parquet");

    let args = Args::parse_from([
        "trade-enrich".to_string(),
        data_dir.join("*.csv").to_string_lossy().to_string(),
        "--output".to_string(),
        output.to_string_lossy().to_string(),
        "--quiet".to_string(),
    ]);

    let stats = cli::run(args).unwrap();
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_failed, 0);
    assert_eq!(stats.records, 4);
    assert_eq!(stats.unmapped_hs_codes, 1);
    assert_eq!(stats.undated_records, 1);
    assert_eq!(stats.rows_written, Some(4));
    assert!(output.exists());
}

#[test]
fn test_cli_run_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let pattern = temp_dir.path().join("*.csv").to_string_lossy().to_string();

    let args = Args::parse_from(["trade-enrich".to_string(), pattern, "--quiet".to_string()]);
    assert!(cli::run(args).is_err());
}

#[test]
fn test_documented_examples() {
    let priority = parse_description("container with scrubber");
    assert_eq!(priority.sub_category, SubCategory::Scrubber);

    let parsed = parse_description("QTY: 50 USD 12.5 MODEL: AB-100");
    assert_eq!(parsed.quantity, Some(50));
    assert_eq!(parsed.unit_price_usd, Some(12.5));
    assert_eq!(parsed.model_name.as_deref(), Some("AB-100"));

    let empty = parse_description("");
    assert_eq!(empty.quantity, None);
    assert_eq!(empty.unit_price_usd, None);
    assert_eq!(empty.model_name, None);
    assert_eq!(empty.sub_category, SubCategory::Others);

    let mut row = vec![""; 20];
    row[1] = "2023-05-10";
    row[3] = "73239990";
    row[16] = "100";
    row[19] = "25";
    let enriched = enrich(&decode_row(&row), HsnTable::builtin());
    assert_eq!(
        enriched.hsn_description.as_deref(),
        Some("Household articles of iron or steel")
    );
    assert_eq!(enriched.main_category.as_deref(), Some("Steel"));
    assert_eq!(enriched.grand_total_inr, Some(125.0));
    assert_eq!(enriched.year, Some(2023));

    row[3] = "00000000";
    let unmapped = enrich(&decode_row(&row), HsnTable::builtin());
    assert_eq!(unmapped.hsn_description.as_deref(), Some("Unknown"));
    assert_eq!(unmapped.main_category.as_deref(), Some("Others"));

    let custom = HsnTable::from_entries([("00000000", HsnEntry::new("Test", "Test"))]);
    assert_eq!(
        enrich(&decode_row(&row), &custom).main_category.as_deref(),
        Some("Test")
    );
}
