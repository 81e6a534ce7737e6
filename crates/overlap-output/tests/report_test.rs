//! Integration tests for ranking and report rendering.

use overlap_index::{IndexName, NameNormalizer, OverlapAggregator};
use overlap_output::{ExportFormat, OverlapReport, ReportBuilder, rank_overlaps, write_report};

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_full_report_workflow() {
    let normalizer = NameNormalizer::default();
    let mut aggregator = OverlapAggregator::new();

    aggregator.add(
        normalizer.index_name("ind_niftyindiadefence_list"),
        symbols(&["HAL", "BEL", "MAZDOCK", "BDL"]),
    );
    aggregator.add(
        normalizer.index_name("nifty200momentum30"),
        symbols(&["BEL", "HAL", "TRENT", "BSE"]),
    );
    aggregator.add(
        normalizer.index_name("nifty500momentum50"),
        symbols(&["BSE", "HAL", "BEL", "DIXON"]),
    );

    let indices = aggregator.indices().to_vec();
    let map = aggregator.finish();
    let report = ReportBuilder::new()
        .indices(indices)
        .notices(["No index information found for fund: Parag Parikh Flexi Cap Direct Growth"])
        .build(&map);

    let ranked: Vec<(&str, usize)> = report
        .entries
        .iter()
        .map(|entry| (entry.symbol.as_str(), entry.count))
        .collect();
    assert_eq!(ranked, [("HAL", 3), ("BEL", 3), ("BSE", 2)]);
    assert_eq!(
        report.entries[0].indices,
        [
            IndexName::from("indiadefence"),
            IndexName::from("200momentum30"),
            IndexName::from("500momentum50"),
        ]
    );

    let text = report.to_text();
    assert!(text.contains("HAL: present in 3 portfolios within [indiadefence,200momentum30,500momentum50]"));
    assert!(text.contains("note: No index information found for fund: Parag Parikh"));
}

#[test]
fn test_report_matches_ranking() {
    let map = overlap_index::aggregate(vec![
        (IndexName::from("A"), symbols(&["X", "Y"])),
        (IndexName::from("B"), symbols(&["Y"])),
    ]);

    let report = OverlapReport::new(&map);
    assert_eq!(report.entries, rank_overlaps(&map));
}

#[test]
fn test_empty_report_exports() {
    let report = OverlapReport::new(&overlap_index::OverlapMap::new());

    let mut csv = Vec::new();
    write_report(&report, ExportFormat::Csv, &mut csv).unwrap();
    assert_eq!(String::from_utf8(csv).unwrap(), "symbol,count,indices\n");

    let mut json = Vec::new();
    write_report(&report, ExportFormat::Json, &mut json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["entries"].as_array().unwrap().len(), 0);
}

#[test]
fn test_every_symbol_csv_export() {
    let map = overlap_index::aggregate(vec![
        (IndexName::from("A"), symbols(&["X", "Y"])),
        (IndexName::from("B"), symbols(&["Y"])),
    ]);
    let report = ReportBuilder::new().every_symbol(true).build(&map);

    let mut csv = Vec::new();
    write_report(&report, ExportFormat::Csv, &mut csv).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "symbol,count,indices\nY,2,A;B\nX,1,A\n"
    );
    assert_eq!(report.entries, overlap_output::rank_all(&map));
}
