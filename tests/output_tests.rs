use pretty_assertions::assert_eq;
use profstats::aggregator::StatsAggregator;
use profstats::middleware::{ProfileGate, ProfileResponse, RequestContext};
use profstats::output::{read_summary, to_summary, validate_path, write_report, write_summary};
use profstats::parser::SortBy;
use std::path::Path;
use tempfile::NamedTempFile;

const STATS: &str = "         3 function calls in 0.065 seconds

   Ordered by: cumulative time

   ncalls  tottime  percall  cumtime  percall filename:lineno(function)
        1    0.030    0.030    0.060    0.060 /usr/lib/django/core/handlers/base.py:99(get_response)
        1    0.020    0.020    0.030    0.030 /srv/site/shop/views.py:12(index)
        1    0.015    0.015    0.015    0.015 /srv/site/shop/models.py:40(save)
";

#[test]
fn test_summary_round_trip_through_file() {
    let agg = StatsAggregator::new(STATS, SortBy::default(), 40, 100);
    let summary = to_summary(&agg);
    let temp_file = NamedTempFile::new().unwrap();

    write_summary(&summary, temp_file.path()).unwrap();
    let loaded = read_summary(temp_file.path()).unwrap();

    assert_eq!(loaded.record_count, 3);
    let groups: Vec<&str> = loaded.by_group.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(groups, vec!["/srv/site/shop", "/usr/lib/django/core"]);
}

#[test]
fn test_report_file_contents() {
    let agg = StatsAggregator::new(STATS, SortBy::default(), 40, 100);
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("report.html");

    write_report(&agg.render(), &path).unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<pre>\n"));
    assert!(html.contains("53.8%   0.035 /srv/site/shop\n"));
    assert!(html.contains("46.2%   0.030 /usr/lib/django/core\n"));
}

#[test]
fn test_validate_output_path_empty() {
    assert!(validate_path(Path::new("")).is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(validate_path(temp_dir.path()).is_err());
}

#[test]
fn test_gate_swaps_response_for_superuser() {
    let gate = ProfileGate::new(false);
    let ctx = RequestContext::new("?page=1&prof").with_superuser(true);

    let response = gate.process_response(&ctx, ProfileResponse::new("<html></html>"), STATS);
    let expected = StatsAggregator::new(STATS, SortBy::default(), 50, 200).render();

    assert_eq!(response.content, expected);
}
