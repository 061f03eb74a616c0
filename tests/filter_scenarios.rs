//! End-to-end filtering scenarios driven through the viewer core.

use std::io::Write;

use logsieve::error::{LogsieveError, TimeBound};
use logsieve::filter::FilterInputs;
use logsieve::LogViewer;

const SAMPLE: &str = "10:00:00.000 INFO start\n10:00:01.500 ERROR fail\n10:00:02.000 INFO end\n";

fn sample_log() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(SAMPLE.as_bytes()).expect("write contents");
    file
}

async fn open_sample(viewer: &mut LogViewer) -> tempfile::NamedTempFile {
    let file = sample_log();
    viewer.open(file.path()).await.expect("open sample log");
    file
}

#[tokio::test]
async fn include_term_selects_matching_lines() {
    let mut viewer = LogViewer::with_disk_source();
    let _file = open_sample(&mut viewer).await;

    let result = viewer
        .run_filter(&FilterInputs {
            include_text: "ERROR".to_string(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(result.filtered_text, "10:00:01.500 ERROR fail\n");
    assert_eq!(result.match_count, 1);
}

#[tokio::test]
async fn exclude_term_rejects_matching_lines() {
    let mut viewer = LogViewer::with_disk_source();
    let _file = open_sample(&mut viewer).await;

    let result = viewer
        .run_filter(&FilterInputs {
            exclude_text: "INFO".to_string(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(result.filtered_text, "10:00:01.500 ERROR fail\n");
    assert_eq!(result.match_count, 1);
}

#[tokio::test]
async fn time_window_selects_lines_inside_the_interval() {
    let mut viewer = LogViewer::with_disk_source();
    let _file = open_sample(&mut viewer).await;

    let result = viewer
        .run_filter(&FilterInputs {
            start_time_text: "10:00:01.000".to_string(),
            end_time_text: "10:00:01.999".to_string(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(result.filtered_text, "10:00:01.500 ERROR fail\n");
}

#[tokio::test]
async fn malformed_start_time_aborts_and_names_the_bound() {
    let mut viewer = LogViewer::with_disk_source();
    let _file = open_sample(&mut viewer).await;

    let err = viewer
        .run_filter(&FilterInputs {
            start_time_text: "bad-format".to_string(),
            ..Default::default()
        })
        .unwrap_err();

    match err {
        LogsieveError::TimeFormat { bound, input } => {
            assert_eq!(bound, TimeBound::Start);
            assert_eq!(input, "bad-format");
        }
        other => panic!("expected a time-format error, got {other:?}"),
    }

    // No result was produced: the unfiltered view is still intact.
    assert_eq!(viewer.rendered_text(), SAMPLE);
    assert_eq!(viewer.last_match_count(), None);
}

#[tokio::test]
async fn refiltering_a_result_with_the_same_spec_is_stable() {
    let mut viewer = LogViewer::with_disk_source();
    let _file = open_sample(&mut viewer).await;

    let inputs = FilterInputs {
        include_text: "INFO".to_string(),
        ..Default::default()
    };
    let first = viewer.run_filter(&inputs).unwrap();

    // Write the filtered output to a new file and filter it again.
    let mut refile = tempfile::NamedTempFile::new().unwrap();
    refile.write_all(first.filtered_text.as_bytes()).unwrap();
    viewer.open(refile.path()).await.unwrap();
    let second = viewer.run_filter(&inputs).unwrap();

    assert_eq!(second.filtered_text, first.filtered_text);
    assert_eq!(second.match_count, first.match_count);
}

#[tokio::test]
async fn quoted_keywords_filter_as_single_terms() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"disk full on /var\nfull disk elsewhere\nunrelated\n")
        .unwrap();

    let mut viewer = LogViewer::with_disk_source();
    viewer.open(file.path()).await.unwrap();

    let result = viewer
        .run_filter(&FilterInputs {
            include_text: "\"disk full\"".to_string(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(result.filtered_text, "disk full on /var\n");
    assert_eq!(result.match_count, 1);
}

#[tokio::test]
async fn search_over_filtered_output_wraps_around() {
    let mut viewer = LogViewer::with_disk_source();
    let _file = open_sample(&mut viewer).await;

    viewer
        .run_filter(&FilterInputs {
            include_text: "INFO".to_string(),
            ..Default::default()
        })
        .unwrap();

    let scanner = viewer.begin_search("info").unwrap();
    assert!(viewer.install_search(scanner.run_to_completion()));

    let index = viewer.search_index().unwrap();
    assert_eq!(index.len(), 2); // case-insensitive find over rendered text
    let first = index.current().unwrap();

    let second = viewer.navigate_search(1).unwrap();
    assert_ne!(first, second);
    assert_eq!(viewer.navigate_search(1), Some(first)); // wrapped
    assert_eq!(viewer.navigate_search(-1), Some(second)); // wrapped back
}
