//! Rendering snapshot tests for the results formatter.
//!
//! These tests verify that rendering is:
//! - Deterministic (same input produces identical output)
//! - Layered by verbosity (debug output only adds lines)
//! - Uniform in float precision, including nested values

use std::time::Duration;

use munge::MungeError;
use munge::core::{ExecutionInfo, InputRef};
use munge::report::{format_results, render_summary};
use munge::results::{Results, Value};

/// A fixed results tree resembling a stats run over two inputs.
fn make_fixed_results() -> Results {
    Results::new()
        .with("count", 5)
        .with("mean", 3.2)
        .with("std", 1.7204650534085253)
        .with(
            "range",
            Results::new().with("min", 1.0).with("max", 6.0),
        )
        .with("ok", true)
        .with_debug("per_input", vec![3, 2])
        .with_debug(
            "timing",
            Results::new().with("load_ms", 0.126).with("passes", 2),
        )
}

#[test]
fn test_condensed_snapshot() {
    let text = format_results(&make_fixed_results(), 0, None).unwrap();
    assert_eq!(text, "5 3.200 1.720 (1.000 6.000) true");
}

#[test]
fn test_expanded_snapshot() {
    let text = format_results(&make_fixed_results(), 1, Some(2)).unwrap();
    let expected = "\
count: 5
mean: 3.20
std: 1.72
range:
  min: 1.00
  max: 6.00
ok: true
";
    assert_eq!(text, expected);
}

#[test]
fn test_debug_snapshot() {
    let text = format_results(&make_fixed_results(), 4, Some(2)).unwrap();
    let expected = "\
count: 5
mean: 3.20
std: 1.72
range:
  min: 1.00
  max: 6.00
ok: true
per_input [debug]: [3, 2]
timing [debug]:
  load_ms: 0.13
  passes: 2
";
    assert_eq!(text, expected);
}

#[test]
fn test_verbosity_two_and_three_match_expanded() {
    let results = make_fixed_results();
    let expanded = format_results(&results, 1, None).unwrap();
    assert_eq!(format_results(&results, 2, None).unwrap(), expanded);
    assert_eq!(format_results(&results, 3, None).unwrap(), expanded);
}

#[test]
fn test_debug_output_only_adds_lines() {
    let results = make_fixed_results();
    let expanded = format_results(&results, 1, Some(4)).unwrap();
    let debug = format_results(&results, 9, Some(4)).unwrap();

    for line in expanded.lines() {
        assert!(debug.lines().any(|l| l == line), "debug output lost {line:?}");
    }
    assert!(debug.lines().count() > expanded.lines().count());
}

#[test]
fn test_rendering_is_deterministic() {
    let results = make_fixed_results();
    for verbosity in [0, 1, 4] {
        let first = format_results(&results, verbosity, Some(3)).unwrap();
        let second = format_results(&results, verbosity, Some(3)).unwrap();
        assert_eq!(first, second, "verbosity {verbosity} differs between calls");
    }
}

#[test]
fn test_precision_applies_to_nested_lists() {
    let results = Results::new().with(
        "groups",
        vec![
            Value::Group(Results::new().with("x", 1.23456)),
            Value::List(vec![Value::Float(9.87654), Value::Int(3)]),
        ],
    );
    assert_eq!(
        format_results(&results, 0, Some(2)).unwrap(),
        "[(1.23), [9.88, 3]]"
    );
    assert_eq!(format_results(&results, 0, Some(0)).unwrap(), "[(1), [10, 3]]");
}

#[test]
fn test_unrenderable_result_names_path() {
    let results = Results::new().with(
        "outer",
        Results::new().with("inner", Results::new().with("x", 1).with("x", 2)),
    );
    let err = format_results(&results, 1, None).unwrap_err();
    match err {
        MungeError::UnrenderableResult { path, reason } => {
            assert_eq!(path, "outer.inner.x");
            assert_eq!(reason, "duplicate label");
        }
        other => panic!("expected UnrenderableResult, got {other}"),
    }
}

#[test]
fn test_summary_snapshot() {
    let info = ExecutionInfo {
        date: time::OffsetDateTime::from_unix_timestamp(1_767_225_600).unwrap(),
        processor: "stats".to_string(),
        input: vec![InputRef::new("srs", "0"), InputRef::new("srs", "1")],
        time: Duration::from_millis(42),
        prngs_seed: None,
    };
    let results = format_results(&Results::new().with("mean", 0.5), 1, Some(1)).unwrap();
    let text = render_summary(&info, &results, Some(1));

    assert_eq!(
        text,
        "\nDate: 2026-01-01 00:00:00 UTC\nProcessor: stats\nInput: srs_0 srs_1, Time: 0.0 s\nPRNGs: unseeded\nmean: 0.5\n"
    );
}
