use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use similar::{ChangeTag, TextDiff};

fn moments(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_moments"))
        .args(args)
        .output()
        .expect("Failed to execute moments")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "moments failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("Output is not valid UTF-8")
}

fn json_of(args: &[&str]) -> serde_json::Value {
    let output = moments(args);
    serde_json::from_str(&stdout_of(&output)).expect("Output is not valid JSON")
}

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::write(&path, contents).expect("Failed to write scratch file");
    path
}

fn diff_strings(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(&format!("{sign}{change}"));
    }
    out
}

fn assert_text_eq(expected: &str, actual: &str) {
    assert!(
        expected == actual,
        "text output mismatch:\n{}",
        diff_strings(expected, actual)
    );
}

#[test]
fn bucket_week_json() {
    let json = json_of(&[
        "bucket",
        "--type",
        "week",
        "--at",
        "2024-01-03T14:30:00Z",
        "--output-format",
        "json",
    ]);

    assert_eq!(json["id"], "week-1704067200");
    assert_eq!(json["type"], "week");
    assert_eq!(json["start_utc"], "2024-01-01T00:00:00Z");
    assert_eq!(json["end_utc"], "2024-01-08T00:00:00Z");
    assert!(json.get("count").is_none());
}

#[test]
fn bucket_day_in_berlin_text() {
    let output = moments(&[
        "bucket",
        "--tz",
        "Europe/Berlin",
        "--type",
        "day",
        "--at",
        "2026-03-29T00:15:00Z",
    ]);

    assert_text_eq(
        "day-1774738800: 2026-03-29T00:00:00+01:00 to 2026-03-30T00:00:00+02:00\n",
        &stdout_of(&output),
    );
}

#[test]
fn view_days_text_with_counts() {
    let moments_file = scratch_file(
        "view_moments.txt",
        "# captured dots\n2024-01-01T09:00:00Z\n2024-01-01T10:00:00Z\n\n1704445200\n",
    );
    let output = moments(&[
        "view",
        "--view",
        "today",
        "--scale",
        "days",
        "--at",
        "2024-01-03T14:30:00Z",
        "--moments",
        moments_file.to_str().unwrap(),
    ]);

    // 1704445200 is 2024-01-05T09:00:00Z.
    let counts = [2, 0, 0, 0, 1, 0, 0];
    let expected: String = counts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            let day = i as u32 + 1;
            format!(
                "day-{}: 2024-01-{:02}T00:00:00+00:00 to 2024-01-{:02}T00:00:00+00:00 ({})\n",
                1_704_067_200 + i * 86_400,
                day,
                day + 1,
                count
            )
        })
        .collect();

    assert_text_eq(&expected, &stdout_of(&output));
}

#[test]
fn week_view_hours_falls_back_to_days() {
    let json = json_of(&[
        "view",
        "--view",
        "week",
        "--scale",
        "hours",
        "--at",
        "2024-01-03T14:30:00Z",
        "--output-format",
        "json",
    ]);

    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows.iter().all(|row| row["type"] == "day" && row["count"] == 0));
}

#[test]
fn range_of_months() {
    let json = json_of(&[
        "range",
        "--type",
        "month",
        "--start",
        "2024-01-30T18:00:00Z",
        "--end",
        "2024-03-02T00:00:00Z",
        "--output-format",
        "json",
    ]);

    let starts: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["start_utc"].as_str().unwrap())
        .collect();
    assert_eq!(
        starts,
        vec![
            "2024-01-01T00:00:00Z",
            "2024-02-01T00:00:00Z",
            "2024-03-01T00:00:00Z"
        ]
    );
}

#[test]
fn year_with_moments() {
    let moments_file = scratch_file(
        "year_moments.txt",
        "2024-01-10T08:00:00Z\n2024-01-10T20:00:00Z\n2024-02-29T12:00:00Z\n2023-12-31T12:00:00Z\n",
    );
    let json = json_of(&[
        "year",
        "--year",
        "2024",
        "--today",
        "2024-01-10T12:00:00Z",
        "--moments",
        moments_file.to_str().unwrap(),
        "--output-format",
        "json",
    ]);

    let days = json.as_array().unwrap();
    assert_eq!(days.len(), 366);
    assert_eq!(days[9]["day"], "2024-01-10");
    assert_eq!(days[9]["experience_count"], 2);
    assert_eq!(days[9]["is_today"], true);
    assert_eq!(days[10]["is_future"], true);
    assert_eq!(days[59]["day"], "2024-02-29");
    assert_eq!(days[59]["experience_count"], 1);
    let total: u64 = days
        .iter()
        .map(|d| d["experience_count"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 3);
}

#[test]
fn layout_json() {
    let json = json_of(&[
        "layout",
        "--width",
        "370",
        "--height",
        "700",
        "--count",
        "365",
        "--output-format",
        "json",
    ]);

    assert_eq!(json["columns"], 14);
    assert_eq!(json["rows"], 27);
    assert!(json["total_width"].as_f64().unwrap() <= 370.01);
    assert!(json["total_height"].as_f64().unwrap() <= 700.01);
}

#[test]
fn layout_uses_config_file() {
    let config = scratch_file("layout_config.json", r#"{"layout": {"max_columns": 12}}"#);
    let json = json_of(&[
        "layout",
        "--config",
        config.to_str().unwrap(),
        "--width",
        "1000",
        "--height",
        "100",
        "--count",
        "365",
        "--output-format",
        "json",
    ]);

    assert_eq!(json["columns"], 12);
}

#[test]
fn invalid_timezone_is_input_error() {
    let output = moments(&[
        "bucket",
        "--tz",
        "Mars/Base",
        "--at",
        "2024-01-01T00:00:00Z",
        "--output-format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr is not JSON");
    assert_eq!(envelope["exit_code"], 2);
    assert!(envelope["error"].as_str().unwrap().contains("Mars/Base"));
}

#[test]
fn unreadable_moments_line_is_input_error() {
    let moments_file = scratch_file("bad_moments.txt", "2024-01-01T00:00:00Z\nyesterday\n");
    let output = moments(&[
        "year",
        "--year",
        "2024",
        "--moments",
        moments_file.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad_moments.txt:2"), "{stderr}");
}

#[test]
fn inverted_range_is_input_error() {
    let output = moments(&[
        "range",
        "--start",
        "2024-02-01T00:00:00Z",
        "--end",
        "2024-01-01T00:00:00Z",
    ]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unrepresentable_local_bucket_is_input_error() {
    // The last whole second chrono supports; Tokyo's local clock is past it.
    let output = moments(&["bucket", "--tz", "Asia/Tokyo", "--at", "8210298412799"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("outside the supported range"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
}

#[test]
fn year_of_unrepresentable_today_is_input_error() {
    let output = moments(&["year", "--tz", "Asia/Tokyo", "--today", "8210298412799"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("has no local date"), "{stderr}");
}

#[test]
fn bucket_near_end_of_range_in_utc() {
    let json = json_of(&[
        "bucket",
        "--type",
        "day",
        "--at",
        "8210298412799",
        "--output-format",
        "json",
    ]);

    assert_eq!(json["start_utc"], "+262142-12-31T00:00:00Z");
    assert_eq!(json["start_local"], "+262142-12-31T00:00:00+00:00");
}

#[test]
fn unknown_output_format_is_rejected() {
    let output = moments(&[
        "bucket",
        "--at",
        "2024-01-01T00:00:00Z",
        "--output-format",
        "yaml",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}
