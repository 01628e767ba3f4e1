use std::io::Cursor;

use clap::Parser;
use unlimited_fill::{
    Args, FillConfig, FillError, OutputFormat, Record, fill, parse_record, write_report,
};
use unlimited_storage::{LargeInt, Repr, UnlimitedStorage, Value};

fn config(bins: usize) -> FillConfig {
    FillConfig {
        bins,
        ..Default::default()
    }
}

fn fill_str(src: &str, config: FillConfig) -> Result<UnlimitedStorage, FillError> {
    fill(Cursor::new(src), &config)
}

fn report(src: &str, config: FillConfig) -> String {
    let storage = fill_str(src, config).expect("fill failed");
    let mut out = Vec::new();
    write_report(&mut out, &storage, config.output_format).expect("write failed");
    String::from_utf8(out).expect("utf8")
}

fn parsed(line: &str) -> Record {
    parse_record(line, 1)
        .expect("parse failed")
        .expect("empty record")
}

fn malformed_line(text: &str, lineno: usize) -> Option<usize> {
    match parse_record(text, lineno) {
        Err(FillError::Malformed { line, .. }) => Some(line),
        _ => None,
    }
}

#[test]
fn parse_records() {
    assert_eq!(parse_record("", 1).unwrap(), None);
    assert_eq!(parse_record("   # only a comment", 1).unwrap(), None);

    let plain = parsed("3");
    assert_eq!((plain.index, plain.weight), (3, None));

    let weighted = parsed(" 2 250 # trailing");
    assert_eq!(weighted.index, 2);
    assert_eq!(weighted.weight, Some(Value::Unsigned(250)));

    assert_eq!(parsed("0 -1.5").weight, Some(Value::Float(-1.5)));
    let negative = parsed("0 -4").weight;
    assert!(matches!(negative, Some(Value::Signed(-4))));
    let huge = parsed("1 36893488147419103232").weight;
    assert!(matches!(huge, Some(Value::Large(_))));

    assert_eq!(malformed_line("x", 7), Some(7));
    assert_eq!(malformed_line("1 2 3", 2), Some(2));
    assert_eq!(malformed_line("1 two", 4), Some(4));
}

#[test]
fn increments_widen_the_storage() {
    let src = "1\n".repeat(300);
    let storage = fill_str(&src, config(3)).unwrap();
    assert_eq!(storage.repr(), Repr::U16);
    assert_eq!(storage, [0u16, 300, 0]);
}

#[test]
fn raw_report_is_exact_for_huge_counts() {
    let src = "0 18446744073709551615\n0 18446744073709551615\n0\n0\n1 7\n";
    let config = FillConfig {
        bins: 2,
        output_format: OutputFormat::Raw,
        ..Default::default()
    };
    let expected_cell = {
        let mut v = LargeInt::from(u64::MAX);
        v += u64::MAX;
        v += 2u64;
        v
    };
    let expected = format!("# large_int\n0\t{expected_cell}\n1\t7\n");
    assert_eq!(report(src, config), expected);
    assert_eq!(expected_cell.to_string(), "36893488147419103232");
}

#[test]
fn float_report_after_scaling() {
    let config = FillConfig {
        bins: 2,
        scale: Some(0.5),
        ..Default::default()
    };
    assert_eq!(report("0 3\n1\n1\n", config), "0\t1.5\n1\t1\n");
}

#[test]
fn out_of_range_index_is_reported_with_line() {
    let err = fill_str("0\n\n5\n", config(4)).unwrap_err();
    let expected = "line 3: cell index 5 out of range for 4 cells";
    assert_eq!(err.to_string(), expected);
    let FillError::OutOfRange { line, index, bins } = err else {
        panic!("expected an out of range error");
    };
    assert_eq!((line, index, bins), (3, 5, 4));
}

#[test]
fn args_to_config() {
    let args = Args::parse_from([
        "unlimited-fill",
        "--bins",
        "8",
        "--scale",
        "2",
        "--output-format",
        "raw",
    ]);
    let expected = FillConfig {
        bins: 8,
        scale: Some(2.0),
        output_format: OutputFormat::Raw,
    };
    assert_eq!(args.to_fill_config(), expected);
    assert!(args.file.is_none());

    let defaults = Args::parse_from(["unlimited-fill", "input.txt"]);
    assert_eq!(defaults.to_fill_config(), FillConfig::default());
    assert!(defaults.file.is_some());
}
