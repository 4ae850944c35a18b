//! Integration tests for record directory construction and lazy loading

use ecltools_io::{size_on_disk_binary, ArrayType, EclFile, EclWriter, Error};
use rstest::rstest;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a small file exercising every record type, with INTE and CHAR
/// arrays long enough to span multiple data blocks
fn write_sample(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("SAMPLE.INIT");
    let mut out = EclWriter::create(&path).unwrap();

    let ints: Vec<i32> = (0..1500).collect();
    let reals: Vec<f32> = (0..10).map(|i| i as f32 * 0.5).collect();
    let doubles: Vec<f64> = (0..250).map(|i| i as f64 * 0.25).collect();
    let logicals = vec![true, false, true];
    let strings: Vec<String> = (0..120).map(|i| format!("WELL_{i:03}")).collect();

    out.write_inte("INTDATA", &ints).unwrap();
    out.write_real("REALDATA", &reals).unwrap();
    out.write_doub("DOUBDATA", &doubles).unwrap();
    out.write_logi("LOGIDATA", &logicals).unwrap();
    out.write_char("CHARDATA", &strings).unwrap();
    out.write_mess("ENDOFDAT").unwrap();
    out.flush().unwrap();

    path
}

#[test]
fn directory_is_built_without_loading() {
    let dir = TempDir::new().unwrap();
    let file = EclFile::open(write_sample(&dir)).unwrap();

    assert_eq!(file.len(), 6);
    assert!(!file.is_loaded(0));

    let names: Vec<&str> = file.list().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        ["INTDATA", "REALDATA", "DOUBDATA", "LOGIDATA", "CHARDATA", "ENDOFDAT"]
    );

    assert_eq!(file.list()[0].array_type, ArrayType::Inte);
    assert_eq!(file.list()[0].count, 1500);
    // first payload byte follows the 24-byte header
    assert_eq!(file.list()[0].offset, 24);
    // the next record starts after two framed blocks of 1000 + 500 ints
    assert_eq!(
        file.list()[1].offset,
        24 + size_on_disk_binary(1500, ArrayType::Inte) + 24
    );
}

#[test]
fn binary_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut file = EclFile::open(write_sample(&dir)).unwrap();

    let ints: &[i32] = file.get("INTDATA").unwrap();
    assert_eq!(ints.len(), 1500);
    assert_eq!(ints[0], 0);
    assert_eq!(ints[999], 999);
    assert_eq!(ints[1000], 1000);
    assert_eq!(ints[1499], 1499);

    let reals: &[f32] = file.get("REALDATA").unwrap();
    assert_eq!(reals[3], 1.5);

    let doubles: &[f64] = file.get("DOUBDATA").unwrap();
    assert_eq!(doubles.len(), 250);
    assert_eq!(doubles[249], 62.25);

    let logicals: &[bool] = file.get("LOGIDATA").unwrap();
    assert_eq!(logicals, [true, false, true]);

    let strings: &[String] = file.get("CHARDATA").unwrap();
    assert_eq!(strings.len(), 120);
    assert_eq!(strings[0], "WELL_000");
    assert_eq!(strings[119], "WELL_119");
}

#[test]
fn long_strings_promote_to_c0nn() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("PATHS.INIT");

    let mut out = EclWriter::create(&path).unwrap();
    out.write_char("RESTART", &["../base/HISTORY_RUN"]).unwrap();
    out.flush().unwrap();

    let mut file = EclFile::open(&path).unwrap();
    assert_eq!(file.list()[0].array_type, ArrayType::C0nn(19));

    let strings: &[String] = file.get("RESTART").unwrap();
    assert_eq!(strings, ["../base/HISTORY_RUN"]);
}

#[test]
fn get_returns_last_occurrence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("DOUBLE.INIT");

    let mut out = EclWriter::create(&path).unwrap();
    out.write_inte("SEQNUM", &[1]).unwrap();
    out.write_inte("SEQNUM", &[2]).unwrap();
    out.flush().unwrap();

    let mut file = EclFile::open(&path).unwrap();
    assert_eq!(file.get::<i32>("SEQNUM").unwrap(), [2]);
    assert_eq!(file.get_at::<i32>(0).unwrap(), [1]);
    assert_eq!(file.get_at::<i32>(1).unwrap(), [2]);
}

#[rstest]
#[case::missing("NOSUCH")]
#[case::padded_lookup("INTDATA ")]
fn missing_key_fails(#[case] key: &str) {
    let dir = TempDir::new().unwrap();
    let mut file = EclFile::open(write_sample(&dir)).unwrap();

    assert!(!file.has_key(key));
    assert!(matches!(
        file.get::<i32>(key),
        Err(Error::NotFound(name)) if name == key
    ));
}

#[test]
fn type_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let mut file = EclFile::open(write_sample(&dir)).unwrap();

    let err = file.get::<f32>("INTDATA").unwrap_err();
    assert!(matches!(
        err,
        Error::WrongType { ref name, requested: "REAL", .. } if name == "INTDATA"
    ));
}

#[test]
fn corrupt_block_tail_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir);

    // flip one byte of the trailing framing int of REALDATA's only block
    let mut bytes = std::fs::read(&path).unwrap();
    let real_offset = {
        let file = EclFile::open(&path).unwrap();
        file.list()[1].offset as usize
    };
    let tail_pos = real_offset + 4 + 10 * 4;
    bytes[tail_pos + 3] ^= 0xFF;
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&bytes)
        .unwrap();

    let mut file = EclFile::open(&path).unwrap();
    let err = file.get::<f32>("REALDATA").unwrap_err();
    assert!(matches!(
        err,
        Error::TailMismatch { ref name, .. } if name == "REALDATA"
    ));
}

#[test]
fn truncated_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir);

    let bytes = std::fs::read(&path).unwrap();
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&bytes[..100])
        .unwrap();

    assert!(EclFile::open(&path).is_err());
}

// ------------------------------------------------------------------------
// Formatted variant
// ------------------------------------------------------------------------

fn formatted_header(name: &str, count: usize, code: &str) -> String {
    format!(" '{:<8}' {:>11} '{:<4}'\n", name, count, code)
}

fn formatted_inte(values: &[i32]) -> String {
    let mut text = String::new();
    for line in values.chunks(6) {
        for v in line {
            text.push_str(&format!("{:>12}", v));
        }
        text.push('\n');
    }
    text
}

fn formatted_real(values: &[f32]) -> String {
    let mut text = String::new();
    for line in values.chunks(4) {
        for v in line {
            text.push_str(&format!("{:>17}", format!("{:.7E}", v)));
        }
        text.push('\n');
    }
    text
}

fn formatted_char(values: &[&str]) -> String {
    let mut text = String::new();
    for line in values.chunks(7) {
        for v in line {
            text.push_str(&format!(" '{:<8}'", v));
        }
        text.push('\n');
    }
    text
}

#[test]
fn formatted_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("SAMPLE.FSMSPEC");

    let mut content = String::new();
    content.push_str(&formatted_header("DIMENS", 6, "INTE"));
    content.push_str(&formatted_inte(&[5, 10, 6, 4, 0, 0]));
    content.push_str(&formatted_header("KEYWORDS", 2, "CHAR"));
    content.push_str(&formatted_char(&["TIME", "WOPR"]));
    content.push_str(&formatted_header("VALS", 5, "REAL"));
    content.push_str(&formatted_real(&[1.0, 2.0, 3.0, 4.0, 5.0]));
    std::fs::write(&path, content).unwrap();

    let mut file = EclFile::open(&path).unwrap();
    assert!(file.formatted());
    assert_eq!(file.len(), 3);

    assert_eq!(file.get::<i32>("DIMENS").unwrap(), [5, 10, 6, 4, 0, 0]);
    assert_eq!(file.get::<String>("KEYWORDS").unwrap(), ["TIME", "WOPR"]);
    assert_eq!(file.get::<f32>("VALS").unwrap(), [1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn formatted_multiline_blocks() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("BIG.FINIT");

    // 1003 ints: one full block of 1000 then a fresh line grid for the rest
    let values: Vec<i32> = (0..1003).collect();
    let mut content = formatted_header("INTDATA", 1003, "INTE");
    content.push_str(&formatted_inte(&values[..1000]));
    content.push_str(&formatted_inte(&values[1000..]));
    std::fs::write(&path, content).unwrap();

    let mut file = EclFile::open(&path).unwrap();
    let read: &[i32] = file.get("INTDATA").unwrap();
    assert_eq!(read, values.as_slice());
}
