//! Integration tests for summary resolution, restart chains and repacking

use chrono::NaiveDate;
use ecltools_esmry::{Category, ESmry, Error, ExtEsmry};
use ecltools_io::EclWriter;
use rstest::rstest;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One spec-file column: keyword, wgname, num, unit
type Column<'a> = (&'a str, &'a str, i32, &'a str);

const NONE: &str = ":+:+:+:+";

fn write_smspec(
    path: &Path,
    nijk: [i32; 3],
    restart_step: i32,
    restart_root: Option<&str>,
    columns: &[Column],
) {
    let keywords: Vec<&str> = columns.iter().map(|c| c.0).collect();
    let wgnames: Vec<&str> = columns.iter().map(|c| c.1).collect();
    let nums: Vec<i32> = columns.iter().map(|c| c.2).collect();
    let units: Vec<&str> = columns.iter().map(|c| c.3).collect();

    let mut out = EclWriter::create(path).unwrap();
    out.write_inte(
        "DIMENS",
        &[
            columns.len() as i32,
            nijk[0],
            nijk[1],
            nijk[2],
            0,
            restart_step,
        ],
    )
    .unwrap();

    match restart_root {
        Some(root) => {
            let chunks: Vec<String> = root
                .as_bytes()
                .chunks(8)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect();
            out.write_char("RESTART", &chunks).unwrap();
        }
        None => out.write_char::<&str>("RESTART", &[]).unwrap(),
    }

    out.write_char("KEYWORDS", &keywords).unwrap();
    out.write_char("WGNAMES", &wgnames).unwrap();
    out.write_inte("NUMS", &nums).unwrap();
    out.write_char("UNITS", &units).unwrap();
    out.write_inte("STARTDAT", &[1, 1, 2020, 0, 0, 0]).unwrap();
    out.flush().unwrap();
}

/// Steps as (ministep, params, seqhdr-after) triples. A SEQHDR always opens
/// the stream, like the simulators write it.
fn write_unsmry(path: &Path, steps: &[(i32, Vec<f32>, bool)]) {
    let mut out = EclWriter::create(path).unwrap();
    out.write_inte("SEQHDR", &[0]).unwrap();

    for (ministep, params, report) in steps {
        out.write_inte("MINISTEP", &[*ministep]).unwrap();
        out.write_real("PARAMS", params).unwrap();
        if *report {
            out.write_inte("SEQHDR", &[0]).unwrap();
        }
    }

    out.flush().unwrap();
}

fn case(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Four-vector single run over five steps, report steps at 1 and 4
fn write_single_run(dir: &TempDir) -> PathBuf {
    let smspec = case(dir, "SINGLE.SMSPEC");

    write_smspec(
        &smspec,
        [2, 2, 2],
        0,
        None,
        &[
            ("TIME", NONE, 0, "DAYS"),
            ("WOPR", "OP_1", 0, "SM3/DAY"),
            ("FOPT", NONE, 0, "SM3"),
            ("BPR", NONE, 5, "BARSA"),
        ],
    );

    let steps: Vec<(i32, Vec<f32>, bool)> = (0..5)
        .map(|n| {
            let t = (n + 1) as f32;
            (n, vec![t, 10.0 * t, 100.0 * t, 200.0 + t], n == 1)
        })
        .collect();

    write_unsmry(&case(dir, "SINGLE.UNSMRY"), &steps);

    smspec
}

#[test]
fn single_run_keys_units_and_values() {
    let dir = TempDir::new().unwrap();
    let mut smry = ESmry::from_file(write_single_run(&dir)).unwrap();

    assert_eq!(
        smry.keyword_list(),
        ["TIME", "WOPR:OP_1", "FOPT", "BPR:1,1,2"]
    );
    assert_eq!(smry.num_timesteps(), 5);
    assert_eq!(smry.get_unit("WOPR:OP_1").unwrap(), "SM3/DAY");
    assert_eq!(smry.get_unit("BPR:1,1,2").unwrap(), "BARSA");
    assert!(smry.restart_info().is_none());

    assert_eq!(smry.get("TIME").unwrap(), [1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(smry.get("WOPR:OP_1").unwrap(), [10.0, 20.0, 30.0, 40.0, 50.0]);
    assert_eq!(smry.get("BPR:1,1,2").unwrap(), [201.0, 202.0, 203.0, 204.0, 205.0]);

    assert!(matches!(
        smry.get("WOPR:OP_9"),
        Err(Error::KeywordNotFound(_))
    ));
}

#[test]
fn report_steps_and_dates() {
    let dir = TempDir::new().unwrap();
    let mut smry = ESmry::from_file(write_single_run(&dir)).unwrap();

    // SEQHDR after step 1, end of run after step 4
    assert_eq!(smry.get_at_rstep("TIME").unwrap(), [2.0, 5.0]);
    assert_eq!(smry.timestep_idx_at_reportstep_start(1).unwrap(), 1);
    assert_eq!(smry.timestep_idx_at_reportstep_start(2).unwrap(), 4);
    assert!(matches!(
        smry.timestep_idx_at_reportstep_start(3),
        Err(Error::ReportStepOutOfRange { step: 3, count: 2 })
    ));

    assert_eq!(smry.ministeps().unwrap(), [0, 1, 2, 3, 4]);
    assert!(smry.all_steps_available().unwrap());

    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let dates = smry.dates().unwrap();
    assert_eq!(dates[0].date(), start.succ_opt().unwrap());
    assert_eq!(
        dates[4].date(),
        NaiveDate::from_ymd_opt(2020, 1, 6).unwrap()
    );

    let at_rstep = smry.dates_at_rstep().unwrap();
    assert_eq!(at_rstep.len(), 2);
    assert_eq!(at_rstep[0], dates[1]);
}

#[test]
fn bulk_load_equals_per_step_seek() {
    let dir = TempDir::new().unwrap();
    let smspec = write_single_run(&dir);

    let mut seeked = ESmry::from_file(&smspec).unwrap();
    let mut bulk = ESmry::from_file(&smspec).unwrap();
    bulk.load_all().unwrap();

    for key in ["TIME", "WOPR:OP_1", "FOPT", "BPR:1,1,2"] {
        assert_eq!(seeked.get(key).unwrap(), bulk.get_loaded(key).unwrap());
    }
}

#[test]
fn get_loaded_requires_prior_load() {
    let dir = TempDir::new().unwrap();
    let mut smry = ESmry::from_file(write_single_run(&dir)).unwrap();

    assert!(matches!(
        smry.get_loaded("FOPT"),
        Err(Error::NotLoaded(_))
    ));

    smry.load(&["FOPT"]).unwrap();
    assert_eq!(smry.get_loaded("FOPT").unwrap().len(), 5);
}

#[test]
fn summary_nodes_describe_vectors() {
    let dir = TempDir::new().unwrap();
    let smry = ESmry::from_file(write_single_run(&dir)).unwrap();

    let nodes = smry.summary_node_list();
    let wopr = nodes.iter().find(|n| n.keyword == "WOPR").unwrap();

    assert_eq!(wopr.category, Category::Well);
    assert_eq!(wopr.wgname, "OP_1");
    assert_eq!(wopr.unit, "SM3/DAY");
}

#[rstest]
#[case("WOPR*", vec!["WOPR:OP_1"])]
#[case("B??:*", vec!["BPR:1,1,2"])]
#[case("*", vec!["TIME", "WOPR:OP_1", "FOPT", "BPR:1,1,2"])]
#[case("FOPT", vec!["FOPT"])]
#[case("XYZ*", vec![])]
fn keyword_glob_matching(#[case] pattern: &str, #[case] expected: Vec<&str>) {
    let dir = TempDir::new().unwrap();
    let smry = ESmry::from_file(write_single_run(&dir)).unwrap();

    assert_eq!(smry.keyword_list_matching(pattern), expected);
}

#[test]
fn seek_past_block_boundary() {
    let dir = TempDir::new().unwrap();
    let smspec = case(&dir, "WIDE.SMSPEC");

    // 1100 columns, PARAMS spans two data blocks
    let mut columns: Vec<(String, &str, i32, &str)> = vec![("TIME".to_string(), NONE, 0, "DAYS")];
    for n in 1..1100 {
        columns.push((format!("FU{n:04}"), NONE, 0, ""));
    }
    let columns: Vec<Column> = columns
        .iter()
        .map(|(kw, wg, num, unit)| (kw.as_str(), *wg, *num, *unit))
        .collect();

    write_smspec(&smspec, [1, 1, 1], 0, None, &columns);

    let params: Vec<f32> = (0..1100).map(|c| c as f32).collect();
    write_unsmry(
        &case(&dir, "WIDE.UNSMRY"),
        &[(0, params.clone(), false), (1, params, false)],
    );

    let mut seeked = ESmry::from_file(&smspec).unwrap();
    assert_eq!(seeked.get("FU0999").unwrap(), [999.0, 999.0]);
    assert_eq!(seeked.get("FU1050").unwrap(), [1050.0, 1050.0]);
    assert_eq!(seeked.get("FU1099").unwrap(), [1099.0, 1099.0]);

    let mut bulk = ESmry::from_file(&smspec).unwrap();
    bulk.load_all().unwrap();
    assert_eq!(bulk.get_loaded("FU1050").unwrap(), [1050.0, 1050.0]);
}

// ------------------------------------------------------------------------
// Restart chains
// ------------------------------------------------------------------------

fn write_restart_pair(dir: &TempDir) -> PathBuf {
    // base run: three steps, every one a report step
    write_smspec(
        &case(dir, "BASE.SMSPEC"),
        [1, 1, 1],
        0,
        None,
        &[
            ("TIME", NONE, 0, "DAYS"),
            ("FOPT", NONE, 0, "SM3"),
            ("FGPT", NONE, 0, "SM3"),
            ("FWPT", NONE, 0, "SM3"),
        ],
    );
    write_unsmry(
        &case(dir, "BASE.UNSMRY"),
        &[
            (0, vec![1.0, 10.0, 100.0, 5.0], true),
            (1, vec![2.0, 20.0, 200.0, 6.0], true),
            (2, vec![3.0, 30.0, 300.0, 7.0], false),
        ],
    );

    // child restarts from report step 2 and drops FGPT for FLPT
    let child = case(dir, "CHILD.SMSPEC");
    write_smspec(
        &child,
        [1, 1, 1],
        2,
        Some("BASE"),
        &[
            ("TIME", NONE, 0, "DAYS"),
            ("FOPT", NONE, 0, "SM3"),
            ("FWPT", NONE, 0, "SM3"),
            ("FLPT", NONE, 0, "SM3"),
        ],
    );
    write_unsmry(
        &case(dir, "CHILD.UNSMRY"),
        &[
            (2, vec![3.0, 30.0, 7.0, 1000.0], false),
            (3, vec![4.0, 40.0, 8.0, 2000.0], false),
        ],
    );

    child
}

#[test]
fn restart_chain_unions_keywords_base_first() {
    let dir = TempDir::new().unwrap();
    let mut smry = ESmry::from_file_with_base_runs(write_restart_pair(&dir)).unwrap();

    assert_eq!(
        smry.keyword_list(),
        ["TIME", "FOPT", "FGPT", "FWPT", "FLPT"]
    );
    assert_eq!(smry.restart_info(), Some(("BASE", 2)));

    // only two of the base run's three steps are consumed
    assert_eq!(smry.num_timesteps(), 4);
    assert_eq!(smry.get("TIME").unwrap(), [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(smry.get("FOPT").unwrap(), [10.0, 20.0, 30.0, 40.0]);
    assert_eq!(smry.get("FWPT").unwrap(), [5.0, 6.0, 7.0, 8.0]);
}

#[test]
fn restart_chain_nan_fills_missing_runs() {
    let dir = TempDir::new().unwrap();
    let mut smry = ESmry::from_file_with_base_runs(write_restart_pair(&dir)).unwrap();

    // FGPT only exists in the base run, FLPT only in the child
    let fgpt = smry.get("FGPT").unwrap().to_vec();
    assert_eq!(&fgpt[..2], [100.0, 200.0]);
    assert!(fgpt[2].is_nan() && fgpt[3].is_nan());

    let flpt = smry.get("FLPT").unwrap().to_vec();
    assert!(flpt[0].is_nan() && flpt[1].is_nan());
    assert_eq!(&flpt[2..], [1000.0, 2000.0]);
}

#[test]
fn restart_chain_bulk_load_matches_seek() {
    let dir = TempDir::new().unwrap();
    let child = write_restart_pair(&dir);

    let mut seeked = ESmry::from_file_with_base_runs(&child).unwrap();
    let mut bulk = ESmry::from_file_with_base_runs(&child).unwrap();
    bulk.load_all().unwrap();

    for key in ["TIME", "FOPT", "FGPT", "FWPT", "FLPT"] {
        let a = seeked.get(key).unwrap().to_vec();
        let b = bulk.get_loaded(key).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!(x == y || (x.is_nan() && y.is_nan()));
        }
    }
}

#[test]
fn child_alone_ignores_ancestry() {
    let dir = TempDir::new().unwrap();
    let mut smry = ESmry::from_file(write_restart_pair(&dir)).unwrap();

    assert_eq!(smry.keyword_list(), ["TIME", "FOPT", "FWPT", "FLPT"]);
    assert_eq!(smry.get("TIME").unwrap(), [3.0, 4.0]);
    // the RESTART record is still reported even when not followed
    assert_eq!(smry.restart_info(), Some(("BASE", 2)));
}

#[test]
fn restart_cycle_is_detected() {
    let dir = TempDir::new().unwrap();

    let columns: Vec<Column> = vec![("TIME", NONE, 0, "DAYS")];
    write_smspec(&case(&dir, "A.SMSPEC"), [1, 1, 1], 1, Some("B"), &columns);
    write_smspec(&case(&dir, "B.SMSPEC"), [1, 1, 1], 1, Some("A"), &columns);

    assert!(matches!(
        ESmry::from_file_with_base_runs(case(&dir, "A.SMSPEC")),
        Err(Error::RestartLoop(_))
    ));
}

#[test]
fn missing_restart_target_is_fatal() {
    let dir = TempDir::new().unwrap();

    let columns: Vec<Column> = vec![("TIME", NONE, 0, "DAYS")];
    write_smspec(
        &case(&dir, "LOST.SMSPEC"),
        [1, 1, 1],
        1,
        Some("GONE"),
        &columns,
    );

    assert!(matches!(
        ESmry::from_file_with_base_runs(case(&dir, "LOST.SMSPEC")),
        Err(Error::RestartPathNotFound(_))
    ));
}

// ------------------------------------------------------------------------
// Result file discovery and the step-stream state machine
// ------------------------------------------------------------------------

#[test]
fn numbered_result_files_concatenate() {
    let dir = TempDir::new().unwrap();
    let smspec = case(&dir, "MULTI.SMSPEC");

    write_smspec(
        &smspec,
        [1, 1, 1],
        0,
        None,
        &[("TIME", NONE, 0, "DAYS"), ("FOPT", NONE, 0, "SM3")],
    );

    write_unsmry(
        &case(&dir, "MULTI.S0001"),
        &[(0, vec![1.0, 10.0], false), (1, vec![2.0, 20.0], false)],
    );
    write_unsmry(&case(&dir, "MULTI.S0002"), &[(2, vec![3.0, 30.0], false)]);

    let mut smry = ESmry::from_file(&smspec).unwrap();

    assert_eq!(smry.num_timesteps(), 3);
    assert_eq!(smry.get("FOPT").unwrap(), [10.0, 20.0, 30.0]);
    assert_eq!(smry.ministeps().unwrap(), [0, 1, 2]);

    // end of S0001 does not mark a report step, only SEQHDR or end of run
    assert_eq!(smry.get_at_rstep("TIME").unwrap(), [2.0, 3.0]);
}

#[test]
fn most_recent_result_files_win() {
    let dir = TempDir::new().unwrap();
    let smspec = case(&dir, "RACE.SMSPEC");

    write_smspec(
        &smspec,
        [1, 1, 1],
        0,
        None,
        &[("TIME", NONE, 0, "DAYS"), ("FOPT", NONE, 0, "SM3")],
    );

    // the unified file is written after the numbered set, so it wins
    write_unsmry(&case(&dir, "RACE.S0001"), &[(0, vec![1.0, -1.0], false)]);
    std::thread::sleep(std::time::Duration::from_millis(50));
    write_unsmry(&case(&dir, "RACE.UNSMRY"), &[(0, vec![1.0, 10.0], false)]);

    let mut unified_wins = ESmry::from_file(&smspec).unwrap();
    assert_eq!(unified_wins.get("FOPT").unwrap(), [10.0]);

    // refresh the numbered file and it takes over
    std::thread::sleep(std::time::Duration::from_millis(50));
    write_unsmry(&case(&dir, "RACE.S0001"), &[(0, vec![1.0, -1.0], false)]);

    let mut numbered_wins = ESmry::from_file(&smspec).unwrap();
    assert_eq!(numbered_wins.get("FOPT").unwrap(), [-1.0]);
}

#[test]
fn missing_result_files_are_fatal() {
    let dir = TempDir::new().unwrap();
    let smspec = case(&dir, "NODATA.SMSPEC");

    write_smspec(&smspec, [1, 1, 1], 0, None, &[("TIME", NONE, 0, "DAYS")]);

    assert!(matches!(
        ESmry::from_file(&smspec),
        Err(Error::NoResultFiles(_))
    ));
}

#[test]
fn rogue_record_in_step_stream_is_fatal() {
    let dir = TempDir::new().unwrap();
    let smspec = case(&dir, "ROGUE.SMSPEC");

    write_smspec(&smspec, [1, 1, 1], 0, None, &[("TIME", NONE, 0, "DAYS")]);

    let mut out = EclWriter::create(case(&dir, "ROGUE.UNSMRY")).unwrap();
    out.write_inte("SEQHDR", &[0]).unwrap();
    out.write_inte("MINISTEP", &[0]).unwrap();
    out.write_real("PARAMS", &[1.0]).unwrap();
    out.write_real("FOOBAR", &[1.0]).unwrap();
    out.flush().unwrap();

    assert!(matches!(
        ESmry::from_file(&smspec),
        Err(Error::UnknownStepRecord { name, .. }) if name == "FOOBAR"
    ));
}

#[test]
fn misplaced_params_is_fatal() {
    let dir = TempDir::new().unwrap();
    let smspec = case(&dir, "ORDER.SMSPEC");

    write_smspec(&smspec, [1, 1, 1], 0, None, &[("TIME", NONE, 0, "DAYS")]);

    let mut out = EclWriter::create(case(&dir, "ORDER.UNSMRY")).unwrap();
    out.write_inte("SEQHDR", &[0]).unwrap();
    out.write_real("PARAMS", &[1.0]).unwrap();
    out.flush().unwrap();

    assert!(matches!(
        ESmry::from_file(&smspec),
        Err(Error::UnexpectedRecord { expected: "MINISTEP", found, .. }) if found == "PARAMS"
    ));
}

#[test]
fn vendor_records_are_skipped() {
    let dir = TempDir::new().unwrap();
    let smspec = case(&dir, "TNAV.SMSPEC");

    write_smspec(&smspec, [1, 1, 1], 0, None, &[("TIME", NONE, 0, "DAYS")]);

    let mut out = EclWriter::create(case(&dir, "TNAV.UNSMRY")).unwrap();
    out.write_inte("TNAVHEAD", &[1, 2, 3]).unwrap();
    out.write_inte("SEQHDR", &[0]).unwrap();
    out.write_inte("MINISTEP", &[0]).unwrap();
    out.write_real("PARAMS", &[1.5]).unwrap();
    out.write_inte("TNAVTIME", &[7]).unwrap();
    out.write_inte("MINISTEP", &[1]).unwrap();
    out.write_real("PARAMS", &[2.5]).unwrap();
    out.flush().unwrap();

    let mut smry = ESmry::from_file(&smspec).unwrap();
    assert_eq!(smry.get("TIME").unwrap(), [1.5, 2.5]);
}

// ------------------------------------------------------------------------
// ESMRY round trip
// ------------------------------------------------------------------------

#[test]
fn esmry_round_trip() {
    let dir = TempDir::new().unwrap();
    let smspec = write_single_run(&dir);

    let mut smry = ESmry::from_file(&smspec).unwrap();
    assert!(smry.make_esmry_file().unwrap());

    // a second attempt leaves the existing file alone
    assert!(!smry.make_esmry_file().unwrap());

    let mut packed = ExtEsmry::open(case(&dir, "SINGLE.ESMRY")).unwrap();

    assert_eq!(packed.keyword_list(), smry.keyword_list());
    assert_eq!(packed.report_step_flags(), [0, 1, 0, 0, 1]);
    assert_eq!(packed.ministeps(), [0, 1, 2, 3, 4]);
    assert_eq!(packed.start_date(), smry.start_date());
    assert!(packed.restart_info().is_none());

    for key in ["TIME", "WOPR:OP_1", "FOPT", "BPR:1,1,2"] {
        assert_eq!(packed.get(key).unwrap(), smry.get_loaded(key).unwrap());
        assert_eq!(packed.get_unit(key).unwrap(), smry.get_unit(key).unwrap());
    }

    assert_eq!(packed.dates().unwrap(), smry.dates().unwrap());
}

#[test]
fn esmry_requires_single_run() {
    let dir = TempDir::new().unwrap();
    let child = write_restart_pair(&dir);

    let mut smry = ESmry::from_file_with_base_runs(child).unwrap();
    assert!(matches!(
        smry.make_esmry_file(),
        Err(Error::EsmryRequiresSingleRun)
    ));
}

#[test]
fn esmry_keeps_restart_info() {
    let dir = TempDir::new().unwrap();
    let child = write_restart_pair(&dir);

    let mut smry = ESmry::from_file(&child).unwrap();
    assert!(smry.make_esmry_file().unwrap());

    let packed = ExtEsmry::open(case(&dir, "CHILD.ESMRY")).unwrap();
    assert_eq!(packed.restart_info(), Some(("BASE", 2)));
}

// ------------------------------------------------------------------------
// Formatted variant
// ------------------------------------------------------------------------

fn push_header(content: &mut String, name: &str, count: usize, code: &str) {
    content.push_str(&format!(" '{:<8}' {:>11} '{:<4}'\n", name, count, code));
}

fn push_inte(content: &mut String, values: &[i32]) {
    for line in values.chunks(6) {
        for v in line {
            content.push_str(&format!("{:>12}", v));
        }
        content.push('\n');
    }
}

fn push_real(content: &mut String, values: &[f32]) {
    for line in values.chunks(4) {
        for v in line {
            content.push_str(&format!("{:>17}", format!("{:.7E}", v)));
        }
        content.push('\n');
    }
}

fn push_char(content: &mut String, values: &[&str]) {
    for line in values.chunks(7) {
        for v in line {
            content.push_str(&format!(" '{:<8}'", v));
        }
        content.push('\n');
    }
}

#[test]
fn formatted_run_reads_like_binary() {
    let dir = TempDir::new().unwrap();

    let mut spec = String::new();
    push_header(&mut spec, "DIMENS", 6, "INTE");
    push_inte(&mut spec, &[2, 1, 1, 1, 0, 0]);
    push_header(&mut spec, "RESTART", 0, "CHAR");
    push_header(&mut spec, "KEYWORDS", 2, "CHAR");
    push_char(&mut spec, &["TIME", "FOPT"]);
    push_header(&mut spec, "WGNAMES", 2, "CHAR");
    push_char(&mut spec, &[NONE, NONE]);
    push_header(&mut spec, "NUMS", 2, "INTE");
    push_inte(&mut spec, &[0, 0]);
    push_header(&mut spec, "UNITS", 2, "CHAR");
    push_char(&mut spec, &["DAYS", "SM3"]);
    push_header(&mut spec, "STARTDAT", 6, "INTE");
    push_inte(&mut spec, &[1, 1, 2020, 0, 0, 0]);
    std::fs::write(case(&dir, "FMT.FSMSPEC"), spec).unwrap();

    let mut data = String::new();
    push_header(&mut data, "SEQHDR", 1, "INTE");
    push_inte(&mut data, &[0]);
    for step in 0..2 {
        push_header(&mut data, "MINISTEP", 1, "INTE");
        push_inte(&mut data, &[step]);
        push_header(&mut data, "PARAMS", 2, "REAL");
        push_real(&mut data, &[(step + 1) as f32, 10.0 * (step + 1) as f32]);
    }
    std::fs::write(case(&dir, "FMT.FUNSMRY"), data).unwrap();

    let mut smry = ESmry::from_file(case(&dir, "FMT.FSMSPEC")).unwrap();

    assert_eq!(smry.keyword_list(), ["TIME", "FOPT"]);
    assert_eq!(smry.ministeps().unwrap(), [0, 1]);
    assert_eq!(smry.get("FOPT").unwrap(), [10.0, 20.0]);
    assert_eq!(smry.get("TIME").unwrap(), [1.0, 2.0]);

    let mut bulk = ESmry::from_file(case(&dir, "FMT.FSMSPEC")).unwrap();
    bulk.load_all().unwrap();
    assert_eq!(bulk.get_loaded("FOPT").unwrap(), [10.0, 20.0]);
}

#[test]
fn wrong_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = case(&dir, "CASE.UNSMRY");
    std::fs::write(&path, b"").unwrap();

    assert!(matches!(
        ESmry::from_file(&path),
        Err(Error::WrongExtension)
    ));
}
