use std::fs;
use std::io::Write;
use std::path::PathBuf;

use kart_coupon_service::coupon::factory::create_reader;
use kart_coupon_service::coupon::reader::CouponReader;

mod common;

fn write_coupon_file(dir: &PathBuf, name: &str, lines: &[&str]) {
    let mut file = fs::File::create(dir.join(name)).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

fn corpus_dir() -> PathBuf {
    let dir = common::temp_file_name("./target/results/");
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn found_in_two_of_two_files() {
    common::setup();
    let dir = corpus_dir();
    write_coupon_file(&dir, "couponbase1", &["ALPHA01", "BETA0002", "GAMMA003"]);
    write_coupon_file(&dir, "couponbase2", &["BETA0002", "DELTA04"]);

    let reader = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5).unwrap();
    let outcome = reader.search("BETA0002");
    assert!(outcome.found);
    assert!(outcome.errors.is_empty());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn not_found_when_present_in_only_one_file() {
    common::setup();
    let dir = corpus_dir();
    write_coupon_file(&dir, "couponbase1", &["ALPHA01", "BETA0002"]);
    write_coupon_file(&dir, "couponbase2", &["DELTA04", "EPSILON5"]);

    let reader = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5).unwrap();
    let outcome = reader.search("BETA0002");
    assert!(!outcome.found);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn found_in_three_of_three_files() {
    common::setup();
    let dir = corpus_dir();
    write_coupon_file(&dir, "couponbase1", &["A0001111"]);
    write_coupon_file(&dir, "couponbase2", &["A0001111"]);
    write_coupon_file(&dir, "couponbase3", &["A0001111"]);

    let reader = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5).unwrap();
    let outcome = reader.search("A0001111");
    assert!(outcome.found);
    // `probes_cancelled` (SearchOutcome) is the hook for asserting "at least
    // one probe observes cancellation" end-to-end; not asserted here since
    // with 3 single-line files all three probes may complete before the
    // threshold-triggered cancellation is ever observed — the exact moment
    // cancellation fires is non-deterministic by spec.md §5, only the
    // Boolean outcome is not. `cancellation_short_circuits_without_error`
    // in probe.rs covers the mechanism deterministically in isolation.
    assert!(outcome.probes_cancelled <= 3);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn query_outside_global_range_is_pruned() {
    common::setup();
    let dir = corpus_dir();
    write_coupon_file(&dir, "couponbase1", &["B", "C", "D"]);
    write_coupon_file(&dir, "couponbase2", &["E", "F", "G"]);

    let reader = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5).unwrap();
    let outcome = reader.search("A");
    assert!(!outcome.found);
    assert!(outcome.errors.is_empty());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn large_file_match_found_within_bounded_window() {
    common::setup();
    let dir = corpus_dir();
    let lines: Vec<String> = (0..1_000_000).map(|i| format!("code-{i:07}")).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_coupon_file(&dir, "couponbase1", &refs);
    write_coupon_file(&dir, "couponbase2", &["code-0523456"]);

    let reader = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5).unwrap();
    let outcome = reader.search("code-0523456");
    assert!(outcome.found);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn empty_file_in_corpus_contributes_nothing() {
    common::setup();
    let dir = corpus_dir();
    write_coupon_file(&dir, "couponbase1", &[]);
    write_coupon_file(&dir, "couponbase2", &["X"]);

    let reader = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5).unwrap();
    let outcome = reader.search("X");
    assert!(!outcome.found);
    assert!(outcome.errors.is_empty());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn search_is_idempotent() {
    common::setup();
    let dir = corpus_dir();
    write_coupon_file(&dir, "couponbase1", &["ALPHA01", "BETA0002"]);
    write_coupon_file(&dir, "couponbase2", &["BETA0002", "DELTA04"]);

    let reader = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5).unwrap();
    for _ in 0..5 {
        assert!(reader.search("BETA0002").found);
    }

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn no_coupon_files_fails_construction() {
    common::setup();
    let dir = corpus_dir();

    let result = create_reader("hdd", dir.to_str().unwrap(), 100_000, 5);
    assert!(result.is_err());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn ssd_reader_is_not_implemented() {
    let result = create_reader("ssd", ".", 100_000, 5);
    assert!(result.is_err());
}

#[test]
fn unknown_reader_tag_is_unsupported() {
    let result = create_reader("nvme", ".", 100_000, 5);
    assert!(result.is_err());
}
