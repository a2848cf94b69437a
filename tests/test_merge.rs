use std::fs;
use std::io::Write;
use std::path::PathBuf;

use kart_coupon_service::external_sort::sort::Sort;

mod common;

fn sorted_fixture(path: &PathBuf, lines: usize) {
    let mut file = fs::File::create(path).unwrap();
    for i in 0..lines {
        writeln!(file, "coupon-{i:08}").unwrap();
    }
}

#[test]
fn test_merge() -> Result<(), anyhow::Error> {
    common::setup();
    let output_path = common::temp_file_name("./target/results/");

    let mut input_files = Vec::new();
    for i in 0..10 {
        let mut path = output_path.clone();
        path.set_file_name("sorted-1000");
        path.set_extension(format!("{i}"));
        sorted_fixture(&path, 1000);
        input_files.push(path.clone());
    }
    let text_file_sort = Sort::new(input_files.clone(), output_path.clone());
    text_file_sort.merge()?;

    let lines = common::read_lines(output_path.clone())?;
    assert_eq!(lines.len(), 10000);
    for window in lines.windows(2) {
        assert!(window[0] <= window[1]);
    }
    fs::remove_file(output_path)?;
    for path in input_files {
        fs::remove_file(path)?;
    }
    Ok(())
}
