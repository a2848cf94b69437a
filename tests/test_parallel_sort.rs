use std::fs;
use std::io::Write;
use std::path::PathBuf;

use kart_coupon_service::external_sort::sort::Sort;

mod common;

fn shuffled_fixture(path: &PathBuf, lines: usize) -> Vec<String> {
    let mut values: Vec<String> = (0..lines).map(|i| format!("coupon-{i:08}")).collect();
    let mut shuffled = Vec::with_capacity(lines);
    let mut remaining = values.clone();
    for i in 0..lines {
        let pick = (i * 7919 + 104729) % remaining.len();
        shuffled.push(remaining.remove(pick));
    }
    values.sort();
    let mut file = fs::File::create(path).unwrap();
    for line in &shuffled {
        writeln!(file, "{line}").unwrap();
    }
    values
}

#[test]
fn test_parallel_sort() -> Result<(), anyhow::Error> {
    common::setup();
    let random_path = common::temp_file_name("./target/parallel-results/");
    let output_path = common::temp_file_name("./target/parallel-results/");
    let tmp_path = PathBuf::from("./target/parallel-results/");

    let expected = shuffled_fixture(&random_path, 10_000);

    let mut text_file_sort = Sort::new(vec![random_path.clone()], output_path.clone());
    text_file_sort.with_tasks(15);
    text_file_sort.with_tmp_dir(tmp_path.clone());
    text_file_sort.with_chunk_size_bytes(10_000);
    text_file_sort.sort()?;

    let output_lines = common::read_lines(output_path.clone())?;
    assert_eq!(output_lines, expected);
    fs::remove_file(random_path)?;
    fs::remove_file(output_path)?;
    Ok(())
}

#[test]
fn test_parallel_sort_single_task_matches_default_tasks() -> Result<(), anyhow::Error> {
    common::setup();
    let random_path = common::temp_file_name("./target/parallel-results/");
    let low_output_path = common::temp_file_name("./target/parallel-results/");
    let high_output_path = common::temp_file_name("./target/parallel-results/");
    let tmp_path = PathBuf::from("./target/parallel-results/");

    shuffled_fixture(&random_path, 10_000);

    let mut low_sort = Sort::new(vec![random_path.clone()], low_output_path.clone());
    low_sort.with_tasks(1);
    low_sort.with_tmp_dir(tmp_path.clone());
    low_sort.with_chunk_size_bytes(10_000);
    low_sort.sort()?;

    let mut high_sort = Sort::new(vec![random_path.clone()], high_output_path.clone());
    high_sort.with_tasks(8);
    high_sort.with_tmp_dir(tmp_path.clone());
    high_sort.with_chunk_size_bytes(10_000);
    high_sort.sort()?;

    let low_lines = common::read_lines(low_output_path.clone())?;
    let high_lines = common::read_lines(high_output_path.clone())?;
    assert_eq!(low_lines, high_lines);
    fs::remove_file(random_path)?;
    fs::remove_file(low_output_path)?;
    fs::remove_file(high_output_path)?;
    Ok(())
}
