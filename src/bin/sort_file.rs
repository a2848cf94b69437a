use std::io::BufRead;
use std::path::PathBuf;

use kart_coupon_service::external_sort::sort::Sort;

const DEFAULT_CHUNK_SIZE_BYTES: u64 = 100 * 1024 * 1024;

fn count_lines(path: &PathBuf) -> std::io::Result<usize> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(reader.lines().count())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: sort-file <input-path> <output-path> [<chunk-size-bytes>]");
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let output_path = PathBuf::from(&args[2]);
    let chunk_size_bytes = args.get(3)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_CHUNK_SIZE_BYTES);

    println!(
        "Sorting file: {} -> {} (chunk size: {} bytes)",
        input_path.display(),
        output_path.display(),
        chunk_size_bytes
    );

    let mut sort = Sort::new(vec![input_path.clone()], output_path.clone());
    sort.with_chunk_size_bytes(chunk_size_bytes);

    if let Err(e) = sort.sort() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let input_lines = match count_lines(&input_path) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Failed to count input lines: {}", e);
            std::process::exit(1);
        }
    };
    let output_lines = match count_lines(&output_path) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Failed to count output lines: {}", e);
            std::process::exit(1);
        }
    };

    println!("Validation: input lines = {}, output lines = {}", input_lines, output_lines);
    if input_lines != output_lines {
        eprintln!("Line count mismatch! Possible data loss during sort.");
        std::process::exit(1);
    }

    println!("Sorting complete and validated successfully!");
}
