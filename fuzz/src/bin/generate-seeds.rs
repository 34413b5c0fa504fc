//! Generates seed corpus files from the in-code seed definitions.
//!
//! Run with: `cargo run --manifest-path fuzz/Cargo.toml --bin generate-seeds`
//!
//! Files are not overwritten if they already exist, so the fuzzer's
//! discoveries are preserved.

use parpeg_fuzz::{CALC_SEEDS, JSON_SEEDS, LIST_SEEDS};
use std::{fs, path::Path};

fn main() {
    let fuzz_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    for (target, seeds) in [
        ("parse_json", JSON_SEEDS),
        ("parse_list", LIST_SEEDS),
        ("calc", CALC_SEEDS),
    ] {
        write_seeds(&fuzz_dir.join("corpus").join(target), seeds, target);
    }
}

fn write_seeds(dir: &Path, seeds: &[(&str, &str)], target: &str) {
    fs::create_dir_all(dir).expect("failed to create corpus directory");

    let (mut written, mut skipped) = (0, 0);
    for (name, content) in seeds {
        let path = dir.join(name);
        if path.exists() {
            skipped += 1;
        } else {
            fs::write(&path, content).expect("failed to write seed file");
            written += 1;
        }
    }

    println!("{target}: wrote {written} seeds, skipped {skipped} existing");
}
