use std::env;
use std::fs;
use std::path::Path;

include!("../build_common.rs");

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();

    // Process README for rustdoc (uses shared build_common.rs)
    process_readme_for_rustdoc(&crate_dir);

    // Built-in configuration is embedded with include_str!
    println!("cargo:rerun-if-changed=src/config/defaults.json");
}
