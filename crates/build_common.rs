// Shared build script helper: turns a crate README into its rustdoc front page.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Write `OUT_DIR/README_GENERATED.md` from the crate's README.md.
///
/// Links are rewritten so they resolve inside rustdoc:
/// - `](src/engine/mod.rs)` becomes `](engine/mod)` (module link)
/// - `](../../README.md)` points at the workspace repository URL
///
/// A crate without a README gets an empty page rather than a build failure.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let content = fs::read_to_string(Path::new(crate_dir).join("README.md")).unwrap_or_default();
    let repository = workspace_repository(crate_dir);
    let rendered = rewrite_readme_links(&content, repository.as_deref());

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), rendered).unwrap();
}

fn rewrite_readme_links(content: &str, repository: Option<&str>) -> String {
    let mut rendered = content.replace("](src/", "](").replace(".rs)", ")");
    if let Some(url) = repository {
        rendered = rendered.replace("](../../README.md", &format!("]({url}"));
    }
    rendered
}

/// `repository = "..."` from the workspace manifest two levels up.
fn workspace_repository(crate_dir: &str) -> Option<String> {
    let manifest = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(manifest).ok()?;

    content.lines().map(str::trim).find_map(|line| {
        let value = line
            .strip_prefix("repository")?
            .trim_start()
            .strip_prefix('=')?;
        let value = value.trim().strip_prefix('"')?;
        value.split_once('"').map(|(url, _)| url.to_string())
    })
}
