//! cfgdoc — generate a commented defaults document from Rust config source.
//!
//! Reads the module files of a configuration package, finds the conventional
//! `DEFAULT_VALUES` declaration, and renders its initializer as YAML (or
//! JSON) with every field's in-source documentation attached:
//!
//! - `cfgdoc path/to/config/` — document a module directory to stdout
//! - `cfgdoc src/config.rs -f json -o defaults.json` — single file, to disk

mod comments;
mod model;
mod render;
mod resolve;
mod unit;
mod walk;

use anyhow::{bail, Context, Result};
use clap::Parser;
use model::Document;
use std::fs;
use std::path::{Path, PathBuf};
use unit::{Registry, Unit};
use walk::Walker;

#[derive(Parser)]
#[command(
    name = "cfgdoc",
    about = "Generate a commented defaults document from Rust configuration source"
)]
struct Cli {
    /// Module directory, single .rs file, or glob pattern.
    input: String,

    /// Name of the defaults declaration to document.
    #[arg(long, default_value = "DEFAULT_VALUES")]
    var: String,

    /// Output format: yaml (default) or json.
    #[arg(short = 'f', long, default_value = "yaml")]
    format: String,

    /// Write to a file instead of stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let files = collect_files(&cli.input)?;
    if files.is_empty() {
        bail!("no .rs files found in {}", cli.input);
    }

    let mut registry = Registry::default();
    for path in &files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let unit = Unit::parse(&module_name(path), &source)
            .with_context(|| format!("failed to load {}", path.display()))?;
        registry.insert(unit)?;
    }

    let (root_unit, var) = registry.find_variable(&cli.var)?;
    let root = Walker::new(&registry, root_unit).walk(&var.init)?;
    let doc = Document {
        head_comment: var.doc.clone().unwrap_or_default(),
        root,
    };

    let renderer = render::create_renderer(&cli.format)?;
    let rendered = renderer.render(&doc);

    match &cli.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("\n{}", rendered),
    }
    Ok(())
}

/// Expand the positional argument into a sorted, deduplicated list of `.rs`
/// files: a directory is scanned non-recursively, a file is taken as-is,
/// anything else is tried as a glob pattern.
fn collect_files(input: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(input);
    let mut files = Vec::new();
    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        let entries = fs::read_dir(path)
            .with_context(|| format!("failed to read directory: {}", path.display()))?;
        for entry in entries.flatten() {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(p);
            }
        }
    } else {
        let matches: Vec<_> = glob::glob(input)
            .with_context(|| format!("invalid glob pattern: {}", input))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", input);
        }
        files.extend(matches);
    }
    // Sort for deterministic unit loading
    files.sort();
    files.dedup();
    Ok(files)
}

/// Unit name for a module file: "config/values.rs" → "values".
fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
