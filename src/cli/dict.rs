//! `dict`: one resource dictionary per source directory.
//!
//! Per directory:
//! - **Collect** - `*.svg*` files, sorted by name
//! - **Import** - parallel usvg import and sizing, results kept in file order
//! - **Assemble** - keyed drawing groups in one `ResourceDictionary`
//! - **Normalize** - simplify, extract, consolidate, attach images
//! - **Write** - output file from the `[output]` templates

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use super::DictArgs;
use super::common::{file_stem, render, write_file};
use crate::config::{ConverterConfig, SourceDepth, SourceDir, TemplateVars, source_dirs};
use crate::drawing::{self, DrawingNode};
use crate::logger::ProgressLine;
use crate::normalize::{
    NameRegistry, NormalizeOptions, drawing_group_key, normalize_dictionary, validate_name,
};
use crate::utils::{plural_count, plural_count_with};
use crate::{debug, log};

/// Run the `dict` command over every source directory.
///
/// A directory without SVG files is skipped, not failed. Every directory is
/// attempted; the command fails afterwards if any of them did.
pub fn build_dictionaries(args: &DictArgs, config: &ConverterConfig) -> Result<()> {
    let root = resolve_root(args.dir.as_deref())?;
    let target = match &args.target {
        Some(target) => std::path::absolute(target)
            .with_context(|| format!("Invalid target {}", target.display()))?,
        None => root.clone(),
    };

    let dirs = source_dirs(&root, SourceDepth::from_flags(args.subdirs, args.recurse));
    log!("dict"; "source: {}", root.display());

    let root_str = root.to_string_lossy();
    let total = dirs.len();
    let mut failed = 0;
    for (index, dir) in dirs.iter().enumerate() {
        let vars = dir.vars(&root_str);
        match convert_dir(dir, &vars, &target, config) {
            Ok(Some(path)) => {
                log!("dict"; "directory {}/{}: written to {}", index + 1, total, path.display());
            }
            Ok(None) => {
                log!("dict"; "directory {}/{}: skipped, no svg files in {}", index + 1, total, dir.path.display());
            }
            Err(e) => {
                failed += 1;
                log!("error"; "directory {}/{}: {:#}", index + 1, total, e);
            }
        }
    }

    if failed > 0 {
        bail!(
            "{} failed to convert",
            plural_count_with(failed, "directory", "directories")
        );
    }
    Ok(())
}

fn resolve_root(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = dir.unwrap_or(Path::new("."));
    dir.canonicalize()
        .with_context(|| format!("Source directory {} not found", dir.display()))
}

/// Convert one directory. Returns the written file, `None` when skipped.
fn convert_dir(
    dir: &SourceDir,
    vars: &TemplateVars<'_>,
    target: &Path,
    config: &ConverterConfig,
) -> Result<Option<PathBuf>> {
    let files = dir.svg_files();
    if files.is_empty() {
        return Ok(None);
    }

    let options = config.normalize_options(&config.output.container_name(vars))?;
    let text = dictionary_text(&files, &options, config)
        .with_context(|| format!("in {}", dir.path.display()))?;

    let path = config.output.output_file(target, vars);
    write_file(&path, &text)?;
    Ok(Some(path))
}

/// Merge `files` into one normalized dictionary document.
pub fn dictionary_text(
    files: &[PathBuf],
    options: &NormalizeOptions,
    config: &ConverterConfig,
) -> Result<String> {
    let entries = import_entries(files, &config.convert.drawing_key_replacement)?;

    let mut doc = drawing::write_dictionary(&entries);
    let normalized = normalize_dictionary(&mut doc, options)?;
    debug!(
        "dict";
        "{}: {} with {} keys",
        options.container_name,
        plural_count(normalized.images, "image"),
        normalized.registry.len()
    );

    render(&doc, config.convert.strip_namespaces)
}

/// Import and size every file in parallel, then key the drawings in file order.
///
/// Stems that validate to the same name get `2`, `3`, ... appended so sibling
/// keys stay unique.
fn import_entries(files: &[PathBuf], replacement: &str) -> Result<Vec<DrawingNode>> {
    let progress = ProgressLine::new("dict", &[("svg", files.len())]);
    let imported: Vec<Result<DrawingNode>> = files
        .par_iter()
        .map(|file| {
            let node = drawing::import_file(file).map(|mut node| {
                drawing::set_size_to_geometries(&mut node);
                node
            });
            progress.inc("svg");
            node
        })
        .collect();
    progress.finish();

    let mut stems = NameRegistry::new();
    let mut entries = Vec::with_capacity(files.len());
    for (file, node) in files.iter().zip(imported) {
        let mut node = node?;
        let stem = stems.unique_base(&validate_name(file_stem(file)?, replacement));
        if let DrawingNode::Group(group) = &mut node {
            group.key = Some(drawing_group_key(&stem, replacement));
        }
        entries.push(node);
    }
    Ok(entries)
}
