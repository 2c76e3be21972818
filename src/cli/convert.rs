//! `convert`: one SVG file -> one keyed drawing.
//!
//! import -> size -> write -> simplify, no resource dictionary.

use std::path::Path;

use anyhow::Result;

use super::ConvertArgs;
use super::common::{emit, file_stem, render};
use crate::config::{ConvertConfig, ConverterConfig, ResultMode};
use crate::drawing;
use crate::log;
use crate::normalize::{drawing_group_key, drawing_image_key, normalize_single};

/// Run the `convert` command.
pub fn convert_file(args: &ConvertArgs, config: &ConverterConfig) -> Result<()> {
    let text = convert_to_string(&args.file, &config.convert)?;
    emit(&text, args.output.as_deref())?;
    if let Some(output) = &args.output {
        log!("convert"; "{} -> {}", args.file.display(), output.display());
    }
    Ok(())
}

/// Convert `file` into single-file markup.
pub fn convert_to_string(file: &Path, convert: &ConvertConfig) -> Result<String> {
    let mut node = drawing::import_file(file)?;
    drawing::set_size_to_geometries(&mut node);

    let stem = file_stem(file)?;
    let replacement = &convert.drawing_key_replacement;
    let (mut doc, key) = match convert.result_mode {
        ResultMode::DrawingGroup => (
            drawing::write_drawing_group(&node),
            drawing_group_key(stem, replacement),
        ),
        ResultMode::DrawingImage => (
            drawing::write_drawing_image(&node),
            drawing_image_key(stem, &convert.image_key, replacement),
        ),
    };

    normalize_single(&mut doc, Some(&key));
    render(&doc, convert.strip_namespaces)
}
