//! `normalize`: run the dictionary pipeline over existing markup.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::common::{emit, file_stem, render};
use crate::config::ConverterConfig;
use crate::markup;
use crate::normalize::normalize_dictionary;
use crate::utils::plural_count;
use crate::{debug, log};

/// Run the `normalize` command. The container name is the file stem.
pub fn normalize_file(file: &Path, output: Option<&Path>, config: &ConverterConfig) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let normalized = normalize_text(&text, file_stem(file)?, config)
        .with_context(|| format!("Failed to normalize {}", file.display()))?;
    emit(&normalized, output)
}

/// Normalize dictionary markup, using `container` for global keys.
pub fn normalize_text(text: &str, container: &str, config: &ConverterConfig) -> Result<String> {
    let mut doc = markup::parse(text)?;
    let options = config.normalize_options(container)?;
    let normalized = normalize_dictionary(&mut doc, &options)?;
    if normalized.images == 0 {
        log!("normalize"; "no top-level drawing groups, document unchanged");
    } else {
        debug!("normalize"; "{} normalized", plural_count(normalized.images, "image"));
    }
    render(&doc, config.convert.strip_namespaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DICTIONARY: &str = r##"<ResourceDictionary xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation" xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml">
  <ResourceDictionary.Entries>
    <DrawingGroup x:Key="homeDrawingGroup">
      <GeometryDrawing Brush="#FF202020" Geometry="F1 M0,0 L4,4z" />
    </DrawingGroup>
    <DrawingGroup x:Key="userDrawingGroup">
      <GeometryDrawing Brush="#ff202020" Geometry="F1 M1,1 L4,4z" />
    </DrawingGroup>
  </ResourceDictionary.Entries>
</ResourceDictionary>"##;

    #[test]
    fn test_normalize_text_shares_global_color() {
        let text = normalize_text(DICTIONARY, "app icons", &ConverterConfig::default()).unwrap();
        assert!(text.contains(r##"<Color x:Key="AppiconsColor">#FF202020</Color>"##));
        assert!(text.contains(r#"<SolidColorBrush x:Key="AppiconsBrush" Color="{DynamicResource AppiconsColor}"/>"#));
        assert!(text.contains(r#"x:Key="homeGeometry""#));
        assert!(text.contains(r#"x:Key="userImage""#));
        assert!(!text.contains("ResourceDictionary.Entries"));
    }

    #[test]
    fn test_normalize_file_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Icons.xaml");
        let output = dir.path().join("out/Icons.xaml");
        fs::write(&input, DICTIONARY).unwrap();

        normalize_file(&input, Some(&output), &ConverterConfig::default()).unwrap();
        let text = fs::read_to_string(output).unwrap();
        assert!(text.contains(r#"x:Key="IconsColor""#));
    }

    #[test]
    fn test_normalize_rejects_bad_markup() {
        assert!(normalize_text("<ResourceDictionary>", "x", &ConverterConfig::default()).is_err());
    }

    #[test]
    fn test_normalize_rejects_truncated_dictionary() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Trunc.xaml");
        let output = dir.path().join("Trunc.out.xaml");
        fs::write(
            &input,
            r##"<ResourceDictionary><DrawingGroup x:Key="aDrawingGroup"><GeometryDrawing Brush="#FF000000"/>"##,
        )
        .unwrap();

        let err = normalize_file(&input, Some(&output), &ConverterConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("unclosed element"));
        assert!(!output.exists());
    }
}
