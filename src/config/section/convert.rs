//! `[convert]` section configuration.
//!
//! Naming and consolidation settings shared by every command.
//!
//! # Example
//!
//! ```toml
//! [convert]
//! consolidate_brushes = true        # share local brush proxies
//! image_key = "Image"               # suffix of DrawingImage keys
//! main_key_replacement = ""         # replaces invalid chars in the container name
//! drawing_key_replacement = ""      # replaces invalid chars in drawing keys
//! result_mode = "drawing-group"     # single-file root: drawing-group | drawing-image
//! strip_namespaces = true           # drop the default and x xmlns declarations
//! resource_kinds = ["color", "brush", "opacity"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::normalize::{NormalizeError, ResourceKind, validate_name};

/// Root element written by the `convert` command.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResultMode {
    /// `<DrawingGroup x:Key="...">`
    #[default]
    DrawingGroup,
    /// `<DrawingImage x:Key="...">` wrapping the drawing group.
    DrawingImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Share one local proxy per distinct value within an image.
    /// `false` emits one proxy per occurrence.
    pub consolidate_brushes: bool,

    /// Suffix of `DrawingImage` keys (`cloud` + `Image`).
    pub image_key: String,

    /// Replacement for invalid characters in the container name.
    pub main_key_replacement: String,

    /// Replacement for invalid characters in drawing keys.
    pub drawing_key_replacement: String,

    /// Root element of single-file conversions.
    pub result_mode: ResultMode,

    /// Remove the default and `x` namespace declarations from the output.
    pub strip_namespaces: bool,

    /// Resource kinds to consolidate, by name.
    pub resource_kinds: Vec<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            consolidate_brushes: true,
            image_key: "Image".to_string(),
            main_key_replacement: String::new(),
            drawing_key_replacement: String::new(),
            result_mode: ResultMode::DrawingGroup,
            strip_namespaces: true,
            resource_kinds: ["color", "brush", "opacity"].map(String::from).to_vec(),
        }
    }
}

impl ConvertConfig {
    const IMAGE_KEY: FieldPath = FieldPath::new("convert.image_key");
    const RESOURCE_KINDS: FieldPath = FieldPath::new("convert.resource_kinds");

    /// Parse `resource_kinds`, keeping the configured order and dropping repeats.
    pub fn kinds(&self) -> Result<Vec<ResourceKind>, NormalizeError> {
        let mut kinds = Vec::with_capacity(self.resource_kinds.len());
        for name in &self.resource_kinds {
            let kind: ResourceKind = name.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.image_key.is_empty() || validate_name(&self.image_key, "") != self.image_key {
            diag.error_with_hint(
                Self::IMAGE_KEY,
                format!("`{}` is not a valid key suffix", self.image_key),
                "use letters and digits only",
            );
        }

        match self.kinds() {
            Ok(kinds) => {
                if kinds.contains(&ResourceKind::Brush) && !kinds.contains(&ResourceKind::Color) {
                    diag.error_with_hint(
                        Self::RESOURCE_KINDS,
                        "`brush` requires `color`",
                        "brush entries reference color entries; add \"color\" to the list",
                    );
                }
            }
            Err(e) => diag.error_with_hint(
                Self::RESOURCE_KINDS,
                e.to_string(),
                "supported kinds: color, brush, opacity",
            ),
        }
    }
}
