//! `[output]` section configuration.
//!
//! Naming templates for the `dict` command.
//!
//! # Example
//!
//! ```toml
//! [output]
//! name = "{2}"              # container name
//! path = "{1}/{2}.xaml"     # output file, relative to the target directory
//! ```
//!
//! # Placeholders
//!
//! | Placeholder | Value                                             |
//! |-------------|---------------------------------------------------|
//! | `{0}`       | Root directory path                               |
//! | `{1}`       | Sub-path from the root to the source directory    |
//! | `{2}`       | Source directory name                             |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Values substituted into the output templates for one source directory.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub root: &'a str,
    pub sub_path: &'a str,
    pub name: &'a str,
}

impl TemplateVars<'_> {
    /// Replace `{0}`, `{1}` and `{2}` in `template`.
    pub fn expand(&self, template: &str) -> String {
        template
            .replace("{0}", self.root)
            .replace("{1}", self.sub_path)
            .replace("{2}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Container name template. The expanded name prefixes every global key.
    pub name: String,

    /// Output file template, relative to the target directory.
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            name: "{2}".to_string(),
            path: "{1}/{2}.xaml".to_string(),
        }
    }
}

impl OutputConfig {
    const NAME: FieldPath = FieldPath::new("output.name");
    const PATH: FieldPath = FieldPath::new("output.path");

    /// Expanded container name, before identifier normalization.
    pub fn container_name(&self, vars: &TemplateVars<'_>) -> String {
        vars.expand(&self.name)
    }

    /// Output file for one source directory.
    ///
    /// Leading separators left by an empty `{1}` are dropped so the result
    /// stays below `target`; a path without extension gets `.xaml`.
    pub fn output_file(&self, target: &Path, vars: &TemplateVars<'_>) -> PathBuf {
        let expanded = vars.expand(&self.path);
        let relative = expanded.trim_start_matches(['/', '\\']);
        let mut path = target.join(relative);
        if path.extension().is_none() {
            path.set_extension("xaml");
        }
        path
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error_with_hint(Self::NAME, "must not be empty", "default is \"{2}\"");
        }
        if self.path.trim().is_empty() {
            diag.error_with_hint(Self::PATH, "must not be empty", "default is \"{1}/{2}.xaml\"");
        }
    }
}
