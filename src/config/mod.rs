//! Converter configuration management for `svgxaml.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── convert    # [convert]
//! │   └── output     # [output]
//! ├── error          # ConfigError, ConfigDiagnostics
//! ├── source         # Source directory enumeration
//! └── mod.rs         # ConverterConfig (this file)
//! ```
//!
//! The config file is optional: without one every section takes its
//! defaults, and CLI flags override file values either way.

pub mod section;
mod error;
mod source;

pub use error::{ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{ConvertConfig, OutputConfig, ResultMode, TemplateVars};
pub use source::{SourceDepth, SourceDir, source_dirs};

use crate::{
    cli::{Cli, Commands},
    debug,
    normalize::{NormalizeOptions, normalize_container_name},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgxaml.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Path of the loaded config file, `None` when running on defaults
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Naming and consolidation settings
    pub convert: ConvertConfig,

    /// Output templates of the `dict` command
    pub output: OutputConfig,
}

impl ConverterConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file, falls back to defaults
    /// when none exists, then applies command flags and validates.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.apply_command_options(&cli.command);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in {}", path.display()))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, command: &Commands) {
        match command {
            Commands::Convert { args } => {
                Self::update_option(&mut self.convert.result_mode, args.mode.as_ref());
            }
            Commands::Dict { args } => {
                Self::update_option(&mut self.output.name, args.name.as_ref());
                Self::update_option(&mut self.output.path, args.output.as_ref());
                if args.no_consolidate {
                    self.convert.consolidate_brushes = false;
                }
            }
            Commands::Normalize { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.convert.validate(&mut diag);
        self.output.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    // ========================================================================
    // normalizer options
    // ========================================================================

    /// Options for one dictionary run with the given raw container name.
    pub fn normalize_options(&self, container: &str) -> Result<NormalizeOptions> {
        Ok(NormalizeOptions {
            container_name: normalize_container_name(
                container,
                &self.convert.main_key_replacement,
            ),
            consolidate_brushes: self.convert.consolidate_brushes,
            image_key: self.convert.image_key.clone(),
            kinds: self.convert.kinds()?,
        })
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::ResourceKind;
    use clap::Parser;

    #[test]
    fn test_from_str_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        assert!(ConverterConfig::from_str("[convert\nimage_key = \"Image\"").is_err());
    }

    #[test]
    fn test_from_str_full() {
        let config = ConverterConfig::from_str(
            r#"
            [convert]
            consolidate_brushes = false
            image_key = "Icon"
            main_key_replacement = "_"
            resource_kinds = ["color", "brush"]

            [output]
            name = "{2}Icons"
            "#,
        )
        .unwrap();
        assert!(!config.convert.consolidate_brushes);
        assert_eq!(config.convert.image_key, "Icon");
        assert_eq!(config.output.name, "{2}Icons");
        assert_eq!(config.output.path, "{1}/{2}.xaml");
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = ConverterConfig::from_str("[render]\ndpi = 96").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let mut config = ConverterConfig::from_str(
            r#"
            [convert]
            resource_kinds = ["brush"]
            [output]
            path = ""
            "#,
        )
        .unwrap();
        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 2);

        config.convert.resource_kinds.push("color".to_string());
        config.output.path = "{2}".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = ConverterConfig::default();
        let cli = Cli::parse_from([
            "svgxaml", "dict", "-n", "{2}Icons", "-o", "res/{2}", "--no-consolidate",
        ]);
        config.apply_command_options(&cli.command);
        assert_eq!(config.output.name, "{2}Icons");
        assert_eq!(config.output.path, "res/{2}");
        assert!(!config.convert.consolidate_brushes);

        let cli = Cli::parse_from(["svgxaml", "convert", "a.svg", "-m", "drawing-image"]);
        config.apply_command_options(&cli.command);
        assert_eq!(config.convert.result_mode, ResultMode::DrawingImage);
    }

    #[test]
    fn test_normalize_options() {
        let mut config = ConverterConfig::default();
        config.convert.resource_kinds = vec!["opacity".to_string(), "color".to_string()];
        config.convert.main_key_replacement = "_".to_string();

        let options = config.normalize_options("my icons").unwrap();
        assert_eq!(options.container_name, "My_icons");
        assert!(options.consolidate_brushes);
        assert_eq!(options.image_key, "Image");
        assert_eq!(options.kinds, [ResourceKind::Opacity, ResourceKind::Color]);
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("svgxaml.toml");
        assert_eq!(find_config_file(&path), None);
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path.clone()));
        assert!(ConverterConfig::from_path(&path).is_ok());
    }
}
