//! Source directory enumeration for the `dict` command.
//!
//! | Depth     | Directories converted                                  |
//! |-----------|--------------------------------------------------------|
//! | `Root`    | The root directory only                                |
//! | `Subdirs` | Every top-level subdirectory                           |
//! | `Recurse` | Every nested subdirectory                              |
//!
//! With `Recurse`, a directory that only holds further directories (no SVG
//! files of its own) is not converted; its children are.

use jwalk::WalkDir;
use std::path::{Path, PathBuf};

use super::TemplateVars;
use crate::debug;

/// How deep below the root source directories are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceDepth {
    #[default]
    Root,
    Subdirs,
    Recurse,
}

impl SourceDepth {
    /// `--recurse` wins over `--subdirs`.
    pub const fn from_flags(subdirs: bool, recurse: bool) -> Self {
        match (subdirs, recurse) {
            (_, true) => Self::Recurse,
            (true, false) => Self::Subdirs,
            (false, false) => Self::Root,
        }
    }
}

/// One directory that becomes one dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDir {
    /// Directory path.
    pub path: PathBuf,
    /// Path below the root, `/` separated, empty for the root itself.
    pub sub_path: String,
    /// Directory name.
    pub name: String,
}

impl SourceDir {
    fn new(root: &Path, path: PathBuf) -> Self {
        let sub_path = path
            .strip_prefix(root)
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            sub_path,
            name,
        }
    }

    /// Template values for this directory below `root`.
    pub fn vars<'a>(&'a self, root: &'a str) -> TemplateVars<'a> {
        TemplateVars {
            root,
            sub_path: &self.sub_path,
            name: &self.name,
        }
    }

    /// SVG files directly inside this directory.
    pub fn svg_files(&self) -> Vec<PathBuf> {
        svg_files(&self.path)
    }
}

/// Collect the source directories below `root` (root must be absolute and
/// normalized for `{0}`/`{1}` to be meaningful).
pub fn source_dirs(root: &Path, depth: SourceDepth) -> Vec<SourceDir> {
    let max_depth = match depth {
        SourceDepth::Root => return vec![SourceDir::new(root, root.to_path_buf())],
        SourceDepth::Subdirs => 1,
        SourceDepth::Recurse => usize::MAX,
    };

    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path())
        .filter(|dir| {
            let keep = depth != SourceDepth::Recurse || !is_container_only(dir);
            if !keep {
                debug!("dict"; "{} only holds directories", dir.display());
            }
            keep
        })
        .map(|dir| SourceDir::new(root, dir))
        .collect()
}

/// `*.svg*` files (svg, svgz) directly inside `dir`, sorted by name.
pub fn svg_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_svg(p))
        .collect();
    files.sort();
    files
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.to_ascii_lowercase().starts_with("svg"))
}

/// Has subdirectories but no SVG files of its own.
fn is_container_only(dir: &Path) -> bool {
    let has_subdirs = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .any(|e| e.file_type().is_dir());
    has_subdirs && svg_files(dir).is_empty()
}
