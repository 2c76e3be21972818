//! Configuration section definitions.
//!
//! Each module corresponds to a section in `svgxaml.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `convert` | `[convert]`  | Key naming, consolidation, result mode   |
//! | `output`  | `[output]`   | Container name and output file templates |

mod convert;
mod output;

pub use convert::{ConvertConfig, ResultMode};
pub use output::{OutputConfig, TemplateVars};
