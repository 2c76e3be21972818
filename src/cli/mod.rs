//! Command-line interface module.

mod args;
pub mod common;
pub mod convert;
pub mod dict;
pub mod normalize;

pub use args::{Cli, Commands, ConvertArgs, DictArgs};
