//! Small helpers shared by the commands.

mod plural;

pub use plural::{plural_count, plural_count_with};
