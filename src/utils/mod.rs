//! Shared helpers: path handling, content keys, pluralization.

pub mod hash;
pub mod path;
mod plural;

pub use plural::plural_count;
