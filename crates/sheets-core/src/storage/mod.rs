//! Storage module for the JSON save format and markdown export

mod json;
mod md;

pub use json::{CellInfo, SaveKind, SparseSave, parse_json, write_json};
pub use md::{write_markdown, write_markdown_file};
