//! Prompt assembly and citation formatting

pub mod citation;
pub mod prompt;

pub use citation::{format_citation, format_citations};
pub use prompt::PromptBuilder;
