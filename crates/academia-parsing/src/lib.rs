use thiserror::Error;

pub mod cites;
pub mod config;
pub mod linker;
pub mod names;
pub mod reference;
pub mod section;

pub use cites::{cite_spans, find_cites, highlight_cites};
pub use config::{NameListStrategy, ParsingConfig, ParsingConfigBuilder};
pub use linker::{PaperLinker, link_cites, link_paper};
pub use names::{format_names, parse_name_list};
pub use reference::{format_reference, parse_reference};
pub use section::{SectionPartition, is_references_title, partition_sections};
// Re-export domain types from core (canonical definitions live there)
pub use academia_core::{
    AuthorYearCite, Cite, CiteOrigin, CiteStyle, LinkStats, LinkedCite, Name, Paper, Reference,
    ReferencePointer, Section,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("unknown name list strategy: {0}")]
    UnknownStrategy(String),
}
