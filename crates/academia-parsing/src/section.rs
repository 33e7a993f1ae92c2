use academia_core::Section;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// Default bibliography title: "References" or "Reference", whole title,
/// case-sensitive.
static REFERENCES_TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^References?$").unwrap());

/// A paper's sections split into body and bibliography, each paired with
/// its index in the original section list.
#[derive(Debug, Clone, Default)]
pub struct SectionPartition<'a> {
    pub body: Vec<(usize, &'a Section)>,
    pub bibliography: Vec<(usize, &'a Section)>,
}

/// Whether `title` names a bibliography section, using the configured
/// pattern or the default.
pub fn is_references_title(title: &str, config: &ParsingConfig) -> bool {
    config
        .references_title_re
        .as_ref()
        .unwrap_or(&*REFERENCES_TITLE_RE)
        .is_match(title)
}

/// Split sections into body and bibliography by title, preserving order.
pub fn partition_sections(sections: &[Section]) -> SectionPartition<'_> {
    partition_sections_with_config(sections, &ParsingConfig::default())
}

/// Config-aware version of [`partition_sections`].
pub fn partition_sections_with_config<'a>(
    sections: &'a [Section],
    config: &ParsingConfig,
) -> SectionPartition<'a> {
    let mut partition = SectionPartition::default();
    for (i, section) in sections.iter().enumerate() {
        if is_references_title(&section.title, config) {
            tracing::debug!(index = i, title = %section.title, "bibliography section");
            partition.bibliography.push((i, section));
        } else {
            partition.body.push((i, section));
        }
    }
    partition
}
