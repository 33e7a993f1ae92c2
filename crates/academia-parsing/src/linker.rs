use academia_core::{
    AuthorYearCite, Cite, LinkedCite, Paper, Reference, ReferencePointer,
    authors_match_with_sentinel,
};

use crate::config::ParsingConfig;
use crate::{cites, reference, section};

/// A configurable citation-reference linking pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`PaperLinker::with_config`] to supply a custom bibliography title
/// pattern, "et al." sentinel or name-list strategy.
#[derive(Debug, Clone, Default)]
pub struct PaperLinker {
    config: ParsingConfig,
}

impl PaperLinker {
    /// Create a linker with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a linker with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Parse every paragraph of every bibliography section, in order (step 1).
    pub fn parse_references(&self, paper: &Paper) -> Vec<Reference> {
        section::partition_sections_with_config(&paper.sections, &self.config)
            .bibliography
            .into_iter()
            .flat_map(|(_, s)| s.paragraphs.iter())
            .map(|p| reference::parse_reference_with_config(p, &self.config))
            .collect()
    }

    /// Find the cites in every body paragraph, in document order (step 2).
    pub fn find_cites(&self, paper: &Paper) -> Vec<AuthorYearCite> {
        let partition = section::partition_sections_with_config(&paper.sections, &self.config);
        let mut found = Vec::new();
        for (section_i, section) in partition.body {
            for (paragraph_i, paragraph) in section.paragraphs.iter().enumerate() {
                let pointer = format!("/sections/{section_i}/paragraphs/{paragraph_i}");
                found.extend(cites::find_cites_with_config(
                    paragraph,
                    &pointer,
                    &self.config,
                ));
            }
        }
        found
    }

    /// Attach every matching reference to each cite (step 3).
    pub fn link_cites(&self, found: Vec<AuthorYearCite>, references: &[Reference]) -> Vec<Cite> {
        found
            .into_iter()
            .map(|cite| {
                let matches: Vec<ReferencePointer> = references
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| self.cite_matches(&cite, r))
                    .map(|(i, _)| ReferencePointer(i))
                    .collect();
                if matches.is_empty() {
                    Cite::Unlinked(cite)
                } else {
                    if matches.len() > 1 {
                        tracing::debug!(
                            source = cite.source.as_deref().unwrap_or_default(),
                            candidates = matches.len(),
                            "ambiguous cite"
                        );
                    }
                    Cite::Linked(LinkedCite {
                        cite,
                        references: matches,
                    })
                }
            })
            .collect()
    }

    /// Run the full pipeline, returning a copy of `paper` with `references`
    /// and `cites` filled in. Sections and metadata are carried over as-is.
    pub fn link_paper(&self, paper: &Paper) -> Paper {
        let references = self.parse_references(paper);
        let linked = self.link_cites(self.find_cites(paper), &references);

        tracing::debug!(
            references = references.len(),
            cites = linked.len(),
            linked = linked.iter().filter(|c| c.is_linked()).count(),
            "linked paper"
        );

        Paper {
            title: paper.title.clone(),
            authors: paper.authors.clone(),
            year: paper.year,
            sections: paper.sections.clone(),
            references: Some(references),
            cites: Some(linked),
        }
    }

    /// Authors match by surname ("et al." aware) and the year strings are
    /// identical, so "2015" and "2015a" are different years.
    fn cite_matches(&self, cite: &AuthorYearCite, reference: &Reference) -> bool {
        reference.year.as_deref() == Some(cite.year.as_str())
            && authors_match_with_sentinel(&cite.authors, &reference.authors, &self.config.et_al)
    }
}

/// Link a paper with the default configuration.
pub fn link_paper(paper: &Paper) -> Paper {
    PaperLinker::new().link_paper(paper)
}

/// Link cites to references with the default configuration.
pub fn link_cites(found: Vec<AuthorYearCite>, references: &[Reference]) -> Vec<Cite> {
    PaperLinker::new().link_cites(found, references)
}
