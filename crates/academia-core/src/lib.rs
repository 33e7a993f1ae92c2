use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub mod authors;
pub mod config_file;

pub use authors::{ET_AL, authors_match, authors_match_with_sentinel};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid reference pointer: {0:?}")]
    InvalidPointer(String),
}

/// A single person's name.
///
/// `last` is always non-empty. Single-token names (e.g. "Zhou") and the
/// "et al." sentinel carry only `last`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    pub last: String,
}

impl Name {
    /// A name with only a surname.
    pub fn surname(last: impl Into<String>) -> Self {
        Self {
            first: None,
            middle: None,
            last: last.into(),
        }
    }

    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: Some(first.into()),
            middle: None,
            last: last.into(),
        }
    }

    pub fn with_middle(mut self, middle: impl Into<String>) -> Self {
        self.middle = Some(middle.into());
        self
    }

    /// Whether this is the "et al." placeholder for the given sentinel spelling.
    pub fn is_sentinel(&self, sentinel: &str) -> bool {
        self.first.is_none() && self.middle.is_none() && self.last == sentinel
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            self.first.as_deref(),
            self.middle.as_deref(),
            Some(self.last.as_str()),
        ];
        let joined: Vec<&str> = parts.into_iter().flatten().collect();
        write!(f, "{}", joined.join(" "))
    }
}

/// An article as listed in a bibliography.
///
/// Authors may be truncated with the "et al." sentinel, the year may carry a
/// disambiguation suffix ("2015a") or be a range, and other fields may be
/// abbreviated. `year` and `title` are `None` when the entry didn't parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub authors: Vec<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Journal, conference or website; may be abbreviated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<(u32, u32)>,
    /// The original bibliography text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// How a citation is rendered in running text.
///
/// - Textual: Brown (2015)
/// - Parenthetical: (Brown 2015)
/// - Alternate: Brown 2015
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CiteStyle {
    #[default]
    Textual,
    Parenthetical,
    Alternate,
}

/// Where a cite was found: a pointer to the paragraph plus the byte span
/// of the match inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiteOrigin {
    pub pointer: String,
    pub offset: usize,
    pub length: usize,
}

impl CiteOrigin {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// An in-text author-year citation, before linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorYearCite {
    pub style: CiteStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<CiteOrigin>,
    /// The matched text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Usually only surnames, possibly ending in the "et al." sentinel.
    pub authors: Vec<Name>,
    /// Not necessarily numeric.
    pub year: String,
}

/// Index into a paper's `references`, serialized as `/references/{i}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferencePointer(pub usize);

impl ReferencePointer {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn resolve(self, references: &[Reference]) -> Option<&Reference> {
        references.get(self.0)
    }
}

impl fmt::Display for ReferencePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/references/{}", self.0)
    }
}

impl FromStr for ReferencePointer {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("/references/")
            .and_then(|i| i.parse().ok())
            .map(ReferencePointer)
            .ok_or_else(|| CoreError::InvalidPointer(s.to_string()))
    }
}

impl Serialize for ReferencePointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReferencePointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A cite that matched one or more references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedCite {
    #[serde(flatten)]
    pub cite: AuthorYearCite,
    pub references: Vec<ReferencePointer>,
}

impl LinkedCite {
    pub fn is_ambiguous(&self) -> bool {
        self.references.len() > 1
    }
}

/// A cite after linking.
///
/// Linking keeps every matching reference: a `Linked` cite with more than
/// one pointer is ambiguous and left for the caller to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cite {
    Linked(LinkedCite),
    Unlinked(AuthorYearCite),
}

impl Cite {
    pub fn cite(&self) -> &AuthorYearCite {
        match self {
            Cite::Linked(linked) => &linked.cite,
            Cite::Unlinked(cite) => cite,
        }
    }

    pub fn references(&self) -> &[ReferencePointer] {
        match self {
            Cite::Linked(linked) => &linked.references,
            Cite::Unlinked(_) => &[],
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, Cite::Linked(_))
    }

    /// The single linked reference, if exactly one matched.
    pub fn unique_reference(&self) -> Option<ReferencePointer> {
        match self.references() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// A flat unit of document structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Also called the header.
    pub title: String,
    pub paragraphs: Vec<String>,
}

/// Any kind of academic paper, preserving only section and paragraph
/// boundaries. Abstract, body sections and the bibliography all sit at the
/// same level in `sections`.
///
/// `references` and `cites` are derived by linking and absent before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Name>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cites: Option<Vec<Cite>>,
}

impl Paper {
    /// Resolve a cite's pointers against this paper's references.
    pub fn references_for<'a>(&'a self, cite: &'a Cite) -> impl Iterator<Item = &'a Reference> {
        let references = self.references.as_deref().unwrap_or(&[]);
        cite.references()
            .iter()
            .filter_map(move |pointer| pointer.resolve(references))
    }
}

/// Counts reported after linking a paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub references: usize,
    pub cites: usize,
    pub linked: usize,
    pub ambiguous: usize,
}

impl LinkStats {
    pub fn from_paper(paper: &Paper) -> Self {
        let cites = paper.cites.as_deref().unwrap_or(&[]);
        Self {
            references: paper.references.as_ref().map_or(0, Vec::len),
            cites: cites.len(),
            linked: cites.iter().filter(|c| c.is_linked()).count(),
            ambiguous: cites
                .iter()
                .filter(|c| matches!(c, Cite::Linked(l) if l.is_ambiguous()))
                .count(),
        }
    }

    /// Percentage of cites with at least one link, rounded to a whole number.
    pub fn linking_success(&self) -> Option<u32> {
        if self.cites == 0 {
            return None;
        }
        Some((100.0 * self.linked as f64 / self.cites as f64).round() as u32)
    }
}
