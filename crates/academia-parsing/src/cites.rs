use academia_core::{AuthorYearCite, CiteOrigin, CiteStyle};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::ParsingConfig;
use crate::names;

/// One capitalized word, optionally followed by a generation suffix.
const NAME: &str = r"[A-Z][^()\s]+(?: [IV]+)?";
/// Four digits, optionally a dash-joined range, optionally a letter suffix.
pub(crate) const YEAR: &str = r"[0-9]{4}(?:[-\u{2013}\u{2014}][0-9]{4})?[a-z]?";

/// The six author-year surface forms. Order matters: longer forms come
/// first so "Blei et al. (2003)" isn't cut down to a shorter match.
static CITE_RE: Lazy<Regex> = Lazy::new(|| {
    let sources = [
        // et al., duo and single, year in parentheses
        format!(r"{NAME}\s+et\s+al\.\s+\({YEAR}\)"),
        format!(r"{NAME}\s+(?:and|&)\s+{NAME}\s+\({YEAR}\)"),
        format!(r"{NAME}\s+\({YEAR}\)"),
        // et al., duo and single, year after a comma
        format!(r"{NAME}\s+et\s+al\.,\s+{YEAR}\b"),
        format!(r"{NAME}\s+(?:and|&)\s+{NAME},\s+{YEAR}\b"),
        format!(r"{NAME},\s+{YEAR}\b"),
    ];
    Regex::new(&sources.join("|")).unwrap()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(YEAR).unwrap());
static CLEAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"[(),]|{YEAR}")).unwrap());

/// Byte spans `(offset, length)` of all non-overlapping cites in `text`,
/// left to right. Each call starts a fresh scan.
pub fn cite_spans(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    CITE_RE.find_iter(text).map(|m| (m.start(), m.len()))
}

/// Find the author-year cites in one paragraph.
///
/// `pointer` locates the paragraph in the paper (e.g.
/// `/sections/2/paragraphs/0`) and is copied into each cite's origin.
/// Every cite is tagged [`CiteStyle::Textual`]; telling "(Brown 2015)" from
/// "Brown (2015)" needs the surrounding characters.
pub fn find_cites(text: &str, pointer: &str) -> Vec<AuthorYearCite> {
    find_cites_with_config(text, pointer, &ParsingConfig::default())
}

/// Config-aware version of [`find_cites`].
pub fn find_cites_with_config(
    text: &str,
    pointer: &str,
    config: &ParsingConfig,
) -> Vec<AuthorYearCite> {
    cite_spans(text)
        .map(|(offset, length)| {
            let source = &text[offset..offset + length];
            let year = YEAR_RE
                .find(source)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            // cut down to just the names: drop parentheses, commas and the year
            let names_text = CLEAN_RE.replace_all(source, "");
            let authors = names::parse_name_list_with_config(names_text.trim(), config);
            tracing::trace!(pointer, offset, source, "cite match");
            AuthorYearCite {
                style: CiteStyle::Textual,
                origin: Some(CiteOrigin {
                    pointer: pointer.to_string(),
                    offset,
                    length,
                }),
                source: Some(source.to_string()),
                authors,
                year,
            }
        })
        .collect()
}

/// Rewrite `text`, replacing every cite with `decorate(cite_text)`.
pub fn highlight_cites<F>(text: &str, mut decorate: F) -> String
where
    F: FnMut(&str) -> String,
{
    CITE_RE
        .replace_all(text, |caps: &Captures| decorate(&caps[0]))
        .into_owned()
}
