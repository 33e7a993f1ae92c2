use academia_core::{ET_AL, Reference};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cites::YEAR;
use crate::config::ParsingConfig;
use crate::names;

/// `Authors[.,] (Year). Title.` with the year's parentheses optional.
static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(.+?)[.,]?\s*\(?({YEAR})\)?\.\s*(.+?)\.")).unwrap());

/// Parse one bibliography entry into a [`Reference`].
///
/// Entries that don't fit the pattern still produce a `Reference`, with no
/// authors and no year or title; the raw text is always kept in `source`.
pub fn parse_reference(text: &str) -> Reference {
    parse_reference_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`parse_reference`].
pub fn parse_reference_with_config(text: &str, config: &ParsingConfig) -> Reference {
    let Some(caps) = REFERENCE_RE.captures(text) else {
        tracing::debug!(entry = text, "bibliography entry did not match reference pattern");
        return Reference {
            source: Some(text.to_string()),
            ..Default::default()
        };
    };

    Reference {
        authors: names::parse_name_list_with_config(&caps[1], config),
        year: Some(caps[2].to_string()),
        title: Some(caps[3].to_string()),
        source: Some(text.to_string()),
        ..Default::default()
    }
}

/// Format a [`Reference`] as a bibliography line.
///
/// Authors, year, title, venue, publisher and pages are joined with ". "
/// and terminated with a period; absent fields are left out. Lossy: the
/// result preserves surnames, year and title but not the original
/// punctuation.
pub fn format_reference(reference: &Reference) -> String {
    format_reference_with_sentinel(reference, ET_AL)
}

/// [`format_reference`] with an explicit "et al." sentinel spelling.
pub fn format_reference_with_sentinel(reference: &Reference, sentinel: &str) -> String {
    let authors = names::format_names(&reference.authors, sentinel);
    let pages = reference
        .pages
        .map(|(start, end)| format!("{start}-{end}"));

    let parts = [
        Some(authors).filter(|a| !a.is_empty()),
        reference.year.clone(),
        reference.title.clone(),
        reference.venue.clone(),
        reference.publisher.clone(),
        pages,
    ];
    let parts: Vec<String> = parts.into_iter().flatten().collect();
    format!("{}.", parts.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use academia_core::Name;

    #[test]
    fn test_acl_style_entry() {
        let reference = parse_reference(
            "David M. Blei, Andrew Y. Ng, and Michael I. Jordan. 2003. Latent dirichlet allocation. JMLR.",
        );
        assert_eq!(
            reference.authors,
            vec![
                Name::new("David", "Blei").with_middle("M."),
                Name::new("Andrew", "Ng").with_middle("Y."),
                Name::new("Michael", "Jordan").with_middle("I."),
            ]
        );
        assert_eq!(reference.year.as_deref(), Some("2003"));
        assert_eq!(reference.title.as_deref(), Some("Latent dirichlet allocation"));
    }

    #[test]
    fn test_last_first_with_parenthesized_year() {
        let reference = parse_reference(
            "Levy, R., & Daumé III, H. (2011). Computational methods are invaluable. In Proc. ACL.",
        );
        assert_eq!(
            reference.authors,
            vec![Name::new("R.", "Levy"), Name::new("H", "Daumé III")]
        );
        assert_eq!(reference.year.as_deref(), Some("2011"));
        assert_eq!(
            reference.title.as_deref(),
            Some("Computational methods are invaluable")
        );
    }

    #[test]
    fn test_year_suffix() {
        let reference = parse_reference("Smith, J. 2020b. Another Title. Venue.");
        assert_eq!(reference.year.as_deref(), Some("2020b"));
        assert_eq!(reference.authors, vec![Name::new("J", "Smith")]);
    }

    #[test]
    fn test_unparseable_entry_degrades() {
        let text = "Proceedings of some workshop, no year given";
        let reference = parse_reference(text);
        assert!(reference.authors.is_empty());
        assert!(reference.year.is_none());
        assert!(reference.title.is_none());
        assert_eq!(reference.source.as_deref(), Some(text));
    }

    #[test]
    fn test_source_is_verbatim() {
        let text = "Smith, J. 2020. A Paper Title.";
        assert_eq!(parse_reference(text).source.as_deref(), Some(text));
    }

    #[test]
    fn test_format_reference_all_fields() {
        let reference = Reference {
            authors: vec![Name::new("Mona", "Diab"), Name::new("Ankit", "Kamboj")],
            year: Some("2010".to_string()),
            title: Some("A Title".to_string()),
            venue: Some("ACL".to_string()),
            publisher: Some("ACL Anthology".to_string()),
            pages: Some((10, 20)),
            source: None,
        };
        assert_eq!(
            format_reference(&reference),
            "Mona Diab and Ankit Kamboj. 2010. A Title. ACL. ACL Anthology. 10-20."
        );
    }

    #[test]
    fn test_format_reference_skips_absent_fields() {
        let reference = Reference {
            authors: vec![Name::surname("Zhou")],
            title: Some("Untitled".to_string()),
            ..Default::default()
        };
        assert_eq!(format_reference(&reference), "Zhou. Untitled.");
    }

    #[test]
    fn test_format_parse_preserves_key_fields() {
        let text = "Liu, F., Tian, F., & Zhu, Q. (2015). Parsing with swaps. Journal.";
        let formatted = format_reference(&parse_reference(text));
        for needle in ["Liu", "Tian", "Zhu", "2015", "Parsing with swaps"] {
            assert!(formatted.contains(needle), "{needle} missing from {formatted}");
        }
    }
}
