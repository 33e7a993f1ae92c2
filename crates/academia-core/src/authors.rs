use crate::Name;

/// Surname used for the placeholder that "et al." parses into.
///
/// Older bibliographies tokenized this as "al."; callers that need that
/// spelling pass it to [`authors_match_with_sentinel`].
pub const ET_AL: &str = "et al.";

/// Decide whether a cite's author list refers to a reference's author list.
///
/// In-text cites usually carry only surnames while bibliography entries
/// carry full names or initials, so only `last` is compared, position by
/// position.
///
/// The "et al." sentinel matches if and only if the reference has at least
/// one more author beyond the sentinel's position: it cannot stand in for
/// zero further authors, so `[Blei, et al.]` matches `[Blei, Ng, Jordan]`
/// but not `[Blei, Ng]`.
pub fn authors_match(cite_authors: &[Name], reference_authors: &[Name]) -> bool {
    authors_match_with_sentinel(cite_authors, reference_authors, ET_AL)
}

/// [`authors_match`] with an explicit "et al." sentinel spelling.
pub fn authors_match_with_sentinel(
    cite_authors: &[Name],
    reference_authors: &[Name],
    sentinel: &str,
) -> bool {
    let len = cite_authors.len().max(reference_authors.len());
    for i in 0..len {
        let cite_author = cite_authors.get(i);
        // et al. has to be checked before the plain surname comparison
        if cite_author.is_some_and(|a| a.last == sentinel) && reference_authors.len() > i + 1 {
            return true;
        }
        match (cite_author, reference_authors.get(i)) {
            (Some(c), Some(r)) if c.last == r.last => {}
            _ => return false,
        }
    }
    true
}
