use academia_core::Name;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{NameListStrategy, ParsingConfig};

/// Build a [`Name`] from whitespace-delimited parts by position.
///
/// ```text
/// ["Zhou"]                   -> { last: "Zhou" }
/// ["Chris", "Callison-Burch"] -> { first: "Chris", last: "Callison-Burch" }
/// ["Hanna", "M", "Wallach"]   -> { first: "Hanna", middle: "M", last: "Wallach" }
/// ```
///
/// Returns `None` for an empty slice, since a name needs a surname.
pub fn name_from_parts(parts: &[&str]) -> Option<Name> {
    match parts {
        [] => None,
        [last] => Some(Name::surname(*last)),
        [first, last] => Some(Name::new(*first, *last)),
        [first, middle @ .., last] => {
            Some(Name::new(*first, *last).with_middle(middle.join(" ")))
        }
    }
}

/// Parse a free-text list of names.
///
/// ```text
/// "David Mimno, Hanna M Wallach, and Andrew McCallum"
///     -> [David Mimno, Hanna M Wallach, Andrew McCallum]
/// "Aravind K. Joshi, Ben King and Steven Abney"
///     -> [Aravind K. Joshi, Ben King, Steven Abney]
/// "Levy, R., & Daumé III, H."  -> [R. Levy, H. Daumé III]
/// "Zhao et al."                -> [Zhao, et al.]
/// ```
pub fn parse_name_list(input: &str) -> Vec<Name> {
    parse_name_list_with_config(input, &ParsingConfig::default())
}

/// Config-aware version of [`parse_name_list`].
pub fn parse_name_list_with_config(input: &str, config: &ParsingConfig) -> Vec<Name> {
    match config.name_list_strategy {
        NameListStrategy::Scanner => scan_names(input, &config.et_al),
        NameListStrategy::Split => split_names(input, &config.et_al),
    }
}

/// A lexical unit of an author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Name(&'a str),
    Initial(&'a str),
    Separator,
    Conjunction,
    EtAl,
}

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^,\s+").unwrap());
static ET_AL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^et\s+al\b\.?").unwrap());
static CONJUNCTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:(?:and|et)\b|&)").unwrap());
static INITIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z](?:\.|\s|$)").unwrap());
// Particle and surname are case-insensitive; the generation suffix isn't,
// and needs two or more numerals so "Michael I Jordan" keeps its initial.
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:(?:(?:van|von|da|de)\s+)?[A-Z][^,\s]+)(?:\s+[IVX]{2,}\b)?").unwrap()
});
static CATCH_ALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^,\s]+").unwrap());

/// Tokenizer over an author list. Characters no rule accepts are skipped.
pub(crate) struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let rest = &self.input[self.pos..];
            if rest.is_empty() {
                return None;
            }
            if let Some(m) = WHITESPACE_RE.find(rest) {
                self.pos += m.end();
                continue;
            }
            if let Some(m) = SEPARATOR_RE.find(rest) {
                self.pos += m.end();
                return Some(Token::Separator);
            }
            if let Some(m) = ET_AL_RE.find(rest) {
                self.pos += m.end();
                return Some(Token::EtAl);
            }
            if let Some(m) = CONJUNCTION_RE.find(rest) {
                self.pos += m.end();
                return Some(Token::Conjunction);
            }
            if let Some(m) = INITIAL_RE.find(rest) {
                self.pos += m.end();
                return Some(Token::Initial(m.as_str().trim()));
            }
            if let Some(m) = NAME_RE.find(rest).or_else(|| CATCH_ALL_RE.find(rest)) {
                self.pos += m.end();
                return Some(Token::Name(m.as_str()));
            }
            // a lone comma or other stray punctuation
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            self.pos += skip;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Buffer is empty.
    Empty,
    /// One token buffered, no separator seen yet.
    OnePending,
    /// Two or more tokens buffered.
    Accumulating,
    /// A separator followed a single buffered token: the buffer may hold
    /// "Last, First" and is rotated when flushed.
    SwapPending,
}

struct NameScanner<'a> {
    names: Vec<Name>,
    buffer: Vec<&'a str>,
    state: ScanState,
    sentinel: &'a str,
}

impl<'a> NameScanner<'a> {
    fn new(sentinel: &'a str) -> Self {
        Self {
            names: Vec::new(),
            buffer: Vec::new(),
            state: ScanState::Empty,
            sentinel,
        }
    }

    fn push(&mut self, part: &'a str) {
        self.buffer.push(part);
        if self.state != ScanState::SwapPending {
            self.state = if self.buffer.len() == 1 {
                ScanState::OnePending
            } else {
                ScanState::Accumulating
            };
        }
    }

    fn flush(&mut self) {
        if self.state == ScanState::SwapPending {
            // "Levy, R." -> "R. Levy"
            self.buffer.rotate_left(1);
        }
        if let Some(name) = name_from_parts(&self.buffer) {
            self.names.push(name);
        }
        self.buffer.clear();
        self.state = ScanState::Empty;
    }

    fn feed(&mut self, token: Token<'a>) {
        match token {
            Token::Name(part) => {
                // the first full name after a "Last, Initial" pair starts a new person
                if self.state == ScanState::SwapPending {
                    self.flush();
                }
                self.push(part);
            }
            Token::Initial(part) => self.push(part),
            Token::Separator | Token::Conjunction => match self.state {
                ScanState::Empty => {}
                ScanState::OnePending => self.state = ScanState::SwapPending,
                ScanState::Accumulating => self.flush(),
                ScanState::SwapPending => {
                    if self.buffer.len() > 1 {
                        self.flush();
                    }
                }
            },
            Token::EtAl => {
                if self.state != ScanState::Empty {
                    self.flush();
                }
                self.names.push(Name::surname(self.sentinel));
            }
        }
    }

    fn finish(mut self) -> Vec<Name> {
        if self.state != ScanState::Empty {
            self.flush();
        }
        self.names
    }
}

fn scan_names(input: &str, sentinel: &str) -> Vec<Name> {
    let tokens: Vec<Token<'_>> = Tokens::new(input).collect();

    // "Liu, Tian" is either one person or two surnames; read it as one
    // person written last-name-first.
    if let [Token::Name(last), Token::Separator, Token::Name(first)] = tokens.as_slice() {
        return vec![Name::new(*first, *last)];
    }

    let mut scanner = NameScanner::new(sentinel);
    for token in tokens {
        scanner.feed(token);
    }
    scanner.finish()
}

static TRAILING_ET_AL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:,\s*|\s+)et\s+al\b\.?\s*$").unwrap());
static LIST_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s+and\s+|,\s+&\s+|\s+and\s+|\s+&\s+|,\s+").unwrap());

/// Split an author list into per-person strings on list separators,
/// longest separator first. A trailing "et al." is dropped; see
/// [`split_names`] for how it is represented.
pub fn split_name_list(input: &str) -> Vec<String> {
    let input = TRAILING_ET_AL_RE.replace(input.trim(), "");
    LIST_SPLIT_RE
        .split(&input)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

/// Legacy parsing: split the list, then parse each chunk by part count.
/// Handles list separation but not "Last, First" swaps.
fn split_names(input: &str, sentinel: &str) -> Vec<Name> {
    let mut names: Vec<Name> = split_name_list(input)
        .iter()
        .filter_map(|chunk| {
            let parts: Vec<&str> = chunk.split_whitespace().collect();
            name_from_parts(&parts)
        })
        .collect();
    if TRAILING_ET_AL_RE.is_match(input.trim()) {
        names.push(Name::surname(sentinel));
    }
    names
}

/// Format a list of names for display.
///
/// ```text
/// [A]        -> "A"
/// [A, B]     -> "A and B"
/// [A, B, C]  -> "A, B, and C"
/// [A, et al.] -> "A et al."
/// ```
pub fn format_names(names: &[Name], sentinel: &str) -> String {
    let (names, truncated) = match names.split_last() {
        Some((last, rest)) if last.is_sentinel(sentinel) => (rest, true),
        _ => (names, false),
    };
    let formatted: Vec<String> = names.iter().map(Name::to_string).collect();
    let list = match formatted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    };
    match (truncated, list.is_empty()) {
        (true, true) => sentinel.to_string(),
        (true, false) => format!("{list} {sentinel}"),
        (false, _) => list,
    }
}
