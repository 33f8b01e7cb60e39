//! Route template parsing.
//!
//! # Responsibilities
//! - Expand trailing optional groups into concrete routes
//! - Split each route into literal and placeholder tokens
//! - Apply placeholder sugar to placeholder patterns
//!
//! # Grammar
//! ```text
//! template    := body ("[" body)* "]"*        (brackets only as a trailing suffix)
//! placeholder := "{" ws* NAME ws* (":" ws* PATTERN)? "}"
//! NAME        := [a-zA-Z_][a-zA-Z0-9_-]*
//! PATTERN     := any text with balanced "{" "}"
//! ```
//!
//! # Design Decisions
//! - Placeholders are recognised before brackets, so `{id:[0-9]+}` never
//!   opens an optional group
//! - Nested braces in patterns are handled with a depth counter, so
//!   `{n:\d{1,3}}` works without a recursive regex
//! - A `{` that does not open a valid placeholder is plain text

use crate::routing::error::RouteError;
use crate::routing::sugar::SugarTable;
use crate::routing::token::{Token, TokenSequence};

/// A placeholder located in a route string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder<'a> {
    /// Byte offset of the opening `{`.
    start: usize,
    /// Byte offset just past the closing `}`.
    end: usize,
    name: &'a str,
    /// Trimmed pattern text, `None` when there was no `:` part.
    pattern: Option<&'a str>,
}

/// Parses route templates into token sequences.
#[derive(Debug, Clone, Default)]
pub struct PatternParser {
    sugar: SugarTable,
}

impl PatternParser {
    /// Create a parser with the default sugar table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit sugar table.
    pub fn with_sugar(sugar: SugarTable) -> Self {
        Self { sugar }
    }

    pub fn sugar(&self) -> &SugarTable {
        &self.sugar
    }

    /// Parse a template into one token sequence per optional expansion.
    ///
    /// `/user/{id}[/{name}]` yields `/user/{id}` and `/user/{id}/{name}`.
    pub fn parse(&self, template: &str) -> Result<Vec<TokenSequence>, RouteError> {
        let without_closing = template.trim_end_matches(']');
        let option_count = template.len() - without_closing.len();

        if contains_outside_placeholders(without_closing, b']') {
            return Err(RouteError::bad_pattern(
                "Optional segments can only occur at the end of a route",
                template,
            ));
        }

        let segments = split_outside_placeholders(without_closing, b'[');
        if segments.len() - 1 != option_count {
            return Err(RouteError::bad_pattern(
                "Number of opening '[' and closing ']' does not match",
                template,
            ));
        }

        let mut current = String::with_capacity(without_closing.len());
        let mut routes = Vec::with_capacity(segments.len());
        for (n, segment) in segments.iter().enumerate() {
            if segment.is_empty() && n != 0 {
                return Err(RouteError::bad_pattern("Empty optional part", template));
            }
            current.push_str(segment);
            routes.push(self.parse_placeholders(&current));
        }

        Ok(routes)
    }

    /// Tokenize a single route that contains no optional groups.
    pub fn parse_placeholders(&self, route: &str) -> TokenSequence {
        let placeholders = find_placeholders(route);
        if placeholders.is_empty() {
            return vec![Token::literal(route)];
        }

        let mut tokens = Vec::with_capacity(placeholders.len() * 2 + 1);
        let mut offset = 0;
        for ph in placeholders {
            if ph.start > offset {
                tokens.push(Token::literal(&route[offset..ph.start]));
            }
            tokens.push(Token::variable(ph.name, self.sugar.resolve(ph.pattern)));
            offset = ph.end;
        }
        if offset < route.len() {
            tokens.push(Token::literal(&route[offset..]));
        }
        tokens
    }
}

/// Scan all placeholders, left to right, without overlap.
fn find_placeholders(route: &str) -> Vec<Placeholder<'_>> {
    let bytes = route.as_bytes();
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] == b'{' {
            if let Some(ph) = scan_placeholder(route, pos) {
                pos = ph.end;
                found.push(ph);
                continue;
            }
        }
        pos += 1;
    }
    found
}

/// Split on `delim`, ignoring occurrences inside placeholders.
fn split_outside_placeholders(route: &str, delim: u8) -> Vec<&str> {
    let bytes = route.as_bytes();
    let mut parts = Vec::new();
    let mut seg_start = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => {
                if let Some(ph) = scan_placeholder(route, pos) {
                    pos = ph.end;
                    continue;
                }
            }
            b if b == delim => {
                parts.push(&route[seg_start..pos]);
                seg_start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }
    parts.push(&route[seg_start..]);
    parts
}

fn contains_outside_placeholders(route: &str, needle: u8) -> bool {
    split_outside_placeholders(route, needle).len() > 1
}

/// Try to read a placeholder whose `{` sits at byte offset `start`.
fn scan_placeholder(route: &str, start: usize) -> Option<Placeholder<'_>> {
    let bytes = route.as_bytes();
    debug_assert_eq!(bytes.get(start), Some(&b'{'));

    let mut pos = skip_whitespace(bytes, start + 1);

    let name_start = pos;
    match bytes.get(pos) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => pos += 1,
        _ => return None,
    }
    while let Some(b) = bytes.get(pos) {
        if b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-' {
            pos += 1;
        } else {
            break;
        }
    }
    let name = &route[name_start..pos];

    pos = skip_whitespace(bytes, pos);
    match *bytes.get(pos)? {
        b'}' => Some(Placeholder {
            start,
            end: pos + 1,
            name,
            pattern: None,
        }),
        b':' => {
            let pattern_start = pos + 1;
            let mut depth = 0usize;
            let mut cursor = pattern_start;
            while let Some(&b) = bytes.get(cursor) {
                match b {
                    b'{' => depth += 1,
                    b'}' if depth == 0 => {
                        return Some(Placeholder {
                            start,
                            end: cursor + 1,
                            name,
                            pattern: Some(route[pattern_start..cursor].trim()),
                        });
                    }
                    b'}' => depth -= 1,
                    _ => {}
                }
                cursor += 1;
            }
            None
        }
        _ => None,
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}
