//! Dynamic route matching.
//!
//! # Responsibilities
//! - Assemble an anchored regex from a token sequence
//! - Match a request path against it (full-string match only)
//! - Extract named captures into route parameters
//!
//! # Design Decisions
//! - Literal text is regex-escaped verbatim
//! - Each placeholder becomes `(?P<name>pattern)`
//! - Only named groups are reported; numbered groups are dropped

use indexmap::IndexMap;
use regex::Regex;

use crate::routing::error::RouteError;
use crate::routing::token::Token;

/// Parameters extracted from a matched path, in group order.
pub type Params = IndexMap<String, String>;

/// A compiled dynamic route pattern.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    regex: Regex,
    variables: Vec<String>,
}

impl RouteMatcher {
    /// Build the anchored regex for a token sequence.
    ///
    /// Fails on repeated placeholder names or when the regex does not compile.
    pub fn from_tokens(tokens: &[Token]) -> Result<Self, RouteError> {
        let mut source = String::from("^");
        let mut variables: Vec<String> = Vec::new();

        for token in tokens {
            match token {
                Token::Literal(text) => source.push_str(&regex::escape(text)),
                Token::Variable { name, pattern } => {
                    if variables.iter().any(|v| v == name) {
                        return Err(RouteError::DuplicateVariable {
                            name: name.clone(),
                            route: describe(tokens),
                        });
                    }
                    variables.push(name.clone());
                    source.push_str(&format!("(?P<{name}>{pattern})"));
                }
            }
        }
        source.push('$');

        let matcher = Self::from_source(&source)?;
        Ok(Self {
            variables,
            ..matcher
        })
    }

    /// Recompile a matcher from a previously produced regex source.
    pub fn from_source(source: &str) -> Result<Self, RouteError> {
        let regex = Regex::new(source).map_err(|source_err| RouteError::InvalidRegex {
            regex: source.to_string(),
            source: source_err,
        })?;
        let variables = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();
        Ok(Self { regex, variables })
    }

    /// The regex source, used as the table key.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Placeholder names declared by the route.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns true if the whole path matches.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match the path and collect every named group that participated.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let params = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_string(), m.as_str().to_string()))
            })
            .collect();
        Some(params)
    }
}

/// Render tokens back into template form for error messages.
fn describe(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Token::Literal(text) => text.clone(),
            Token::Variable { name, pattern } => format!("{{{name}:{pattern}}}"),
        })
        .collect()
}
