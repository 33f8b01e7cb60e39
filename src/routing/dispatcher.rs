//! Request dispatch against a compiled table.
//!
//! # Matching Order
//! ```text
//! 1. static[method][path]                     exact lookup
//! 2. dynamic[method] in registration order    first anchored match wins
//! 3. HEAD only: repeat 1-2 against GET
//! 4. want_allowed_methods: collect other methods that would match
//!        → MethodNotAllowed(allowed, fallback)
//! 5. NotFound(fallback)
//! ```
//!
//! # Design Decisions
//! - No specificity ranking: overlapping patterns resolve by registration order
//! - NotFound and MethodNotAllowed are outcomes, not errors
//! - The table is only borrowed, never mutated

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::observability::metrics;
use crate::routing::matcher::Params;
use crate::routing::table::{CompiledTable, DynamicRoute};

/// Result of resolving a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<'a, H> {
    /// A route matched.
    Found { handler: &'a H, params: Params },
    /// The path exists under other methods only.
    MethodNotAllowed {
        allowed: Vec<String>,
        fallback: Option<&'a H>,
    },
    /// Nothing matched.
    NotFound { fallback: Option<&'a H> },
}

impl<'a, H> Outcome<'a, H> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found { .. })
    }

    /// The matched handler, or the fallback handler for misses.
    pub fn handler(&self) -> Option<&'a H> {
        match self {
            Outcome::Found { handler, .. } => Some(*handler),
            Outcome::MethodNotAllowed { fallback, .. } | Outcome::NotFound { fallback } => {
                *fallback
            }
        }
    }

    /// Extracted parameters; `None` for anything but `Found`.
    pub fn params(&self) -> Option<&Params> {
        match self {
            Outcome::Found { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Found { .. } => "found",
            Outcome::MethodNotAllowed { .. } => "method_not_allowed",
            Outcome::NotFound { .. } => "not_found",
        }
    }
}

/// Stateless request matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `method` + `path` against `table`.
    ///
    /// The method is compared upper-cased.
    pub fn dispatch<'a, H>(
        &self,
        table: &'a CompiledTable<H>,
        method: &str,
        path: &str,
        want_allowed_methods: bool,
    ) -> Outcome<'a, H> {
        let method = method.to_ascii_uppercase();
        let outcome = self.resolve(table, &method, path, want_allowed_methods);

        tracing::trace!(
            method = %method,
            path = %path,
            outcome = outcome.label(),
            "Dispatched request"
        );
        metrics::record_dispatch(outcome.label());
        outcome
    }

    fn resolve<'a, H>(
        &self,
        table: &'a CompiledTable<H>,
        method: &str,
        path: &str,
        want_allowed_methods: bool,
    ) -> Outcome<'a, H> {
        if let Some(found) = match_method(table, method, path) {
            return found;
        }

        if method == "HEAD" {
            if let Some(found) = match_method(table, "GET", path) {
                return found;
            }
        }

        let fallback = table.fallback(method);

        if want_allowed_methods {
            let allowed = allowed_methods(table, method, path);
            if !allowed.is_empty() {
                return Outcome::MethodNotAllowed {
                    allowed: allowed.into_iter().collect(),
                    fallback,
                };
            }
        }

        Outcome::NotFound { fallback }
    }
}

/// Static then dynamic lookup within a single method bucket.
fn match_method<'a, H>(table: &'a CompiledTable<H>, method: &str, path: &str) -> Option<Outcome<'a, H>> {
    if let Some(handler) = table.static_routes().get(method).and_then(|m| m.get(path)) {
        return Some(Outcome::Found {
            handler,
            params: Params::new(),
        });
    }

    table
        .dynamic_routes()
        .get(method)
        .and_then(|routes| match_dynamic(routes, path))
}

fn match_dynamic<'a, H>(
    routes: &'a IndexMap<String, DynamicRoute<H>>,
    path: &str,
) -> Option<Outcome<'a, H>> {
    routes.values().find_map(|route| {
        route.matcher.captures(path).map(|params| Outcome::Found {
            handler: &route.handler,
            params,
        })
    })
}

/// Methods other than `method` that have a route for `path`, first-seen order.
fn allowed_methods<H>(table: &CompiledTable<H>, method: &str, path: &str) -> IndexSet<String> {
    let mut allowed = IndexSet::new();

    for (other, routes) in table.static_routes() {
        if other != method && routes.contains_key(path) {
            allowed.insert(other.clone());
        }
    }

    for (other, routes) in table.dynamic_routes() {
        if other != method && routes.values().any(|r| r.matcher.matches(path)) {
            allowed.insert(other.clone());
        }
    }

    allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::compiler::RouteCompiler;
    use crate::routing::parser::PatternParser;
    use crate::routing::table::Fallbacks;

    fn build(routes: &[(&str, &str, &str)], fallbacks: &[(&str, &str)]) -> CompiledTable<String> {
        let parser = PatternParser::new();
        let mut compiler = RouteCompiler::new();
        for (method, template, handler) in routes {
            for tokens in parser.parse(template).unwrap() {
                compiler
                    .add_route(method, &tokens, handler.to_string())
                    .unwrap();
            }
        }
        let fallbacks: Fallbacks<String> = fallbacks
            .iter()
            .map(|(m, h)| (m.to_string(), h.to_string()))
            .collect();
        compiler.into_table(fallbacks)
    }

    #[test]
    fn test_static_found() {
        let table = build(&[("GET", "/get", "get")], &[]);
        let outcome = Dispatcher::new().dispatch(&table, "GET", "/get", false);
        assert_eq!(
            outcome,
            Outcome::Found {
                handler: &"get".to_string(),
                params: Params::new()
            }
        );
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let table = build(&[("GET", "/get", "get")], &[]);
        assert!(Dispatcher::new().dispatch(&table, "get", "/get", false).is_found());
    }

    #[test]
    fn test_dynamic_params() {
        let table = build(&[("GET", r"/user/{id:\d+}", "user")], &[]);
        let outcome = table.dispatch("GET", "/user/42", false);
        assert_eq!(outcome.handler().map(String::as_str), Some("user"));
        assert_eq!(outcome.params().unwrap()["id"], "42");

        assert_eq!(
            table.dispatch("GET", "/user/abc", false),
            Outcome::NotFound { fallback: None }
        );
    }

    #[test]
    fn test_static_wins_over_dynamic() {
        let table = build(
            &[("GET", "/user/{name}", "dynamic"), ("GET", "/user/me", "static")],
            &[],
        );
        let outcome = table.dispatch("GET", "/user/me", false);
        assert_eq!(outcome.handler().map(String::as_str), Some("static"));
    }

    #[test]
    fn test_first_registered_dynamic_wins() {
        let table = build(
            &[("GET", "/p/{any}", "loose"), ("GET", r"/p/{n:\d+}", "strict")],
            &[],
        );
        let outcome = table.dispatch("GET", "/p/12", false);
        assert_eq!(outcome.handler().map(String::as_str), Some("loose"));
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let table = build(&[("GET", "/head", "get"), ("GET", "/d/{x}", "dyn")], &[]);
        assert_eq!(
            table.dispatch("HEAD", "/head", false).handler().map(String::as_str),
            Some("get")
        );
        assert_eq!(
            table.dispatch("HEAD", "/d/1", false).handler().map(String::as_str),
            Some("dyn")
        );
        assert!(!table.dispatch("POST", "/head", false).is_found());
    }

    #[test]
    fn test_head_route_preferred_over_get() {
        let table = build(&[("GET", "/x", "get"), ("HEAD", "/x", "head")], &[]);
        assert_eq!(
            table.dispatch("HEAD", "/x", false).handler().map(String::as_str),
            Some("head")
        );
    }

    #[test]
    fn test_method_not_allowed() {
        let table = build(
            &[
                ("GET", "/x", "get"),
                ("POST", "/x", "post"),
                ("PUT", "/{any}", "put"),
            ],
            &[("DELETE", "err")],
        );
        let outcome = table.dispatch("DELETE", "/x", true);
        assert_eq!(
            outcome,
            Outcome::MethodNotAllowed {
                allowed: vec!["GET".into(), "POST".into(), "PUT".into()],
                fallback: Some(&"err".to_string()),
            }
        );

        // Without the flag the same request is a plain miss
        assert_eq!(
            table.dispatch("DELETE", "/x", false),
            Outcome::NotFound {
                fallback: Some(&"err".to_string())
            }
        );
    }

    #[test]
    fn test_allowed_methods_deduplicated() {
        let table = build(
            &[("GET", "/x", "a"), ("GET", "/{y}", "b"), ("POST", "/{y}", "c")],
            &[],
        );
        match table.dispatch("PATCH", "/x", true) {
            Outcome::MethodNotAllowed { allowed, fallback } => {
                assert_eq!(allowed, vec!["GET".to_string(), "POST".to_string()]);
                assert!(fallback.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_uses_method_fallback() {
        let table = build(&[("GET", "/a", "a")], &[("GET", "404"), ("POST", "post404")]);
        assert_eq!(
            table.dispatch("POST", "/missing", true),
            Outcome::NotFound {
                fallback: Some(&"post404".to_string())
            }
        );
        assert_eq!(table.dispatch("PUT", "/missing", false).handler(), None);
    }

    #[test]
    fn test_outcome_serializes() {
        let table = build(&[("GET", "/u/{id}", "user")], &[]);
        let json = serde_json::to_value(table.dispatch("GET", "/u/5", false)).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["handler"], "user");
        assert_eq!(json["params"]["id"], "5");
    }
}
