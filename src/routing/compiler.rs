//! Route compilation.
//!
//! # Responsibilities
//! - Classify token sequences as static or dynamic
//! - Build anchored regexes for dynamic routes
//! - Accumulate method → pattern → handler maps for both classes
//!
//! # Design Decisions
//! - A sequence is static only when it is a single literal token
//! - Identical keys overwrite silently and keep their original position
//! - Dynamic order is registration order, which is match priority

use indexmap::IndexMap;

use crate::observability::metrics;
use crate::routing::error::RouteError;
use crate::routing::matcher::RouteMatcher;
use crate::routing::table::{CompiledTable, DynamicRoute, DynamicRoutes, Fallbacks, StaticRoutes};
use crate::routing::token::Token;

/// A classified, validated route ready to be stored.
#[derive(Debug, Clone)]
pub enum RouteData {
    /// Matched by exact string equality.
    Static(String),
    /// Matched by an anchored regex.
    Dynamic(RouteMatcher),
}

impl RouteData {
    pub fn kind(&self) -> &'static str {
        match self {
            RouteData::Static(_) => "static",
            RouteData::Dynamic(_) => "dynamic",
        }
    }

    /// Exact path for static routes, regex source for dynamic ones.
    pub fn key(&self) -> &str {
        match self {
            RouteData::Static(path) => path,
            RouteData::Dynamic(matcher) => matcher.as_str(),
        }
    }
}

/// Accumulates routes into static and dynamic maps.
#[derive(Debug, Clone)]
pub struct RouteCompiler<H> {
    static_routes: StaticRoutes<H>,
    dynamic_routes: DynamicRoutes<H>,
}

impl<H> Default for RouteCompiler<H> {
    fn default() -> Self {
        Self {
            static_routes: IndexMap::new(),
            dynamic_routes: IndexMap::new(),
        }
    }
}

impl<H> RouteCompiler<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and validate a token sequence without storing it.
    pub fn compile(tokens: &[Token]) -> Result<RouteData, RouteError> {
        match tokens {
            [Token::Literal(path)] => Ok(RouteData::Static(path.clone())),
            _ => RouteMatcher::from_tokens(tokens).map(RouteData::Dynamic),
        }
    }

    /// Compile and store a route for `method`.
    pub fn add_route(&mut self, method: &str, tokens: &[Token], handler: H) -> Result<(), RouteError> {
        let data = Self::compile(tokens)?;
        self.insert(method, data, handler);
        Ok(())
    }

    /// Store an already compiled route.
    pub fn insert(&mut self, method: &str, data: RouteData, handler: H) {
        tracing::debug!(method = %method, kind = data.kind(), key = %data.key(), "Adding route");
        metrics::record_route_registered(data.kind());

        match data {
            RouteData::Static(path) => {
                self.static_routes
                    .entry(method.to_string())
                    .or_default()
                    .insert(path, handler);
            }
            RouteData::Dynamic(matcher) => {
                self.dynamic_routes
                    .entry(method.to_string())
                    .or_default()
                    .insert(matcher.as_str().to_string(), DynamicRoute { matcher, handler });
            }
        }
    }

    pub fn static_routes(&self) -> &StaticRoutes<H> {
        &self.static_routes
    }

    pub fn dynamic_routes(&self) -> &DynamicRoutes<H> {
        &self.dynamic_routes
    }

    /// Freeze the accumulated routes together with the fallback handlers.
    pub fn into_table(self, fallbacks: Fallbacks<H>) -> CompiledTable<H> {
        CompiledTable::new(self.static_routes, self.dynamic_routes, fallbacks)
    }
}

impl<H: Clone> RouteCompiler<H> {
    /// Copy of the current state as a table, leaving the compiler usable.
    pub fn snapshot(&self, fallbacks: Fallbacks<H>) -> CompiledTable<H> {
        self.clone().into_table(fallbacks)
    }
}
