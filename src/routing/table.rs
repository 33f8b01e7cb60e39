//! The compiled route table.
//!
//! A `CompiledTable` is built once and never mutated afterwards. It owns
//! plain data only, so it can be shared read-only across threads behind an
//! `Arc` when the handler type allows it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::routing::dispatcher::{Dispatcher, Outcome};
use crate::routing::error::RouteError;
use crate::routing::matcher::RouteMatcher;

/// A dynamic entry: compiled regex plus its handler.
#[derive(Debug, Clone)]
pub struct DynamicRoute<H> {
    pub matcher: RouteMatcher,
    pub handler: H,
}

/// method → exact path → handler
pub type StaticRoutes<H> = IndexMap<String, IndexMap<String, H>>;

/// method → regex source → dynamic entry, in registration order
pub type DynamicRoutes<H> = IndexMap<String, IndexMap<String, DynamicRoute<H>>>;

/// method → fallback handler
pub type Fallbacks<H> = IndexMap<String, H>;

/// Finalized routing data consulted at dispatch time.
#[derive(Debug, Clone)]
pub struct CompiledTable<H> {
    static_routes: StaticRoutes<H>,
    dynamic_routes: DynamicRoutes<H>,
    fallbacks: Fallbacks<H>,
}

impl<H> CompiledTable<H> {
    pub fn new(
        static_routes: StaticRoutes<H>,
        dynamic_routes: DynamicRoutes<H>,
        fallbacks: Fallbacks<H>,
    ) -> Self {
        Self {
            static_routes,
            dynamic_routes,
            fallbacks,
        }
    }

    pub fn static_routes(&self) -> &StaticRoutes<H> {
        &self.static_routes
    }

    pub fn dynamic_routes(&self) -> &DynamicRoutes<H> {
        &self.dynamic_routes
    }

    pub fn fallbacks(&self) -> &Fallbacks<H> {
        &self.fallbacks
    }

    /// Fallback handler registered for a method, if any.
    pub fn fallback(&self, method: &str) -> Option<&H> {
        self.fallbacks.get(method)
    }

    /// Total number of static entries across all methods.
    pub fn static_count(&self) -> usize {
        self.static_routes.values().map(IndexMap::len).sum()
    }

    /// Total number of dynamic entries across all methods.
    pub fn dynamic_count(&self) -> usize {
        self.dynamic_routes.values().map(IndexMap::len).sum()
    }

    /// Resolve a request against this table.
    pub fn dispatch(&self, method: &str, path: &str, want_allowed_methods: bool) -> Outcome<'_, H> {
        Dispatcher::new().dispatch(self, method, path, want_allowed_methods)
    }

    /// Rebuild a table from its serialisable form, recompiling every regex.
    pub fn from_snapshot(snapshot: TableSnapshot<H>) -> Result<Self, RouteError> {
        let mut dynamic_routes = DynamicRoutes::new();
        for (method, routes) in snapshot.dynamic_routes {
            let mut bucket = IndexMap::with_capacity(routes.len());
            for (source, handler) in routes {
                let matcher = RouteMatcher::from_source(&source)?;
                bucket.insert(source, DynamicRoute { matcher, handler });
            }
            dynamic_routes.insert(method, bucket);
        }

        Ok(Self {
            static_routes: snapshot.static_routes,
            dynamic_routes,
            fallbacks: snapshot.fallbacks,
        })
    }
}

impl<H: Clone> CompiledTable<H> {
    /// Produce the serialisable form of this table.
    pub fn to_snapshot(&self) -> TableSnapshot<H> {
        let dynamic_routes = self
            .dynamic_routes
            .iter()
            .map(|(method, routes)| {
                let bucket = routes
                    .iter()
                    .map(|(source, route)| (source.clone(), route.handler.clone()))
                    .collect();
                (method.clone(), bucket)
            })
            .collect();

        TableSnapshot {
            static_routes: self.static_routes.clone(),
            dynamic_routes,
            fallbacks: self.fallbacks.clone(),
        }
    }
}

/// Storage form of a compiled table. Dynamic routes are keyed by regex source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot<H> {
    #[serde(rename = "static")]
    pub static_routes: IndexMap<String, IndexMap<String, H>>,
    #[serde(rename = "dynamic")]
    pub dynamic_routes: IndexMap<String, IndexMap<String, H>>,
    #[serde(rename = "errors")]
    pub fallbacks: IndexMap<String, H>,
}
