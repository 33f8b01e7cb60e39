//! Route registry.
//!
//! # Responsibilities
//! - Own the parser, compiler and dispatcher
//! - Expose per-method registration and nested group prefixes
//! - Finalize the compiled table once, on first use
//! - Optionally reload/persist the table through a cache store
//!
//! # Lifecycle
//! ```text
//! Open { compiler, fallbacks }
//!     add_route / error / group      (allowed)
//!     route_data / dispatch / load_cache hit
//!         → Finalized(table)
//! Finalized(table)
//!     add_route / error              → RegistrationClosed
//!     dispatch                       (read-only)
//! ```
//!
//! # Design Decisions
//! - A template is fully parsed and compiled before anything is stored, so a
//!   failing call never leaves half of its expansions behind
//! - The finalized table sits behind an `Arc` and can be handed to other threads

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{CacheError, CacheStore, FileCacheStore, StoredTable};
use crate::config::schema::{GroupConfig, RouteConfig, RouterConfig};
use crate::observability::metrics;
use crate::routing::compiler::RouteCompiler;
use crate::routing::dispatcher::{Dispatcher, Outcome};
use crate::routing::error::RouteError;
use crate::routing::parser::PatternParser;
use crate::routing::sugar::SugarTable;
use crate::routing::table::{CompiledTable, Fallbacks, TableSnapshot};

/// Methods registered by `any` and by the `"*"` method.
pub const ANY_METHODS: [&str; 6] = ["GET", "POST", "HEAD", "PUT", "DELETE", "PATCH"];

/// Methods covered by `error` and by `error_for("*", ..)`.
pub const ERROR_METHODS: [&str; 5] = ["GET", "POST", "HEAD", "PUT", "DELETE"];

/// Default cache expiry window.
pub const DEFAULT_CACHE_EXPIRE: Duration = Duration::from_secs(30);

#[derive(Debug)]
enum State<H> {
    Open {
        compiler: RouteCompiler<H>,
        fallbacks: Fallbacks<H>,
    },
    Finalized(Arc<CompiledTable<H>>),
}

type EncodeFn<H> = fn(&CompiledTable<H>) -> Result<serde_json::Value, CacheError>;

struct CacheSettings<H> {
    store: Box<dyn CacheStore>,
    expire: Duration,
    enabled: bool,
    encode: EncodeFn<H>,
}

impl<H> std::fmt::Debug for CacheSettings<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSettings")
            .field("store", &self.store)
            .field("expire", &self.expire)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Route registry and dispatch entry point.
#[derive(Debug)]
pub struct Router<H> {
    parser: PatternParser,
    dispatcher: Dispatcher,
    prefix: String,
    state: State<H>,
    cache: Option<CacheSettings<H>>,
}

impl<H: Clone> Default for Router<H> {
    fn default() -> Self {
        Self::with_parser(PatternParser::new())
    }
}

impl<H: Clone> Router<H> {
    /// Create a router with the default sugar table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router whose parser uses `sugar`.
    pub fn with_sugar(sugar: SugarTable) -> Self {
        Self::with_parser(PatternParser::with_sugar(sugar))
    }

    pub fn with_parser(parser: PatternParser) -> Self {
        Self {
            parser,
            dispatcher: Dispatcher::new(),
            prefix: String::new(),
            state: State::Open {
                compiler: RouteCompiler::new(),
                fallbacks: Fallbacks::new(),
            },
            cache: None,
        }
    }

    pub fn parser(&self) -> &PatternParser {
        &self.parser
    }

    /// Current group prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, State::Finalized(_))
    }

    /// Turn cache persistence on or off without detaching the store.
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        if let Some(cache) = &mut self.cache {
            cache.enabled = enabled;
        }
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.cache.as_ref().is_some_and(|c| c.enabled)
    }

    /// Run `body` with `prefix` appended to the current group prefix.
    ///
    /// The previous prefix is restored even when `body` fails.
    pub fn group<F>(&mut self, prefix: &str, body: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut Self) -> Result<(), RouteError>,
    {
        let previous_len = self.prefix.len();
        self.prefix.push_str(prefix);
        let result = body(self);
        self.prefix.truncate(previous_len);
        result
    }

    /// Register a template for one method; `"*"` means every method in `ANY_METHODS`.
    pub fn add_route(&mut self, method: &str, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route_for(&[method], template, handler)
    }

    /// Register a template for several methods at once.
    ///
    /// An empty `methods` slice registers nothing; the template is not parsed.
    pub fn add_route_for(
        &mut self,
        methods: &[&str],
        template: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        let State::Open { compiler, .. } = &mut self.state else {
            return Err(RouteError::RegistrationClosed);
        };
        if methods.is_empty() {
            tracing::debug!(template = %template, "No methods given, nothing registered");
            return Ok(());
        }

        let route = format!("{}{}", self.prefix, template);
        let compiled = self
            .parser
            .parse(&route)?
            .iter()
            .map(|tokens| RouteCompiler::<H>::compile(tokens))
            .collect::<Result<Vec<_>, _>>()?;

        for method in expand_methods(methods, &ANY_METHODS) {
            for data in &compiled {
                compiler.insert(&method, data.clone(), handler.clone());
            }
        }
        Ok(())
    }

    pub fn get(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("GET", template, handler)
    }

    pub fn post(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("POST", template, handler)
    }

    pub fn put(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("PUT", template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("DELETE", template, handler)
    }

    pub fn head(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("HEAD", template, handler)
    }

    pub fn patch(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("PATCH", template, handler)
    }

    /// Register for every method in `ANY_METHODS`.
    pub fn any(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("*", template, handler)
    }

    /// Register a fallback handler for every method in `ERROR_METHODS`.
    pub fn error(&mut self, handler: H) -> Result<(), RouteError> {
        self.error_for("*", handler)
    }

    /// Register a fallback handler for one method (`"*"` = `ERROR_METHODS`).
    pub fn error_for(&mut self, method: &str, handler: H) -> Result<(), RouteError> {
        let State::Open { fallbacks, .. } = &mut self.state else {
            return Err(RouteError::RegistrationClosed);
        };
        for method in expand_methods(&[method], &ERROR_METHODS) {
            tracing::debug!(method = %method, "Adding fallback handler");
            fallbacks.insert(method, handler.clone());
        }
        Ok(())
    }

    /// The compiled table, finalizing the router on first call.
    pub fn route_data(&mut self) -> &CompiledTable<H> {
        self.finalize()
    }

    /// Shared handle to the compiled table, finalizing on first call.
    pub fn shared_table(&mut self) -> Arc<CompiledTable<H>> {
        Arc::clone(self.finalize())
    }

    /// Resolve a request, finalizing the router on first call.
    pub fn dispatch(&mut self, method: &str, path: &str, want_allowed_methods: bool) -> Outcome<'_, H> {
        let dispatcher = self.dispatcher;
        let table = self.finalize();
        dispatcher.dispatch(table, method, path, want_allowed_methods)
    }

    fn finalize(&mut self) -> &Arc<CompiledTable<H>> {
        if let State::Open { compiler, fallbacks } = &mut self.state {
            let compiler = std::mem::take(compiler);
            let fallbacks = std::mem::take(fallbacks);
            let table = Arc::new(compiler.into_table(fallbacks));

            tracing::info!(
                static_routes = table.static_count(),
                dynamic_routes = table.dynamic_count(),
                fallbacks = table.fallbacks().len(),
                "Route table finalized"
            );
            metrics::record_compiled_routes(table.static_count(), table.dynamic_count());

            self.save_cache(&table);
            self.state = State::Finalized(table);
        }

        match &self.state {
            State::Finalized(table) => table,
            State::Open { .. } => unreachable!("router was finalized above"),
        }
    }

    fn save_cache(&self, table: &CompiledTable<H>) {
        let Some(cache) = self.cache.as_ref().filter(|c| c.enabled) else {
            return;
        };
        let result = (cache.encode)(table).and_then(|value| cache.store.save(&StoredTable::now(value)));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to save route cache");
        }
    }
}

impl<H> Router<H>
where
    H: Clone + Serialize + DeserializeOwned,
{
    /// Attach a cache store. Cached tables older than `expire` are ignored.
    pub fn with_cache(mut self, store: impl CacheStore + 'static, expire: Duration) -> Self {
        self.cache = Some(CacheSettings {
            store: Box::new(store),
            expire,
            enabled: true,
            encode: encode_table::<H>,
        });
        self
    }

    /// Try to finalize the router from the attached cache.
    ///
    /// Returns `Ok(true)` when a fresh table was loaded. Missing, stale or
    /// malformed tables are treated as absent and leave the router open.
    pub fn load_cache(&mut self) -> Result<bool, RouteError> {
        if self.is_finalized() {
            return Err(RouteError::RegistrationClosed);
        }
        let Some(cache) = self.cache.as_ref().filter(|c| c.enabled) else {
            return Ok(false);
        };

        let stored = match cache.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                metrics::record_cache_load("miss");
                return Ok(false);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Route cache unreadable, recompiling");
                metrics::record_cache_load("malformed");
                return Ok(false);
            }
        };

        if !stored.is_fresh(cache.expire) {
            tracing::info!(
                age_secs = stored.age().as_secs(),
                expire_secs = cache.expire.as_secs(),
                "Route cache expired, recompiling"
            );
            metrics::record_cache_load("stale");
            return Ok(false);
        }

        match decode_table::<H>(stored.table) {
            Ok(table) => {
                tracing::info!(
                    static_routes = table.static_count(),
                    dynamic_routes = table.dynamic_count(),
                    "Route table loaded from cache"
                );
                metrics::record_cache_load("hit");
                self.state = State::Finalized(Arc::new(table));
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Route cache malformed, recompiling");
                metrics::record_cache_load("malformed");
                Ok(false)
            }
        }
    }
}

impl Router<String> {
    /// Build a router from configuration.
    ///
    /// When the configured cache holds a fresh table, registration is skipped
    /// and the cached table is used as is.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouteError> {
        let sugar = SugarTable::default().merged(config.sugar.clone());
        let mut router = Router::with_sugar(sugar);

        if config.cache.enabled {
            if let Some(path) = &config.cache.path {
                router = router.with_cache(
                    FileCacheStore::new(path),
                    Duration::from_secs(config.cache.expire_secs),
                );
                if router.load_cache()? {
                    return Ok(router);
                }
            }
        }

        register_routes(&mut router, &config.routes)?;
        for group in &config.groups {
            register_group(&mut router, group)?;
        }
        for error in &config.errors {
            for method in &error.methods {
                router.error_for(method, error.handler.clone())?;
            }
        }

        Ok(router)
    }
}

fn register_routes(router: &mut Router<String>, routes: &[RouteConfig]) -> Result<(), RouteError> {
    for route in routes {
        let methods: Vec<&str> = route.methods.iter().map(String::as_str).collect();
        router.add_route_for(&methods, &route.pattern, route.handler.clone())?;
    }
    Ok(())
}

fn register_group(router: &mut Router<String>, group: &GroupConfig) -> Result<(), RouteError> {
    router.group(&group.prefix, |r| {
        register_routes(r, &group.routes)?;
        for nested in &group.groups {
            register_group(r, nested)?;
        }
        Ok(())
    })
}

/// Upper-case methods, expanding `"*"` to `wildcard`.
fn expand_methods(methods: &[&str], wildcard: &[&str]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(methods.len());
    for method in methods {
        if *method == "*" {
            expanded.extend(wildcard.iter().map(|m| m.to_string()));
        } else {
            expanded.push(method.to_ascii_uppercase());
        }
    }
    expanded
}

fn encode_table<H: Clone + Serialize>(table: &CompiledTable<H>) -> Result<serde_json::Value, CacheError> {
    Ok(serde_json::to_value(table.to_snapshot())?)
}

fn decode_table<H: DeserializeOwned>(value: serde_json::Value) -> Result<CompiledTable<H>, CacheError> {
    let snapshot: TableSnapshot<H> = serde_json::from_value(value)?;
    CompiledTable::from_snapshot(snapshot).map_err(|e| CacheError::Malformed(e.to_string()))
}
