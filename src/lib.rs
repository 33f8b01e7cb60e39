//! Route compiler and matcher library.
//!
//! Turns route templates such as `/article/{id:\d+}[/{slug}]` into a compiled
//! table and resolves `(method, path)` pairs against it.
//!
//! ```
//! use route_compiler::{Outcome, Router};
//!
//! let mut router = Router::new();
//! router.get("/", "home@index").unwrap();
//! router.get(r"/article/{id:\d+}", "article@show").unwrap();
//! router.group("/admin", |r| r.get("/article/list", "admin/article@index")).unwrap();
//! router.error("error@code404").unwrap();
//!
//! match router.dispatch("GET", "/article/42", false) {
//!     Outcome::Found { handler, params } => {
//!         assert_eq!(*handler, "article@show");
//!         assert_eq!(params["id"], "42");
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

pub mod cache;
pub mod config;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use routing::{CompiledTable, Dispatcher, Outcome, PatternParser, RouteError, Router, SugarTable};
