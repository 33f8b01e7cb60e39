//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration:
//!     template string
//!     → parser.rs (expand optional groups, tokenize placeholders)
//!     → compiler.rs (static path or anchored regex via matcher.rs)
//!     → router.rs (accumulate per method, freeze into table.rs)
//!
//! Incoming Request (method, path):
//!     → dispatcher.rs (static → dynamic → HEAD→GET → allowed methods)
//!     → Return: Found / MethodNotAllowed / NotFound
//! ```
//!
//! # Design Decisions
//! - Routes compiled once, immutable after finalization
//! - Static lookup is a hash probe; dynamic lookup is a linear regex scan
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod compiler;
pub mod dispatcher;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod router;
pub mod sugar;
pub mod table;
pub mod token;

pub use compiler::{RouteCompiler, RouteData};
pub use dispatcher::{Dispatcher, Outcome};
pub use error::RouteError;
pub use matcher::{Params, RouteMatcher};
pub use parser::PatternParser;
pub use router::Router;
pub use sugar::SugarTable;
pub use table::{CompiledTable, TableSnapshot};
pub use token::{Token, TokenSequence};
