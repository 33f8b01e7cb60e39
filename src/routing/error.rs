//! Registration-time error definitions.

use thiserror::Error;

/// Errors raised while parsing, compiling or registering routes.
///
/// All of these are programmer errors for the call that raised them. A
/// failing registration leaves previously registered routes untouched.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Malformed template (misplaced or unbalanced optional brackets).
    #[error("{reason}, route = {route}")]
    BadPattern { reason: &'static str, route: String },

    /// The same placeholder name appears twice in one expanded route.
    #[error("Cannot use the same placeholder \"{name}\" twice, route = {route}")]
    DuplicateVariable { name: String, route: String },

    /// The assembled route regex was rejected by the regex engine.
    #[error("Invalid route regex \"{regex}\": {source}")]
    InvalidRegex {
        regex: String,
        #[source]
        source: regex::Error,
    },

    /// Registration attempted after the route table was finalized.
    #[error("Route table already finalized, registration is closed")]
    RegistrationClosed,
}

impl RouteError {
    pub(crate) fn bad_pattern(reason: &'static str, route: &str) -> Self {
        RouteError::BadPattern {
            reason,
            route: route.to_string(),
        }
    }
}
