//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check methods, handlers and cache settings
//! - Catch sugar aliases that could never be looked up
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{GroupConfig, RouteConfig, RouterConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("top-level route has an empty pattern")]
    EmptyPattern,

    #[error("route \"{0}\" has an empty handler")]
    EmptyHandler(String),

    #[error("route \"{0}\" lists no methods")]
    NoMethods(String),

    #[error("invalid HTTP method \"{0}\"")]
    InvalidMethod(String),

    #[error("group \"{0}\" has no prefix and no routes")]
    EmptyGroup(String),

    #[error("error handler is empty")]
    EmptyErrorHandler,

    #[error("cache is enabled but no cache path is set")]
    MissingCachePath,

    #[error("cache expiry must be greater than zero")]
    ZeroCacheExpiry,

    #[error("sugar alias \"{0}\" has surrounding whitespace and can never match")]
    UntrimmedSugarAlias(String),

    #[error("unknown log level \"{0}\"")]
    InvalidLogLevel(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.cache.enabled {
        if config.cache.path.as_deref().map_or(true, str::is_empty) {
            errors.push(ValidationError::MissingCachePath);
        }
        if config.cache.expire_secs == 0 {
            errors.push(ValidationError::ZeroCacheExpiry);
        }
    }

    for alias in config.sugar.keys() {
        if alias.trim() != alias {
            errors.push(ValidationError::UntrimmedSugarAlias(alias.clone()));
        }
    }

    for route in &config.routes {
        if route.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern);
        }
        validate_route(route, &mut errors);
    }

    for group in &config.groups {
        validate_group(group, &mut errors);
    }

    for error in &config.errors {
        if error.handler.is_empty() {
            errors.push(ValidationError::EmptyErrorHandler);
        }
        validate_methods(&error.methods, "error handler", &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    if route.handler.is_empty() {
        errors.push(ValidationError::EmptyHandler(route.pattern.clone()));
    }
    validate_methods(&route.methods, &route.pattern, errors);
}

fn validate_group(group: &GroupConfig, errors: &mut Vec<ValidationError>) {
    if group.prefix.is_empty() && group.routes.is_empty() && group.groups.is_empty() {
        errors.push(ValidationError::EmptyGroup(group.prefix.clone()));
    }
    for route in &group.routes {
        validate_route(route, errors);
    }
    for nested in &group.groups {
        validate_group(nested, errors);
    }
}

fn validate_methods(methods: &[String], owner: &str, errors: &mut Vec<ValidationError>) {
    if methods.is_empty() {
        errors.push(ValidationError::NoMethods(owner.to_string()));
    }
    for method in methods {
        let valid = method == "*"
            || (!method.is_empty() && method.chars().all(|c| c.is_ascii_alphabetic()));
        if !valid {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CacheConfig, ErrorConfig};

    fn route(methods: &[&str], pattern: &str, handler: &str) -> RouteConfig {
        RouteConfig {
            methods: methods.iter().map(|m| m.to_string()).collect(),
            pattern: pattern.to_string(),
            handler: handler.to_string(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.routes.push(route(&[], "", ""));
        config.routes.push(route(&["GE T"], "/a", "a"));
        config.cache = CacheConfig {
            enabled: true,
            path: None,
            expire_secs: 0,
        };
        config.errors.push(ErrorConfig {
            methods: vec!["*".into()],
            handler: String::new(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyPattern));
        assert!(errors.contains(&ValidationError::EmptyHandler(String::new())));
        assert!(errors.contains(&ValidationError::NoMethods(String::new())));
        assert!(errors.contains(&ValidationError::InvalidMethod("GE T".into())));
        assert!(errors.contains(&ValidationError::MissingCachePath));
        assert!(errors.contains(&ValidationError::ZeroCacheExpiry));
        assert!(errors.contains(&ValidationError::EmptyErrorHandler));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn test_group_rules() {
        let mut config = RouterConfig::default();
        config.groups.push(GroupConfig {
            prefix: "/admin".into(),
            routes: vec![route(&["GET"], "", "admin@home")],
            groups: vec![GroupConfig {
                prefix: String::new(),
                routes: vec![],
                groups: vec![],
            }],
        });

        // Empty pattern is fine inside a group, empty nested group is not
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyGroup(String::new())]);
    }

    #[test]
    fn test_sugar_alias_and_log_level() {
        let mut config = RouterConfig::default();
        config.sugar.insert(" i".into(), r"\d+".into());
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidLogLevel("loud".into()),
                ValidationError::UntrimmedSugarAlias(" i".into()),
            ]
        );
    }
}
