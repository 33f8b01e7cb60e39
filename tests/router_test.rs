//! End-to-end registration and dispatch tests.

use indexmap::IndexMap;
use route_compiler::routing::{Params, Token};
use route_compiler::{Outcome, PatternParser, RouteError, Router, SugarTable};

mod common;

#[test]
fn test_static_table_layout() {
    let mut r = common::verb_router();
    let table = r.route_data();

    let layout: Vec<(String, Vec<String>)> = table
        .static_routes()
        .iter()
        .map(|(method, routes)| (method.clone(), routes.keys().cloned().collect()))
        .collect();

    assert_eq!(
        layout,
        vec![
            ("DELETE".to_string(), vec!["/delete".to_string()]),
            ("GET".to_string(), vec!["/get".to_string(), "/admin/get".to_string()]),
            ("HEAD".to_string(), vec!["/head".to_string()]),
            ("PATCH".to_string(), vec!["/patch".to_string()]),
            ("POST".to_string(), vec!["/post".to_string(), "/admin/post".to_string()]),
            ("PUT".to_string(), vec!["/put".to_string()]),
        ]
    );
    assert!(table.dynamic_routes().is_empty());
    assert!(table.fallbacks().is_empty());
}

#[test]
fn test_static_round_trip() {
    let mut r = common::verb_router();
    assert_eq!(
        r.dispatch("GET", "/get", false),
        Outcome::Found {
            handler: &"get".to_string(),
            params: Params::new(),
        }
    );
    assert_eq!(common::handler_of(&r.dispatch("POST", "/admin/post", false)), Some("post"));
}

#[test]
fn test_placeholder_extraction() {
    let mut r: Router<String> = Router::new();
    r.get(r"/user/{id:\d+}", "user".into()).unwrap();

    let mut expected = IndexMap::new();
    expected.insert("id".to_string(), "42".to_string());
    assert_eq!(
        r.dispatch("GET", "/user/42", false),
        Outcome::Found {
            handler: &"user".to_string(),
            params: expected,
        }
    );
    assert_eq!(r.dispatch("GET", "/user/abc", false), Outcome::NotFound { fallback: None });
}

#[test]
fn test_head_uses_get_route() {
    let mut r: Router<String> = Router::new();
    r.get("/head", "get-handler".into()).unwrap();
    let outcome = r.dispatch("HEAD", "/head", false);
    assert!(outcome.is_found());
    assert_eq!(common::handler_of(&outcome), Some("get-handler"));
}

#[test]
fn test_allowed_methods_in_registration_order() {
    let mut r: Router<String> = Router::new();
    r.get("/x", "get".into()).unwrap();
    r.post("/x", "post".into()).unwrap();
    r.error("fallback".into()).unwrap();

    assert_eq!(
        r.dispatch("DELETE", "/x", true),
        Outcome::MethodNotAllowed {
            allowed: vec!["GET".to_string(), "POST".to_string()],
            fallback: Some(&"fallback".to_string()),
        }
    );
}

#[test]
fn test_first_registered_wins_over_specificity() {
    let mut r: Router<String> = Router::new();
    r.get("/files/{path:.+}", "catch-all".into()).unwrap();
    r.get("/files/{name:a}", "letters".into()).unwrap();

    let outcome = r.dispatch("GET", "/files/readme", false);
    assert_eq!(common::handler_of(&outcome), Some("catch-all"));
    assert_eq!(outcome.params().unwrap()["path"], "readme");
}

#[test]
fn test_empty_match_resolved_by_registration_order() {
    let mut r: Router<String> = Router::new();
    r.get("/e{x:.*}", "first".into()).unwrap();
    r.get("/e{y:[a-z]*}", "second".into()).unwrap();

    let outcome = r.dispatch("GET", "/e", false);
    assert_eq!(common::handler_of(&outcome), Some("first"));
    let params = outcome.params().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params["x"], "");
}

#[test]
fn test_registration_closed() {
    let mut r: Router<String> = Router::new();
    r.get("/a", "a".into()).unwrap();
    r.route_data();
    assert!(matches!(
        r.add_route("GET", "/b", "b".into()),
        Err(RouteError::RegistrationClosed)
    ));
}

#[test]
fn test_sugar_alias_equivalent_to_regex() {
    let mut sugared: Router<String> = Router::new();
    sugared.get("/n/{n:i}", "n".into()).unwrap();
    let mut explicit: Router<String> = Router::new();
    explicit.get(r"/n/{n:\d+}", "n".into()).unwrap();

    for path in ["/n/1", "/n/123", "/n/x", "/n/", "/n/1/2"] {
        assert_eq!(
            sugared.dispatch("GET", path, false),
            explicit.dispatch("GET", path, false),
            "{path}"
        );
    }
}

#[test]
fn test_literal_template_parses_to_itself() {
    let parser = PatternParser::new();
    for template in ["/", "/about", "/a/b/c.html", "/with space", "/ümlaut"] {
        let routes = parser.parse(template).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0], vec![Token::literal(template)]);
    }
}

#[test]
fn test_optional_groups_prefix_extension() {
    let parser = PatternParser::new();
    let routes = parser.parse("/archive[/{year:i}[/{month:i}[/{day:i}]]]").unwrap();
    assert_eq!(routes.len(), 4);

    let rendered: Vec<String> = routes.iter().map(|tokens| render(tokens)).collect();
    assert_eq!(rendered[0], "/archive");
    assert_eq!(rendered[3], r"/archive/{year:\d+}/{month:\d+}/{day:\d+}");
    for pair in rendered.windows(2) {
        assert!(pair[1].len() > pair[0].len());
        assert!(pair[1].starts_with(&pair[0]));
    }
}

fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Token::Literal(text) => text.clone(),
            Token::Variable { name, pattern } => format!("{{{name}:{pattern}}}"),
        })
        .collect()
}

#[test]
fn test_optional_routes_dispatch() {
    let mut r: Router<String> = Router::new();
    r.get("/archive[/{year:i}[/{month:i}]]", "archive".into()).unwrap();

    assert_eq!(r.route_data().static_count(), 1);
    assert_eq!(r.route_data().dynamic_count(), 2);

    assert!(r.dispatch("GET", "/archive", false).params().unwrap().is_empty());
    assert_eq!(r.dispatch("GET", "/archive/2024", false).params().unwrap()["year"], "2024");
    let outcome = r.dispatch("GET", "/archive/2024/05", false);
    assert_eq!(outcome.params().unwrap()["month"], "05");
    assert!(!r.dispatch("GET", "/archive/2024/05/01", false).is_found());
}

#[test]
fn test_custom_sugar_router() {
    let mut r: Router<String> =
        Router::with_sugar(SugarTable::default().merged([("slug", "[a-z0-9-]+")]));
    r.get("/post/{slug:slug}", "post".into()).unwrap();
    assert!(r.dispatch("GET", "/post/hello-world", false).is_found());
    assert!(!r.dispatch("GET", "/post/Hello", false).is_found());
}

#[test]
fn test_shared_table_across_threads() {
    let mut r: Router<String> = Router::new();
    r.get(r"/user/{id:\d+}", "user".into()).unwrap();
    let table = r.shared_table();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let table = table.clone();
            std::thread::spawn(move || {
                let path = format!("/user/{i}");
                let outcome = table.dispatch("GET", &path, false);
                outcome.params().map(|p| p["id"].clone())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(i.to_string()));
    }
}
