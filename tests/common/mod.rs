//! Shared utilities for integration tests.

use route_compiler::{Outcome, Router};

/// Router with one static route per supported verb plus an admin group.
#[allow(dead_code)]
pub fn verb_router() -> Router<String> {
    let mut r = Router::new();
    r.delete("/delete", "delete".into()).unwrap();
    r.get("/get", "get".into()).unwrap();
    r.head("/head", "head".into()).unwrap();
    r.patch("/patch", "patch".into()).unwrap();
    r.post("/post", "post".into()).unwrap();
    r.put("/put", "put".into()).unwrap();

    r.group("/admin", |r| {
        r.get("/get", "get".into())?;
        r.post("/post", "post".into())
    })
    .unwrap();
    r
}

/// Handler name of an outcome, matched or fallback.
#[allow(dead_code)]
pub fn handler_of<'a>(outcome: &Outcome<'a, String>) -> Option<&'a str> {
    outcome.handler().map(String::as_str)
}
