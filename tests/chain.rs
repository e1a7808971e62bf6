//! Chain composition behavior.

use std::sync::{Arc, Mutex};

use hyper::{Method, Uri};
use when_error_type::prelude::*;

fn request() -> Req {
    Req::new(Method::GET, Uri::from_static("/orders"))
}

fn response() -> Res {
    Res::builder().empty()
}

/// Handler that records its tag and answers with it.
fn tagged_handler(tag: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Handler {
    let log = Arc::clone(log);
    Handler::from_fn(move |_error, _req, _res, _next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(tag);
            Ok(Res::text(tag))
        }
    })
}

fn spy_next() -> (ErrorNext, Arc<Mutex<Vec<SharedError>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&seen);

    let next = ErrorNext::new(move |error: SharedError| {
        let record = Arc::clone(&record);
        async move {
            record.lock().unwrap().push(error.clone());
            Outcome::Forwarded(error)
        }
    });

    (next, seen)
}

#[tokio::test]
async fn first_matching_stage_wins() {
    let timeout = ErrorClass::new("TimeoutError");
    let log = Arc::new(Mutex::new(Vec::new()));

    let chain = ErrorChain::new()
        .when(timeout.clone(), tagged_handler("timeout", &log))
        .unwrap()
        .when(ErrorClass::base(), tagged_handler("fallback", &log))
        .unwrap();

    let error = timeout.construct("slow").unwrap();
    let (next, seen) = spy_next();

    let outcome = chain.handle(error, request(), response(), next).await;

    assert_eq!(outcome.response().map(Res::body_text), Some("timeout".to_string()));
    assert_eq!(*log.lock().unwrap(), vec!["timeout"]);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_matching_stages_fall_through_in_order() {
    let timeout = ErrorClass::new("TimeoutError");
    let database = ErrorClass::new("DatabaseError");
    let log = Arc::new(Mutex::new(Vec::new()));

    let chain = ErrorChain::new()
        .when(timeout, tagged_handler("timeout", &log))
        .unwrap()
        .when(database.clone(), tagged_handler("database", &log))
        .unwrap();

    let error = database.construct("deadlock").unwrap();
    let (next, _seen) = spy_next();

    let outcome = chain.handle(error, request(), response(), next).await;

    assert_eq!(outcome.response().map(Res::body_text), Some("database".to_string()));
    assert_eq!(*log.lock().unwrap(), vec!["database"]);
}

#[tokio::test]
async fn unmatched_errors_reach_the_chain_continuation() {
    let timeout = ErrorClass::new("TimeoutError");
    let database = ErrorClass::new("DatabaseError");
    let unrelated = ErrorClass::new("ValidationError");
    let log = Arc::new(Mutex::new(Vec::new()));

    let chain = ErrorChain::new()
        .when(timeout, tagged_handler("timeout", &log))
        .unwrap()
        .when(database, tagged_handler("database", &log))
        .unwrap();

    let error = unrelated.construct("bad input").unwrap();
    let (next, seen) = spy_next();

    let outcome = chain
        .handle(error.clone(), request(), response(), next)
        .await;

    assert!(log.lock().unwrap().is_empty());
    let forwarded = seen.lock().unwrap();
    assert_eq!(forwarded.len(), 1);
    assert!(Arc::ptr_eq(&forwarded[0], &error));
    assert!(outcome.error().is_some_and(|e| Arc::ptr_eq(e, &error)));
}

#[tokio::test]
async fn empty_chain_forwards_everything() {
    let error = ErrorClass::new("TimeoutError").construct("slow").unwrap();
    let (next, seen) = spy_next();

    let outcome = ErrorChain::new()
        .handle(error, request(), response(), next)
        .await;

    assert!(outcome.is_forwarded());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn chain_construction_fails_fast() {
    let result = ErrorChain::new().when(ErrorClass::new("TimeoutError"), Handler::unbound());

    assert_eq!(
        result.err().map(|e| e.to_string()),
        Some("A handler must be a Function".to_string())
    );
}
