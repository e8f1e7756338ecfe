//! Integration tests for the container combinators, the deferred pipeline,
//! the aggregators, and the serialization contract.

use shunt::aggregate::{self, Fetch};
use shunt::outcome::{capture, capture_async};
use shunt::{Filtered, Maybe, Missing, Outcome, err, lazy, none, ok, some};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

#[test]
fn test_chain_and_unwrap() {
    let doubled = some(5).and_then(|n| if n > 3 { some(n * 2) } else { none() });
    assert_eq!(doubled.unwrap(), 10);

    let rejected = some(2).and_then(|n| if n > 3 { some(n * 2) } else { none() });
    assert!(rejected.is_none());
}

#[test]
fn test_or_else_recovers() {
    let recovered = none().or_else(|| some(0));
    assert_eq!(recovered.unwrap(), 0);
}

#[test]
fn test_wrong_branch_is_noop() {
    // A failed container never invokes success-side callbacks.
    let called = AtomicBool::new(false);
    let out: Outcome<i32, &str> = err("boom").map(|n| {
        called.store(true, Ordering::SeqCst);
        n
    });
    assert_eq!(out, err("boom"));
    assert!(!called.load(Ordering::SeqCst));

    // A successful container never invokes failure-side callbacks.
    let called = AtomicBool::new(false);
    let out: Outcome<i32, &str> = ok(7).or_else(|e| {
        called.store(true, Ordering::SeqCst);
        err(e)
    });
    assert_eq!(out, ok(7));
    assert!(!called.load(Ordering::SeqCst));
}

#[test]
fn test_filter_downgrades() {
    assert_eq!(some(5).filter(|n| *n > 10), none());
    assert_eq!(some(5).filter(|n| *n > 1), some(5));

    // Default failure is deterministic and carries the payload.
    let out: Outcome<i32, Filtered> = ok(5).filter(|n| *n > 10);
    assert_eq!(out, err(Filtered::of(&5)));

    // Caller-supplied failure constructor receives the rejected payload.
    let out: Outcome<i32, String> = ok(5).filter_or(|n| *n > 10, |n| format!("{n} too small"));
    assert_eq!(out, err("5 too small".to_string()));

    // No-op on an already-failed instance: the predicate never runs.
    let called = AtomicBool::new(false);
    let out: Outcome<i32, Filtered> = err(Filtered::of(&0)).filter(|_| {
        called.store(true, Ordering::SeqCst);
        true
    });
    assert!(out.is_err());
    assert!(!called.load(Ordering::SeqCst));
}

#[test]
fn test_unwrap_fallback() {
    let out: Outcome<usize, &str> = err("boom");
    assert_eq!(out.unwrap_or_else(str::len), 4);

    let out: Outcome<usize, &str> = err("boom");
    assert_eq!(out.unwrap_or(9), 9);
}

#[test]
fn test_tee_side_effect() {
    let seen = AtomicUsize::new(0);
    let out = ok::<usize, String>(3).tee(|n| seen.store(*n, Ordering::SeqCst));
    assert_eq!(out, ok(3));
    assert_eq!(seen.load(Ordering::SeqCst), 3);

    let out: Outcome<usize, &str> = err("boom").tee(|n| seen.store(*n, Ordering::SeqCst));
    assert!(out.is_err());
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[test]
fn test_iteration_protocol() {
    // A success container yields exactly one element, a failure yields zero.
    let values: Vec<i32> = some(3).into_iter().collect();
    assert_eq!(values, vec![3]);

    let values: Vec<i32> = none().into_iter().collect();
    assert!(values.is_empty());

    let values: Vec<i32> = ok::<_, String>(4).into_iter().collect();
    assert_eq!(values, vec![4]);

    let mut total = 0;
    for n in &ok::<_, String>(5) {
        total += n;
    }
    for n in &err::<i32, _>("ignored") {
        total += n;
    }
    assert_eq!(total, 5);
}

#[test]
fn test_collect_short_circuits() {
    let out: Outcome<Vec<i32>, &str> = vec![ok(1), err("x"), ok(3)].into_iter().collect();
    assert_eq!(out, err("x"));

    let out: Maybe<Vec<i32>> = vec![some(1), some(2)].into_iter().collect();
    assert_eq!(out, some(vec![1, 2]));
}

#[test]
fn test_bridges() {
    assert_eq!(some(5).ok_or("missing"), ok(5));
    assert_eq!(none::<i32>().ok_or("missing"), err("missing"));
    assert_eq!(none::<i32>().into_outcome(), err(Missing));

    assert_eq!(ok::<_, String>(5).into_maybe(), some(5));
    assert_eq!(err::<i32, _>("gone").into_maybe(), none());

    // Std bridges.
    assert_eq!(Outcome::from(Ok::<_, String>(1)), ok(1));
    assert_eq!(Result::from(ok::<_, String>(1)), Ok(1));
    assert_eq!(Maybe::from(Some(2)), some(2));
    assert_eq!(Option::from(some(2)), Some(2));
}

#[test]
fn test_capture_converts_panics() {
    let out = capture(|| -> i32 { panic!("x") });
    match out {
        Outcome::Err(caught) => assert_eq!(caught.0, "x"),
        Outcome::Ok(_) => panic!("expected a captured panic"),
    }

    assert_eq!(capture(|| 7), ok(7));
}

#[tokio::test]
async fn test_capture_async_converts_panics() {
    async fn explode() -> i32 {
        panic!("boom")
    }

    let out = capture_async(explode()).await;
    match out {
        Outcome::Err(caught) => assert_eq!(caught.0, "boom"),
        Outcome::Ok(_) => panic!("expected a captured panic"),
    }

    assert_eq!(capture_async(async { 7 }).await, ok(7));
}

#[tokio::test]
async fn test_aggregate_and_collects_in_order() {
    let out = aggregate::and(vec![
        Fetch::ready(ok::<_, String>(1)),
        Fetch::thunk(|| ok(2)),
        Fetch::thunk_defer(|| async { ok(3) }),
    ])
    .await;
    assert_eq!(out, ok(vec![1, 2, 3]));

    let out: Outcome<Vec<i32>, String> = aggregate::and(vec![]).await;
    assert_eq!(out, ok(vec![]));
}

#[tokio::test]
async fn test_aggregate_and_short_circuits() {
    let second = Arc::new(AtomicBool::new(false));
    let third = Arc::new(AtomicBool::new(false));
    let second_flag = Arc::clone(&second);
    let third_flag = Arc::clone(&third);

    let out = aggregate::and(vec![
        Fetch::ready(ok(1)),
        Fetch::thunk(move || {
            second_flag.store(true, Ordering::SeqCst);
            err("failed")
        }),
        Fetch::thunk(move || {
            third_flag.store(true, Ordering::SeqCst);
            ok(3)
        }),
    ])
    .await;

    assert_eq!(out, err("failed"));
    assert!(second.load(Ordering::SeqCst));
    // The element after the failure is never resolved.
    assert!(!third.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_aggregate_or_left_bias() {
    let third = Arc::new(AtomicBool::new(false));
    let third_flag = Arc::clone(&third);

    let out = aggregate::or(vec![
        Fetch::ready(err("a")),
        Fetch::ready(ok(2)),
        Fetch::thunk(move || {
            third_flag.store(true, Ordering::SeqCst);
            ok(3)
        }),
    ])
    .await;

    assert_eq!(out, ok(2));
    assert!(!third.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_aggregate_or_recovers_or_keeps_last_failure() {
    let out = aggregate::or(vec![
        Fetch::ready(err("a")),
        Fetch::ready(err("b")),
        Fetch::thunk(|| ok(9)),
    ])
    .await;
    assert_eq!(out, ok(9));

    let out: Outcome<i32, &str> =
        aggregate::or(vec![Fetch::ready(err("a")), Fetch::ready(err("b"))]).await;
    assert_eq!(out, err("b"));
}

#[tokio::test(start_paused = true)]
async fn test_positional_order_under_async_skew() {
    // The slower earlier element still lands first: payloads are assembled
    // in input order, not completion order.
    let out = aggregate::and(vec![
        Fetch::thunk_defer(|| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            ok::<_, String>("slow")
        }),
        Fetch::thunk_defer(|| async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            ok("fast")
        }),
    ])
    .await;
    assert_eq!(out, ok(vec!["slow", "fast"]));
}

#[tokio::test]
async fn test_pipeline_basic_eval() {
    let out = lazy(ok::<_, String>(1))
        .map(|n| n + 1)
        .filter_or(|n| *n > 1, |n| format!("{n} is too small"))
        .eval()
        .await;
    assert_eq!(out, ok(2));
}

#[tokio::test]
async fn test_pipeline_purity_and_step_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let map_log = Arc::clone(&log);
    let tee_log = Arc::clone(&log);
    let then_log = Arc::clone(&log);

    let pipeline = lazy(ok::<_, String>(1))
        .map(move |n| {
            map_log.lock().unwrap().push("map");
            n + 1
        })
        .tee(move |_| tee_log.lock().unwrap().push("tee"))
        .and_then_async(move |n| async move {
            then_log.lock().unwrap().push("and_then_async");
            ok(n * 2)
        });

    // Purity before evaluation: nothing has run yet.
    assert!(log.lock().unwrap().is_empty());

    let out = pipeline.eval().await;
    assert_eq!(out, ok(4));
    // Steps ran in exactly their attachment order.
    assert_eq!(*log.lock().unwrap(), vec!["map", "tee", "and_then_async"]);
}

#[tokio::test]
async fn test_pipeline_short_circuit_and_recovery() {
    let skipped = Arc::new(AtomicBool::new(false));
    let skipped_flag = Arc::clone(&skipped);

    let out = lazy(err::<usize, &str>("boom"))
        .map(move |n| {
            skipped_flag.store(true, Ordering::SeqCst);
            n
        })
        .or_else(|e| ok::<_, &str>(e.len()))
        .map(|n| n * 2)
        .eval()
        .await;

    assert_eq!(out, ok(8));
    // The success-only step before the recovery never ran.
    assert!(!skipped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_pipeline_async_source_and_steps() {
    let out = lazy(Fetch::thunk_defer(|| async { ok::<_, String>(10) }))
        .map_async(|n| async move { n + 1 })
        .tee_async(|_| async {})
        .filter_or_async(
            |n| {
                let n = *n;
                async move { n > 10 }
            },
            |n| format!("{n} rejected"),
        )
        .eval()
        .await;
    assert_eq!(out, ok(11));
}

#[tokio::test]
async fn test_pipeline_or_else_async_recovery() {
    let out = lazy(err::<i32, String>("gone".to_string()))
        .or_else_async(|e| async move { ok::<_, String>(i32::try_from(e.len()).unwrap()) })
        .eval()
        .await;
    assert_eq!(out, ok(4));
}

#[test]
fn test_pipeline_trace_rendering() {
    let pipeline = lazy(ok::<_, String>(1))
        .map(|n| n + 1)
        .filter_or(|n| *n > 1, |n| format!("{n}"));
    assert_eq!(pipeline.to_string(), "lazy(<ready>).map(..).filter_or(..)");
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_tagged_shape() {
    // Only the active tag's fields are emitted, with no extras.
    let json = serde_json::to_value(ok::<_, String>(1)).unwrap();
    assert_eq!(json, serde_json::json!({"ok": true, "value": 1}));

    let json = serde_json::to_value(err::<i32, _>("boom".to_string())).unwrap();
    assert_eq!(json, serde_json::json!({"ok": false, "error": "boom"}));

    let json = serde_json::to_value(some(5)).unwrap();
    assert_eq!(json, serde_json::json!({"some": true, "value": 5}));

    let json = serde_json::to_value(none::<i32>()).unwrap();
    assert_eq!(json, serde_json::json!({"some": false}));
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_roundtrip() {
    for outcome in [ok::<_, String>(42), err(String::from("boom"))] {
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: Outcome<i32, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, parsed);
    }

    for maybe in [some(42), none::<i32>()] {
        let json = serde_json::to_string(&maybe).unwrap();
        let parsed: Maybe<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(maybe, parsed);
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_normalizes_plain_shapes() {
    // Deserialization is the normalizer: the plain tagged-object shape
    // rebuilds a combinator-bearing instance.
    let parsed: Outcome<i32, String> = serde_json::from_str(r#"{"ok":true,"value":2}"#).unwrap();
    assert_eq!(parsed.map(|n| n * 2), ok(4));

    let parsed: Maybe<i32> = serde_json::from_str(r#"{"some":false}"#).unwrap();
    assert_eq!(parsed, none());

    // A success shape without its payload is rejected.
    let missing: Result<Outcome<i32, String>, _> = serde_json::from_str(r#"{"ok":true}"#);
    assert!(missing.is_err());
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_needs_no_default_payloads() {
    // Payload and error types only need Serialize/Deserialize; neither
    // family requires them to implement Default.
    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Port(u16);

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Refused {
        reason: String,
    }

    let outcome: Outcome<Port, Refused> = ok(Port(8080));
    let json = serde_json::to_string(&outcome).unwrap();
    let parsed: Outcome<Port, Refused> = serde_json::from_str(&json).unwrap();
    assert_eq!(outcome, parsed);

    let outcome: Outcome<Port, Refused> = err(Refused {
        reason: "closed".to_string(),
    });
    let json = serde_json::to_string(&outcome).unwrap();
    let parsed: Outcome<Port, Refused> = serde_json::from_str(&json).unwrap();
    assert_eq!(outcome, parsed);

    let maybe = some(Port(443));
    let json = serde_json::to_string(&maybe).unwrap();
    let parsed: Maybe<Port> = serde_json::from_str(&json).unwrap();
    assert_eq!(maybe, parsed);
}
