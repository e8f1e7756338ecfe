//! Basic usage example for the shunt crate.
//!
//! Run with: `cargo run --example basic_usage`

use shunt::aggregate::{self, Fetch};
use shunt::{Outcome, err, lazy, none, ok, some};

/// Parses a port from a config-style string.
fn parse_port(raw: &str) -> Outcome<u16, String> {
    Outcome::from(raw.trim().parse::<u16>()).map_err(|e| format!("bad port {raw:?}: {e}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Shunt Library Demo ===\n");

    // Eager combinators: short-circuiting, immutable containers.
    let port = parse_port("8080")
        .filter_or(|p| *p >= 1024, |p| format!("port {p} is privileged"))
        .map(|p| p + 1);
    println!("chained: {port}");

    // Optional values bridge into the failure channel and back.
    let fallback = none::<u16>().or_else(|| some(3000)).ok_or("no port at all");
    println!("bridged: {fallback}");

    // A deferred pipeline runs nothing until `eval()`.
    let pipeline = lazy(ok::<_, String>(21))
        .tee(|n| println!("about to double {n}"))
        .map_async(|n| async move { n * 2 })
        .filter_or(|n| *n > 10, |n| format!("{n} is too small"));
    println!("trace:   {pipeline}");
    println!("eval:    {}", pipeline.eval().await);

    // Aggregation resolves sources left to right and stops at the first
    // failure; the third thunk never runs here.
    let combined = aggregate::and(vec![
        Fetch::ready(parse_port("80")),
        Fetch::thunk(|| err("unreachable source".to_string())),
        Fetch::thunk(|| unreachable!("short-circuited")),
    ])
    .await;
    println!("and:     {combined:?}");

    // `or` keeps the first success instead.
    let first_up = aggregate::or(vec![
        Fetch::thunk(|| parse_port("not-a-port")),
        Fetch::thunk_defer(|| async { parse_port("8443") }),
    ])
    .await;
    println!("or:      {first_up}");
}
