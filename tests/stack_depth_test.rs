// Stack depth tests for recursive grammars
// Run with: cargo test --features samples --test stack_depth_test -- --nocapture
//
// Matching is plain recursion, so nesting depth is bounded by the thread
// stack. These tests pin down depths that must keep working and check that
// deep speculation still recycles every dead node.

#![cfg(feature = "samples")]

use parpeg::samples::{json, list};
use std::thread;

fn nested_list(depth: usize) -> String {
    "(".repeat(depth) + "x" + &")".repeat(depth)
}

fn nested_array(depth: usize) -> String {
    "[".repeat(depth) + "1" + &"]".repeat(depth)
}

#[test]
fn moderate_depth_on_default_stack() {
    for depth in [10, 30, 60] {
        let input = nested_list(depth);
        let mut ctx = list::ListContext::new();
        list::parse(&mut ctx, &input).unwrap_or_else(|e| panic!("depth {depth}: {e}"));
        assert_eq!(ctx.node_count(), depth + 1);
        assert_eq!(list::serialize(&ctx, &input), input);
    }
}

#[test]
fn test_with_larger_stack() {
    println!("\n=== Nesting depth with 8MB stack ===\n");

    let handle = thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(|| {
            for depth in [100, 250, 500] {
                let input = nested_list(depth);
                let mut ctx = list::ListContext::new();
                match list::parse(&mut ctx, &input) {
                    Ok(()) => println!("list depth {depth}: ✓ {} nodes", ctx.node_count()),
                    Err(e) => panic!("list depth {depth}: ✗ {e}"),
                }

                let input = nested_array(depth);
                let mut ctx = json::JsonContext::new();
                match json::parse(&mut ctx, &input) {
                    Ok(_) => println!("json depth {depth}: ✓ {} nodes", ctx.node_count()),
                    Err(e) => panic!("json depth {depth}: ✗ {e}"),
                }
            }
        })
        .expect("Failed to spawn thread");

    handle.join().expect("Thread panicked");
}

#[test]
fn deep_failure_recycles_everything() {
    let handle = thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(|| {
            // Unbalanced: every level is built and then abandoned.
            let depth = 300;
            let input = "(".repeat(depth) + "x" + &")".repeat(depth - 1);
            let mut ctx = list::ListContext::new();
            assert!(list::parse(&mut ctx, &input).is_err());
            assert_eq!(ctx.node_count(), 0);
            assert_eq!(ctx.live_bytes(), 0);
            assert_eq!(ctx.stats().created, ctx.stats().recycled);
        })
        .expect("Failed to spawn thread");

    handle.join().expect("Thread panicked");
}
