#![no_main]

use libfuzzer_sys::fuzz_target;
use parpeg::Error;
use parpeg::samples::json;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut ctx = json::JsonContext::new();
        let parsed = json::parse(&mut ctx, s);
        // A syntax error means every speculative node was recycled.
        if matches!(parsed, Err(Error::Syntax { .. })) {
            assert_eq!(ctx.node_count(), 0);
        }
        assert_eq!(ctx.stats().created - ctx.stats().recycled, ctx.node_count());
    }
});
