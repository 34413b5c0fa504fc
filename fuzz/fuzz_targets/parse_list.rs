#![no_main]

use libfuzzer_sys::fuzz_target;
use parpeg::samples::list;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut ctx = list::ListContext::new();
        if list::parse(&mut ctx, s).is_ok() {
            // Re-serializing a parsed list must parse to the same tree.
            let canonical = list::serialize(&ctx, s);
            let count = ctx.node_count();
            list::parse(&mut ctx, &canonical).unwrap();
            assert_eq!(ctx.node_count(), count);
            assert_eq!(list::serialize(&ctx, &canonical), canonical);
        }
    }
});
