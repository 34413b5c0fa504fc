#![no_main]

use libfuzzer_sys::fuzz_target;
use parpeg::samples::calc::Calculator;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut calc = Calculator::new();
        let _ = calc.evaluate(s, &[("x", 7), ("y", -3)]);
    }
});
