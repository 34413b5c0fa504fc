//! Seed corpus definitions for fuzz targets.
//!
//! These seeds are the source of truth for fuzzing starting points.
//! The `generate-seeds` binary writes these to `corpus/` directories
//! where libFuzzer picks them up.

/// JSON seeds covering every value kind plus common malformations.
#[rustfmt::skip]
pub const JSON_SEEDS: &[(&str, &str)] = &[
    // Scalars
    ("null", "null"),
    ("true", "true"),
    ("zero", "0"),
    ("negative_exp", "-1.5e-3"),
    ("string", r#""hello""#),
    ("escapes", r#""\"\\\/\b\f\n\r\t""#),
    ("surrogate_pair", r#""\ud83d\ude00""#),

    // Containers
    ("empty_array", "[]"),
    ("empty_object", "{}"),
    ("nested", r#"{"a": [1, {"b": [true, null]}], "c": "d"}"#),
    ("deep_array", "[[[[[[[[[[1]]]]]]]]]]"),

    // Malformed
    ("trailing_comma", "[1, 2,]"),
    ("leading_zero", "01"),
    ("unterminated", r#"{"a": "#),
    ("bare_word", "nul"),
    ("trailing_garbage", "[] x"),
];

/// Nested list seeds, including trailing separators and unbalanced input.
#[rustfmt::skip]
pub const LIST_SEEDS: &[(&str, &str)] = &[
    ("empty", "()"),
    ("flat", "(a,b,c)"),
    ("nested", "(a,(b,(c,d)),e)"),
    ("trailing_sep", "(a,b,)"),
    ("double_sep", "(a,,b)"),
    ("unbalanced", "((a)"),
    ("word", "abc"),
];

/// Calculator seeds exercising precedence and postfix chains.
#[rustfmt::skip]
pub const CALC_SEEDS: &[(&str, &str)] = &[
    ("simple", "1 + 2"),
    ("precedence", "1 + 2 * 3 - 4 / 2"),
    ("postfix_chain", "x++--++"),
    ("prefix", "--x"),
    ("parens", "-(x + 1) * (y - 2)"),
    ("division_by_zero", "1 / (x - 7)"),
    ("overflow", "9223372036854775807 + 1"),
    ("dangling_operator", "1 + * 2"),
];
