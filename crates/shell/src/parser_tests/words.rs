// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    blank       = { "", true },
    spaces      = { "   ", true },
    comment     = { "# note", true },
    indented    = { "   # note", true },
    command     = { "batch", false },
    operation   = { ":read-resource", false },
)]
fn skippable_lines(line: &str, expected: bool) {
    assert_eq!(is_skippable(line), expected);
}

#[yare::parameterized(
    bare       = { "batch", "batch", "" },
    with_arg   = { "holdback-batch  mine ", "holdback-batch", "mine" },
    with_line  = { "edit-batch-line 2 /a=b:add(value=x y)", "edit-batch-line", "2 /a=b:add(value=x y)" },
    padded     = { "  run-batch --verbose", "run-batch", "--verbose" },
)]
fn command_split(line: &str, word: &str, rest: &str) {
    assert_eq!(split_command(line), (word, rest));
}

#[test]
fn args_respect_brackets_and_quotes() {
    let args = split_args("--headers={a=1; b=\"x y\"} --verbose");
    assert_eq!(args, vec!["--headers={a=1; b=\"x y\"}", "--verbose"]);
}

#[test]
fn top_level_split_keeps_nested_commas() {
    let parts = split_top_level(
        "batch, /a=b:add(x=1,y=[2,3]) ,:op(s=\"p,q\"),,run-batch",
        ',',
    );
    assert_eq!(
        parts,
        vec!["batch", "/a=b:add(x=1,y=[2,3])", ":op(s=\"p,q\")", "run-batch"]
    );
}

#[test]
fn escaped_quote_stays_inside_string() {
    let parts = split_top_level(":op(s=\"a\\\",b\"),x", ',');
    assert_eq!(parts, vec![":op(s=\"a\\\",b\")", "x"]);
}
