// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn root_operation() {
    let op = parse(":read-resource");
    assert!(op.address.is_root());
    assert_eq!(op.name, "read-resource");
    assert!(op.params.is_empty());
}

#[yare::parameterized(
    leading_slash = { "/system-property=prop1:read-resource" },
    no_slash      = { "system-property=prop1:read-resource" },
    spaced        = { "  /system-property = prop1 : read-resource  " },
)]
fn single_segment(line: &str) {
    let op = parse(line);
    assert_eq!(op.address, Address::root().child("system-property", "prop1"));
    assert_eq!(op.name, "read-resource");
}

#[test]
fn slash_root() {
    assert!(parse("/:read-children-types").address.is_root());
}

#[test]
fn nested_segments() {
    let op = parse("/subsystem=logging/logger=com.example:remove");
    assert_eq!(
        op.address,
        Address::root()
            .child("subsystem", "logging")
            .child("logger", "com.example")
    );
}

#[test]
fn quoted_segment_name() {
    let op = parse("/path=\"a/b:c\":read-resource");
    assert_eq!(op.address, Address::root().child("path", "a/b:c"));
}

#[test]
fn display_round_trips_the_line() {
    let line = "/system-property=prop1:add(value=prop1_b)";
    assert_eq!(parse(line).to_string(), line);
}
