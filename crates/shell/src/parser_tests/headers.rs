// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn headers_after_params() {
    let op = parse("/deployment=a.war:redeploy(force=true){allow-resource-service-restart=true}");
    assert_eq!(op.param("force"), Some(&ModelValue::Boolean(true)));
    assert_eq!(
        op.headers.get("allow-resource-service-restart"),
        Some(&ModelValue::Boolean(true))
    );
}

#[test]
fn headers_without_params() {
    let op = parse(":reload{blocking-timeout=30}");
    assert!(op.params.is_empty());
    assert_eq!(op.headers.get("blocking-timeout"), Some(&ModelValue::Long(30)));
}

#[test]
fn standalone_header_block() {
    let headers = parse_headers("{rollback-on-runtime-failure=false; blocking-timeout=5}").unwrap();
    let keys: Vec<&str> = headers.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["rollback-on-runtime-failure", "blocking-timeout"]);
    assert_eq!(headers[0], ModelValue::Boolean(false));
    assert_eq!(headers[1], ModelValue::Long(5));
}

#[test]
fn empty_header_block() {
    assert!(parse_headers("{}").unwrap().is_empty());
}

#[yare::parameterized(
    no_brace      = { "a=b" },
    unclosed      = { "{a=b" },
    missing_value = { "{a=}" },
    trailing      = { "{a=b} extra" },
)]
fn invalid_header_blocks(text: &str) {
    assert!(parse_headers(text).is_err());
}
