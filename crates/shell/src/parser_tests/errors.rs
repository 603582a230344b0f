// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    empty      = { "" },
    blank      = { "   " },
)]
fn empty_requests(line: &str) {
    assert_eq!(parse_operation(line), Err(ParseError::Empty));
}

#[test]
fn address_without_operation() {
    let err = parse_operation("/system-property=prop1").unwrap_err();
    assert!(matches!(err, ParseError::MissingOperation { .. }));
    assert_eq!(err.to_string(), "operation name is missing after the address");
}

#[test]
fn missing_operation_name() {
    let err = parse_operation("/a=b:").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedEof {
            expected: "operation name".to_string()
        }
    );
}

#[test]
fn missing_value_points_at_paren() {
    let line = "/a=b:add(value=)";
    let err = parse_operation(line).unwrap_err();
    assert_eq!(err.span(), Some(Span::new(15, 16)));
    assert_eq!(err.context(line, 40).unwrap(), format!("{line}\n{}^", " ".repeat(15)));
}

#[test]
fn unterminated_quote() {
    let err = parse_operation(":op(a=\"abc)").unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedQuote { span } if span.start == 6));
}

#[test]
fn unterminated_params() {
    let err = parse_operation(":op(a=1").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn unterminated_expression() {
    let err = parse_operation(":op(a=${x)").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn duplicate_parameter() {
    let err = parse_operation(":op(a=1,a=2)").unwrap_err();
    assert_eq!(err.to_string(), "parameter 'a' is given more than once");
    assert_eq!(err.span(), Some(Span::new(8, 9)));
}

#[test]
fn trailing_garbage() {
    let err = parse_operation(":read-resource(recursive=true) junk").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedChar { found: 'j', .. }));
}

#[test]
fn segment_without_equals() {
    let err = parse_operation("/subsystem:read-resource").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedChar { found: ':', .. }));
}

#[test]
fn eof_has_no_caret_context() {
    let err = parse_operation(":op(a=1").unwrap_err();
    assert_eq!(err.context(":op(a=1", 40), None);
}

proptest::proptest! {
    #[test]
    fn never_panics(line in "\\PC{0,40}") {
        let _ = parse_operation(&line);
    }

    #[test]
    fn plain_string_values_survive_display(value in "[a-zA-Z_][a-zA-Z0-9_.-]{0,12}") {
        let line = format!("/system-property=p:add(value={value})");
        let op = parse_operation(&line).unwrap();
        let reparsed = parse_operation(&op.to_string()).unwrap();
        proptest::prop_assert_eq!(reparsed, op);
    }
}
