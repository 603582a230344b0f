// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn single_string_param() {
    let op = parse("/system-property=prop1:add(value=prop1_a)");
    assert_eq!(op.param("value"), Some(&ModelValue::from("prop1_a")));
}

#[test]
fn empty_param_list() {
    assert!(parse(":read-resource()").params.is_empty());
}

#[test]
fn params_keep_input_order() {
    let op = parse(":op(z=1,a=2,m=3)");
    let keys: Vec<&str> = op.params.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[yare::parameterized(
    boolean_true  = { "true", ModelValue::Boolean(true) },
    boolean_false = { "false", ModelValue::Boolean(false) },
    long          = { "42", ModelValue::Long(42) },
    negative      = { "-7", ModelValue::Long(-7) },
    string        = { "hello", ModelValue::from("hello") },
    decimal_text  = { "1.5", ModelValue::from("1.5") },
    url           = { "http://host:8080/x", ModelValue::from("http://host:8080/x") },
    inner_space   = { "two words", ModelValue::from("two words") },
    quoted_true   = { "\"true\"", ModelValue::from("true") },
    quoted_comma  = { "\"a,b\"", ModelValue::from("a,b") },
    escaped_quote = { "\"say \\\"hi\\\"\"", ModelValue::from("say \"hi\"") },
    expression    = { "${jboss.home}", ModelValue::Expression("${jboss.home}".into()) },
    expr_default  = { "${a:${b:c}}", ModelValue::Expression("${a:${b:c}}".into()) },
    expr_embedded = { "pre-${x}-post", ModelValue::Expression("pre-${x}-post".into()) },
    quoted_expr   = { "\"${x}\"", ModelValue::from("${x}") },
)]
fn typed_values(text: &str, expected: ModelValue) {
    let op = parse(&format!(":write-attribute(name=n,value={text})"));
    assert_eq!(op.param("value"), Some(&expected));
}

#[test]
fn flag_param_is_true() {
    let op = parse(":read-resource(recursive)");
    assert_eq!(op.param("recursive"), Some(&ModelValue::Boolean(true)));
}

#[test]
fn list_and_object_values() {
    let op = parse(":op(items=[1, two, \"3\"],props={a=1,b=>x})");
    assert_eq!(
        op.param("items"),
        Some(&ModelValue::List(vec![
            ModelValue::Long(1),
            ModelValue::from("two"),
            ModelValue::from("3"),
        ]))
    );
    let props = op.param("props").unwrap();
    assert_eq!(props.get("a"), Some(&ModelValue::Long(1)));
    assert_eq!(props.get("b"), Some(&ModelValue::from("x")));
}

#[test]
fn empty_list_and_object() {
    let op = parse(":op(a=[],b={})");
    assert_eq!(op.param("a"), Some(&ModelValue::List(vec![])));
    assert_eq!(op.param("b"), Some(&ModelValue::object()));
}

#[test]
fn parse_value_standalone() {
    assert_eq!(parse_value(" 12 ").unwrap(), ModelValue::Long(12));
    assert_eq!(
        parse_value("[a,[b]]").unwrap(),
        ModelValue::List(vec![
            ModelValue::from("a"),
            ModelValue::List(vec![ModelValue::from("b")]),
        ])
    );
}
