// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{FakeController, LocalController};
use mgmt_core::{ModelValue, STEPS};
use std::io::Write;

fn local() -> (CommandContext<LocalController>, LocalController) {
    let controller = LocalController::new();
    (CommandContext::new(controller.clone()), controller)
}

async fn ok(ctx: &mut CommandContext<impl Controller>, line: &str) -> CommandOutput {
    match ctx.handle(line).await {
        Ok(output) => output,
        Err(e) => panic!("{line:?} failed: {e}"),
    }
}

async fn err(ctx: &mut CommandContext<impl Controller>, line: &str) -> CommandError {
    match ctx.handle(line).await {
        Ok(output) => panic!("{line:?} unexpectedly succeeded: {output:?}"),
        Err(e) => e,
    }
}

fn step_lines<C: Controller>(ctx: &CommandContext<C>) -> Vec<String> {
    ctx.session()
        .current_steps()
        .iter()
        .map(|c| c.line.clone())
        .collect()
}

fn value(s: &str) -> Option<ModelValue> {
    Some(ModelValue::from(s))
}

#[tokio::test]
async fn immediate_operation_outside_batch_mode() {
    let (mut ctx, controller) = local();
    let output = ok(&mut ctx, "/system-property=prop1:add(value=prop1_a)").await;
    assert_eq!(output, CommandOutput::Response(ControllerResponse::success(None)));
    assert_eq!(controller.property("prop1"), value("prop1_a"));
}

#[tokio::test]
async fn failed_immediate_operation_is_an_error() {
    let (mut ctx, _controller) = local();
    let e = err(&mut ctx, "/system-property=nope:remove").await;
    assert!(matches!(e, CommandError::OperationFailed(ref m) if m.starts_with("CTL0216:")));
}

#[tokio::test]
async fn blank_and_comment_lines_do_nothing() {
    let (mut ctx, controller) = local();
    assert_eq!(ok(&mut ctx, "   ").await, CommandOutput::Nothing);
    assert_eq!(ok(&mut ctx, "# batch").await, CommandOutput::Nothing);
    assert!(!ctx.is_batch_mode());
    assert!(controller.executed().is_empty());
}

#[tokio::test]
async fn batch_mode_captures_without_executing() {
    let (mut ctx, controller) = local();
    ok(&mut ctx, "/system-property=prop1:add(value=prop1_a)").await;
    ok(&mut ctx, "batch").await;
    assert!(ctx.is_batch_mode());

    let captured = ok(
        &mut ctx,
        "/system-property=prop1:write-attribute(name=value,value=prop1_b)",
    )
    .await;
    assert_eq!(captured, CommandOutput::Nothing);
    assert_eq!(controller.property("prop1"), value("prop1_a"));
    assert_eq!(controller.executed().len(), 1);
    assert_eq!(step_lines(&ctx).len(), 1);
}

#[tokio::test]
async fn successful_batch_applies_every_step_and_leaves_batch_mode() {
    let (mut ctx, controller) = local();
    ok(&mut ctx, "/system-property=prop1:add(value=prop1_a)").await;
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/system-property=prop1:write-attribute(name=value,value=prop1_b)").await;
    ok(&mut ctx, "/system-property=prop2:add(value=prop2_a)").await;
    ok(&mut ctx, "/system-property=prop2:write-attribute(name=value,value=prop2_b)").await;
    assert_eq!(controller.property("prop1"), value("prop1_a"));
    assert_eq!(controller.property("prop2"), None);

    let output = ok(&mut ctx, "run-batch").await;
    assert_eq!(output, CommandOutput::Message(BATCH_SUCCEEDED.to_string()));
    assert!(!ctx.is_batch_mode());
    assert_eq!(controller.property("prop1"), value("prop1_b"));
    assert_eq!(controller.property("prop2"), value("prop2_b"));
}

#[tokio::test]
async fn failed_batch_rolls_back_and_keeps_session() {
    let (mut ctx, controller) = local();
    ok(&mut ctx, "/system-property=prop1:add(value=prop1_a)").await;
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/system-property=prop2:add(value=prop2_a)").await;
    ok(&mut ctx, "/system-property=prop1:add(value=prop1_b)").await;
    let before_steps = step_lines(&ctx);
    let before_model = controller.snapshot();

    let e = err(&mut ctx, "run-batch").await;
    let CommandError::BatchFailed(failure) = &e else {
        panic!("expected batch failure, got {e:?}");
    };
    assert_eq!(failure.code.as_deref(), Some("CTL0062"));
    assert!(e
        .to_string()
        .contains("/system-property=prop1:add(value=prop1_b)"));

    assert_eq!(controller.snapshot(), before_model);
    assert_eq!(controller.property("prop1"), value("prop1_a"));
    assert_eq!(controller.property("prop2"), None);
    assert!(ctx.is_batch_mode());
    assert_eq!(step_lines(&ctx), before_steps);

    ok(&mut ctx, "discard-batch").await;
    assert!(!ctx.is_batch_mode());
    assert_eq!(controller.property("prop1"), value("prop1_a"));
}

#[tokio::test]
async fn sequencing_errors_outside_batch_mode() {
    let (mut ctx, controller) = local();
    for line in [
        "run-batch",
        "discard-batch",
        "holdback-batch later",
        "list-batch",
        "clear-batch",
        "remove-batch-line 1",
        "move-batch-line 1 2",
        "edit-batch-line 1 :read-resource",
    ] {
        let e = err(&mut ctx, line).await;
        assert!(
            matches!(e, CommandError::Batch(BatchError::NotActive)),
            "{line}: {e:?}"
        );
        assert_eq!(e.to_string(), "not in batch mode");
    }
    assert!(controller.executed().is_empty());
}

#[tokio::test]
async fn batch_twice_is_an_error() {
    let (mut ctx, _controller) = local();
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/a=b:add").await;
    let e = err(&mut ctx, "batch").await;
    assert_eq!(e.to_string(), "already in batch mode");
    assert_eq!(step_lines(&ctx), vec!["/a=b:add"]);
}

#[tokio::test]
async fn hold_back_round_trip() {
    let (mut ctx, _controller) = local();
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/system-property=a:add(value=1)").await;
    ok(&mut ctx, "system-property=b:add(value=2)").await;
    let before = step_lines(&ctx);

    ok(&mut ctx, "holdback-batch later").await;
    assert!(!ctx.is_batch_mode());
    assert_eq!(
        ok(&mut ctx, "batch -l").await,
        CommandOutput::Lines(vec!["later".to_string()])
    );

    ok(&mut ctx, "batch later").await;
    assert!(ctx.is_batch_mode());
    assert_eq!(step_lines(&ctx), before);
    assert!(ctx.store().is_empty());
}

#[tokio::test]
async fn batched_step_matches_immediate_execution() {
    let (mut ctx, controller) = local();
    ok(&mut ctx, "/system-property=direct:add(value=a,operation=x)").await;
    assert_eq!(controller.property("direct"), value("a"));

    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/system-property=batched:add(value=a,operation=x)").await;
    ok(&mut ctx, "/system-property=other:add(value=b,address=y)").await;
    let output = ok(&mut ctx, "run-batch").await;
    assert_eq!(output, CommandOutput::Message(BATCH_SUCCEEDED.to_string()));
    assert_eq!(controller.property("batched"), value("a"));
    assert_eq!(controller.property("other"), value("b"));
}

#[tokio::test]
async fn quoted_batch_name_is_unquoted() {
    let (mut ctx, _controller) = local();
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/a=1:add").await;
    ok(&mut ctx, "holdback-batch \"parked\"").await;
    assert_eq!(
        ok(&mut ctx, "batch -l").await,
        CommandOutput::Lines(vec!["parked".to_string()])
    );
    ok(&mut ctx, "batch parked").await;
    assert_eq!(step_lines(&ctx), vec!["/a=1:add"]);
}

#[tokio::test]
async fn hold_back_name_collision_fails_closed() {
    let (mut ctx, _controller) = local();
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/a=1:add").await;
    ok(&mut ctx, "holdback-batch x").await;
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/a=2:add").await;

    let e = err(&mut ctx, "holdback-batch x").await;
    assert_eq!(e.to_string(), "a batch named 'x' is already held back");
    assert!(ctx.is_batch_mode());
    assert_eq!(step_lines(&ctx), vec!["/a=2:add"]);

    ok(&mut ctx, "discard-batch").await;
    ok(&mut ctx, "batch x").await;
    assert_eq!(step_lines(&ctx), vec!["/a=1:add"]);
}

#[tokio::test]
async fn activate_unknown_or_while_batching() {
    let (mut ctx, _controller) = local();
    let e = err(&mut ctx, "batch nope").await;
    assert_eq!(e.to_string(), "no held back batch named 'nope'");
    assert!(!ctx.is_batch_mode());

    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "holdback-batch parked").await;
    ok(&mut ctx, "batch").await;
    let e = err(&mut ctx, "batch parked").await;
    assert!(matches!(e, CommandError::Batch(BatchError::AlreadyActive)));
    assert!(ctx.store().contains("parked"));
}

#[tokio::test]
async fn failed_batch_does_not_touch_store() {
    let (mut ctx, controller) = local();
    controller.run("/system-property=dup:add(value=x)");
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/system-property=keep:add(value=1)").await;
    ok(&mut ctx, "holdback-batch keep").await;

    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/system-property=dup:add(value=y)").await;
    err(&mut ctx, "run-batch").await;
    ok(&mut ctx, "discard-batch").await;

    assert_eq!(ctx.store().names().collect::<Vec<_>>(), vec!["keep"]);
    ok(&mut ctx, "batch keep").await;
    assert_eq!(step_lines(&ctx), vec!["/system-property=keep:add(value=1)"]);
}

#[tokio::test]
async fn parse_errors_are_not_captured() {
    let (mut ctx, _controller) = local();
    ok(&mut ctx, "batch").await;
    let e = err(&mut ctx, "/system-property=p:add(value=").await;
    assert!(matches!(e, CommandError::Parse { .. }));
    assert!(e.diagnostic().is_none());

    let e = err(&mut ctx, "/system-property=p:add(value=))").await;
    assert!(e.diagnostic().unwrap().contains('^'));
    assert!(step_lines(&ctx).is_empty());
}

#[tokio::test]
async fn headers_reach_the_composite() {
    let controller = FakeController::new();
    let mut ctx = CommandContext::new(controller.clone());
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/deployment=app.war:redeploy").await;
    ok(&mut ctx, "run-batch --headers={allow-resource-service-restart=true}").await;

    let calls = controller.calls();
    assert_eq!(calls.len(), 1);
    let composite = &calls[0];
    assert!(composite.is_composite());
    assert_eq!(
        composite.headers.get("allow-resource-service-restart"),
        Some(&ModelValue::Boolean(true))
    );
    let steps = composite.param(STEPS).and_then(ModelValue::as_list).unwrap();
    assert_eq!(steps.len(), 1);
    assert!(steps[0].get("operation-headers").is_none());
}

#[tokio::test]
async fn transport_failure_keeps_session() {
    let controller = FakeController::new();
    controller.reply(Err(ControllerError::Timeout));
    let mut ctx = CommandContext::new(controller.clone());
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/a=1:add").await;

    let e = err(&mut ctx, "run-batch").await;
    assert!(matches!(e, CommandError::Controller(ControllerError::Timeout)));
    assert!(ctx.is_batch_mode());
    assert_eq!(step_lines(&ctx), vec!["/a=1:add"]);

    // no retry: the next run is a fresh call
    ok(&mut ctx, "run-batch").await;
    assert_eq!(controller.calls().len(), 2);
    assert!(!ctx.is_batch_mode());
}

#[tokio::test]
async fn empty_batch_still_runs() {
    let controller = FakeController::new();
    let mut ctx = CommandContext::new(controller.clone());
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "run-batch").await;
    assert_eq!(
        controller.calls()[0].param(STEPS),
        Some(&ModelValue::List(vec![]))
    );
}

#[tokio::test]
async fn verbose_run_returns_response() {
    let (mut ctx, _controller) = local();
    ok(&mut ctx, "batch").await;
    ok(&mut ctx, "/system-property=v:add(value=1)").await;
    let CommandOutput::Response(response) = ok(&mut ctx, "run-batch --verbose").await else {
        panic!("expected a response");
    };
    assert!(response.is_success());
    assert!(response.result.unwrap().get("step-1").is_some());
}

#[tokio::test]
async fn editing_commands() {
    let (mut ctx, _controller) = local();
    ok(&mut ctx, "batch").await;
    assert_eq!(
        ok(&mut ctx, "list-batch").await,
        CommandOutput::Message("The batch is empty.".to_string())
    );
    ok(&mut ctx, "/a=1:add").await;
    ok(&mut ctx, "/a=2:add").await;
    ok(&mut ctx, "/a=3:add").await;

    ok(&mut ctx, "move-batch-line 3 1").await;
    ok(&mut ctx, "remove-batch-line 2").await;
    ok(&mut ctx, "edit-batch-line 2 /a=9:add").await;
    assert_eq!(
        ok(&mut ctx, "list-batch").await,
        CommandOutput::Lines(vec!["#1 /a=3:add".to_string(), "#2 /a=9:add".to_string()])
    );

    let e = err(&mut ctx, "remove-batch-line 5").await;
    assert!(matches!(e, CommandError::Batch(BatchError::LineOutOfRange { line: 5, len: 2 })));
    let e = err(&mut ctx, "edit-batch-line 1 /a=1:add(").await;
    assert!(matches!(e, CommandError::Parse { .. }));
    assert_eq!(step_lines(&ctx), vec!["/a=3:add", "/a=9:add"]);

    ok(&mut ctx, "clear-batch").await;
    assert!(ctx.is_batch_mode());
    assert!(step_lines(&ctx).is_empty());
}

fn batch_file(lines: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(lines.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn run_batch_from_file() {
    let (mut ctx, controller) = local();
    let file = batch_file(
        "# properties\n/system-property=f1:add(value=1)\n\n/system-property=f2:add(value=2)\n",
    );
    let line = format!("run-batch --file={}", file.path().display());
    assert_eq!(
        ok(&mut ctx, &line).await,
        CommandOutput::Message(BATCH_SUCCEEDED.to_string())
    );
    assert_eq!(controller.property("f1"), Some(ModelValue::Long(1)));
    assert_eq!(controller.property("f2"), Some(ModelValue::Long(2)));
    assert!(!ctx.is_batch_mode());
}

#[tokio::test]
async fn run_batch_file_failure_and_misuse() {
    let (mut ctx, controller) = local();
    controller.run("/system-property=f1:add(value=0)");
    let file = batch_file("/system-property=f2:add(value=2)\n/system-property=f1:add(value=1)\n");
    let line = format!("run-batch --file={}", file.path().display());

    let e = err(&mut ctx, &line).await;
    assert!(e
        .to_string()
        .starts_with("The batch failed with the following error: CTL0062"));
    assert_eq!(controller.property("f2"), None);
    assert!(!ctx.is_batch_mode());

    ok(&mut ctx, "batch").await;
    let e = err(&mut ctx, &line).await;
    assert!(matches!(e, CommandError::Batch(BatchError::FileInBatchMode)));
    assert!(step_lines(&ctx).is_empty());
}

#[tokio::test]
async fn run_batch_missing_file() {
    let (mut ctx, _controller) = local();
    let e = err(&mut ctx, "run-batch --file=/nonexistent/ops.cli").await;
    assert!(matches!(e, CommandError::ReadFile { .. }));
    assert!(e.to_string().starts_with("failed to read /nonexistent/ops.cli"));
}
