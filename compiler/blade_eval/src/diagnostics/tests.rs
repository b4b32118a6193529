use super::*;
use blade_value::{raised, EvalErrorKind, Value};
use pretty_assertions::assert_eq;

fn frame(function: &str, call_site: Option<SourceLocation>) -> CallFrame {
    CallFrame::new(Arc::from(function), Arc::from("main.b"), call_site)
}

// CallStack basic operations

#[test]
fn empty_stack() {
    let stack = CallStack::new(Some(100));
    assert!(stack.is_empty());
    assert_eq!(stack.depth(), 0);
    assert!(stack.current_frame().is_none());
    assert!(stack.capture(None).is_empty());
}

#[test]
fn push_and_pop() {
    let mut stack = CallStack::default();
    assert!(stack.push(frame("foo", None)).is_ok());
    assert_eq!(stack.depth(), 1);
    assert_eq!(
        stack.current_frame().map(|f| &*f.function),
        Some("foo")
    );
    stack.pop();
    assert!(stack.is_empty());
}

#[test]
fn depth_limit_enforced() {
    let mut stack = CallStack::new(Some(3));
    for _ in 0..3 {
        assert!(stack.push(frame("recurse", None)).is_ok());
    }
    let err = match stack.push(frame("recurse", None)) {
        Ok(()) => panic!("push should fail at max depth"),
        Err(err) => err,
    };
    assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 3 });
    assert_eq!(err.backtrace.as_ref().map(EvalBacktrace::len), Some(3));
    // Depth unchanged after failed push
    assert_eq!(stack.depth(), 3);
}

#[test]
fn unlimited_depth() {
    let mut stack = CallStack::new(None);
    for _ in 0..10_000 {
        assert!(stack.push(frame("deep", None)).is_ok());
    }
    assert_eq!(stack.depth(), 10_000);
    assert_eq!(stack.max_depth(), None);
}

// Backtrace capture

#[test]
fn capture_pairs_frames_with_locations() {
    let mut stack = CallStack::default();
    assert!(stack.push(frame(":program", None)).is_ok());
    assert!(stack
        .push(frame("outer", Some(SourceLocation::new(10, 1))))
        .is_ok());
    assert!(stack
        .push(frame("inner", Some(SourceLocation::new(4, 3))))
        .is_ok());

    let bt = stack.capture(Some(SourceLocation::new(2, 5)));
    let summary: Vec<_> = bt
        .frames()
        .iter()
        .map(|f| (f.function.as_str(), f.location))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("inner", Some(SourceLocation::new(2, 5))),
            ("outer", Some(SourceLocation::new(4, 3))),
            (":program", Some(SourceLocation::new(10, 1))),
        ]
    );
}

#[test]
fn attach_backtrace_keeps_existing() {
    let mut stack = CallStack::default();
    assert!(stack.push(frame("f", None)).is_ok());
    let err = raised(None, "x", Value::Nil).with_backtrace(EvalBacktrace::default());
    let err = stack.attach_backtrace(err, None);
    assert_eq!(err.backtrace.as_ref().map(EvalBacktrace::len), Some(0));

    let fresh = stack.attach_backtrace(raised(None, "x", Value::Nil), None);
    assert_eq!(fresh.backtrace.as_ref().map(EvalBacktrace::len), Some(1));
}

#[test]
fn attach_backtrace_on_empty_stack_is_noop() {
    let stack = CallStack::default();
    let err = stack.attach_backtrace(raised(None, "x", Value::Nil), None);
    assert!(err.backtrace.is_none());
}
