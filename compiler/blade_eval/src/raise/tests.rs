use super::*;
use std::sync::Arc;

use blade_value::{ClassRef, ErrorCategory, EvalErrorKind, ObjectRef};
use pretty_assertions::assert_eq;

use crate::diagnostics::CallFrame;

fn stack() -> CallStack {
    let mut stack = CallStack::default();
    let source: Arc<str> = Arc::from("main.b");
    assert!(stack
        .push(CallFrame::new(Arc::from(":program"), Arc::clone(&source), None))
        .is_ok());
    assert!(stack
        .push(CallFrame::new(
            Arc::from("check"),
            source,
            Some(SourceLocation::new(9, 1)),
        ))
        .is_ok());
    stack
}

fn error_object(class: &str, message: Option<Value>) -> ObjectRef {
    let object = ObjectRef::new(ClassRef::new(class));
    if let Some(message) = message {
        object.set(MESSAGE_FIELD, message);
    }
    object
}

#[test]
fn object_with_message() {
    let object = error_object("ValueError", Some(Value::string("bad input")));
    let err = raise(
        Value::object(object.clone()),
        SourceLocation::new(4, 5),
        &stack(),
    );

    assert_eq!(
        err.kind,
        EvalErrorKind::Raised {
            type_name: Some("ValueError".to_string()),
            message: "bad input".to_string(),
        }
    );
    assert_eq!(err.category(), ErrorCategory::Raised);
    let expected = "ValueError: bad input\n\tat main.b:4:5 -> check()\n\tat main.b:9:1 -> @.script()";
    assert_eq!(err.traceback.as_deref(), Some(expected));
    assert_eq!(object.get(STACKTRACE_FIELD), Some(Value::string(expected)));
    assert_eq!(err.value, Some(Value::object(object)));
}

#[test]
fn object_without_message_has_type_only_header() {
    let object = error_object("Exception", None);
    let err = raise(Value::object(object), SourceLocation::new(1, 1), &stack());
    assert_eq!(err.message, "Exception");
    let traceback = err.traceback.unwrap_or_default();
    assert!(traceback.starts_with("Exception\n\tat "));
}

#[test]
fn nil_message_is_absent() {
    let object = error_object("Exception", Some(Value::Nil));
    let err = raise(Value::object(object), SourceLocation::new(1, 1), &stack());
    assert_eq!(
        err.kind,
        EvalErrorKind::Raised {
            type_name: Some("Exception".to_string()),
            message: String::new(),
        }
    );
}

#[test]
fn non_text_message_uses_textual_form() {
    let object = error_object("CodeError", Some(Value::Int(42)));
    let err = raise(Value::object(object), SourceLocation::new(1, 1), &stack());
    assert_eq!(err.message, "CodeError: 42");
}

#[test]
fn reraise_keeps_original_traceback() {
    let object = error_object("E", Some(Value::string("m")));
    let first = raise(
        Value::object(object.clone()),
        SourceLocation::new(4, 5),
        &stack(),
    );

    let mut outer = CallStack::default();
    assert!(outer
        .push(CallFrame::new(Arc::from(":program"), Arc::from("other.b"), None))
        .is_ok());
    let second = raise(
        Value::object(object.clone()),
        SourceLocation::new(20, 2),
        &outer,
    );

    assert_eq!(first.traceback, second.traceback);
    assert_eq!(
        object.get(STACKTRACE_FIELD).map(|v| v.display_value()),
        first.traceback
    );
    // The backtrace itself reflects where the re-raise happened.
    assert_eq!(second.backtrace.as_ref().map(EvalBacktrace::len), Some(1));
}

#[test]
fn non_object_value_has_no_header() {
    let err = raise(Value::string("plain"), SourceLocation::new(3, 3), &stack());
    assert_eq!(
        err.kind,
        EvalErrorKind::Raised {
            type_name: None,
            message: "plain".to_string(),
        }
    );
    assert!(err.traceback.is_none());
    assert_eq!(err.value, Some(Value::string("plain")));
    assert_eq!(err.backtrace.as_ref().map(EvalBacktrace::len), Some(2));
}

#[test]
fn render_without_header() {
    let bt = stack().capture(Some(SourceLocation::new(2, 2)));
    assert_eq!(
        render_traceback(None, &bt),
        "\tat main.b:2:2 -> check()\n\tat main.b:9:1 -> @.script()"
    );
}

#[test]
fn header_forms() {
    assert_eq!(header("E", "m"), "E: m");
    assert_eq!(header("E", ""), "E");
}
