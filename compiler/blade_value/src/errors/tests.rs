use super::*;
use pretty_assertions::assert_eq;

// Kind → message

#[test]
fn unsupported_operands_names_operator_and_operands() {
    let err = unsupported_operands("+", &[&Value::Nil, &Value::string("a")]);
    assert_eq!(
        err.kind,
        EvalErrorKind::UnsupportedOperands {
            operation: "+".to_string(),
            operands: vec!["nil (nil)".to_string(), "\"a\" (str)".to_string()],
        }
    );
    assert_eq!(
        err.message,
        "unsupported operand types for `+`: nil (nil) and \"a\" (str)"
    );
    assert_eq!(err.category(), ErrorCategory::Argument);
}

#[test]
fn arity_mismatch_message() {
    assert_eq!(
        arity_mismatch("chr", 1, 2).message,
        "chr() expects 1 argument, got 2"
    );
    assert_eq!(
        arity_mismatch("time", 0, 1).message,
        "time() expects 0 arguments, got 1"
    );
}

#[test]
fn negative_count_is_argument_error() {
    let err = negative_count("*", -3);
    assert_eq!(err.category(), ErrorCategory::Argument);
    assert_eq!(err.message, "`*` cannot repeat a negative number of times (-3)");
}

#[test]
fn invalid_code_point_message() {
    let err = invalid_code_point(0xD800);
    assert_eq!(err.kind, EvalErrorKind::InvalidCodePoint { code: 0xD800 });
    assert_eq!(err.message, "55296 is not a valid code point");
}

#[test]
fn size_out_of_bounds_reports_size_and_limit() {
    let err = size_out_of_bounds("*", 4_294_967_294, 2_147_483_647, "elements");
    assert_eq!(err.category(), ErrorCategory::Bounds);
    assert_eq!(
        err.message,
        "result of `*` would have 4294967294 elements, exceeding the limit of 2147483647"
    );
}

#[test]
fn size_out_of_bounds_names_its_unit() {
    let err = size_out_of_bounds("*", 3_000_000_000, 2_147_483_647, "bytes");
    assert_eq!(
        err.message,
        "result of `*` would have 3000000000 bytes, exceeding the limit of 2147483647"
    );
}

#[test]
fn raised_with_type_and_message() {
    let err = raised(Some("ValueError"), "bad input", Value::Nil);
    assert_eq!(err.message, "ValueError: bad input");
    assert!(err.is_raised());
    assert_eq!(err.value, Some(Value::Nil));
    assert_eq!(err.category(), ErrorCategory::Raised);
}

#[test]
fn raised_with_empty_message_is_type_only() {
    let err = raised(Some("Exception"), "", Value::Nil);
    assert_eq!(err.message, "Exception");
}

#[test]
fn raised_untyped_keeps_message() {
    let err = raised(None, "oops", Value::string("oops"));
    assert_eq!(err.message, "oops");
    assert_eq!(err.value, Some(Value::string("oops")));
}

#[test]
fn recursion_limit_is_resource_error() {
    let err = recursion_limit_exceeded(200);
    assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 200 });
    assert_eq!(err.category(), ErrorCategory::Resource);
    assert_eq!(err.message, "maximum recursion depth exceeded (limit: 200)");
}

// Backtrace

#[test]
fn backtrace_display() {
    let bt = EvalBacktrace::new(vec![
        BacktraceFrame {
            function: "inner".to_string(),
            source: "main.b".to_string(),
            location: Some(SourceLocation::new(3, 5)),
        },
        BacktraceFrame {
            function: ":program".to_string(),
            source: "main.b".to_string(),
            location: None,
        },
    ]);
    assert_eq!(bt.len(), 2);
    assert_eq!(
        bt.to_string(),
        "stack backtrace:\n  0: inner (main.b:3:5)\n  1: :program (main.b)\n"
    );
}

#[test]
fn empty_backtrace_displays_nothing() {
    let bt = EvalBacktrace::default();
    assert!(bt.is_empty());
    assert_eq!(bt.to_string(), "");
}

#[test]
fn builder_methods_attach_context() {
    let err = raised(Some("E"), "m", Value::Nil)
        .with_backtrace(EvalBacktrace::default())
        .with_traceback("E: m".to_string());
    assert!(err.backtrace.is_some());
    assert_eq!(err.traceback.as_deref(), Some("E: m"));
    assert_eq!(err.to_string(), "E: m");
}
