use super::*;
use pretty_assertions::assert_eq;
use std::collections::hash_map::DefaultHasher;

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_value_truthy() {
    assert!(Value::Bool(true).is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!Value::Nil.is_truthy());
    assert!(Value::Int(0).is_truthy());
    assert!(Value::string("").is_truthy());
}

#[test]
fn test_display_value() {
    assert_eq!(Value::Int(42).display_value(), "42");
    assert_eq!(Value::Float(3.0).display_value(), "3.0");
    assert_eq!(Value::Float(2.5).display_value(), "2.5");
    assert_eq!(Value::Bool(true).display_value(), "true");
    assert_eq!(Value::Nil.display_value(), "nil");
    assert_eq!(Value::string("hello").display_value(), "hello");
    assert_eq!(
        Value::list(vec![Value::Int(1), Value::string("a")]).display_value(),
        "[1, a]"
    );
}

#[test]
fn test_display_quotes_text() {
    assert_eq!(format!("{}", Value::string("hello")), "\"hello\"");
    assert_eq!(format!("{}", Value::Int(7)), "7");
    assert_eq!(
        format!("{}", Value::list(vec![Value::string("x"), Value::Nil])),
        "[\"x\", nil]"
    );
}

#[test]
fn test_object_display_uses_class() {
    let obj = ObjectRef::new(ClassRef::new("Exception"));
    assert_eq!(Value::object(obj).display_value(), "<Exception object>");
}

#[test]
fn test_callable_display() {
    assert_eq!(Value::callable("print", true).display_value(), "<builtin print>");
    assert_eq!(Value::callable("fib", false).display_value(), "<function fib>");
}

#[test]
fn test_factory_methods() {
    let s = Value::string("hello");
    assert_eq!(s.as_str(), Some("hello"));

    let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(list.as_list().map(<[Value]>::len), Some(2));
}

#[test]
fn test_numeric_views() {
    assert_eq!(Value::Int(3).as_number(), Some(3.0));
    assert_eq!(Value::Float(1.5).as_number(), Some(1.5));
    assert_eq!(Value::string("1").as_number(), None);
    assert_eq!(Value::Int(3).as_float(), None);
    assert_eq!(Value::Float(3.0).as_int(), None);
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Nil.type_name(), "nil");
    assert_eq!(Value::Int(1).type_name(), "int");
    assert_eq!(Value::Float(1.0).type_name(), "float");
    assert_eq!(Value::string("").type_name(), "str");
    assert_eq!(Value::list(vec![]).type_name(), "list");
}

#[test]
fn test_structural_equality() {
    assert_eq!(Value::string("a"), Value::string("a"));
    assert_eq!(
        Value::list(vec![Value::Int(1)]),
        Value::list(vec![Value::Int(1)])
    );
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

#[test]
fn test_objects_compare_by_identity() {
    let class = ClassRef::new("Point");
    let a = ObjectRef::new(class.clone());
    let b = ObjectRef::new(class);
    a.set("x", Value::Int(1));
    b.set("x", Value::Int(1));
    assert_ne!(Value::object(a.clone()), Value::object(b.clone()));
    assert_eq!(Value::object(a.clone()), Value::object(a.clone()));
    assert_eq!(hash_of(&Value::object(a.clone())), hash_of(&Value::object(a)));
}

#[test]
fn test_hash_matches_equality() {
    assert_eq!(hash_of(&Value::string("abc")), hash_of(&Value::string("abc")));
    assert_eq!(
        hash_of(&Value::list(vec![Value::Int(1), Value::Nil])),
        hash_of(&Value::list(vec![Value::Int(1), Value::Nil]))
    );
    assert_ne!(hash_of(&Value::Int(1)), hash_of(&Value::Bool(true)));
}
