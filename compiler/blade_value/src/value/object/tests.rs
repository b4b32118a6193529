use super::*;
use pretty_assertions::assert_eq;

fn error_class() -> ClassRef {
    ClassRef::new("Error")
}

#[test]
fn get_or_returns_default_when_missing() {
    let obj = ObjectRef::new(error_class());
    assert_eq!(obj.get_or("message", Value::string("")), Value::string(""));
    obj.set("message", Value::string("bad"));
    assert_eq!(obj.get_or("message", Value::string("")), Value::string("bad"));
}

#[test]
fn set_overwrites() {
    let obj = ObjectRef::new(error_class());
    obj.set("code", Value::Int(1));
    obj.set("code", Value::Int(2));
    assert_eq!(obj.get("code"), Some(Value::Int(2)));
}

#[test]
fn define_once_keeps_first_value() {
    let obj = ObjectRef::new(error_class());
    assert!(obj.define_once("stacktrace", Value::string("first")));
    assert!(!obj.define_once("stacktrace", Value::string("second")));
    assert_eq!(obj.get("stacktrace"), Some(Value::string("first")));
}

#[test]
fn identity_not_structure() {
    let class = error_class();
    let a = ObjectRef::new(class.clone());
    let b = ObjectRef::new(class);
    assert_ne!(a, b);
    assert_ne!(a.identity(), b.identity());
    let a2 = a.clone();
    assert_eq!(a, a2);
    assert_eq!(a.identity(), a2.identity());
}

#[test]
fn class_identity() {
    let a = ClassRef::new("Error");
    let b = ClassRef::new("Error");
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_eq!(a.name(), "Error");
}

#[test]
fn field_names_sorted() {
    let obj = ObjectRef::new(error_class());
    obj.set("message", Value::Nil);
    obj.set("code", Value::Nil);
    assert_eq!(obj.field_names(), vec!["code".to_string(), "message".to_string()]);
    assert!(obj.contains("code"));
    assert!(!obj.contains("stacktrace"));
}
