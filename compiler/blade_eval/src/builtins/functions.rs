//! The core builtin functions: `time`, `print`, `microtime`, `abs`, `bin`,
//! `chr`, `hex` and `id`.

use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use blade_value::{invalid_code_point, unsupported_operands, EvalResult, Value};
use rustc_hash::FxHasher;

use super::{BuiltinContext, BuiltinDeclarations, BuiltinEntry, BuiltinFunction};
use crate::specialization::{Outcome, Specialization, SpecializationSite};

/// Declaration source for the core builtins.
pub struct CoreBuiltins;

static CORE: [BuiltinEntry; 8] = [
    BuiltinEntry::new("time", false, 0, time),
    BuiltinEntry::new("print", true, 0, print),
    BuiltinEntry::new("microtime", false, 0, microtime),
    BuiltinEntry::new("abs", false, 1, abs),
    BuiltinEntry::new("bin", false, 1, bin),
    BuiltinEntry::new("chr", false, 1, chr),
    BuiltinEntry::new("hex", false, 1, hex),
    BuiltinEntry::new("id", false, 1, id),
];

// Factories

fn time() -> Box<dyn BuiltinFunction> {
    Box::new(Time)
}

fn print() -> Box<dyn BuiltinFunction> {
    Box::new(Print)
}

fn microtime() -> Box<dyn BuiltinFunction> {
    Box::new(MicroTime)
}

fn abs() -> Box<dyn BuiltinFunction> {
    Box::new(Abs::default())
}

fn bin() -> Box<dyn BuiltinFunction> {
    Box::new(Bin)
}

fn chr() -> Box<dyn BuiltinFunction> {
    Box::new(Chr)
}

fn hex() -> Box<dyn BuiltinFunction> {
    Box::new(Hex)
}

fn id() -> Box<dyn BuiltinFunction> {
    Box::new(Id)
}

impl BuiltinDeclarations for CoreBuiltins {
    fn declarations(&self) -> &[BuiltinEntry] {
        &CORE
    }
}

fn since_epoch() -> std::time::Duration {
    // A clock set before the epoch reads as the epoch.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

fn to_int(n: u128) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

/// `time()`: whole seconds since the Unix epoch, from a millisecond clock.
struct Time;

impl BuiltinFunction for Time {
    fn call(&self, _ctx: &BuiltinContext, _args: &[Value]) -> EvalResult {
        Ok(to_int(since_epoch().as_millis() / 1000))
    }
}

/// `microtime()`: microseconds since the Unix epoch.
struct MicroTime;

impl BuiltinFunction for MicroTime {
    fn call(&self, _ctx: &BuiltinContext, _args: &[Value]) -> EvalResult {
        Ok(to_int(since_epoch().as_micros()))
    }
}

/// `print(...)`: the textual form of every non-nil argument, separated by
/// single spaces. No newline is added. Nil arguments are skipped entirely.
struct Print;

impl BuiltinFunction for Print {
    fn call(&self, ctx: &BuiltinContext, args: &[Value]) -> EvalResult {
        let line = args
            .iter()
            .filter(|v| !v.is_nil())
            .map(Value::display_value)
            .collect::<Vec<_>>()
            .join(" ");
        let handler = ctx.print_handler();
        handler.print(&line);
        handler.flush();
        Ok(Value::Nil)
    }
}

// abs

fn is_int(args: &[Value]) -> bool {
    matches!(args, [Value::Int(_)])
}

fn is_float(args: &[Value]) -> bool {
    matches!(args, [Value::Float(_)])
}

/// Exact absolute value; `i64::MIN` has none and yields a float.
#[expect(
    clippy::cast_precision_loss,
    reason = "the only inexact case is i64::MIN, whose magnitude is a power of two"
)]
fn abs_int(args: &[Value]) -> Outcome {
    let [Value::Int(n)] = args else {
        return Outcome::Decline;
    };
    let value = n
        .checked_abs()
        .map_or_else(|| Value::Float(-(*n as f64)), Value::Int);
    Outcome::Done(Ok(value))
}

fn abs_float(args: &[Value]) -> Outcome {
    let [Value::Float(f)] = args else {
        return Outcome::Decline;
    };
    Outcome::Done(Ok(Value::Float(f.abs())))
}

static ABS: [Specialization<[Value]>; 2] = [
    Specialization {
        name: "abs(int)",
        guard: is_int,
        body: abs_int,
        replaces: 0,
    },
    Specialization {
        name: "abs(float)",
        guard: is_float,
        body: abs_float,
        replaces: 0,
    },
];

/// `abs(x)`: absolute value of a number, NaN for anything else.
#[derive(Default)]
struct Abs {
    site: SpecializationSite,
}

impl BuiltinFunction for Abs {
    fn call(&self, _ctx: &BuiltinContext, args: &[Value]) -> EvalResult {
        self.site
            .dispatch("abs", &ABS, args)
            .unwrap_or(Ok(Value::Float(f64::NAN)))
    }
}

/// The single integer argument of `name`, or an argument error.
fn int_arg(name: &str, args: &[Value]) -> Result<i64, blade_value::EvalError> {
    match args {
        [Value::Int(n)] => Ok(*n),
        _ => Err(unsupported_operands(name, &args.iter().collect::<Vec<_>>())),
    }
}

/// `bin(x)`: base-2 digits of the two's-complement bit pattern.
struct Bin;

impl BuiltinFunction for Bin {
    fn call(&self, _ctx: &BuiltinContext, args: &[Value]) -> EvalResult {
        let n = int_arg("bin", args)?;
        Ok(Value::string(format!("{n:b}")))
    }
}

/// `hex(x)`: base-16 digits of the two's-complement bit pattern.
struct Hex;

impl BuiltinFunction for Hex {
    fn call(&self, _ctx: &BuiltinContext, args: &[Value]) -> EvalResult {
        let n = int_arg("hex", args)?;
        Ok(Value::string(format!("{n:x}")))
    }
}

/// `chr(x)`: one-character text for a Unicode scalar value.
struct Chr;

impl BuiltinFunction for Chr {
    fn call(&self, _ctx: &BuiltinContext, args: &[Value]) -> EvalResult {
        let n = int_arg("chr", args)?;
        let c = u32::try_from(n)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| invalid_code_point(n))?;
        Ok(Value::string(c.to_string()))
    }
}

/// `id(x)`: identity of an object, a value hash for everything else.
struct Id;

impl BuiltinFunction for Id {
    #[expect(
        clippy::cast_possible_wrap,
        reason = "identities and hashes are opaque bit patterns"
    )]
    fn call(&self, _ctx: &BuiltinContext, args: &[Value]) -> EvalResult {
        let hash = match args {
            [Value::Object(object)] => object.identity() as u64,
            [value] => {
                let mut hasher = FxHasher::default();
                value.hash(&mut hasher);
                hasher.finish()
            }
            _ => 0,
        };
        Ok(Value::Int(hash as i64))
    }
}
