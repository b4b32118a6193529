//! Specializing binary operators.
//!
//! Each operator has a static, priority-ordered strategy table. Every
//! binary node in a linked function owns an `OperatorSite` that remembers
//! which strategies matched before and which are excluded for good, so a
//! site that once overflowed keeps computing in floating point.
//!
//! Strategy order for `+`:
//!
//! | # | operands | result |
//! |---|---|---|
//! | 0 | int + int | checked int, rewrites to float on overflow |
//! | 1 | float + int | float |
//! | 2 | int + float | float |
//! | 3 | number + number | float, replaces #0 once activated |
//! | 4 | str + str | concatenation |
//! | 5 | str + int | decimal rendering appended |
//! | 6 | int + str | decimal rendering prepended |
//! | 7 | either operand str | textual form of the other operand |
//!
//! Activation of #3 excludes #0 even when no overflow happened: after a
//! site has added two floats, it adds integers as floats too.
//!
//! `*` follows the same numeric order (`int*int`, `float*int`, `int*float`,
//! `number*number`) before the text and list repetitions.

use blade_ir::BinaryOp;
use blade_value::{
    negative_count, size_out_of_bounds, unsupported_operands, EvalResult, Value,
};

use crate::specialization::{bit, Outcome, Specialization, SpecializationSite};

/// Maximum number of elements a list repetition may produce (`i32::MAX`).
pub const MAX_LIST_LEN: usize = 0x7fff_ffff;

/// Maximum number of bytes a text repetition may produce (`i32::MAX`).
pub const MAX_TEXT_LEN: usize = 0x7fff_ffff;

type Strategy = Specialization<[Value]>;

// Operand shapes

fn ints(args: &[Value]) -> Option<(i64, i64)> {
    match args {
        [Value::Int(a), Value::Int(b)] => Some((*a, *b)),
        _ => None,
    }
}

fn numbers(args: &[Value]) -> Option<(f64, f64)> {
    match args {
        [a, b] => Some((a.as_number()?, b.as_number()?)),
        _ => None,
    }
}

fn is_ints(args: &[Value]) -> bool {
    ints(args).is_some()
}

fn is_float_int(args: &[Value]) -> bool {
    matches!(args, [Value::Float(_), Value::Int(_)])
}

fn is_int_float(args: &[Value]) -> bool {
    matches!(args, [Value::Int(_), Value::Float(_)])
}

fn is_floats(args: &[Value]) -> bool {
    matches!(args, [Value::Float(_), Value::Float(_)])
}

fn is_numbers(args: &[Value]) -> bool {
    numbers(args).is_some()
}

fn is_strs(args: &[Value]) -> bool {
    matches!(args, [Value::Str(_), Value::Str(_)])
}

fn is_str_int(args: &[Value]) -> bool {
    matches!(args, [Value::Str(_), Value::Int(_)])
}

fn is_int_str(args: &[Value]) -> bool {
    matches!(args, [Value::Int(_), Value::Str(_)])
}

fn has_str(args: &[Value]) -> bool {
    args.iter().any(|v| matches!(v, Value::Str(_)))
}

fn is_list_int(args: &[Value]) -> bool {
    matches!(args, [Value::List(_), Value::Int(_)])
}

#[inline]
fn done(value: Value) -> Outcome {
    Outcome::Done(Ok(value))
}

fn float_op(args: &[Value], op: fn(f64, f64) -> f64) -> Outcome {
    match numbers(args) {
        Some((a, b)) => done(Value::Float(op(a, b))),
        None => Outcome::Decline,
    }
}

// Addition

fn add_ints(args: &[Value]) -> Outcome {
    let Some((a, b)) = ints(args) else {
        return Outcome::Decline;
    };
    a.checked_add(b)
        .map_or(Outcome::Rewrite, |sum| done(Value::Int(sum)))
}

fn add_floats(args: &[Value]) -> Outcome {
    float_op(args, |a, b| a + b)
}

fn concat_strs(args: &[Value]) -> Outcome {
    match args {
        [Value::Str(a), Value::Str(b)] => {
            let mut out = String::with_capacity(a.len() + b.len());
            out.push_str(a);
            out.push_str(b);
            done(Value::string(out))
        }
        _ => Outcome::Decline,
    }
}

fn concat_str_int(args: &[Value]) -> Outcome {
    match args {
        [Value::Str(a), Value::Int(b)] => done(Value::string(format!("{}{b}", a.as_str()))),
        _ => Outcome::Decline,
    }
}

fn concat_int_str(args: &[Value]) -> Outcome {
    match args {
        [Value::Int(a), Value::Str(b)] => done(Value::string(format!("{a}{}", b.as_str()))),
        _ => Outcome::Decline,
    }
}

fn concat_converted(args: &[Value]) -> Outcome {
    match args {
        [a, b] => done(Value::string(a.display_value() + &b.display_value())),
        _ => Outcome::Decline,
    }
}

static ADD: [Strategy; 8] = [
    Specialization {
        name: "int+int",
        guard: is_ints,
        body: add_ints,
        replaces: 0,
    },
    Specialization {
        name: "float+int",
        guard: is_float_int,
        body: add_floats,
        replaces: 0,
    },
    Specialization {
        name: "int+float",
        guard: is_int_float,
        body: add_floats,
        replaces: 0,
    },
    Specialization {
        name: "number+number",
        guard: is_numbers,
        body: add_floats,
        replaces: bit(0),
    },
    Specialization {
        name: "str+str",
        guard: is_strs,
        body: concat_strs,
        replaces: 0,
    },
    Specialization {
        name: "str+int",
        guard: is_str_int,
        body: concat_str_int,
        replaces: 0,
    },
    Specialization {
        name: "int+str",
        guard: is_int_str,
        body: concat_int_str,
        replaces: 0,
    },
    Specialization {
        name: "any+str",
        guard: has_str,
        body: concat_converted,
        replaces: 0,
    },
];

// Division

/// Exact quotient when it exists; otherwise the pair is divided as floats.
///
/// Covers a zero divisor (infinity or NaN) and `i64::MIN / -1`. The float
/// path is taken per call and never excludes the integer strategy.
#[expect(
    clippy::cast_precision_loss,
    reason = "inexact integer division is defined as float division"
)]
fn div_ints(args: &[Value]) -> Outcome {
    let Some((a, b)) = ints(args) else {
        return Outcome::Decline;
    };
    match (a.checked_rem(b), a.checked_div(b)) {
        (Some(0), Some(quotient)) => done(Value::Int(quotient)),
        _ => done(Value::Float(a as f64 / b as f64)),
    }
}

fn div_floats(args: &[Value]) -> Outcome {
    float_op(args, |a, b| a / b)
}

static DIV: [Strategy; 4] = [
    Specialization {
        name: "int/int",
        guard: is_ints,
        body: div_ints,
        replaces: 0,
    },
    Specialization {
        name: "float/int",
        guard: is_float_int,
        body: div_floats,
        replaces: 0,
    },
    Specialization {
        name: "int/float",
        guard: is_int_float,
        body: div_floats,
        replaces: 0,
    },
    Specialization {
        name: "float/float",
        guard: is_floats,
        body: div_floats,
        replaces: 0,
    },
];

// Multiplication

fn mul_ints(args: &[Value]) -> Outcome {
    let Some((a, b)) = ints(args) else {
        return Outcome::Decline;
    };
    a.checked_mul(b)
        .map_or(Outcome::Rewrite, |product| done(Value::Int(product)))
}

fn mul_floats(args: &[Value]) -> Outcome {
    float_op(args, |a, b| a * b)
}

/// Validate a repetition and return the count as `usize`.
///
/// `unit` is the size of one copy, counted in `measure` (bytes or elements).
fn repeat_count(
    unit: usize,
    count: i64,
    limit: usize,
    measure: &'static str,
) -> Result<usize, blade_value::EvalError> {
    let Ok(count) = u64::try_from(count) else {
        return Err(negative_count(BinaryOp::Mul.as_symbol(), count));
    };
    if unit == 0 {
        return Ok(0);
    }
    let size = u128::from(count) * (unit as u128);
    if size > limit as u128 {
        return Err(size_out_of_bounds(BinaryOp::Mul.as_symbol(), size, limit, measure));
    }
    // size <= limit and unit > 0, so the count fits too.
    usize::try_from(count)
        .map_err(|_| size_out_of_bounds(BinaryOp::Mul.as_symbol(), size, limit, measure))
}

fn repeat_str(args: &[Value]) -> Outcome {
    let [Value::Str(text), Value::Int(count)] = args else {
        return Outcome::Decline;
    };
    let result = repeat_count(text.len(), *count, MAX_TEXT_LEN, "bytes")
        .map(|count| Value::string(text.repeat(count)));
    Outcome::Done(result)
}

fn repeat_list(args: &[Value]) -> Outcome {
    let [Value::List(items), Value::Int(count)] = args else {
        return Outcome::Decline;
    };
    let result = repeat_count(items.len(), *count, MAX_LIST_LEN, "elements").map(|count| {
        let mut out = Vec::with_capacity(items.len().saturating_mul(count));
        for _ in 0..count {
            out.extend(items.iter().cloned());
        }
        Value::list(out)
    });
    Outcome::Done(result)
}

static MUL: [Strategy; 6] = [
    Specialization {
        name: "int*int",
        guard: is_ints,
        body: mul_ints,
        replaces: 0,
    },
    Specialization {
        name: "float*int",
        guard: is_float_int,
        body: mul_floats,
        replaces: 0,
    },
    Specialization {
        name: "int*float",
        guard: is_int_float,
        body: mul_floats,
        replaces: 0,
    },
    Specialization {
        name: "number*number",
        guard: is_numbers,
        body: mul_floats,
        replaces: bit(0),
    },
    Specialization {
        name: "str*int",
        guard: is_str_int,
        body: repeat_str,
        replaces: 0,
    },
    Specialization {
        name: "list*int",
        guard: is_list_int,
        body: repeat_list,
        replaces: 0,
    },
];

/// The strategy table for an operator.
pub fn strategies(op: BinaryOp) -> &'static [Specialization<[Value]>] {
    match op {
        BinaryOp::Add => &ADD,
        BinaryOp::Mul => &MUL,
        BinaryOp::Div => &DIV,
    }
}

/// A binary operator node's specialization state.
#[derive(Debug)]
pub struct OperatorSite {
    op: BinaryOp,
    state: SpecializationSite,
}

impl OperatorSite {
    pub fn new(op: BinaryOp) -> Self {
        OperatorSite {
            op,
            state: SpecializationSite::new(),
        }
    }

    #[inline]
    pub fn op(&self) -> BinaryOp {
        self.op
    }

    /// Apply the operator, specializing this site on the operand types.
    pub fn evaluate(&self, left: Value, right: Value) -> EvalResult {
        let args = [left, right];
        match self
            .state
            .dispatch(self.op.as_symbol(), strategies(self.op), &args[..])
        {
            Some(result) => result,
            None => {
                let [left, right] = &args;
                Err(unsupported_operands(self.op.as_symbol(), &[left, right]))
            }
        }
    }

    /// Name of the strategy that matched last.
    pub fn active_strategy(&self) -> Option<&'static str> {
        self.state
            .active()
            .and_then(|index| strategies(self.op).get(index))
            .map(|s| s.name)
    }

    /// Names of the strategies permanently excluded at this site.
    pub fn excluded_strategies(&self) -> Vec<&'static str> {
        strategies(self.op)
            .iter()
            .enumerate()
            .filter(|(index, _)| self.state.is_excluded(*index))
            .map(|(_, s)| s.name)
            .collect()
    }
}

/// Evaluate `left <op> right` at `site`.
#[inline]
pub fn evaluate_binary(site: &OperatorSite, left: Value, right: Value) -> EvalResult {
    site.evaluate(left, right)
}
