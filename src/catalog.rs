//! Built-in demonstration units.
//!
//! Each group below shows one gradual-typing idea with a small typed Rust
//! function. Where the idea is "the checker would not have caught this",
//! the unit checks the value at runtime and fails with the mismatch.
//! All inputs are fixed so every run gives the same results.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use serde_json::{json, Value};

use crate::error::UnitError;
use crate::unit::DemonstrationUnit;
use crate::value::{expect_type, render_record, Render, TypeTag};

/// Every built-in unit, in display order.
pub fn units() -> Vec<DemonstrationUnit> {
    vec![
        DemonstrationUnit::new("primitives.str_len", || Ok(str_len("apple")))
            .with_topic("Primitive types"),
        DemonstrationUnit::new("primitives.invalid_inc", || invalid_inc(1))
            .with_topic("Primitive types"),
        DemonstrationUnit::new("gradual.untyped_flow", untyped_flow)
            .with_topic("Partially annotated code"),
        DemonstrationUnit::new("composed.gen_list", || Ok(gen_list())).with_topic("Composed types"),
        DemonstrationUnit::new("composed.gen_dict", || Ok(gen_dict())).with_topic("Composed types"),
        DemonstrationUnit::new("composed.gen_tuple", || Ok(gen_tuple()))
            .with_topic("Composed types"),
        DemonstrationUnit::new("returns.none", || {
            my_print("hello");
            Ok(())
        })
        .with_topic("Functions returning nothing"),
        DemonstrationUnit::new("returns.no_return", || -> Result<(), UnitError> {
            Err(not_ready("not_ready"))
        })
        .with_topic("Functions that never return"),
        DemonstrationUnit::new("variables.annotated", || Ok(AnnotatedVariables::default()))
            .with_topic("Annotated variables"),
        DemonstrationUnit::new("optional.first_product", || Ok(get_first_product(&[7, 8, 9])))
            .with_topic("Optional types"),
        DemonstrationUnit::new("optional.first_product_empty", || Ok(get_first_product(&[])))
            .with_topic("Optional types"),
        DemonstrationUnit::new("union.int_or_str", || Ok(int_or_str(1))).with_topic("Union types"),
        DemonstrationUnit::new("object.opaque_inc", || opaque_inc(dummy(Box::new(1_i64)))).with_topic("Any vs object"),
        DemonstrationUnit::new("classes.counter", || {
            let mut counter = Counter::new(1);
            counter.inc();
            Ok(counter.value())
        })
        .with_topic("Annotated classes"),
        DemonstrationUnit::new("callables.typed_map", || Ok(typed_map(&[1, 2, 3], |x| x * 2)))
            .with_topic("Callables"),
        DemonstrationUnit::new("callables.typed_reduce", || {
            Ok(typed_reduce(&["a", "b", "c"], |acc, x| acc + x, String::new()))
        })
        .with_topic("Callables"),
        DemonstrationUnit::new("generics.first", || Ok(first(&[1, 2, 3]).copied()))
            .with_topic("Type variables"),
        DemonstrationUnit::new("generics.tuplify", || Ok(tuplify(1, "a")))
            .with_topic("Type variables"),
        DemonstrationUnit::new("generics.constrained_mix", || {
            Ok(fmix("a".to_string(), "b".to_string(), false))
        })
        .with_topic("Constrained type variables"),
        DemonstrationUnit::new("generics.parametrized", || Ok(*Parametrized::new(42).get_value()))
            .with_topic("Parametrized classes"),
        DemonstrationUnit::new("ignore.pseudo_int", || pseudo_int("a"))
            .with_topic("Ignoring type hints"),
        DemonstrationUnit::new("refine.delegate", || Ok(delegate(&1_i64)))
            .with_topic("Refining types"),
        DemonstrationUnit::new("varargs.foo", || {
            Ok(foo(&["x", "y"], &[("a", 1), ("b", 2), ("c", 3)]))
        })
        .with_topic("Arbitrary argument lists"),
        DemonstrationUnit::new("main.convert_currency", convert_user_input)
            .with_topic("Undefined reference"),
    ]
}

// =============================================================================
// Part 1: Primitive and partially annotated functions
// =============================================================================

fn str_len(s: &str) -> usize {
    s.chars().count()
}

/// Declared to produce a `str`, but the body increments a number.
fn invalid_inc(n: i64) -> Result<Value, UnitError> {
    expect_type(&(n + 1), TypeTag::Str)
}

fn expects_string(a: &str) -> Value {
    Value::String(a.to_string())
}

fn expects_int(a: &Value) -> Result<i64, UnitError> {
    match a {
        Value::Number(n) => n
            .as_i64()
            .map(|n| n + 1)
            .ok_or_else(|| UnitError::mismatch(TypeTag::Int, TypeTag::Float)),
        other => Err(UnitError::mismatch(TypeTag::Int, TypeTag::of(other))),
    }
}

/// The first call has no declared return type, so its result flows into
/// `expects_int` unchecked until it is used.
fn untyped_flow() -> Result<i64, UnitError> {
    let untyped = expects_string("a");
    expects_int(&untyped)
}

// =============================================================================
// Part 2: Composed types, None and NoReturn
// =============================================================================

fn gen_list() -> Vec<i64> {
    vec![1, 2, 3]
}

fn gen_dict() -> BTreeMap<String, i64> {
    BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)])
}

fn gen_tuple() -> (i64, &'static str) {
    (1, "apple")
}

fn my_print(s: &str) {
    tracing::debug!(">{s}");
}

fn not_ready(what: &str) -> UnitError {
    UnitError::NotImplemented(what.to_string())
}

#[derive(Debug)]
struct AnnotatedVariables {
    b: bool,
    i: i64,
    s: String,
    f: f64,
}

impl Default for AnnotatedVariables {
    fn default() -> Self {
        Self {
            b: false,
            i: 1,
            s: "abc".to_string(),
            f: 1.0,
        }
    }
}

impl Render for AnnotatedVariables {
    fn render(&self) -> String {
        render_record(&[
            ("b", &self.b as &dyn Render),
            ("i", &self.i as &dyn Render),
            ("s", &self.s as &dyn Render),
            ("f", &self.f as &dyn Render),
        ])
    }
}

// =============================================================================
// Part 3: Optional, union and opaque values
// =============================================================================

fn get_first_product(product_codes: &[i64]) -> Option<i64> {
    product_codes.first().copied()
}

#[derive(Debug, Clone, PartialEq)]
enum IntOrStr {
    Int(i64),
    Str(String),
}

impl Render for IntOrStr {
    fn render(&self) -> String {
        match self {
            IntOrStr::Int(n) => n.render(),
            IntOrStr::Str(s) => s.render(),
        }
    }

    fn render_nested(&self) -> String {
        match self {
            IntOrStr::Int(n) => n.render_nested(),
            IntOrStr::Str(s) => s.render_nested(),
        }
    }
}

/// Which branch is taken depends on `seed`; 0 picks the integer.
fn int_or_str(seed: u32) -> IntOrStr {
    if seed == 0 {
        IntOrStr::Int(0)
    } else {
        IntOrStr::Str("do not hit zero".to_string())
    }
}

fn dummy(x: Box<dyn Any>) -> Box<dyn Any> {
    x
}

fn inc(x: i64) -> i64 {
    x + 1
}

/// `inc` only accepts an int, so the opaque value is downcast first. Anything
/// that is not an `i64` stays an `object` and is rejected.
fn opaque_inc(value: Box<dyn Any>) -> Result<i64, UnitError> {
    let n = value
        .downcast_ref::<i64>()
        .ok_or_else(|| UnitError::mismatch(TypeTag::Int, TypeTag::Object))?;
    Ok(inc(*n))
}

// =============================================================================
// Part 4: Classes and callables
// =============================================================================

struct Counter {
    n: i64,
}

impl Counter {
    fn new(n: i64) -> Self {
        Self { n }
    }

    fn inc(&mut self) {
        self.n += 1;
    }

    fn value(&self) -> i64 {
        self.n
    }
}

fn typed_map(xs: &[i64], f: impl Fn(i64) -> i64) -> Vec<i64> {
    xs.iter().map(|&x| f(x)).collect()
}

fn typed_reduce(xs: &[&str], f: impl Fn(String, &str) -> String, x0: String) -> String {
    xs.iter().fold(x0, |acc, x| f(acc, x))
}

// =============================================================================
// Part 5: Generics
// =============================================================================

fn first<T>(xs: &[T]) -> Option<&T> {
    xs.first()
}

fn tuplify<T1, T2>(a: T1, b: T2) -> (T1, T2) {
    (a, b)
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for String {}
}

/// Only `i64` or `String`, and both arguments must be the same one.
trait Mix: sealed::Sealed + Render {}

impl Mix for i64 {}
impl Mix for String {}

fn fmix<T: Mix>(a: T, b: T, pick_first: bool) -> T {
    if pick_first {
        a
    } else {
        b
    }
}

struct Parametrized<T> {
    value: T,
}

impl<T> Parametrized<T> {
    fn new(value: T) -> Self {
        Self { value }
    }

    fn get_value(&self) -> &T {
        &self.value
    }
}

// =============================================================================
// Part 6: Ignored hints, refinement and variadic arguments
// =============================================================================

/// An annotation the checker was told to skip; the literal still has to
/// parse at runtime.
fn pseudo_int(literal: &str) -> Result<i64, UnitError> {
    literal
        .parse::<i64>()
        .map_err(|_| UnitError::value(format!("invalid literal for int(): '{literal}'")))
}

fn delegate(x: &dyn Any) -> Option<i64> {
    x.downcast_ref::<i64>().map(|n| inc(*n))
}

fn foo(args: &[&str], kwargs: &[(&str, i64)]) -> Value {
    let kwargs: HashMap<&str, i64> = kwargs.iter().copied().collect();
    json!({ "args": args.len(), "kwargs": kwargs.len() })
}

// =============================================================================
// Part 7: The trailing script
// =============================================================================

type Converter = fn(f64) -> f64;

/// Names visible to the script. `convert_currency` was never defined.
fn script_scope() -> HashMap<&'static str, Converter> {
    HashMap::new()
}

fn convert_user_input() -> Result<f64, UnitError> {
    let user_input = 10.0;
    let fee = 10.0;

    let scope = script_scope();
    let convert_currency = scope
        .get("convert_currency")
        .ok_or_else(|| UnitError::Undefined("convert_currency".to_string()))?;

    Ok(convert_currency(user_input) - fee)
}
