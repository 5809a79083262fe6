//! Runtime type tags and value rendering.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

use crate::error::UnitError;

/// Coarse runtime type of a demonstration value, using the gradual-typing
/// names (`int`, `str`, `list`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    None,
    Bool,
    Int,
    Float,
    Str,
    List,
    Dict,
    /// An opaque value whose concrete type has not been refined yet.
    Object,
}

impl TypeTag {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::None,
            Value::Bool(_) => TypeTag::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => TypeTag::Int,
            Value::Number(_) => TypeTag::Float,
            Value::String(_) => TypeTag::Str,
            Value::Array(_) => TypeTag::List,
            Value::Object(_) => TypeTag::Dict,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::None => "None",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Dict => "dict",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serializes `value` and checks it against a declared type.
///
/// This is the runtime stand-in for a return annotation: a body that returns
/// something else fails with [`UnitError::TypeMismatch`].
pub fn expect_type<T: Serialize>(value: &T, declared: TypeTag) -> Result<Value, UnitError> {
    let value = serde_json::to_value(value)?;
    let actual = TypeTag::of(&value);
    if actual == declared {
        Ok(value)
    } else {
        Err(UnitError::mismatch(declared, actual))
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Text shown for a unit's successful value.
///
/// Rendering never fails. Nothing and `None` show as `None`, a top-level
/// string shows without quotes, containers use compact JSON-like brackets
/// with quoted strings inside, and floats keep their `NaN`/`inf` spelling.
pub trait Render {
    fn render(&self) -> String;

    /// Form used inside a container.
    fn render_nested(&self) -> String {
        self.render()
    }
}

macro_rules! render_with_display {
    ($($ty:ty),*) => {
        $(impl Render for $ty {
            fn render(&self) -> String {
                self.to_string()
            }
        })*
    };
}

render_with_display!(bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Render for f32 {
    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl Render for f64 {
    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl Render for () {
    fn render(&self) -> String {
        "None".to_string()
    }
}

impl Render for str {
    fn render(&self) -> String {
        self.to_string()
    }

    fn render_nested(&self) -> String {
        format!("{self:?}")
    }
}

impl Render for String {
    fn render(&self) -> String {
        self.as_str().render()
    }

    fn render_nested(&self) -> String {
        self.as_str().render_nested()
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self) -> String {
        (**self).render()
    }

    fn render_nested(&self) -> String {
        (**self).render_nested()
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render(&self) -> String {
        (**self).render()
    }

    fn render_nested(&self) -> String {
        (**self).render_nested()
    }
}

impl<T: Render> Render for Option<T> {
    fn render(&self) -> String {
        self.as_ref().map_or_else(|| "None".to_string(), Render::render)
    }

    fn render_nested(&self) -> String {
        self.as_ref()
            .map_or_else(|| "None".to_string(), Render::render_nested)
    }
}

impl<T: Render> Render for [T] {
    fn render(&self) -> String {
        format!("[{}]", self.iter().map(Render::render_nested).join(","))
    }
}

impl<T: Render> Render for Vec<T> {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

impl<T: Render, const N: usize> Render for [T; N] {
    fn render(&self) -> String {
        self.as_slice().render()
    }
}

macro_rules! render_tuple {
    ($($name:ident),+) => {
        impl<$($name: Render),+> Render for ($($name,)+) {
            #[allow(non_snake_case)]
            fn render(&self) -> String {
                let ($($name,)+) = self;
                let items = [$($name.render_nested()),+];
                format!("[{}]", items.join(","))
            }
        }
    };
}

render_tuple!(A, B);
render_tuple!(A, B, C);
render_tuple!(A, B, C, D);

fn render_entry<K: Render, V: Render>(key: &K, value: &V) -> String {
    format!("{}:{}", key.render_nested(), value.render_nested())
}

impl<K: Render, V: Render> Render for BTreeMap<K, V> {
    fn render(&self) -> String {
        format!("{{{}}}", self.iter().map(|(k, v)| render_entry(k, v)).join(","))
    }
}

/// Entries are sorted by their rendered text so output is stable.
impl<K: Render, V: Render, S> Render for HashMap<K, V, S> {
    fn render(&self) -> String {
        let mut entries = self.iter().map(|(k, v)| render_entry(k, v)).sorted();
        format!("{{{}}}", entries.join(","))
    }
}

impl Render for Value {
    fn render(&self) -> String {
        match self {
            Value::Null => "None".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn render_nested(&self) -> String {
        match self {
            Value::Null => "None".to_string(),
            other => other.to_string(),
        }
    }
}

/// Renders named fields in the given order, like a dict literal.
pub fn render_record(fields: &[(&str, &dyn Render)]) -> String {
    let mut entries = fields
        .iter()
        .map(|(name, value)| format!("{}:{}", name.render_nested(), value.render_nested()));
    format!("{{{}}}", entries.join(","))
}
