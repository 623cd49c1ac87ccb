//! Typed log values and their canonical text form.
//!
//! Formatting is culture-invariant: the decimal separator is always `.`, no
//! matter what locale the host process runs under.
//!
//! | Kind            | Example input          | Text                         |
//! |-----------------|------------------------|------------------------------|
//! | `Float`/`Double`| `3.14159`              | `3.1416`                     |
//! | `Float`/`Double`| `f64::NEG_INFINITY`    | `-Infinity`                  |
//! | `Int`/`UInt`    | `42`                   | `42`                         |
//! | `Bool`          | `true`                 | `TRUE`                       |
//! | `Vec3`          | `Vec3::new(1., 2., 3.)`| `(1.0000, 2.0000, 3.0000)`   |
//! | `Text`          | `"left"`               | `left`                       |

use std::fmt;

/// Decimal places used for every floating-point component.
pub const FLOAT_DECIMALS: usize = 4;

// ── Vec3 ──────────────────────────────────────────────────────────────────────

/// A 3-component float vector (positions, rotations, velocities…).
///
/// Logged as one opaque field, never split across three columns.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f32, f32, f32)> for Vec3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_float(f, f64::from(self.x))?;
        f.write_str(", ")?;
        write_float(f, f64::from(self.y))?;
        f.write_str(", ")?;
        write_float(f, f64::from(self.z))?;
        f.write_str(")")
    }
}

/// Fixed four decimals; non-finite values get the names `Infinity`,
/// `-Infinity` and `NaN` instead of Rust's `inf` / `NaN`.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{v:.p$}", p = FLOAT_DECIMALS)
    }
}

// ── LogValue ──────────────────────────────────────────────────────────────────

/// One value handed to the accumulator for a single column of a single row.
///
/// Build it with `.into()` from the primitive types, or with
/// [`LogValue::display`] for anything else that implements `Display`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogValue {
    Float(f32),
    Double(f64),
    Int(i64),
    UInt(u64),
    Bool(bool),
    Vec3(Vec3),
    Text(String),
}

impl LogValue {
    /// Capture any displayable value by its default text representation.
    pub fn display(value: impl fmt::Display) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Float(v) => write_float(f, f64::from(*v)),
            LogValue::Double(v) => write_float(f, *v),
            LogValue::Int(v) => write!(f, "{v}"),
            LogValue::UInt(v) => write!(f, "{v}"),
            LogValue::Bool(true) => f.write_str("TRUE"),
            LogValue::Bool(false) => f.write_str("FALSE"),
            LogValue::Vec3(v) => v.fmt(f),
            LogValue::Text(s) => f.write_str(s),
        }
    }
}

/// Canonical text for `value`.  Never fails.
#[inline]
pub fn format_value(value: &LogValue) -> String {
    value.to_string()
}

// ── Conversions ───────────────────────────────────────────────────────────────

macro_rules! log_value_from {
    ($variant:ident($target:ty): $($src:ty),+) => {
        $(
            impl From<$src> for LogValue {
                #[inline]
                fn from(v: $src) -> Self {
                    LogValue::$variant(v as $target)
                }
            }
        )+
    };
}

log_value_from!(Int(i64): i8, i16, i32, i64, isize);
log_value_from!(UInt(u64): u8, u16, u32, u64, usize);

impl From<f32> for LogValue {
    fn from(v: f32) -> Self {
        LogValue::Float(v)
    }
}

impl From<f64> for LogValue {
    fn from(v: f64) -> Self {
        LogValue::Double(v)
    }
}

impl From<bool> for LogValue {
    fn from(v: bool) -> Self {
        LogValue::Bool(v)
    }
}

impl From<Vec3> for LogValue {
    fn from(v: Vec3) -> Self {
        LogValue::Vec3(v)
    }
}

impl From<String> for LogValue {
    fn from(v: String) -> Self {
        LogValue::Text(v)
    }
}

impl From<&str> for LogValue {
    fn from(v: &str) -> Self {
        LogValue::Text(v.to_owned())
    }
}

impl From<&String> for LogValue {
    fn from(v: &String) -> Self {
        LogValue::Text(v.clone())
    }
}
