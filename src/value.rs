use std::fmt;

/// Loosely-typed value for one query dimension.
///
/// Mirrors what a caller can hand the portal form: a name, a number, or a
/// list of either. Validators decide which shapes they accept.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    List(Vec<ParamValue>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        ParamValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>, const N: usize> From<[T; N]> for ParamValue {
    fn from(value: [T; N]) -> Self {
        ParamValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::List(xs) => {
                f.write_str("[")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{x}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl ParamValue {
    /// Parse a user-provided string into a best-effort [`ParamValue`].
    ///
    /// Meant for command-line and config inputs where everything starts as text.
    ///
    /// - `"38"` -> `Int(38)`
    /// - `"2.5"` -> `Float(2.5)`
    /// - `"ili,who"` -> `List([Str, Str])`
    /// - `"[1, 2, 3]"` -> `List([Int, Int, Int])`
    /// - Otherwise -> `Str(..)`
    pub fn parse_auto(s: &str) -> Self {
        let mut t = s.trim();
        let bracketed = t.starts_with('[') && t.ends_with(']') && t.len() >= 2;
        if bracketed {
            t = t[1..t.len() - 1].trim();
        }

        if bracketed || t.contains(',') {
            let items = t
                .split(',')
                .map(str::trim)
                .filter(|x| !x.is_empty())
                .map(parse_scalar)
                .collect();
            return ParamValue::List(items);
        }

        parse_scalar(t)
    }

    /// Numeric coercion of a single value: integers pass through, floats are
    /// truncated, and strings are parsed as integers or floats.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Float(x) if x.is_finite() => Some(x.trunc() as i64),
            ParamValue::Str(s) => {
                let t = s.trim();
                t.parse::<i64>().ok().or_else(|| {
                    t.parse::<f64>()
                        .ok()
                        .filter(|x| x.is_finite())
                        .map(|x| x.trunc() as i64)
                })
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Items of a list, or the value itself as a one-element slice.
    pub fn items(&self) -> &[ParamValue] {
        match self {
            ParamValue::List(xs) => xs,
            other => std::slice::from_ref(other),
        }
    }
}

fn parse_scalar(t: &str) -> ParamValue {
    if let Ok(v) = t.parse::<i64>() {
        ParamValue::Int(v)
    } else if let Ok(v) = t.parse::<f64>() {
        ParamValue::Float(v)
    } else {
        ParamValue::Str(t.to_string())
    }
}
