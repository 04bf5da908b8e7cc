use super::cid::Cid;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::mem;

/// A DAG-CBOR map. Keys are unique; the canonical wire order is applied by
/// the encoder, see [`key_order`].
pub type Map = BTreeMap<String, Value>;

/// A value in the DAG-CBOR data model.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Encodable range is `-2^64 ..= 2^64 - 1`.
    Integer(i128),
    /// Must be finite to be encoded.
    Float(f64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Value>),
    Map(Map),
    Link(Cid),
}

/// Canonical DAG-CBOR map key ordering: shorter keys first, keys of equal
/// length compared byte-wise.
pub fn key_order(a: &str, b: &str) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

impl Value {
    /// A short name for the kind of value, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bytes(_) => "byte string",
            Value::Text(_) => "text string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Link(_) => "link",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Cid> {
        match self {
            Value::Link(c) => Some(c),
            _ => None,
        }
    }

    /// Takes the elements of an array, or hands the value back.
    pub fn into_array(mut self) -> Result<Vec<Value>, Self> {
        if let Value::Array(items) = &mut self {
            return Ok(mem::take(items));
        }
        Err(self)
    }

    /// Takes the entries of a map, or hands the value back.
    pub fn into_map(mut self) -> Result<Map, Self> {
        if let Value::Map(map) = &mut self {
            return Ok(mem::take(map));
        }
        Err(self)
    }

    /// Takes the contents of a text string, or hands the value back.
    pub fn into_text(mut self) -> Result<String, Self> {
        if let Value::Text(s) = &mut self {
            return Ok(mem::take(s));
        }
        Err(self)
    }
}

// Nesting depth is unbounded, children are freed from a heap worklist
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = match self {
            Value::Array(items) if !items.is_empty() => mem::take(items),
            Value::Map(map) if !map.is_empty() => mem::take(map).into_values().collect(),
            _ => return,
        };

        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Array(items) => pending.append(items),
                Value::Map(map) => pending.extend(mem::take(map).into_values()),
                _ => {}
            }
        }
    }
}

macro_rules! impl_integer_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(value as i128)
                }
            }
        )*
    };
}

impl_integer_from!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<Cid> for Value {
    fn from(value: Cid) -> Self {
        Value::Link(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
