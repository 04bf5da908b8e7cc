use super::cid::{self, Cid};
use super::encode::TAG_CID;
use super::*;
use core::cmp::Ordering;
use thiserror::Error;
use tracing::trace;

// Cap on speculative preallocation, counts come from untrusted input
const MAX_PREALLOCATE: u64 = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("input is empty")]
    Empty,

    #[error("unexpected end of input: need {needed} bytes, have {available}")]
    NotEnoughData { needed: u64, available: usize },

    #[error("argument {value} is not minimally encoded with minor value {minor}")]
    NonMinimal { value: u64, minor: u8 },

    #[error("invalid minor value {minor} for major type {major}")]
    InvalidMinorValue { major: u8, minor: u8 },

    #[error("indefinite-length items are not supported (major type {0})")]
    IndefiniteLength(u8),

    #[error("text string is not valid UTF-8")]
    InvalidUtf8,

    #[error("float is NaN")]
    NaN,

    #[error("float is infinite")]
    Infinite,

    #[error("{0}-bit floats are not canonical, expected a 64-bit float")]
    ShortFloat(u8),

    #[error("unsupported simple value {0}")]
    UnsupportedSimpleValue(u8),

    #[error("unsupported tag {0}")]
    UnsupportedTag(u64),

    #[error("expected tag 42 content to be a byte string (major type 2), found major type {0}")]
    InvalidLinkType(u8),

    #[error("CID link has no content")]
    EmptyLink,

    #[error("CID link has multibase prefix {0:#04x}, expected 0x00")]
    InvalidLinkPrefix(u8),

    #[error("invalid CID link: {0}")]
    InvalidLink(#[source] cid::Error),

    #[error("map key must be a text string, found {0}")]
    NonStringKey(&'static str),

    #[error("duplicate map key {0:?}")]
    DuplicateKey(String),

    #[error("map key {key:?} does not sort after previous key {previous:?}")]
    MisorderedKey { key: String, previous: String },

    #[error("{0} bytes of trailing data after the first item")]
    TrailingData(usize),
}

/// A decoding failure.
///
/// `offset` is where the failing item starts, so `input[offset..]` is the
/// data left unconsumed; `path` locates the item within the document.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid DAG-CBOR at offset {offset} ({path}): {kind}")]
pub struct Error {
    pub kind: ErrorKind,
    pub offset: usize,
    pub path: Path,
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn available(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8], ErrorKind> {
        let available = self.available();
        if len > available as u64 {
            return Err(ErrorKind::NotEnoughData {
                needed: len,
                available,
            });
        }
        let start = self.offset;
        self.offset += len as usize;
        Ok(&self.data[start..self.offset])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ErrorKind> {
        let mut a = [0u8; N];
        a.copy_from_slice(self.take(N as u64)?);
        Ok(a)
    }

    fn read_header(&mut self) -> Result<(u8, u8), ErrorKind> {
        let [b] = self.take_array()?;
        Ok((b >> 5, b & 0x1F))
    }

    fn read_argument(&mut self, major: u8, minor: u8) -> Result<u64, ErrorKind> {
        let (value, smallest) = match minor {
            0..=23 => return Ok(minor as u64),
            24 => (u8::from_be_bytes(self.take_array()?) as u64, 24),
            25 => (
                u16::from_be_bytes(self.take_array()?) as u64,
                u8::MAX as u64 + 1,
            ),
            26 => (
                u32::from_be_bytes(self.take_array()?) as u64,
                u16::MAX as u64 + 1,
            ),
            27 => (u64::from_be_bytes(self.take_array()?), u32::MAX as u64 + 1),
            31 if (2..=5).contains(&major) => return Err(ErrorKind::IndefiniteLength(major)),
            _ => return Err(ErrorKind::InvalidMinorValue { major, minor }),
        };
        if value < smallest {
            Err(ErrorKind::NonMinimal { value, minor })
        } else {
            Ok(value)
        }
    }

    fn read_simple(&mut self, minor: u8) -> Result<Value, ErrorKind> {
        match minor {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 => Ok(Value::Null),
            25 => Err(ErrorKind::ShortFloat(16)),
            26 => Err(ErrorKind::ShortFloat(32)),
            27 => {
                let f = f64::from_be_bytes(self.take_array()?);
                if f.is_nan() {
                    Err(ErrorKind::NaN)
                } else if f.is_infinite() {
                    Err(ErrorKind::Infinite)
                } else {
                    Ok(Value::Float(f))
                }
            }
            28..=30 => Err(ErrorKind::InvalidMinorValue { major: 7, minor }),
            31 => Err(ErrorKind::IndefiniteLength(7)),
            _ => Err(ErrorKind::UnsupportedSimpleValue(minor)),
        }
    }

    fn read_link(&mut self) -> Result<Cid, ErrorKind> {
        let (major, minor) = self.read_header()?;
        if major != 2 {
            return Err(ErrorKind::InvalidLinkType(major));
        }
        let len = self.read_argument(major, minor)?;
        let content = self.take(len)?;
        match content.first() {
            None => Err(ErrorKind::EmptyLink),
            Some(&prefix) if prefix != cid::MULTIBASE_IDENTITY => {
                Err(ErrorKind::InvalidLinkPrefix(prefix))
            }
            Some(_) => Cid::from_bytes(content).map_err(ErrorKind::InvalidLink),
        }
    }

    fn read_item(&mut self) -> Result<Item, ErrorKind> {
        let (major, minor) = self.read_header()?;
        if major == 7 {
            return self.read_simple(minor).map(Item::Value);
        }

        let arg = self.read_argument(major, minor)?;
        let value = match major {
            0 => Value::Integer(arg as i128),
            1 => Value::Integer(-1 - arg as i128),
            2 => Value::Bytes(self.take(arg)?.to_vec()),
            3 => Value::Text(
                core::str::from_utf8(self.take(arg)?)
                    .map_err(|_| ErrorKind::InvalidUtf8)?
                    .to_string(),
            ),
            4 if arg == 0 => Value::Array(Vec::new()),
            4 => {
                return Ok(Item::Open(Open::Array(Vec::with_capacity(
                    arg.min(MAX_PREALLOCATE) as usize,
                )), arg));
            }
            5 if arg == 0 => Value::Map(Map::new()),
            5 => {
                return Ok(Item::Open(
                    Open::Map {
                        entries: Map::new(),
                        key: None,
                        previous: None,
                    },
                    arg,
                ));
            }
            6 if arg == TAG_CID => Value::Link(self.read_link()?),
            6 => return Err(ErrorKind::UnsupportedTag(arg)),
            _ => unreachable!(),
        };
        Ok(Item::Value(value))
    }
}

enum Item {
    Value(Value),
    /// A non-empty container and its element (or entry) count.
    Open(Open, u64),
}

enum Open {
    Array(Vec<Value>),
    Map {
        entries: Map,
        /// Key awaiting its value.
        key: Option<String>,
        /// Last accepted key, for the ordering check.
        previous: Option<String>,
    },
}

/// A partially decoded array or map on the decode stack.
struct Container {
    start: usize,
    /// Elements, or complete key/value pairs, still to come.
    remaining: u64,
    open: Open,
}

impl Container {
    fn segment(&self) -> Segment {
        match &self.open {
            Open::Array(items) => Segment::Index(items.len()),
            Open::Map { key: Some(key), .. } => Segment::Key(key.clone()),
            Open::Map { entries, .. } => Segment::MapKey(entries.len()),
        }
    }

    /// Feeds the next completed child in, returning `true` once the
    /// container is complete.
    fn accept(&mut self, value: Value) -> Result<bool, ErrorKind> {
        match &mut self.open {
            Open::Array(items) => items.push(value),
            Open::Map {
                entries,
                key,
                previous,
            } => match key.take() {
                Some(key) => {
                    entries.insert(key, value);
                }
                None => {
                    let next = value
                        .into_text()
                        .map_err(|other| ErrorKind::NonStringKey(other.kind()))?;
                    if let Some(previous) = previous {
                        match key_order(&next, previous) {
                            Ordering::Greater => {}
                            Ordering::Equal => return Err(ErrorKind::DuplicateKey(next)),
                            Ordering::Less => {
                                return Err(ErrorKind::MisorderedKey {
                                    key: next,
                                    previous: previous.clone(),
                                });
                            }
                        }
                    }
                    *previous = Some(next.clone());
                    *key = Some(next);
                    return Ok(false);
                }
            },
        }
        self.remaining -= 1;
        Ok(self.remaining == 0)
    }

    fn into_value(self) -> Value {
        match self.open {
            Open::Array(items) => Value::Array(items),
            Open::Map { entries, .. } => Value::Map(entries),
        }
    }
}

fn fail(kind: ErrorKind, offset: usize, stack: &[Container]) -> Error {
    let path = Path::from(stack.iter().map(Container::segment).collect::<Vec<_>>());
    trace!("Rejecting DAG-CBOR at offset {offset} ({path}): {kind}");
    Error { kind, offset, path }
}

/// Decodes exactly one item from the front of `data`, returning it and
/// the bytes that follow it.
///
/// Nesting is tracked on an explicit stack rather than by recursion, so
/// deeply nested input cannot exhaust the call stack.
pub fn decode_first(data: &[u8]) -> Result<(Value, &[u8]), Error> {
    if data.is_empty() {
        return Err(fail(ErrorKind::Empty, 0, &[]));
    }

    let mut reader = Reader { data, offset: 0 };
    let mut stack: Vec<Container> = Vec::new();

    'items: loop {
        let start = reader.offset;
        let mut value = match reader.read_item() {
            Ok(Item::Value(value)) => value,
            Ok(Item::Open(open, count)) => {
                stack.push(Container {
                    start,
                    remaining: count,
                    open,
                });
                continue;
            }
            Err(kind) => return Err(fail(kind, start, &stack)),
        };

        // Feed the completed value upwards, closing every container it completes
        let mut value_start = start;
        while let Some(mut top) = stack.pop() {
            match top.accept(value) {
                Ok(false) => {
                    stack.push(top);
                    continue 'items;
                }
                Ok(true) => {
                    value_start = top.start;
                    value = top.into_value();
                }
                Err(kind) => {
                    stack.push(top);
                    return Err(fail(kind, value_start, &stack));
                }
            }
        }

        return Ok((value, &data[reader.offset..]));
    }
}

/// Decodes a single item that must span all of `data`.
pub fn decode(data: &[u8]) -> Result<Value, Error> {
    let (value, rest) = decode_first(data)?;
    if !rest.is_empty() {
        return Err(fail(
            ErrorKind::TrailingData(rest.len()),
            data.len() - rest.len(),
            &[],
        ));
    }
    Ok(value)
}
