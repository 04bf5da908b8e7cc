use super::buffer::Buffer;
use super::cid::{Cid, Codec};
use super::*;
use thiserror::Error;

// Most documents are small records
const INITIAL_CAPACITY: usize = 1024;

pub(crate) const TAG_CID: u64 = 42;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("integer {0} is outside the range -2^64..2^64")]
    IntegerOutOfRange(i128),

    #[error("float {0} is not finite")]
    NonFiniteFloat(f64),
}

/// A value that has no canonical encoding, and where it was found.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Cannot encode value at {path}: {kind}")]
pub struct Error {
    pub kind: ErrorKind,
    pub path: Path,
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: Path::root(),
        }
    }

    fn within(self, segment: Segment) -> Self {
        Self {
            kind: self.kind,
            path: self.path.prepend(segment),
        }
    }
}

pub struct Encoder {
    data: Buffer,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            data: Buffer::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn build(self) -> Vec<u8> {
        self.data.finalize()
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_uint_minor(&mut self, major: u8, val: u64) {
        if val < 24 {
            self.data.push((major << 5) | (val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push((major << 5) | 24u8);
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push((major << 5) | 25u8);
            self.data.write(&(val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push((major << 5) | 26u8);
            self.data.write(&(val as u32).to_be_bytes())
        } else {
            self.data.push((major << 5) | 27u8);
            self.data.write(&val.to_be_bytes())
        }
    }

    fn emit_integer(&mut self, val: i128) -> Result<(), Error> {
        let out_of_range = || Error::new(ErrorKind::IntegerOutOfRange(val));
        if val >= 0 {
            self.emit_uint_minor(0, u64::try_from(val).map_err(|_| out_of_range())?);
        } else {
            self.emit_uint_minor(1, u64::try_from(-1 - val).map_err(|_| out_of_range())?);
        }
        Ok(())
    }

    fn emit_float(&mut self, val: f64) -> Result<(), Error> {
        if !val.is_finite() {
            return Err(Error::new(ErrorKind::NonFiniteFloat(val)));
        }
        self.data.push((7 << 5) | 27);
        self.data.write(&val.to_be_bytes());
        Ok(())
    }

    fn emit_bytes(&mut self, major: u8, val: &[u8]) {
        self.emit_uint_minor(major, val.len() as u64);
        self.data.write(val)
    }

    fn emit_link(&mut self, cid: &Cid) {
        self.emit_uint_minor(6, TAG_CID);
        self.emit_bytes(2, &cid.to_prefixed_bytes())
    }

    fn emit_array(&mut self, values: &[Value]) -> Result<(), Error> {
        self.emit_uint_minor(4, values.len() as u64);
        for (idx, value) in values.iter().enumerate() {
            self.emit(value).map_err(|e| e.within(Segment::Index(idx)))?;
        }
        Ok(())
    }

    /// Emits `map` with its keys in canonical order, whatever order the
    /// map itself iterates in.
    pub fn emit_map(&mut self, map: &Map) -> Result<(), Error> {
        let mut entries = map.iter().collect::<Vec<_>>();
        entries.sort_by(|(a, _), (b, _)| key_order(a, b));

        self.emit_uint_minor(5, entries.len() as u64);
        for (key, value) in entries {
            self.emit_bytes(3, key.as_bytes());
            self.emit(value)
                .map_err(|e| e.within(Segment::Key(key.clone())))?;
        }
        Ok(())
    }

    pub fn emit(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => self.data.push((7 << 5) | 22),
            Value::Bool(false) => self.data.push((7 << 5) | 20),
            Value::Bool(true) => self.data.push((7 << 5) | 21),
            Value::Integer(i) => self.emit_integer(*i)?,
            Value::Float(f) => self.emit_float(*f)?,
            Value::Bytes(b) => self.emit_bytes(2, b),
            Value::Text(s) => self.emit_bytes(3, s.as_bytes()),
            Value::Array(a) => self.emit_array(a)?,
            Value::Map(m) => self.emit_map(m)?,
            Value::Link(cid) => self.emit_link(cid),
        }
        Ok(())
    }
}

/// Encodes a document. The root of a DAG-CBOR document is always a map.
pub fn encode(map: &Map) -> Result<Vec<u8>, Error> {
    let mut e = Encoder::new();
    e.emit_map(map)?;
    Ok(e.build())
}

/// Encodes any value, not just a document root.
pub fn encode_value(value: &Value) -> Result<Vec<u8>, Error> {
    let mut e = Encoder::new();
    e.emit(value)?;
    Ok(e.build())
}

/// Encodes a document and computes the dag-cbor CID addressing it.
pub fn encode_with_cid(map: &Map) -> Result<(Cid, Vec<u8>), Error> {
    let data = encode(map)?;
    Ok((Cid::create(Codec::DagCbor, &data), data))
}
