/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Element of an array.
    Index(usize),
    /// Value of a map entry.
    Key(String),
    /// Key of the n-th entry of a map, before the key itself is known to be valid.
    MapKey(usize),
}

/// Location of a value within a document, from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub(crate) fn prepend(mut self, segment: Segment) -> Self {
        self.0.insert(0, segment);
        self
    }
}

impl From<Vec<Segment>> for Path {
    fn from(value: Vec<Segment>) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Path {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Key(k)
                    if !k.is_empty()
                        && k.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') =>
                {
                    write!(f, ".{k}")?
                }
                Segment::Key(k) => write!(f, "[{k:?}]")?,
                Segment::MapKey(n) => write!(f, ".<key {n}>")?,
            }
        }
        Ok(())
    }
}
