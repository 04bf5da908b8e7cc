/// Append-only byte sink used by the encoder.
///
/// Storage at least doubles on each growth, or grows to exactly the
/// required size when doubling is not enough, so every byte is copied at
/// most once per growth and appends are amortised O(1).
pub(crate) struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    fn ensure(&mut self, needed: usize) {
        let required = self.data.len() + needed;
        if required > self.data.capacity() {
            let target = usize::max(self.data.capacity() * 2, required);
            self.data.reserve_exact(target - self.data.len());
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.ensure(bytes.len());
        self.data.extend_from_slice(bytes)
    }

    pub fn push(&mut self, byte: u8) {
        self.ensure(1);
        self.data.push(byte)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns exactly the bytes written.
    pub fn finalize(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_by_doubling() {
        let mut b = Buffer::with_capacity(4);
        b.write(&[1, 2, 3]);
        b.write(&[4, 5]);
        assert!(b.data.capacity() >= 8);

        b.write(&[0; 100]);
        assert!(b.data.capacity() >= 105);
        assert_eq!(b.len(), 105);
    }

    #[test]
    fn finalize_returns_written_prefix() {
        let mut b = Buffer::with_capacity(1024);
        b.push(0xa0);
        b.write(b"xyz");
        assert_eq!(b.finalize(), [0xa0, b'x', b'y', b'z']);
    }

    #[test]
    fn starts_empty() {
        let mut b = Buffer::with_capacity(0);
        assert_eq!(b.len(), 0);
        b.push(1);
        assert_eq!(b.finalize(), [1]);
    }
}
