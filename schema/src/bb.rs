/// A byte buffer meant for reading a fuse wire out of a binary image.
///
/// Example usage:
///
/// ```
/// let mut bb = fuse_wire_schema::ByteBuffer::new(b"abc\x01\x02");
/// assert_eq!(bb.seek_to(b"abc"), Ok(0));
/// assert_eq!(bb.read_bytes(3), Ok(b"abc".as_slice()));
/// assert_eq!(bb.read_byte(), Ok(1));
/// assert_eq!(bb.read_byte(), Ok(2));
/// assert_eq!(bb.read_byte(), Err(()));
/// ```
///
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that wraps the provided byte slice. The lifetime
    /// of the returned ByteBuffer must not outlive the lifetime of the byte
    /// slice.
    pub fn new(data: &'a [u8]) -> ByteBuffer<'a> {
        ByteBuffer { data, index: 0 }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor to the first occurrence of `needle` at or after the
    /// current index and return that position.
    pub fn seek_to(&mut self, needle: &[u8]) -> Result<usize, ()> {
        if needle.is_empty() || self.index > self.data.len() {
            return Err(());
        }
        let found = self.data[self.index..]
            .windows(needle.len())
            .position(|window| window == needle)
            .ok_or(())?;
        self.index += found;
        Ok(self.index)
    }

    /// Try to read a byte starting at the current index.
    pub fn read_byte(&mut self) -> Result<u8, ()> {
        if self.index >= self.data.len() {
            Err(())
        } else {
            let value = self.data[self.index];
            self.index += 1;
            Ok(value)
        }
    }

    /// Try to read `len` bytes starting at the current index.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ()> {
        if self.index + len > self.data.len() {
            Err(())
        } else {
            let value = &self.data[self.index..self.index + len];
            self.index += len;
            Ok(value)
        }
    }
}

#[test]
fn read_byte() {
    let read = |bytes| ByteBuffer::new(bytes).read_byte();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(1));
    assert_eq!(read(&[254]), Ok(254));
    assert_eq!(read(&[255]), Ok(255));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[], 1), Err(()));
    assert_eq!(read(&[0], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert_eq!(read(&[0], 2), Err(()));

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert_eq!(bb.read_bytes(1), Err(()));
}

#[test]
fn seek_to() {
    let mut bb = ByteBuffer::new(b"xxabyyab");
    assert_eq!(bb.seek_to(b"ab"), Ok(2));
    assert_eq!(bb.index(), 2);
    // Seeking again from the match stays put.
    assert_eq!(bb.seek_to(b"ab"), Ok(2));
    bb.read_bytes(2).unwrap();
    assert_eq!(bb.seek_to(b"ab"), Ok(6));
    bb.read_bytes(2).unwrap();
    assert_eq!(bb.seek_to(b"ab"), Err(()));

    assert_eq!(ByteBuffer::new(b"abc").seek_to(b""), Err(()));
    assert_eq!(ByteBuffer::new(b"a").seek_to(b"abc"), Err(()));
}
