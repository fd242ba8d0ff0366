use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::InternalError;

/// Ring-like receive buffer. Bytes are appended by the connection layer (or
/// pulled from an [AsyncRead]) and consumed only when the frame parser accepts
/// a complete frame, so a truncated delivery leaves the contents untouched.
pub struct ReadBuffer {
    buffer: Vec<u8>,
    begin: usize,
    end: usize,
}

impl ReadBuffer {
    /// Create a buffer with the provided initial capacity
    pub fn new(capacity: usize) -> Self {
        ReadBuffer {
            buffer: vec![0; capacity],
            begin: 0,
            end: 0,
        }
    }

    /// Number of unconsumed bytes
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// True if no unconsumed bytes remain
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// View of the unconsumed bytes
    pub(crate) fn remaining(&self) -> &[u8] {
        self.buffer.get(self.begin..self.end).unwrap_or(&[])
    }

    /// Discard `count` bytes from the front of the buffer
    pub(crate) fn advance(&mut self, count: usize) -> Result<(), InternalError> {
        if self.len() < count {
            return Err(InternalError::InsufficientBytesForRead(count, self.len()));
        }
        self.begin += count;
        Ok(())
    }

    /// Append bytes delivered by the connection layer
    pub fn append(&mut self, data: &[u8]) {
        // compact first so appends reuse the space freed by consumed frames
        if self.is_empty() {
            self.begin = 0;
            self.end = 0;
        } else if self.begin > 0 {
            self.buffer.copy_within(self.begin..self.end, 0);
            self.end -= self.begin;
            self.begin = 0;
        }

        let required = self.end + data.len();
        if required > self.buffer.len() {
            self.buffer.resize(required, 0);
        }

        self.buffer[self.end..required].copy_from_slice(data);
        self.end = required;
    }

    /// Read some bytes from the provided I/O object, appending them to the buffer
    pub(crate) async fn read_some<T: AsyncRead + Unpin>(
        &mut self,
        io: &mut T,
    ) -> Result<usize, std::io::Error> {
        // check to see if the buffer is empty and adjust the indices
        // this allows us to make the biggest read possible
        if self.is_empty() {
            self.begin = 0;
            self.end = 0;
        }

        // if we've reached capacity, but still need more data we have to shift
        if self.end == self.buffer.len() {
            let length = self.len();
            self.buffer.copy_within(self.begin..self.end, 0);
            self.begin = 0;
            self.end = length;
        }

        let count = io.read(&mut self.buffer[self.end..]).await?;
        if count == 0 {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        }
        self.end += count;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_bytes_are_visible_until_consumed() {
        let mut buffer = ReadBuffer::new(8);
        assert!(buffer.is_empty());

        buffer.append(&[0x01, 0x02, 0x03]);
        assert_eq!(buffer.remaining(), &[0x01, 0x02, 0x03]);

        buffer.advance(2).unwrap();
        assert_eq!(buffer.remaining(), &[0x03]);

        buffer.append(&[0x04]);
        assert_eq!(buffer.remaining(), &[0x03, 0x04]);
    }

    #[test]
    fn errors_when_advancing_past_the_end() {
        let mut buffer = ReadBuffer::new(8);
        buffer.append(&[0x01]);
        assert_eq!(
            buffer.advance(2),
            Err(InternalError::InsufficientBytesForRead(2, 1))
        );
    }

    #[test]
    fn grows_to_hold_deliveries_larger_than_the_initial_capacity() {
        let mut buffer = ReadBuffer::new(2);
        let data: Vec<u8> = (0..32).collect();
        buffer.append(&data);
        assert_eq!(buffer.remaining(), data.as_slice());
    }

    #[test]
    fn read_some_errors_on_eof() {
        let mut io = tokio_test::io::Builder::new().build();
        let mut buffer = ReadBuffer::new(8);
        let err = tokio_test::block_on(buffer.read_some(&mut io)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
