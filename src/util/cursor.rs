use crate::error::{AduParseError, InternalError};

/// custom read-only cursor
pub(crate) struct ReadCursor<'a> {
    src: &'a [u8],
}

/// custom write cursor
pub(crate) struct WriteCursor<'a> {
    dest: &'a mut [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    pub(crate) fn new(src: &'a [u8]) -> ReadCursor<'a> {
        ReadCursor { src }
    }

    pub(crate) fn len(&self) -> usize {
        self.src.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub(crate) fn expect_empty(&self) -> Result<(), AduParseError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AduParseError::TrailingBytes(self.len()))
        }
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, AduParseError> {
        match self.src.split_first() {
            Some((first, rest)) => {
                self.src = rest;
                Ok(*first)
            }
            None => Err(AduParseError::InsufficientBytes),
        }
    }

    pub(crate) fn read_u16_be(&mut self) -> Result<u16, AduParseError> {
        let high = self.read_u8()?;
        let low = self.read_u8()?;
        Ok(((high as u16) << 8) | (low as u16))
    }

    pub(crate) fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], AduParseError> {
        match (self.src.get(0..count), self.src.get(count..)) {
            (Some(first), Some(rest)) => {
                self.src = rest;
                Ok(first)
            }
            _ => Err(AduParseError::InsufficientBytes),
        }
    }
}

impl<'a> WriteCursor<'a> {
    pub(crate) fn new(dest: &'a mut [u8]) -> WriteCursor<'a> {
        WriteCursor { dest, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.dest.len() - self.pos
    }

    pub(crate) fn seek_from_start(&mut self, pos: usize) -> Result<(), InternalError> {
        if pos > self.dest.len() {
            return Err(InternalError::BadSeekOperation);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn write_u8(&mut self, value: u8) -> Result<(), InternalError> {
        match self.dest.get_mut(self.pos) {
            Some(dest) => {
                *dest = value;
                self.pos += 1;
                Ok(())
            }
            None => Err(InternalError::InsufficientWriteSpace(1, self.remaining())),
        }
    }

    pub(crate) fn write_u16_be(&mut self, value: u16) -> Result<(), InternalError> {
        if self.remaining() < 2 {
            return Err(InternalError::InsufficientWriteSpace(2, self.remaining()));
        }
        self.write_u8((value >> 8) as u8)?;
        self.write_u8((value & 0xFF) as u8)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_cursor_errors_when_empty() {
        let mut cursor = ReadCursor::new(&[]);
        assert_eq!(cursor.read_u8(), Err(AduParseError::InsufficientBytes));
        assert_eq!(cursor.read_u16_be(), Err(AduParseError::InsufficientBytes));
    }

    #[test]
    fn read_cursor_consumes_bytes_in_order() {
        let mut cursor = ReadCursor::new(&[0xCA, 0xFE, 0x01, 0x02, 0x03]);
        assert_eq!(cursor.read_u16_be(), Ok(0xCAFE));
        assert_eq!(cursor.read_bytes(2), Ok([0x01, 0x02].as_slice()));
        assert_eq!(cursor.expect_empty(), Err(AduParseError::TrailingBytes(1)));
        assert_eq!(cursor.read_u8(), Ok(0x03));
        assert_eq!(cursor.expect_empty(), Ok(()));
    }

    #[test]
    fn write_cursor_writes_big_endian() {
        let mut buffer = [0u8; 4];
        let mut cursor = WriteCursor::new(&mut buffer);
        cursor.write_u16_be(0x0102).unwrap();
        cursor.write_u16_be(0x0304).unwrap();
        assert_eq!(
            cursor.write_u8(0xFF),
            Err(InternalError::InsufficientWriteSpace(1, 0))
        );
        assert_eq!(buffer, [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn write_cursor_can_seek_back_to_patch_a_field() {
        let mut buffer = [0u8; 4];
        let mut cursor = WriteCursor::new(&mut buffer);
        cursor.write_u16_be(0x0000).unwrap();
        cursor.write_u16_be(0x0304).unwrap();
        cursor.seek_from_start(0).unwrap();
        cursor.write_u16_be(0x0102).unwrap();
        assert_eq!(cursor.seek_from_start(5), Err(InternalError::BadSeekOperation));
        assert_eq!(buffer, [0x01, 0x02, 0x03, 0x04]);
    }
}
