use crate::common::traits::Parse;
use crate::error::AduParseError;
use crate::types::{coil_from_u16, AddressRange, Indexed};
use crate::util::cursor::ReadCursor;

impl Parse for AddressRange {
    fn parse(cursor: &mut ReadCursor) -> Result<Self, AduParseError> {
        Ok(AddressRange::new(
            cursor.read_u16_be()?,
            cursor.read_u16_be()?,
        ))
    }
}

impl Parse for Indexed<bool> {
    fn parse(cursor: &mut ReadCursor) -> Result<Self, AduParseError> {
        Ok(Indexed::new(
            cursor.read_u16_be()?,
            coil_from_u16(cursor.read_u16_be()?)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_address_range() {
        let mut cursor = ReadCursor::new(&[0x00, 0x03, 0x02, 0x00]);
        let range = AddressRange::parse(&mut cursor).unwrap();
        assert_eq!(range, AddressRange::new(3, 512));
        assert!(cursor.is_empty());
    }

    #[test]
    fn parses_an_indexed_coil_state() {
        let mut cursor = ReadCursor::new(&[0x00, 0x05, 0xFF, 0x00]);
        assert_eq!(
            Indexed::<bool>::parse(&mut cursor),
            Ok(Indexed::new(5, true))
        );
    }

    #[test]
    fn rejects_an_unknown_coil_state() {
        let mut cursor = ReadCursor::new(&[0x00, 0x05, 0xAB, 0xCD]);
        assert_eq!(
            Indexed::<bool>::parse(&mut cursor),
            Err(AduParseError::UnknownCoilState(0xABCD))
        );
    }

    #[test]
    fn fails_when_too_few_bytes() {
        let mut cursor = ReadCursor::new(&[0x00, 0x03, 0x02]);
        assert_eq!(
            AddressRange::parse(&mut cursor),
            Err(AduParseError::InsufficientBytes)
        );
    }
}
