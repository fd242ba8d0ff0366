use crate::common::bits::{calc_bytes_for_bits, calc_bytes_for_registers};
use crate::common::traits::Serialize;
use crate::error::Error;
use crate::exception::ExceptionCode;
use crate::types::{coil_to_u16, AddressRange, Indexed};
use crate::util::cursor::WriteCursor;

impl Serialize for AddressRange {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), Error> {
        cursor.write_u16_be(self.start)?;
        cursor.write_u16_be(self.count)?;
        Ok(())
    }
}

impl Serialize for ExceptionCode {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), Error> {
        cursor.write_u8((*self).into())?;
        Ok(())
    }
}

impl Serialize for Indexed<bool> {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), Error> {
        cursor.write_u16_be(self.index)?;
        cursor.write_u16_be(coil_to_u16(self.value))?;
        Ok(())
    }
}

impl Serialize for [bool] {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), Error> {
        cursor.write_u8(calc_bytes_for_bits(self.len())?)?;

        for byte in self.chunks(8) {
            let mut acc: u8 = 0;
            for (count, bit) in byte.iter().enumerate() {
                if *bit {
                    acc |= 1 << count as u8;
                }
            }
            cursor.write_u8(acc)?;
        }

        Ok(())
    }
}

impl Serialize for [u16] {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), Error> {
        cursor.write_u8(calc_bytes_for_registers(self.len())?)?;

        for value in self {
            cursor.write_u16_be(*value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize_to_vec<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
        let mut buffer = [0u8; 64];
        let mut cursor = WriteCursor::new(&mut buffer);
        value.serialize(&mut cursor).unwrap();
        let length = cursor.position();
        buffer[..length].to_vec()
    }

    #[test]
    fn serializes_an_address_range() {
        assert_eq!(
            serialize_to_vec(&AddressRange::new(3, 512)),
            [0x00, 0x03, 0x02, 0x00]
        );
    }

    #[test]
    fn serializes_packed_bits_lsb_first() {
        assert_eq!(
            serialize_to_vec([true, false, true].as_slice()),
            [0x01, 0x05]
        );
        assert_eq!(
            serialize_to_vec([true; 9].as_slice()),
            [0x02, 0xFF, 0x01]
        );
    }

    #[test]
    fn serializes_registers_big_endian() {
        assert_eq!(
            serialize_to_vec([0xCAFE, 0x0001].as_slice()),
            [0x04, 0xCA, 0xFE, 0x00, 0x01]
        );
    }

    #[test]
    fn serializes_an_indexed_coil_state() {
        assert_eq!(
            serialize_to_vec(&Indexed::new(5, true)),
            [0x00, 0x05, 0xFF, 0x00]
        );
    }
}
