use crate::error::InternalError;

pub(crate) fn num_bytes_for_bits(count: u16) -> usize {
    (count as usize + 7) / 8
}

pub(crate) fn calc_bytes_for_bits(num_bits: usize) -> Result<u8, InternalError> {
    let div_8 = num_bits / 8;
    let count = if num_bits % 8 == 0 { div_8 } else { div_8 + 1 };
    u8::try_from(count).map_err(|_| InternalError::BadByteCount(count))
}

pub(crate) fn calc_bytes_for_registers(num_registers: usize) -> Result<u8, InternalError> {
    let count = 2 * num_registers;
    u8::try_from(count).map_err(|_| InternalError::BadByteCount(count))
}

/// Unpack the first `count` bits from LSB-first packed bytes
pub(crate) fn unpack_bits(bytes: &[u8], count: u16) -> Vec<bool> {
    (0..count as usize)
        .map(|pos| match bytes.get(pos / 8) {
            Some(byte) => byte & (1 << (pos % 8)) != 0,
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculates_number_of_bytes_needed_for_count_of_packed_bits() {
        assert_eq!(num_bytes_for_bits(7), 1);
        assert_eq!(num_bytes_for_bits(8), 1);
        assert_eq!(num_bytes_for_bits(9), 2);
        assert_eq!(num_bytes_for_bits(15), 2);
        assert_eq!(num_bytes_for_bits(16), 2);
        assert_eq!(num_bytes_for_bits(17), 3);
        assert_eq!(num_bytes_for_bits(0xFFFF), 8192); // ensure that it's free from overflow
    }

    #[test]
    fn errors_when_byte_count_exceeds_u8() {
        assert_eq!(calc_bytes_for_bits(8 * 255), Ok(255));
        assert_eq!(
            calc_bytes_for_bits(8 * 255 + 1),
            Err(InternalError::BadByteCount(256))
        );
        assert_eq!(
            calc_bytes_for_registers(128),
            Err(InternalError::BadByteCount(256))
        );
    }

    #[test]
    fn unpacks_lsb_first() {
        assert_eq!(unpack_bits(&[0x05], 3), vec![true, false, true]);
        assert_eq!(
            unpack_bits(&[0xFF, 0x01], 9),
            vec![true, true, true, true, true, true, true, true, true]
        );
    }
}
