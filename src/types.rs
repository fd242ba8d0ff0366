use crate::error::AduParseError;

/// Modbus unit identifier, a type-safe wrapper around `u8`.
///
/// Unit-level multiplexing is not performed; the identifier is carried through
/// and echoed in the response unchanged.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq)]
pub struct UnitId {
    /// underlying raw value
    pub value: u8,
}

impl UnitId {
    /// Create a [UnitId] from a raw value
    pub fn new(value: u8) -> Self {
        UnitId { value }
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#04X}", self.value)
    }
}

/// Start address and element count tuple carried by read requests and echoed
/// by write-multiple responses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressRange {
    /// starting address of the range as transmitted on the wire
    pub start: u16,
    /// count of elements in the range
    pub count: u16,
}

impl AddressRange {
    /// Create an [AddressRange] from a start address and count
    pub fn new(start: u16, count: u16) -> Self {
        AddressRange { start, count }
    }
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "start: {} count: {}", self.start, self.count)
    }
}

/// Value and its wire address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indexed<T> {
    /// address of the value
    pub index: u16,
    /// associated value
    pub value: T,
}

impl<T> Indexed<T> {
    /// Create an [Indexed] from an address and value
    pub fn new(index: u16, value: T) -> Self {
        Indexed { index, value }
    }
}

impl<T> std::fmt::Display for Indexed<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "index: {} value: {}", self.index, self.value)
    }
}

/// Logical memory region addressed by a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// single-bit read/write values
    Coils,
    /// single-bit read-only values, aka input status
    DiscreteInputs,
    /// 16-bit read-only values
    InputRegisters,
    /// 16-bit read/write values
    HoldingRegisters,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TableKind::Coils => f.write_str("coils"),
            TableKind::DiscreteInputs => f.write_str("discrete inputs"),
            TableKind::InputRegisters => f.write_str("input registers"),
            TableKind::HoldingRegisters => f.write_str("holding registers"),
        }
    }
}

pub(crate) fn coil_to_u16(value: bool) -> u16 {
    if value {
        0xFF00
    } else {
        0x0000
    }
}

pub(crate) fn coil_from_u16(value: u16) -> Result<bool, AduParseError> {
    match value {
        0xFF00 => Ok(true),
        0x0000 => Ok(false),
        _ => Err(AduParseError::UnknownCoilState(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_coil_states_to_and_from_u16() {
        assert_eq!(coil_to_u16(true), 0xFF00);
        assert_eq!(coil_to_u16(false), 0x0000);
        assert_eq!(coil_from_u16(0xFF00), Ok(true));
        assert_eq!(coil_from_u16(0x0000), Ok(false));
        assert_eq!(
            coil_from_u16(0xCAFE),
            Err(AduParseError::UnknownCoilState(0xCAFE))
        );
    }
}
