use crate::common::function::FunctionCode;
use crate::common::traits::Parse;
use crate::error::AduParseError;
use crate::types::{AddressRange, Indexed};
use crate::util::cursor::ReadCursor;

/// Request PDU decoded from the wire, one variant per supported function.
///
/// A function code outside the supported set decodes to [Unsupported], which
/// carries the raw code so the exception response can echo it.
///
/// [Unsupported]: RequestPdu::Unsupported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPdu {
    /// read a range of coils
    ReadCoils(AddressRange),
    /// read a range of discrete inputs (input status)
    ReadDiscreteInputs(AddressRange),
    /// read a range of holding registers
    ReadHoldingRegisters(AddressRange),
    /// read a range of input registers
    ReadInputRegisters(AddressRange),
    /// write a single coil
    WriteSingleCoil(Indexed<bool>),
    /// write a block of holding registers
    WriteMultipleRegisters(WriteRegisters),
    /// function code with no dispatch entry; payload is discarded
    Unsupported(u8),
}

/// Body of a write-multiple-registers request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRegisters {
    /// starting address of the block
    pub start: u16,
    /// register values to write
    pub values: Vec<u16>,
}

impl RequestPdu {
    /// Parse one request PDU from the body of a complete frame
    pub(crate) fn parse(cursor: &mut ReadCursor) -> Result<Self, AduParseError> {
        let raw = cursor.read_u8()?;

        let function = match FunctionCode::get(raw) {
            Some(x) => x,
            None => {
                // payload shape is unknown, discard it and keep the raw code
                cursor.read_bytes(cursor.len())?;
                return Ok(RequestPdu::Unsupported(raw));
            }
        };

        match function {
            FunctionCode::ReadCoils => {
                let x = RequestPdu::ReadCoils(AddressRange::parse(cursor)?);
                cursor.expect_empty()?;
                Ok(x)
            }
            FunctionCode::ReadDiscreteInputs => {
                let x = RequestPdu::ReadDiscreteInputs(AddressRange::parse(cursor)?);
                cursor.expect_empty()?;
                Ok(x)
            }
            FunctionCode::ReadHoldingRegisters => {
                let x = RequestPdu::ReadHoldingRegisters(AddressRange::parse(cursor)?);
                cursor.expect_empty()?;
                Ok(x)
            }
            FunctionCode::ReadInputRegisters => {
                let x = RequestPdu::ReadInputRegisters(AddressRange::parse(cursor)?);
                cursor.expect_empty()?;
                Ok(x)
            }
            FunctionCode::WriteSingleCoil => {
                let x = RequestPdu::WriteSingleCoil(Indexed::<bool>::parse(cursor)?);
                cursor.expect_empty()?;
                Ok(x)
            }
            FunctionCode::WriteMultipleRegisters => {
                let range = AddressRange::parse(cursor)?;
                let byte_count = cursor.read_u8()? as usize;
                if byte_count != 2 * range.count as usize {
                    return Err(AduParseError::ByteCountMismatch(
                        byte_count,
                        2 * range.count as usize,
                    ));
                }
                let mut values = Vec::with_capacity(range.count as usize);
                for _ in 0..range.count {
                    values.push(cursor.read_u16_be()?);
                }
                cursor.expect_empty()?;
                Ok(RequestPdu::WriteMultipleRegisters(WriteRegisters {
                    start: range.start,
                    values,
                }))
            }
        }
    }

    /// The dispatch tag of this request, if it belongs to the supported set
    pub(crate) fn function(&self) -> Option<FunctionCode> {
        match self {
            RequestPdu::ReadCoils(_) => Some(FunctionCode::ReadCoils),
            RequestPdu::ReadDiscreteInputs(_) => Some(FunctionCode::ReadDiscreteInputs),
            RequestPdu::ReadHoldingRegisters(_) => Some(FunctionCode::ReadHoldingRegisters),
            RequestPdu::ReadInputRegisters(_) => Some(FunctionCode::ReadInputRegisters),
            RequestPdu::WriteSingleCoil(_) => Some(FunctionCode::WriteSingleCoil),
            RequestPdu::WriteMultipleRegisters(_) => Some(FunctionCode::WriteMultipleRegisters),
            RequestPdu::Unsupported(_) => None,
        }
    }

    /// The raw function code as received on the wire
    pub(crate) fn raw_function(&self) -> u8 {
        match self.function() {
            Some(function) => function.get_value(),
            None => match self {
                RequestPdu::Unsupported(raw) => *raw,
                _ => 0,
            },
        }
    }
}

impl std::fmt::Display for RequestPdu {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RequestPdu::ReadCoils(range) => write!(f, "{} {}", FunctionCode::ReadCoils, range),
            RequestPdu::ReadDiscreteInputs(range) => {
                write!(f, "{} {}", FunctionCode::ReadDiscreteInputs, range)
            }
            RequestPdu::ReadHoldingRegisters(range) => {
                write!(f, "{} {}", FunctionCode::ReadHoldingRegisters, range)
            }
            RequestPdu::ReadInputRegisters(range) => {
                write!(f, "{} {}", FunctionCode::ReadInputRegisters, range)
            }
            RequestPdu::WriteSingleCoil(value) => {
                write!(f, "{} {}", FunctionCode::WriteSingleCoil, value)
            }
            RequestPdu::WriteMultipleRegisters(write) => write!(
                f,
                "{} start: {} count: {}",
                FunctionCode::WriteMultipleRegisters,
                write.start,
                write.values.len()
            ),
            RequestPdu::Unsupported(raw) => write!(f, "UNSUPPORTED FUNCTION ({raw:#04X})"),
        }
    }
}
