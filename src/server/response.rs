use crate::common::bits::{num_bytes_for_bits, unpack_bits};
use crate::common::function::FunctionCode;
use crate::common::traits::Serialize;
use crate::error::{AduParseError, Error};
use crate::exception::ExceptionCode;
use crate::server::request::RequestPdu;
use crate::types::{coil_from_u16, AddressRange, Indexed};
use crate::util::cursor::{ReadCursor, WriteCursor};

/// Response PDU produced by a request handler, or by the transaction
/// coordinator when a domain error must be reported to the client.
///
/// Values are as transmitted on the wire: read responses carry the element
/// values, write responses echo the fields the protocol requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePdu {
    /// ordered coil values
    ReadCoils(Vec<bool>),
    /// ordered discrete input values
    ReadDiscreteInputs(Vec<bool>),
    /// ordered holding register values
    ReadHoldingRegisters(Vec<u16>),
    /// ordered input register values
    ReadInputRegisters(Vec<u16>),
    /// echoed start address and applied value
    WriteSingleCoil(Indexed<bool>),
    /// echoed start address and count of registers written
    WriteMultipleRegisters(AddressRange),
    /// exception reply carrying the original function code
    Exception {
        /// raw function code of the request being answered
        function: u8,
        /// exception code describing the failure
        exception: ExceptionCode,
    },
}

impl ResponsePdu {
    /// The function byte written on the wire for this response
    pub(crate) fn wire_function(&self) -> u8 {
        match self {
            ResponsePdu::ReadCoils(_) => FunctionCode::ReadCoils.get_value(),
            ResponsePdu::ReadDiscreteInputs(_) => FunctionCode::ReadDiscreteInputs.get_value(),
            ResponsePdu::ReadHoldingRegisters(_) => {
                FunctionCode::ReadHoldingRegisters.get_value()
            }
            ResponsePdu::ReadInputRegisters(_) => FunctionCode::ReadInputRegisters.get_value(),
            ResponsePdu::WriteSingleCoil(_) => FunctionCode::WriteSingleCoil.get_value(),
            ResponsePdu::WriteMultipleRegisters(_) => {
                FunctionCode::WriteMultipleRegisters.get_value()
            }
            ResponsePdu::Exception { function, .. } => function | 0x80,
        }
    }

    /// Parse a response PDU, using the originating request for context.
    ///
    /// This is the client direction of the codec contract; the count of a bit
    /// or register read cannot be recovered from the byte count alone.
    pub fn parse(cursor: &mut ReadCursor, request: &RequestPdu) -> Result<Self, AduParseError> {
        let raw = cursor.read_u8()?;

        if raw & 0x80 != 0 {
            let exception = ExceptionCode::from(cursor.read_u8()?);
            cursor.expect_empty()?;
            return Ok(ResponsePdu::Exception {
                function: raw & 0x7F,
                exception,
            });
        }

        if raw != request.raw_function() {
            return Err(AduParseError::UnknownResponseFunction(raw));
        }

        let pdu = match request {
            RequestPdu::ReadCoils(range) => {
                ResponsePdu::ReadCoils(parse_bit_values(cursor, range.count)?)
            }
            RequestPdu::ReadDiscreteInputs(range) => {
                ResponsePdu::ReadDiscreteInputs(parse_bit_values(cursor, range.count)?)
            }
            RequestPdu::ReadHoldingRegisters(range) => {
                ResponsePdu::ReadHoldingRegisters(parse_register_values(cursor, range.count)?)
            }
            RequestPdu::ReadInputRegisters(range) => {
                ResponsePdu::ReadInputRegisters(parse_register_values(cursor, range.count)?)
            }
            RequestPdu::WriteSingleCoil(_) => ResponsePdu::WriteSingleCoil(Indexed::new(
                cursor.read_u16_be()?,
                coil_from_u16(cursor.read_u16_be()?)?,
            )),
            RequestPdu::WriteMultipleRegisters(_) => ResponsePdu::WriteMultipleRegisters(
                AddressRange::new(cursor.read_u16_be()?, cursor.read_u16_be()?),
            ),
            RequestPdu::Unsupported(_) => {
                return Err(AduParseError::UnknownResponseFunction(raw));
            }
        };

        cursor.expect_empty()?;
        Ok(pdu)
    }
}

fn parse_bit_values(cursor: &mut ReadCursor, count: u16) -> Result<Vec<bool>, AduParseError> {
    let byte_count = cursor.read_u8()? as usize;
    if byte_count != num_bytes_for_bits(count) {
        return Err(AduParseError::ByteCountMismatch(
            byte_count,
            num_bytes_for_bits(count),
        ));
    }
    Ok(unpack_bits(cursor.read_bytes(byte_count)?, count))
}

fn parse_register_values(cursor: &mut ReadCursor, count: u16) -> Result<Vec<u16>, AduParseError> {
    let byte_count = cursor.read_u8()? as usize;
    if byte_count != 2 * count as usize {
        return Err(AduParseError::ByteCountMismatch(
            byte_count,
            2 * count as usize,
        ));
    }
    let mut values = Vec::with_capacity(count as usize);
    for _ in 0..count {
        values.push(cursor.read_u16_be()?);
    }
    Ok(values)
}

impl Serialize for ResponsePdu {
    fn serialize(&self, cursor: &mut WriteCursor) -> Result<(), Error> {
        cursor.write_u8(self.wire_function())?;
        match self {
            ResponsePdu::ReadCoils(values) => values.as_slice().serialize(cursor),
            ResponsePdu::ReadDiscreteInputs(values) => values.as_slice().serialize(cursor),
            ResponsePdu::ReadHoldingRegisters(values) => values.as_slice().serialize(cursor),
            ResponsePdu::ReadInputRegisters(values) => values.as_slice().serialize(cursor),
            ResponsePdu::WriteSingleCoil(value) => value.serialize(cursor),
            ResponsePdu::WriteMultipleRegisters(range) => range.serialize(cursor),
            ResponsePdu::Exception { exception, .. } => exception.serialize(cursor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize_to_vec(pdu: &ResponsePdu) -> Vec<u8> {
        let mut buffer = [0u8; 64];
        let mut cursor = WriteCursor::new(&mut buffer);
        pdu.serialize(&mut cursor).unwrap();
        let length = cursor.position();
        buffer[..length].to_vec()
    }

    #[test]
    fn serializes_a_bit_read_response() {
        let pdu = ResponsePdu::ReadCoils(vec![true, false, true]);
        assert_eq!(serialize_to_vec(&pdu), [0x01, 0x01, 0x05]);
    }

    #[test]
    fn serializes_a_register_read_response() {
        let pdu = ResponsePdu::ReadHoldingRegisters(vec![0x000A, 0x0014]);
        assert_eq!(serialize_to_vec(&pdu), [0x03, 0x04, 0x00, 0x0A, 0x00, 0x14]);
    }

    #[test]
    fn serializes_a_write_echo_response() {
        let pdu = ResponsePdu::WriteSingleCoil(Indexed::new(5, true));
        assert_eq!(serialize_to_vec(&pdu), [0x05, 0x00, 0x05, 0xFF, 0x00]);
    }

    #[test]
    fn serializes_an_exception_with_the_high_bit_set() {
        let pdu = ResponsePdu::Exception {
            function: 0x10,
            exception: ExceptionCode::IllegalDataAddress,
        };
        assert_eq!(serialize_to_vec(&pdu), [0x90, 0x02]);
    }

    #[test]
    fn parses_a_bit_read_response_using_the_request_count() {
        let request = RequestPdu::ReadCoils(AddressRange::new(0, 3));
        let mut cursor = ReadCursor::new(&[0x01, 0x01, 0x05]);
        assert_eq!(
            ResponsePdu::parse(&mut cursor, &request),
            Ok(ResponsePdu::ReadCoils(vec![true, false, true]))
        );
    }

    #[test]
    fn parses_an_exception_response() {
        let request = RequestPdu::ReadCoils(AddressRange::new(0, 3));
        let mut cursor = ReadCursor::new(&[0x81, 0x02]);
        assert_eq!(
            ResponsePdu::parse(&mut cursor, &request),
            Ok(ResponsePdu::Exception {
                function: 0x01,
                exception: ExceptionCode::IllegalDataAddress,
            })
        );
    }

    #[test]
    fn rejects_a_response_that_does_not_answer_the_request() {
        let request = RequestPdu::ReadCoils(AddressRange::new(0, 3));
        let mut cursor = ReadCursor::new(&[0x03, 0x02, 0x00, 0x0A]);
        assert_eq!(
            ResponsePdu::parse(&mut cursor, &request),
            Err(AduParseError::UnknownResponseFunction(0x03))
        );
    }
}
