use crate::common::traits::Serialize;
use crate::error::{Error, FrameParseError};
use crate::server::{RequestPdu, ResponsePdu};
use crate::types::UnitId;
use crate::util::buffer::ReadBuffer;
use crate::util::cursor::{ReadCursor, WriteCursor};

pub(crate) mod constants {
    pub(crate) const MAX_ADU_LENGTH: usize = 253;
    pub(crate) const HEADER_LENGTH: usize = 7;
    pub(crate) const MAX_FRAME_LENGTH: usize = HEADER_LENGTH + MAX_ADU_LENGTH;
    // includes the 1 byte unit id
    pub(crate) const MAX_LENGTH_FIELD: usize = MAX_ADU_LENGTH + 1;
}

/// Transaction identifier, the opaque correlation token echoed from request
/// to response
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct TxId {
    value: u16,
}

impl TxId {
    /// Create a [TxId] from a raw value
    pub fn new(value: u16) -> Self {
        TxId { value }
    }

    /// The underlying raw value
    pub fn to_u16(self) -> u16 {
        self.value
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#06X}", self.value)
    }
}

/// MBAP fields carried from a request into its response unchanged
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    /// unit identifier, echoed without multiplexing
    pub unit_id: UnitId,
    /// transaction identifier
    pub tx_id: TxId,
}

impl FrameHeader {
    /// Create a [FrameHeader] from its fields
    pub fn new(unit_id: UnitId, tx_id: TxId) -> Self {
        FrameHeader { unit_id, tx_id }
    }
}

/// Request ADU: the wire envelope around a request PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestAdu {
    /// echoed MBAP fields
    pub header: FrameHeader,
    /// decoded request payload
    pub pdu: RequestPdu,
}

/// Response ADU: the wire envelope around a response PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseAdu {
    /// echoed MBAP fields
    pub header: FrameHeader,
    /// decoded response payload
    pub pdu: ResponsePdu,
}

struct MbapHeader {
    tx_id: u16,
    unit_id: u8,
    pdu_length: usize,
}

fn parse_header(cursor: &mut ReadCursor) -> Result<MbapHeader, Error> {
    let tx_id = cursor.read_u16_be()?;
    let protocol_id = cursor.read_u16_be()?;
    let length = cursor.read_u16_be()? as usize;
    let unit_id = cursor.read_u8()?;

    if protocol_id != 0 {
        return Err(FrameParseError::UnknownProtocolId(protocol_id).into());
    }

    if length > constants::MAX_LENGTH_FIELD {
        return Err(FrameParseError::MbapLengthTooBig(length, constants::MAX_LENGTH_FIELD).into());
    }

    // must be > 0 b/c the 1-byte unit identifier counts towards the length
    if length == 0 {
        return Err(FrameParseError::MbapLengthZero.into());
    }

    Ok(MbapHeader {
        tx_id,
        unit_id,
        pdu_length: length - 1,
    })
}

/// Try to decode one request ADU from the front of the buffer.
///
/// Bytes are consumed only when a complete frame is present; `Ok(None)` means
/// more data is required and the buffer is untouched. `Err` means the data is
/// structurally invalid and the connection layer should give up on the stream.
pub fn decode_request(buffer: &mut ReadBuffer) -> Result<Option<RequestAdu>, Error> {
    if buffer.len() < constants::HEADER_LENGTH {
        return Ok(None);
    }

    let mut cursor = ReadCursor::new(buffer.remaining());
    let header = parse_header(&mut cursor)?;

    if cursor.len() < header.pdu_length {
        return Ok(None);
    }

    let mut body = ReadCursor::new(cursor.read_bytes(header.pdu_length)?);
    let pdu = RequestPdu::parse(&mut body)?;

    buffer.advance(constants::HEADER_LENGTH + header.pdu_length)?;

    Ok(Some(RequestAdu {
        header: FrameHeader::new(UnitId::new(header.unit_id), TxId::new(header.tx_id)),
        pdu,
    }))
}

/// Decode a response ADU from a complete frame, using the originating request
/// for context. Client direction of the codec contract.
pub fn decode_response(frame: &[u8], request: &RequestAdu) -> Result<ResponseAdu, Error> {
    let mut cursor = ReadCursor::new(frame);
    let header = parse_header(&mut cursor)?;

    let mut body = ReadCursor::new(cursor.read_bytes(header.pdu_length)?);
    cursor.expect_empty()?;

    let pdu = ResponsePdu::parse(&mut body, &request.pdu)?;

    Ok(ResponseAdu {
        header: FrameHeader::new(UnitId::new(header.unit_id), TxId::new(header.tx_id)),
        pdu,
    })
}

/// Formats response ADUs into an internal buffer
pub(crate) struct FrameWriter {
    buffer: [u8; constants::MAX_FRAME_LENGTH],
}

impl FrameWriter {
    pub(crate) fn new() -> Self {
        FrameWriter {
            buffer: [0; constants::MAX_FRAME_LENGTH],
        }
    }

    /// Serialize a response ADU, returning the number of frame bytes written
    pub(crate) fn format_impl(
        &mut self,
        header: FrameHeader,
        pdu: &ResponsePdu,
    ) -> Result<usize, Error> {
        let mut cursor = WriteCursor::new(self.buffer.as_mut());
        cursor.write_u16_be(header.tx_id.to_u16())?;
        cursor.write_u16_be(0)?; // protocol id
        cursor.write_u16_be(0)?; // length, patched below
        cursor.write_u8(header.unit_id.value)?;

        pdu.serialize(&mut cursor)?;
        let total_length = cursor.position();

        // patch the length field: PDU bytes plus the unit id
        let length_field = (total_length - constants::HEADER_LENGTH + 1) as u16;
        cursor.seek_from_start(4)?;
        cursor.write_u16_be(length_field)?;

        Ok(total_length)
    }

    pub(crate) fn get(&self, length: usize) -> Result<&[u8], Error> {
        match self.buffer.get(..length) {
            Some(bytes) => Ok(bytes),
            None => Err(crate::error::InternalError::BadSeekOperation.into()),
        }
    }
}
