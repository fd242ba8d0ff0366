/// The error type returned to the connection layer. Anything surfacing here is
/// fatal for the session; recoverable protocol failures become Modbus exception
/// responses instead and never appear as an [Error].
#[derive(Debug)]
pub enum Error {
    /// I/O error from the underlying transport
    Io(std::io::Error),
    /// received a structurally invalid frame
    BadFrame(FrameParseError),
    /// received a frame whose body could not be parsed
    BadRequest(AduParseError),
    /// logic error inside the library, e.g. a failed buffer write
    Internal(InternalError),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::BadFrame(err) => write!(f, "bad frame: {err}"),
            Error::BadRequest(err) => write!(f, "bad request: {err}"),
            Error::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<FrameParseError> for Error {
    fn from(err: FrameParseError) -> Self {
        Error::BadFrame(err)
    }
}

impl From<AduParseError> for Error {
    fn from(err: AduParseError) -> Self {
        Error::BadRequest(err)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Error::Internal(err)
    }
}

/// errors that occur while parsing an MBAP frame off a stream
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameParseError {
    /// received a frame with the length field set to zero
    MbapLengthZero,
    /// received a frame with a length that exceeds the max allowed size
    MbapLengthTooBig(usize, usize), // actual length and maximum length
    /// received a frame with a non-Modbus protocol id
    UnknownProtocolId(u16),
}

impl std::error::Error for FrameParseError {}

impl std::fmt::Display for FrameParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FrameParseError::MbapLengthZero => {
                f.write_str("received frame with the length field set to zero")
            }
            FrameParseError::MbapLengthTooBig(length, max) => write!(
                f,
                "received frame with length ({length}) that exceeds the max allowed length ({max})"
            ),
            FrameParseError::UnknownProtocolId(id) => {
                write!(f, "received frame with non-Modbus protocol id: {id}")
            }
        }
    }
}

/// errors that occur while parsing a PDU inside a complete frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AduParseError {
    /// PDU is too short to be valid
    InsufficientBytes,
    /// PDU contains extra trailing bytes
    TrailingBytes(usize),
    /// the declared byte count does not match the declared element count
    ByteCountMismatch(usize, usize), // declared byte count / count implied by elements
    /// a coil state field held something other than 0xFF00 or 0x0000
    UnknownCoilState(u16),
    /// a response carried a function code that does not answer the request
    UnknownResponseFunction(u8),
}

impl std::error::Error for AduParseError {}

impl std::fmt::Display for AduParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AduParseError::InsufficientBytes => f.write_str("PDU is too short to be valid"),
            AduParseError::TrailingBytes(count) => {
                write!(f, "PDU contains {count} extra trailing bytes")
            }
            AduParseError::ByteCountMismatch(declared, implied) => write!(
                f,
                "declared byte count ({declared}) does not match the element count ({implied})"
            ),
            AduParseError::UnknownCoilState(value) => {
                write!(f, "received coil state with unspecified value: {value:#06X}")
            }
            AduParseError::UnknownResponseFunction(value) => {
                write!(f, "received unexpected response function code: {value:#04X}")
            }
        }
    }
}

/// errors that should only occur if there is a logic error in the library
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// attempted to write more bytes than the output buffer can hold
    InsufficientWriteSpace(usize, usize), // written size and remaining size
    /// cursor seek exceeded the bounds of the underlying buffer
    BadSeekOperation,
    /// a byte count would exceed the maximum size of a u8
    BadByteCount(usize),
    /// attempted to discard more bytes than the buffer holds
    InsufficientBytesForRead(usize, usize), // requested and remaining
}

impl std::error::Error for InternalError {}

impl std::fmt::Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            InternalError::InsufficientWriteSpace(write_size, remaining) => write!(
                f,
                "attempted to write {write_size} bytes with {remaining} bytes remaining"
            ),
            InternalError::BadSeekOperation => {
                f.write_str("cursor seek operation exceeded the bounds of the underlying buffer")
            }
            InternalError::BadByteCount(count) => {
                write!(f, "byte count would exceed the maximum size of a u8: {count}")
            }
            InternalError::InsufficientBytesForRead(requested, remaining) => write!(
                f,
                "attempted to discard {requested} bytes with only {remaining} remaining"
            ),
        }
    }
}
