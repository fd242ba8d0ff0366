pub(crate) mod constants {
    pub(crate) const ILLEGAL_FUNCTION: u8 = 0x01;
    pub(crate) const ILLEGAL_DATA_ADDRESS: u8 = 0x02;
    pub(crate) const ILLEGAL_DATA_VALUE: u8 = 0x03;
    pub(crate) const SERVER_DEVICE_FAILURE: u8 = 0x04;
    pub(crate) const ACKNOWLEDGE: u8 = 0x05;
    pub(crate) const SERVER_DEVICE_BUSY: u8 = 0x06;
    pub(crate) const MEMORY_PARITY_ERROR: u8 = 0x08;
    pub(crate) const GATEWAY_PATH_UNAVAILABLE: u8 = 0x0A;
    pub(crate) const GATEWAY_TARGET_DEVICE_FAILED_TO_RESPOND: u8 = 0x0B;
}

/// Exception codes defined in the Modbus specification
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq)]
pub enum ExceptionCode {
    /// The function code received in the query is not an allowable action for the server
    IllegalFunction,
    /// The data address received in the query is not an allowable address for the server
    IllegalDataAddress,
    /// A value contained in the request is not an allowable value for the server
    IllegalDataValue,
    /// An unrecoverable error occurred while the server was attempting to perform the requested
    /// action
    ServerDeviceFailure,
    /// Specialized use in conjunction with programming commands
    ///
    /// The server has accepted the request and is processing it
    Acknowledge,
    /// Specialized use in conjunction with programming commands
    ///
    /// The server is engaged in processing a long-duration program command, try again later
    ServerDeviceBusy,
    /// The server attempted to read a record file, but detected a parity error in the memory
    MemoryParityError,
    /// The gateway was unable to allocate an internal communication path from the input port to
    /// the output port for processing the request
    GatewayPathUnavailable,
    /// No response was obtained from the target device. Usually means that the device is not
    /// present on the network
    GatewayTargetDeviceFailedToRespond,
    /// The exception code received is not defined in the standard
    Unknown(u8),
}

impl From<u8> for ExceptionCode {
    fn from(value: u8) -> Self {
        match value {
            constants::ILLEGAL_FUNCTION => ExceptionCode::IllegalFunction,
            constants::ILLEGAL_DATA_ADDRESS => ExceptionCode::IllegalDataAddress,
            constants::ILLEGAL_DATA_VALUE => ExceptionCode::IllegalDataValue,
            constants::SERVER_DEVICE_FAILURE => ExceptionCode::ServerDeviceFailure,
            constants::ACKNOWLEDGE => ExceptionCode::Acknowledge,
            constants::SERVER_DEVICE_BUSY => ExceptionCode::ServerDeviceBusy,
            constants::MEMORY_PARITY_ERROR => ExceptionCode::MemoryParityError,
            constants::GATEWAY_PATH_UNAVAILABLE => ExceptionCode::GatewayPathUnavailable,
            constants::GATEWAY_TARGET_DEVICE_FAILED_TO_RESPOND => {
                ExceptionCode::GatewayTargetDeviceFailedToRespond
            }
            _ => ExceptionCode::Unknown(value),
        }
    }
}

impl From<ExceptionCode> for u8 {
    fn from(ex: ExceptionCode) -> Self {
        match ex {
            ExceptionCode::IllegalFunction => constants::ILLEGAL_FUNCTION,
            ExceptionCode::IllegalDataAddress => constants::ILLEGAL_DATA_ADDRESS,
            ExceptionCode::IllegalDataValue => constants::ILLEGAL_DATA_VALUE,
            ExceptionCode::ServerDeviceFailure => constants::SERVER_DEVICE_FAILURE,
            ExceptionCode::Acknowledge => constants::ACKNOWLEDGE,
            ExceptionCode::ServerDeviceBusy => constants::SERVER_DEVICE_BUSY,
            ExceptionCode::MemoryParityError => constants::MEMORY_PARITY_ERROR,
            ExceptionCode::GatewayPathUnavailable => constants::GATEWAY_PATH_UNAVAILABLE,
            ExceptionCode::GatewayTargetDeviceFailedToRespond => {
                constants::GATEWAY_TARGET_DEVICE_FAILED_TO_RESPOND
            }
            ExceptionCode::Unknown(value) => value,
        }
    }
}

impl std::error::Error for ExceptionCode {}

impl std::fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExceptionCode::IllegalFunction => f.write_str("function code received in the query is not an allowable action for the server"),
            ExceptionCode::IllegalDataAddress => f.write_str("data address received in the query is not an allowable address for the server"),
            ExceptionCode::IllegalDataValue => f.write_str("value contained in the request is not an allowable value for the server"),
            ExceptionCode::ServerDeviceFailure => f.write_str("unrecoverable error occurred while the server was attempting to perform the requested action"),
            ExceptionCode::Acknowledge => f.write_str("server has accepted the request and is processing it"),
            ExceptionCode::ServerDeviceBusy => f.write_str("server is engaged in processing a long-duration program command, try again later"),
            ExceptionCode::MemoryParityError => f.write_str("server attempted to read a record file, but detected a parity error in the memory"),
            ExceptionCode::GatewayPathUnavailable => f.write_str("gateway was unable to allocate an internal communication path for processing the request"),
            ExceptionCode::GatewayTargetDeviceFailedToRespond => f.write_str("gateway did not receive a response from the target device"),
            ExceptionCode::Unknown(code) => write!(f, "received unknown exception code: {code}"),
        }
    }
}

/// Failure raised by dispatch or a request handler, converted by the
/// transaction coordinator into an exception response. Each variant maps onto
/// one of the standard exception codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// no handler exists for the function code
    UnknownFunction(u8),
    /// the storage backend rejected the translated index
    AddressOutOfRange,
    /// the storage backend rejected a value supplied by the client
    InvalidValue,
    /// internal dispatch inconsistency or an unclassified backend failure
    DeviceFailure,
}

impl DomainError {
    /// The exception code reported to the client for this failure
    pub fn exception(&self) -> ExceptionCode {
        match self {
            DomainError::UnknownFunction(_) => ExceptionCode::IllegalFunction,
            DomainError::AddressOutOfRange => ExceptionCode::IllegalDataAddress,
            DomainError::InvalidValue => ExceptionCode::IllegalDataValue,
            DomainError::DeviceFailure => ExceptionCode::ServerDeviceFailure,
        }
    }
}

impl std::error::Error for DomainError {}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DomainError::UnknownFunction(raw) => {
                write!(f, "no handler for function code {raw:#04X}")
            }
            DomainError::AddressOutOfRange => {
                f.write_str("storage backend rejected the requested address")
            }
            DomainError::InvalidValue => {
                f.write_str("storage backend rejected the supplied value")
            }
            DomainError::DeviceFailure => f.write_str("unrecoverable server failure"),
        }
    }
}
