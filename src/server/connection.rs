use crate::exception::DomainError;

/// Failure reported by the storage backend when an accessor is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// the index (or index + count) falls outside the backend's valid range
    AddressOutOfRange,
    /// the supplied value is not acceptable to the backend
    InvalidValue,
    /// unclassified backend failure
    Internal,
}

impl std::error::Error for StorageError {}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StorageError::AddressOutOfRange => f.write_str("address out of range"),
            StorageError::InvalidValue => f.write_str("value not acceptable"),
            StorageError::Internal => f.write_str("internal storage failure"),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AddressOutOfRange => DomainError::AddressOutOfRange,
            StorageError::InvalidValue => DomainError::InvalidValue,
            StorageError::Internal => DomainError::DeviceFailure,
        }
    }
}

/// What the transaction engine consumes from the surrounding connection:
/// fire-and-forget transmission of encoded frames plus the storage accessors
/// of the device the connection serves.
///
/// Indices passed to the accessors are storage indices produced by
/// [translate](crate::server::translate), not wire addresses. Implementations
/// may share one storage backend across connections; any serialization
/// discipline around it belongs to the backend.
pub trait Connection {
    /// Queue an encoded response frame for transmission
    fn send(&mut self, frame: &[u8]);

    /// Read `count` single-bit values starting at `index`
    fn read_bits(&mut self, index: u32, count: u16) -> Result<Vec<bool>, StorageError>;

    /// Read `count` 16-bit registers starting at `index`
    fn read_registers(&mut self, index: u32, count: u16) -> Result<Vec<u16>, StorageError>;

    /// Write a single bit, returning the value actually applied
    fn write_bit(&mut self, index: u32, value: bool) -> Result<bool, StorageError>;

    /// Write a block of registers, returning the count written
    fn write_registers(&mut self, index: u32, values: &[u16]) -> Result<u16, StorageError>;
}
