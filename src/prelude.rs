//! One-stop `use` for embedding the transaction engine

pub use crate::error::Error;
pub use crate::exception::{DomainError, ExceptionCode};
pub use crate::server::{
    translate, Connection, InMemoryStorage, RequestPdu, ResponsePdu, Server, Storage,
    StorageConnection, StorageError, StorageType, WriteRegisters,
};
pub use crate::tcp::frame::{FrameHeader, RequestAdu, ResponseAdu, TxId};
pub use crate::tcp::server::{ServerTask, SessionTask};
pub use crate::types::{AddressRange, Indexed, TableKind, UnitId};
pub use crate::util::buffer::ReadBuffer;
