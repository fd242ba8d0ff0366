/// address translation between protocol addresses and storage indices
mod address;
/// connection abstraction presented to request handlers
mod connection;
/// immutable function-to-handler dispatch table
mod dispatch;
/// request handlers, one per supported function
mod handlers;
/// request PDU model and parsing
mod request;
/// response PDU model, serialization, and client-side parsing
mod response;
/// storage backends and the connection adapter over them
mod storage;
/// the transaction engine itself
mod transaction;

pub use address::translate;
pub use connection::{Connection, StorageError};
pub use request::{RequestPdu, WriteRegisters};
pub use response::ResponsePdu;
pub use storage::{InMemoryStorage, Storage, StorageConnection, StorageType};
pub use transaction::Server;
