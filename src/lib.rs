//! A server-side transaction layer for Modbus TCP.
//!
//! The crate decodes request ADUs off a byte stream, dispatches each request
//! through an immutable function table, reads or writes a storage backend,
//! and hands the encoded response back to the connection. Recoverable
//! protocol failures become Modbus exception responses; only I/O faults and
//! structurally invalid frames terminate a session.
//!
//! The core engine in [server] is synchronous and transport-agnostic. The
//! [tcp] module layers Tokio-based listener and session tasks on top of it
//! for serving real sockets.

#![forbid(unsafe_code)]
#![deny(trivial_casts, trivial_numeric_casts, unused_import_braces)]

/// Error types fatal to a session
pub mod error;
/// Modbus exception codes and the domain errors that map onto them
pub mod exception;
/// Convenient re-export of the public API
pub mod prelude;
/// The transaction engine: dispatch, handlers, address translation, storage
pub mod server;
/// MBAP framing and the Tokio TCP layer
pub mod tcp;
/// Public types shared between requests and responses
pub mod types;
/// Buffer utilities used by the connection layer
pub mod util;

mod common;
