use crate::error::Error;
use crate::exception::{DomainError, ExceptionCode};
use crate::server::connection::Connection;
use crate::server::dispatch::DispatchTable;
use crate::server::response::ResponsePdu;
use crate::tcp::frame::{self, FrameWriter, RequestAdu};
use crate::util::buffer::ReadBuffer;

/// The transaction engine. Owns the immutable dispatch table and drives one
/// transaction to completion per decoded request.
pub struct Server {
    table: DispatchTable,
}

impl Default for Server {
    fn default() -> Self {
        Server::new()
    }
}

impl Server {
    /// Create a [Server] with a dispatch entry for every supported function
    pub fn new() -> Self {
        Server {
            table: DispatchTable::new(),
        }
    }

    /// Try to decode one request ADU from the buffer and, if one is present,
    /// run the full transaction against the connection.
    ///
    /// Returns `Ok(false)` when the buffer does not yet hold a complete frame;
    /// nothing is consumed, sent, or read from the backend in that case. The
    /// caller retains unconsumed bytes for the next delivery. Structurally
    /// invalid data and I/O faults surface as [Error] and are fatal for the
    /// session; domain errors never do, they become exception responses.
    pub fn receive<C: Connection>(
        &self,
        buffer: &mut ReadBuffer,
        conn: &mut C,
    ) -> Result<bool, Error> {
        let adu = match frame::decode_request(buffer)? {
            Some(adu) => adu,
            None => return Ok(false),
        };

        tracing::debug!("PDU RX - {}", adu.pdu);
        Transaction::new(adu, conn).run(&self.table)?;
        Ok(true)
    }
}

/// One request/response cycle. Created when a request ADU decodes, discarded
/// as soon as the response is handed to the connection.
struct Transaction<'a, C: Connection> {
    request: RequestAdu,
    conn: &'a mut C,
    writer: FrameWriter,
}

impl<'a, C: Connection> Transaction<'a, C> {
    fn new(request: RequestAdu, conn: &'a mut C) -> Self {
        Transaction {
            request,
            conn,
            writer: FrameWriter::new(),
        }
    }

    fn run(mut self, table: &DispatchTable) -> Result<(), Error> {
        let result = self.dispatch(table);
        self.respond(result)
    }

    /// Look up the dispatch entry for the request and invoke its handler
    fn dispatch(&mut self, table: &DispatchTable) -> Result<ResponsePdu, DomainError> {
        let function = match self.request.pdu.function() {
            Some(function) => function,
            None => {
                return Err(DomainError::UnknownFunction(self.request.pdu.raw_function()));
            }
        };

        let entry = match table.lookup(function) {
            Some(entry) => entry,
            None => return Err(DomainError::UnknownFunction(function.get_value())),
        };

        // lookup already filters by kind, so a mismatch here is a table bug;
        // the client still deserves an answer
        if entry.request != function {
            tracing::error!("dispatch entry for {} does not match the request", function);
            return Err(DomainError::DeviceFailure);
        }

        let response = (entry.handler)(&self.request.pdu, &mut *self.conn)?;

        if response.wire_function() != entry.response.get_value() {
            tracing::error!("handler for {} produced a mismatched response", function);
            return Err(DomainError::DeviceFailure);
        }

        Ok(response)
    }

    /// Wrap the outcome in a response ADU carrying the request's transaction
    /// identifier and hand the encoded bytes to the connection
    fn respond(mut self, result: Result<ResponsePdu, DomainError>) -> Result<(), Error> {
        let pdu = match result {
            Ok(pdu) => pdu,
            Err(err) => {
                tracing::warn!("request failed: {}", err);
                ResponsePdu::Exception {
                    function: self.request.pdu.raw_function(),
                    exception: err.exception(),
                }
            }
        };

        let length = match self.writer.format_impl(self.request.header, &pdu) {
            Ok(length) => length,
            // a response too large for one frame is reported as a server
            // failure rather than killing the session
            Err(Error::Internal(err)) => {
                tracing::warn!("unable to serialize response: {}", err);
                let fallback = ResponsePdu::Exception {
                    function: self.request.pdu.raw_function(),
                    exception: ExceptionCode::ServerDeviceFailure,
                };
                self.writer.format_impl(self.request.header, &fallback)?
            }
            Err(err) => return Err(err),
        };

        self.conn.send(self.writer.get(length)?);
        Ok(())
    }
}
