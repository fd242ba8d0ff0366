use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::error::Error;
use crate::server::{Server, Storage, StorageConnection, StorageType};
use crate::util::buffer::ReadBuffer;

/// Accepts TCP connections and spawns a [SessionTask] for each one.
///
/// Every session shares the same storage backend, so writes performed by one
/// client are visible to reads from another.
pub struct ServerTask<S: Storage> {
    listener: TcpListener,
    storage: StorageType<S>,
}

impl<S: Storage> ServerTask<S> {
    /// Bind the listener and return the task ready to run
    pub async fn bind(addr: SocketAddr, storage: StorageType<S>) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(ServerTask { listener, storage })
    }

    /// Local address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Run the accept loop until the listener fails
    pub async fn run(self) -> Result<(), std::io::Error> {
        let mut session_id: u64 = 0;
        loop {
            let (socket, remote) = self.listener.accept().await?;
            session_id = session_id.wrapping_add(1);
            tracing::info!("accepted connection from: {}", remote);

            let mut session = SessionTask::new(socket, self.storage.clone());
            tokio::spawn(
                async move {
                    match session.run().await {
                        Err(Error::Io(err))
                            if err.kind() == std::io::ErrorKind::UnexpectedEof =>
                        {
                            tracing::info!("remote closed the connection");
                        }
                        Err(err) => tracing::warn!("session terminated: {}", err),
                        Ok(()) => {}
                    }
                }
                .instrument(tracing::info_span!("Session", id = session_id, remote = ?remote)),
            );
        }
    }
}

/// Serves one client socket. Reads bytes into a [ReadBuffer], lets the
/// transaction engine consume complete frames, and flushes the queued
/// responses back to the socket.
pub struct SessionTask<S: Storage, T: AsyncRead + AsyncWrite + Unpin> {
    io: T,
    server: Server,
    conn: StorageConnection<S>,
    buffer: ReadBuffer,
}

impl<S: Storage, T: AsyncRead + AsyncWrite + Unpin> SessionTask<S, T> {
    /// Create a session over an established I/O object
    pub fn new(io: T, storage: StorageType<S>) -> Self {
        SessionTask {
            io,
            server: Server::new(),
            conn: StorageConnection::new(storage),
            buffer: ReadBuffer::new(crate::tcp::frame::constants::MAX_FRAME_LENGTH),
        }
    }

    /// Run until the socket closes or the byte stream turns out to be
    /// structurally invalid
    pub async fn run(&mut self) -> Result<(), Error> {
        loop {
            while self.server.receive(&mut self.buffer, &mut self.conn)? {
                while let Some(frame) = self.conn.pop_frame() {
                    self.io.write_all(&frame).await?;
                }
            }
            self.buffer.read_some(&mut self.io).await?;
        }
    }
}
