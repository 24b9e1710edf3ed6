use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::{self, error::Elapsed};

use crate::{
    command::Command,
    config::{ClientBuilder, Config},
    error::{CommandError, ConnectionError, PacketError, RconError, TransportError},
    packet::{Packet, PacketType},
};

/// Any byte stream the client can speak rcon over.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Transport for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Asynchronous rcon client. Build one with [`Client::builder`], then call
/// [`connect`](Client::connect) to open the connection and authenticate.
///
/// The protocol allows only one outstanding request per connection, so every
/// exchange (the handshake included) runs under a single per-client lock. A
/// `Client` can be shared between tasks behind an `Arc`; concurrent calls
/// queue up and run one after the other.
///
/// Dropping a call's future while it waits for the lock is free. Dropping it
/// after its request went out closes the connection, since the unread
/// response would otherwise be handed to the next caller.
///
/// ## Example
/// ```no_run
/// use rconlink::client::Client;
/// use std::error::Error;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn Error>> {
///     let client = Client::builder()
///         .host("dev.viora.sh")
///         .port(27016)?
///         .password("<put rcon password here>")
///         .build()?;
///
///     client.connect().await?;
///     let response = client.execute_command("echo hi").await?;
///
///     assert_eq!(response, "hi");
///     client.disconnect().await;
///     Ok(())
/// }
/// ```
pub struct Client<S = TcpStream> {
    config: Config,
    session: Mutex<Session<S>>,
    connected: AtomicBool,
}

/// Everything the lock protects.
struct Session<S> {
    stream: Option<S>,
    last_id: i32,
}

impl<S> Session<S> {
    // ids stay positive so they can never collide with the -1 auth failure marker
    fn next_id(&mut self) -> i32 {
        self.last_id = self.last_id.checked_add(1).unwrap_or(1);
        self.last_id
    }

    /// Drops the stream and marks the client disconnected. Returns whether
    /// there was a stream to drop.
    fn close(&mut self, connected: &AtomicBool) -> bool {
        connected.store(false, Ordering::Release);
        self.stream.take().is_some()
    }
}

/// Outcome of [`Client::send_command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconResponse {
    success: bool,
    message: String,
    error_message: Option<String>,
}

impl RconResponse {
    pub fn successful(message: impl Into<String>) -> Self {
        RconResponse {
            success: true,
            message: message.into(),
            error_message: None,
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        RconResponse {
            success: false,
            message: String::new(),
            error_message: Some(error_message.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Response body; empty for failed commands.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl Client<TcpStream> {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Opens a TCP connection to the configured host and authenticates.
    /// Does nothing if the client is already connected.
    pub async fn connect(&self) -> Result<(), RconError> {
        let mut session = self.session.lock().await;
        if self.is_connected() {
            return Ok(());
        }

        let addr = self.config.addr();
        let connecting = time::timeout(self.config.timeout, TcpStream::connect(addr.as_str())).await;
        let stream = match connecting {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(ConnectionError::Unreachable { addr, source }.into()),
            Err(_) => return Err(ConnectionError::ConnectTimeout { addr }.into()),
        };

        trace!("opened tcp stream to {}, attempting auth", addr);

        self.establish(&mut session, stream).await
    }
}

impl<S: Transport> Client<S> {
    pub fn from_config(config: Config) -> Self {
        Client {
            config,
            session: Mutex::new(Session {
                stream: None,
                last_id: 0,
            }),
            connected: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the client holds an authenticated stream that has not failed.
    /// Any broken or interrupted exchange flips this back to `false`.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Authenticates over an already opened stream instead of dialing TCP.
    /// If the client is already connected, `stream` is dropped unused.
    pub async fn connect_with(&self, stream: S) -> Result<(), RconError> {
        let mut session = self.session.lock().await;
        if self.is_connected() {
            return Ok(());
        }

        self.establish(&mut session, stream).await
    }

    /// Closes the connection. Safe to call at any time, any number of times.
    pub async fn disconnect(&self) {
        let mut session = self.session.lock().await;
        self.connected.store(false, Ordering::Release);

        if let Some(mut stream) = session.stream.take() {
            match time::timeout(self.config.timeout, stream.shutdown()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("error shutting down rcon stream: {}", e),
                Err(_) => debug!("timed out shutting down rcon stream"),
            }
            debug!("disconnected from {}", self.config.addr());
        }
    }

    /// Runs a command and returns the raw response body.
    pub async fn execute_command(&self, command: &str) -> Result<String, RconError> {
        if !self.is_connected() {
            return Err(ConnectionError::NotConnected.into());
        }

        // a body that can never be framed must not use up a request id
        Packet::check_body(command).map_err(|e| CommandError::Failed(e.into()))?;

        let mut session = self.session.lock().await;
        let id = session.next_id();
        let command_packet = Packet::new(id, PacketType::Exec, command)
            .map_err(|e| CommandError::Failed(e.into()))?;

        trace!("sending command packet {} to server", id);
        let response = self
            .exchange(&mut session, &command_packet)
            .await
            .map_err(Fault::into_command_error)?;
        trace!("receive response for packet id {}", response.id());

        if response.id() != id {
            // every later reply would be off by one as well
            session.close(&self.connected);
            warn!(
                "response id {} does not match request {}, closing connection",
                response.id(),
                id
            );
            return Err(CommandError::IdMismatch {
                expected: id,
                actual: response.id(),
            }
            .into());
        }

        Ok(response.into_body())
    }

    /// Runs a [`Command`] and parses its response. Errors from `parse` are
    /// returned as they are.
    pub async fn execute_typed<C: Command>(&self, command: &C) -> Result<C::Output, C::Error> {
        let response = self.execute_command(&command.build()).await?;
        command.parse(&response)
    }

    /// Like [`execute_command`](Self::execute_command), but folds any error
    /// into the returned [`RconResponse`].
    pub async fn send_command(&self, command: &str) -> RconResponse {
        match self.execute_command(command).await {
            Ok(body) => RconResponse::successful(body),
            Err(err) => RconResponse::failed(err.to_string()),
        }
    }

    async fn establish(&self, session: &mut Session<S>, stream: S) -> Result<(), RconError> {
        session.stream = Some(stream);

        match self.auth(session).await {
            Ok(()) => {
                self.connected.store(true, Ordering::Release);
                debug!("authenticated with {}", self.config.addr());
                Ok(())
            }
            Err(err) => {
                // never leave a stream around that failed to authenticate
                session.close(&self.connected);
                debug!("closed connection to {}: {}", self.config.addr(), err);
                Err(err)
            }
        }
    }

    async fn auth(&self, session: &mut Session<S>) -> Result<(), RconError> {
        let id = session.next_id();
        let auth_packet = Packet::new(id, PacketType::Auth, self.config.password.as_str())
            .map_err(|e| ConnectionError::Handshake(e.into()))?;

        trace!("sending auth packet {} to server", id);
        let response = self
            .exchange(session, &auth_packet)
            .await
            .map_err(Fault::into_handshake_error)?;
        trace!("receive auth response for packet id {}", response.id());

        if response.id() == -1 || response.id() != id {
            return Err(RconError::Authentication);
        }

        Ok(())
    }

    /// One write-then-read cycle on the session's stream.
    async fn exchange(&self, session: &mut Session<S>, request: &Packet) -> Result<Packet, Fault> {
        let timeout = self.config.timeout;
        let mut in_flight = InFlight::begin(session, &self.connected);
        let stream = in_flight.stream()?;

        time::timeout(timeout, write_to_stream(stream, request)).await??;
        let response = time::timeout(timeout, read_from_stream(stream)).await??;

        in_flight.complete();
        Ok(response)
    }
}

impl<S> Drop for Client<S> {
    fn drop(&mut self) {
        // dropping a tokio stream closes the socket right away
        if self.session.get_mut().stream.take().is_some() {
            debug!("closing rcon connection to {}", self.config.addr());
        }
    }
}

/// Closes the stream unless the exchange it guards ran to completion. Covers
/// I/O errors, timeouts and callers dropping the future mid-exchange alike.
struct InFlight<'a, S> {
    session: &'a mut Session<S>,
    connected: &'a AtomicBool,
    complete: bool,
}

impl<'a, S> InFlight<'a, S> {
    fn begin(session: &'a mut Session<S>, connected: &'a AtomicBool) -> Self {
        InFlight {
            session,
            connected,
            complete: false,
        }
    }

    fn stream(&mut self) -> Result<&mut S, Fault> {
        self.session
            .stream
            .as_mut()
            .ok_or(Fault::Connection(ConnectionError::StreamUnavailable))
    }

    fn complete(mut self) {
        self.complete = true;
    }
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if !self.complete && self.session.close(self.connected) {
            warn!("rcon exchange did not complete, closing connection");
        }
    }
}

/// Why an exchange failed, before the caller decides how to report it.
enum Fault {
    Connection(ConnectionError),
    Transport(TransportError),
}

impl Fault {
    fn into_handshake_error(self) -> RconError {
        match self {
            Fault::Connection(e) => e.into(),
            Fault::Transport(e) => ConnectionError::Handshake(e).into(),
        }
    }

    fn into_command_error(self) -> RconError {
        match self {
            Fault::Connection(e) => e.into(),
            Fault::Transport(e) => CommandError::Failed(e).into(),
        }
    }
}

impl From<ConnectionError> for Fault {
    fn from(e: ConnectionError) -> Self {
        Fault::Connection(e)
    }
}

impl From<TransportError> for Fault {
    fn from(e: TransportError) -> Self {
        Fault::Transport(e)
    }
}

impl From<PacketError> for Fault {
    fn from(e: PacketError) -> Self {
        Fault::Transport(e.into())
    }
}

impl From<Elapsed> for Fault {
    fn from(e: Elapsed) -> Self {
        Fault::Transport(e.into())
    }
}

async fn write_to_stream<S: Transport>(stream: &mut S, packet: &Packet) -> Result<(), Fault> {
    stream
        .write_all(&packet.pack())
        .await
        .map_err(TransportError::Send)?;
    stream.flush().await.map_err(TransportError::Send)?;
    Ok(())
}

async fn read_from_stream<S: Transport>(stream: &mut S) -> Result<Packet, Fault> {
    let mut frame = vec![0u8; 4];
    stream
        .read_exact(&mut frame)
        .await
        .map_err(|e| read_fault(e, ConnectionError::IncompleteSize))?;

    let size = i32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]);
    if size < Packet::BASE_PACKET_SIZE {
        return Err(PacketError::InvalidLength(size).into());
    }

    // no upper bound on purpose, servers differ on how large a single
    // response packet may get
    frame.resize(4 + size as usize, 0);
    stream
        .read_exact(&mut frame[4..])
        .await
        .map_err(|e| read_fault(e, ConnectionError::ClosedWhileReading))?;

    Ok(Packet::unpack(&frame)?)
}

fn read_fault(e: io::Error, on_eof: ConnectionError) -> Fault {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => on_eof.into(),
        _ => TransportError::Receive(e).into(),
    }
}
