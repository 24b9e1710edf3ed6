//! A scriptable stand-in for an rcon server.
#![allow(dead_code)]

use std::net::SocketAddr;

use log::info;
use rconlink::{
    client::Client,
    config::{ClientBuilder, Config},
    packet::{Packet, PacketType},
};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

pub const PASSWORD: &str = "secret";

/// What the stub does after receiving a packet.
pub enum Reply {
    Packets(Vec<Packet>),
    /// Write only the first half of the packet, then hang up.
    Truncated(Packet),
    /// Hang up without answering.
    Close,
    /// Keep the connection open but never answer.
    Silence,
}

pub struct Server {
    pub addr: SocketAddr,
    /// Resolves to every packet the stub received, once the client hangs up.
    pub handle: JoinHandle<Vec<Packet>>,
}

impl Server {
    /// Accepts a single connection and answers each packet with `handler`.
    pub async fn start<F>(handler: F) -> Server
    where
        F: FnMut(&Packet) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            info!("stub server running on {}", addr);
            let (stream, peer) = listener.accept().await.unwrap();
            info!("accept from {:?}", peer);
            serve(stream, handler).await
        });

        Server { addr, handle }
    }

    pub fn client(&self, timeout_ms: u64) -> Client {
        builder(self.addr.port(), timeout_ms).build().unwrap()
    }
}

pub fn builder(port: u16, timeout_ms: u64) -> ClientBuilder {
    Client::builder()
        .host("127.0.0.1")
        .port(port)
        .unwrap()
        .password(PASSWORD)
        .timeout_ms(timeout_ms)
        .unwrap()
}

pub fn config(timeout_ms: u64) -> Config {
    builder(27015, timeout_ms).build_config().unwrap()
}

pub async fn serve<S, F>(mut stream: S, mut handler: F) -> Vec<Packet>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FnMut(&Packet) -> Reply,
{
    let mut received = Vec::new();

    while let Some(packet) = read_packet(&mut stream).await {
        let reply = handler(&packet);
        received.push(packet);

        match reply {
            Reply::Packets(packets) => {
                for packet in packets {
                    if stream.write_all(&packet.pack()).await.is_err() {
                        return received;
                    }
                }
            }
            Reply::Truncated(packet) => {
                let bytes = packet.pack();
                let _ = stream.write_all(&bytes[..bytes.len() / 2]).await;
                let _ = stream.shutdown().await;
                break;
            }
            Reply::Close => break,
            Reply::Silence => {}
        }
    }

    received
}

/// `None` once the peer hangs up.
pub async fn read_packet<S: AsyncRead + Unpin>(stream: &mut S) -> Option<Packet> {
    let mut size = [0u8; 4];
    stream.read_exact(&mut size).await.ok()?;

    let mut frame = size.to_vec();
    frame.resize(4 + i32::from_le_bytes(size) as usize, 0);
    stream.read_exact(&mut frame[4..]).await.ok()?;

    Packet::unpack(&frame).ok()
}

pub fn response(id: i32, body: &str) -> Packet {
    Packet::new(id, PacketType::Response, body).unwrap()
}

pub fn auth_response(id: i32) -> Packet {
    Packet::new(id, PacketType::AuthResponse, "").unwrap()
}

/// Echoes auth ids back (accepting any password) and hands everything else
/// to `commands`.
pub fn accept_auth<F>(mut commands: F) -> impl FnMut(&Packet) -> Reply + Send + 'static
where
    F: FnMut(&Packet) -> Reply + Send + 'static,
{
    move |packet: &Packet| {
        if packet.packet_type() == PacketType::Auth.value() {
            Reply::Packets(vec![auth_response(packet.id())])
        } else {
            commands(packet)
        }
    }
}
