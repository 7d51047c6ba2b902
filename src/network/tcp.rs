//! Host accept loop and client connect over TCP
//!
//! Each accepted connection is bridged to an [`ActorChannel`] by two tasks:
//! a reader that turns answer frames into [`InboundMessage`]s and a writer
//! that drains [`OutboundMessage`]s onto the socket.

use crate::core::ActorId;
use crate::game::{ActorChannel, InboundMessage, OutboundMessage};
use crate::network::codec::{read_decision, write_outbound, PING_MAGIC, PONG_MAGIC};
use crate::{Result, SaladError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Host side of the opening exchange
pub async fn handshake_host<S: AsyncRead + AsyncWrite + Unpin>(stream: &mut S) -> Result<()> {
    let mut ping = [0u8; 4];
    stream.read_exact(&mut ping).await?;
    if &ping != PING_MAGIC {
        return Err(SaladError::Protocol(format!("bad greeting {ping:?}")));
    }
    stream.write_all(PONG_MAGIC).await?;
    stream.flush().await?;
    Ok(())
}

/// Client side of the opening exchange
pub async fn handshake_client<S: AsyncRead + AsyncWrite + Unpin>(stream: &mut S) -> Result<()> {
    stream.write_all(PING_MAGIC).await?;
    stream.flush().await?;
    let mut pong = [0u8; 4];
    stream.read_exact(&mut pong).await?;
    if &pong != PONG_MAGIC {
        return Err(SaladError::Protocol(format!("bad reply {pong:?}")));
    }
    Ok(())
}

/// Accept connections until `count` players completed the handshake
///
/// A connection that fails the handshake is dropped and does not take a
/// seat. Channels come back in connection order.
pub async fn accept_players(listener: &TcpListener, count: usize) -> Result<Vec<ActorChannel>> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "listening");
    }

    let mut channels = Vec::with_capacity(count);
    while channels.len() < count {
        tracing::info!("waiting for {} player(s)", count - channels.len());
        let (mut stream, peer) = listener.accept().await?;
        if let Err(err) = handshake_host(&mut stream).await {
            tracing::warn!(%peer, error = %err, "handshake failed");
            continue;
        }
        tracing::info!(%peer, seat = channels.len(), "connected");
        channels.push(spawn_connection(stream, channels.len()));
    }
    Ok(channels)
}

/// Bridge an established connection to a seat channel
pub fn spawn_connection(stream: TcpStream, seat: ActorId) -> ActorChannel {
    let (channel, handle) = ActorChannel::pair();
    let (reader, writer) = stream.into_split();
    tokio::spawn(read_loop(reader, handle.inbound, seat));
    tokio::spawn(write_loop(writer, handle.outbound, seat));
    channel
}

async fn read_loop(
    mut reader: OwnedReadHalf,
    inbound: mpsc::Sender<InboundMessage>,
    seat: ActorId,
) {
    loop {
        let message = match read_decision(&mut reader).await {
            Ok(Some(payload)) => InboundMessage::from_payload(payload),
            Ok(None) => {
                tracing::info!(seat, "disconnected");
                InboundMessage::Quit
            }
            Err(err) => {
                tracing::warn!(seat, error = %err, "closing connection");
                InboundMessage::Quit
            }
        };
        let quit = message == InboundMessage::Quit;
        if inbound.send(message).await.is_err() || quit {
            break;
        }
    }
}

async fn write_loop(
    mut writer: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<OutboundMessage>,
    seat: ActorId,
) {
    while let Some(message) = outbound.recv().await {
        let close = message == OutboundMessage::Close;
        if let Err(err) = write_outbound(&mut writer, &message).await {
            tracing::warn!(seat, error = %err, "write failed");
            break;
        }
        if close {
            break;
        }
    }
    let _ = writer.shutdown().await;
}

/// Connect to a host and complete the handshake
pub async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let mut stream = TcpStream::connect((host, port)).await?;
    handshake_client(&mut stream).await?;
    tracing::info!(host, port, "connected to host");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::codec::{read_outbound, write_decision};

    #[tokio::test]
    async fn test_handshake() {
        let (mut client, mut host) = tokio::io::duplex(64);
        let (host_result, client_result) =
            tokio::join!(handshake_host(&mut host), handshake_client(&mut client));
        host_result.unwrap();
        client_result.unwrap();
    }

    #[tokio::test]
    async fn test_bad_greeting_rejected() {
        let (mut client, mut host) = tokio::io::duplex(64);
        client.write_all(b"HELO").await.unwrap();
        assert!(matches!(
            handshake_host(&mut host).await,
            Err(SaladError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_bridge() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let accept = tokio::spawn(async move { accept_players(&listener, 1).await });
        let mut client = connect("127.0.0.1", port).await.unwrap();
        let mut channels = accept.await.unwrap().unwrap();
        let channel = &mut channels[0];

        channel
            .outbound
            .send(OutboundMessage::Prompt("pick".to_string()))
            .await
            .unwrap();
        assert_eq!(
            read_outbound(&mut client).await.unwrap(),
            Some(OutboundMessage::Prompt("pick".to_string()))
        );

        write_decision(&mut client, b"AB").await.unwrap();
        assert_eq!(
            channel.inbound.recv().await,
            Some(InboundMessage::Decision(b"AB".to_vec()))
        );

        drop(client);
        assert_eq!(channel.inbound.recv().await, Some(InboundMessage::Quit));
    }

    #[tokio::test]
    async fn test_oversized_answer_closes_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let accept = tokio::spawn(async move { accept_players(&listener, 1).await });
        let mut client = connect("127.0.0.1", port).await.unwrap();
        let mut channels = accept.await.unwrap().unwrap();

        client.write_u32(64).await.unwrap();
        client.write_all(&[b'A'; 64]).await.unwrap();
        assert_eq!(channels[0].inbound.recv().await, Some(InboundMessage::Quit));
    }
}
