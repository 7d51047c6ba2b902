//! Frame encoding for both directions of a connection

use crate::game::OutboundMessage;
use crate::{Result, SaladError};
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Sent by the client right after connecting
pub const PING_MAGIC: &[u8; 4] = b"ABCZ";

/// Host reply to [`PING_MAGIC`]
pub const PONG_MAGIC: &[u8; 4] = b"ZCBA";

/// Largest answer a client may send; anything longer closes the connection
pub const MAX_DECISION_BYTES: usize = 16;

/// Largest text frame a client accepts from the host
pub const MAX_TEXT_BYTES: usize = 1 << 20;

const KIND_TEXT: u8 = 0;
const KIND_PROMPT: u8 = 1;
const KIND_CLOSE: u8 = 2;

/// Read a length prefix, `None` on a clean end of stream
async fn read_len<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<usize>> {
    match reader.read_u32().await {
        Ok(len) => Ok(Some(len as usize)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write one host-to-client frame
pub async fn write_outbound<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &OutboundMessage,
) -> Result<()> {
    let (kind, text) = match message {
        OutboundMessage::Text(text) => (KIND_TEXT, text.as_str()),
        OutboundMessage::Prompt(text) => (KIND_PROMPT, text.as_str()),
        OutboundMessage::Close => (KIND_CLOSE, ""),
    };
    let len = u32::try_from(text.len())
        .map_err(|_| SaladError::Protocol(format!("text frame of {} bytes", text.len())))?;

    writer.write_u8(kind).await?;
    writer.write_u32(len).await?;
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one host-to-client frame, `None` once the host hung up
pub async fn read_outbound<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<OutboundMessage>> {
    let kind = match reader.read_u8().await {
        Ok(kind) => kind,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let len = read_len(reader)
        .await?
        .ok_or_else(|| SaladError::Protocol("connection closed inside a frame".to_string()))?;
    if len > MAX_TEXT_BYTES {
        return Err(SaladError::Protocol(format!("text frame of {len} bytes")));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    let text = String::from_utf8(buf)
        .map_err(|_| SaladError::Protocol("text frame is not utf-8".to_string()))?;

    match kind {
        KIND_TEXT => Ok(Some(OutboundMessage::Text(text))),
        KIND_PROMPT => Ok(Some(OutboundMessage::Prompt(text))),
        KIND_CLOSE => Ok(Some(OutboundMessage::Close)),
        other => Err(SaladError::Protocol(format!("unknown frame kind {other}"))),
    }
}

/// Write one client-to-host answer
pub async fn write_decision<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_DECISION_BYTES {
        return Err(SaladError::Protocol(format!(
            "answer of {} bytes exceeds {MAX_DECISION_BYTES}",
            payload.len()
        )));
    }
    writer.write_u32(payload.len() as u32).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one client-to-host answer, `None` once the client hung up
pub async fn read_decision<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let Some(len) = read_len(reader).await? else {
        return Ok(None);
    };
    if len > MAX_DECISION_BYTES {
        return Err(SaladError::Protocol(format!(
            "answer of {len} bytes exceeds {MAX_DECISION_BYTES}"
        )));
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outbound_frames() {
        let (mut client, mut host) = tokio::io::duplex(1024);
        let messages = [
            OutboundMessage::Text("---- MARKET ----\n".to_string()),
            OutboundMessage::Prompt("pick".to_string()),
            OutboundMessage::Close,
        ];
        for message in &messages {
            write_outbound(&mut host, message).await.unwrap();
        }
        drop(host);

        for message in messages {
            assert_eq!(read_outbound(&mut client).await.unwrap(), Some(message));
        }
        assert_eq!(read_outbound(&mut client).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_text_frame_layout() {
        let mut buf = Vec::new();
        write_outbound(&mut buf, &OutboundMessage::Prompt("ok".to_string()))
            .await
            .unwrap();
        assert_eq!(buf, vec![1, 0, 0, 0, 2, b'o', b'k']);
    }

    #[tokio::test]
    async fn test_decision_frames() {
        let (mut client, mut host) = tokio::io::duplex(64);
        write_decision(&mut client, b"AB").await.unwrap();
        write_decision(&mut client, b"").await.unwrap();
        drop(client);

        assert_eq!(read_decision(&mut host).await.unwrap(), Some(b"AB".to_vec()));
        assert_eq!(read_decision(&mut host).await.unwrap(), Some(Vec::new()));
        assert_eq!(read_decision(&mut host).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_oversized_decision_rejected() {
        let mut buf = Vec::new();
        assert!(write_decision(&mut buf, &[b'A'; 17]).await.is_err());

        let mut frame = (17u32).to_be_bytes().to_vec();
        frame.extend_from_slice(&[b'A'; 17]);
        let mut reader = frame.as_slice();
        assert!(matches!(
            read_decision(&mut reader).await,
            Err(SaladError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_kind_is_protocol_error() {
        let frame = [9u8, 0, 0, 0, 0];
        let mut reader = &frame[..];
        assert!(matches!(
            read_outbound(&mut reader).await,
            Err(SaladError::Protocol(_))
        ));
    }
}
