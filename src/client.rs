//! Terminal client for a human player
//!
//! Prints whatever the host sends and answers each prompt with one line
//! of input. Rules are never checked here; the host re-prompts on a bad
//! answer.

use crate::game::OutboundMessage;
use crate::network::{connect, read_outbound, write_decision, MAX_DECISION_BYTES};
use crate::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Connect to a host and play from stdin/stdout until the match ends
pub async fn run_client(host: &str, port: u16) -> Result<()> {
    let stream = connect(host, port).await?;
    let (reader, writer) = stream.into_split();
    let stdin = BufReader::new(tokio::io::stdin());
    play(reader, writer, stdin, tokio::io::stdout()).await
}

/// Relay host frames to `output` and answer prompts from `input`
///
/// Blank lines are skipped and overlong lines are refused locally. End of
/// input sends an empty answer, which the host treats as quitting.
pub async fn play<R, W, I, O>(mut reader: R, mut writer: W, input: I, mut output: O) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(message) = read_outbound(&mut reader).await? {
        match message {
            OutboundMessage::Text(text) => {
                output.write_all(text.as_bytes()).await?;
                output.flush().await?;
            }
            OutboundMessage::Prompt(text) => {
                output.write_all(text.as_bytes()).await?;
                output.flush().await?;

                let answer = loop {
                    let Some(line) = lines.next_line().await? else {
                        break String::new();
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.len() > MAX_DECISION_BYTES {
                        output.write_all(b"answer too long\n").await?;
                        output.flush().await?;
                        continue;
                    }
                    break line.to_string();
                };

                write_decision(&mut writer, answer.as_bytes()).await?;
                if answer.is_empty() {
                    return Ok(());
                }
            }
            OutboundMessage::Close => break,
        }
    }

    tracing::debug!("host closed the match");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{read_decision, write_outbound};

    #[tokio::test]
    async fn test_prompt_is_answered_with_trimmed_line() {
        let (client_end, mut host_end) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_end);
        let input: &[u8] = b"\n   \n  AB  \n";
        let mut output = Vec::new();

        write_outbound(&mut host_end, &OutboundMessage::Text("market\n".to_string()))
            .await
            .unwrap();
        write_outbound(&mut host_end, &OutboundMessage::Prompt("pick\n".to_string()))
            .await
            .unwrap();
        write_outbound(&mut host_end, &OutboundMessage::Close)
            .await
            .unwrap();

        play(client_read, client_write, input, &mut output)
            .await
            .unwrap();

        assert_eq!(read_decision(&mut host_end).await.unwrap(), Some(b"AB".to_vec()));
        assert_eq!(String::from_utf8(output).unwrap(), "market\npick\n");
    }

    #[tokio::test]
    async fn test_overlong_line_is_refused_locally() {
        let (client_end, mut host_end) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_end);
        let input: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\n0\n";
        let mut output = Vec::new();

        write_outbound(&mut host_end, &OutboundMessage::Prompt("pick\n".to_string()))
            .await
            .unwrap();
        write_outbound(&mut host_end, &OutboundMessage::Close)
            .await
            .unwrap();

        play(client_read, client_write, input, &mut output)
            .await
            .unwrap();

        assert_eq!(read_decision(&mut host_end).await.unwrap(), Some(b"0".to_vec()));
        assert!(String::from_utf8(output).unwrap().contains("answer too long"));
    }

    #[tokio::test]
    async fn test_end_of_input_quits() {
        let (client_end, mut host_end) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_end);
        let input: &[u8] = b"";

        write_outbound(&mut host_end, &OutboundMessage::Prompt("pick\n".to_string()))
            .await
            .unwrap();

        play(client_read, client_write, input, Vec::new())
            .await
            .unwrap();

        assert_eq!(read_decision(&mut host_end).await.unwrap(), Some(Vec::new()));
    }
}
