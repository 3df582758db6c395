//! Common functions within a session
// (c) 2025 Ross Younger

use tracing::debug;

use crate::error::{ClientError, IoContext as _, Result};
use crate::protocol::{MessageKind, Refusal, ServerMessage, common::ReceivingStream};
use crate::util::io::read_exact_or_eof;

/// Receives and decodes one [`ServerMessage`].
///
/// End-of-stream before all 6 bytes have arrived is [`ClientError::Truncated`].
pub(crate) async fn receive_server_message<R: ReceivingStream>(
    recv: &mut R,
) -> Result<ServerMessage> {
    let mut raw = [0u8; ServerMessage::SIZE];
    let n = read_exact_or_eof(recv, &mut raw)
        .await
        .io_context("receiving message from server")?;
    if n < raw.len() {
        return Err(ClientError::Truncated {
            what: "server message",
            expected: ServerMessage::SIZE as u64,
            received: n as u64,
        });
    }
    let msg = ServerMessage::decode(&raw);
    debug!("server msg received: {} {}", msg.msg_type, msg.param);
    Ok(msg)
}

/// Converts a refusal into an error, passing any other message through
pub(crate) fn check_refusal(msg: ServerMessage) -> Result<ServerMessage> {
    if msg.kind() == MessageKind::Refusal {
        return Err(ClientError::Refused(Refusal::from(msg.param)));
    }
    Ok(msg)
}

#[cfg(test)]
mod test {
    use super::{check_refusal, receive_server_message};
    use crate::error::ClientError;
    use crate::protocol::{Refusal, ServerMessage};
    use pretty_assertions::assert_eq;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn header_in_pieces() {
        let mut mock = Builder::new()
            .read(&[0, 3])
            .read(&[0, 0])
            .read(&[0x01, 0x00])
            .build();
        let msg = receive_server_message(&mut mock).await.unwrap();
        assert_eq!(
            msg,
            ServerMessage {
                msg_type: 3,
                param: 256
            }
        );
    }

    #[tokio::test]
    async fn truncated_header() {
        let mut mock = Builder::new().read(&[0, 1, 0]).build();
        let e = receive_server_message(&mut mock).await.unwrap_err();
        assert!(matches!(
            e,
            ClientError::Truncated {
                expected: 6,
                received: 3,
                ..
            }
        ));
    }

    #[test]
    fn refusal_detection() {
        let refused = ServerMessage {
            msg_type: 2,
            param: 3,
        };
        let e = check_refusal(refused).unwrap_err();
        assert_eq!(e.refusal(), Some(Refusal::NoFragmentSize));

        let ok = ServerMessage {
            msg_type: 3,
            param: 2,
        };
        assert_eq!(check_refusal(ok).unwrap(), ok);
    }
}
