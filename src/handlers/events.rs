//! Dispatch of typed bridge events.

use chrono::Utc;
use tracing::{debug, error, info, warn, Instrument};

use super::core::{Context, HandlerError, HandlerResult};
use super::relay::relay_group;
use crate::bridge::Event;
use crate::error::RelayError;
use crate::qr;
use crate::telemetry::spans;

/// Apply one bridge event to the session.
///
/// Only a dead IRC writer is returned as an error; everything else is
/// reported on the status channel or logged.
pub async fn handle_event(ctx: &mut Context<'_>, event: Event) -> HandlerResult {
    let span = spans::event(event.kind());
    dispatch(ctx, event).instrument(span).await
}

async fn dispatch(ctx: &mut Context<'_>, event: Event) -> HandlerResult {
    match event {
        Event::Qr { code } => show_qr(ctx, &code).await,
        Event::Ready { id } => {
            info!(id = %id, "Bridge session ready");
            ctx.status(format!("ok! id={id}")).await?;
            Ok(())
        }
        Event::Chat(chat) => {
            let identity = ctx.state.identity.clone();
            let chat = ctx.state.chats.upsert(*chat, identity.as_deref());
            info!(
                chat = %chat.identifier,
                participants = chat.participants.len(),
                "Chat announced"
            );
            Ok(())
        }
        Event::UnreadMessages(groups) => {
            for group in groups {
                match relay_group(ctx, group).await {
                    Ok(()) => {}
                    Err(RelayError::Send(e)) => return Err(HandlerError::Send(e)),
                    Err(RelayError::UnknownChat(id)) => {
                        error!(chat = %id, "Messages for a chat that was never announced");
                        ctx.status(format!("messages for unknown chat {id}")).await?;
                    }
                    Err(e @ RelayError::Join(_)) => warn!(error = %e, "Relay failed"),
                }
            }
            Ok(())
        }
        Event::Unknown(kind) => {
            debug!(kind = %kind, "Ignoring bridge event");
            Ok(())
        }
    }
}

/// Render the login code, store it, and point the client at it.
async fn show_qr(ctx: &mut Context<'_>, code: &str) -> HandlerResult {
    let svg = match qr::render_svg(code) {
        Ok(svg) => svg,
        Err(e) => {
            warn!(error = %e, "QR rendering failed");
            ctx.status(format!("failed to render QR code: {e}")).await?;
            return Ok(());
        }
    };

    let name = qr::blob_name(Utc::now().timestamp_millis());
    match ctx.blobs.store(&name, svg.as_bytes()).await {
        Ok(reference) => ctx.status(format!("Scan this QR code: {reference}")).await?,
        Err(e) => {
            warn!(error = %e, "Failed to store QR code");
            ctx.status(format!("failed to store QR code: {e}")).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::RawEvent;
    use crate::handlers::test_support::{Harness, MemoryBlobs};
    use serde_json::json;

    fn event(kind: &str, args: Vec<serde_json::Value>) -> Event {
        Event::decode(RawEvent {
            event: kind.to_string(),
            args,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn qr_is_stored_and_announced() {
        let mut h = Harness::new();
        handle_event(&mut h.ctx(), event("qr", vec![json!({"code": "1@abc"})]))
            .await
            .unwrap();

        let names = h.blobs.names();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("qr-") && names[0].ends_with(".svg"));
        assert_eq!(
            h.drain(),
            vec![format!(":status PRIVMSG * :Scan this QR code: blob://{}", names[0])]
        );
    }

    #[tokio::test]
    async fn qr_storage_failure_is_reported_not_fatal() {
        let mut h = Harness::welcomed("bob", "200");
        h.blobs = MemoryBlobs {
            fail: true,
            ..Default::default()
        };
        handle_event(&mut h.ctx(), event("qr", vec![json!({"code": "1@abc"})]))
            .await
            .unwrap();
        assert_eq!(
            h.drain(),
            vec![":status PRIVMSG bob :failed to store QR code: blob storage error: disk full"]
        );
    }

    #[tokio::test]
    async fn ok_acknowledges_with_id() {
        let mut h = Harness::welcomed("bob", "200");
        handle_event(&mut h.ctx(), event("ok", vec![json!({"id": "200@c.us"})]))
            .await
            .unwrap();
        assert_eq!(h.drain(), vec![":status PRIVMSG bob :ok! id=200@c.us"]);
    }

    #[tokio::test]
    async fn chat_then_messages_flow_through() {
        let mut h = Harness::welcomed("bob", "200");
        handle_event(
            &mut h.ctx(),
            event(
                "chat",
                vec![json!({
                    "id": "fam@g.us",
                    "name": "Family",
                    "isGroupChat": true,
                    "participants": [{"id": "100@c.us", "name": "Alice"}, {"id": "200@c.us"}],
                    "admins": ["100@c.us"]
                })],
            ),
        )
        .await
        .unwrap();
        assert!(h.drain().is_empty());

        let chat = h.state.chats.get("fam@g.us").unwrap();
        assert!(chat.participants[0].is_admin);

        handle_event(
            &mut h.ctx(),
            event(
                "unread-messages",
                vec![
                    json!({"chat": {"id": "ghost@g.us"}, "messages": []}),
                    json!({
                        "chat": {"id": "fam@g.us"},
                        "messages": [{"sender": {"id": "100@c.us", "name": "Alice"}, "content": "hi"}]
                    }),
                ],
            ),
        )
        .await
        .unwrap();

        assert_eq!(
            h.drain(),
            vec![
                ":status PRIVMSG bob :messages for unknown chat ghost@g.us",
                ":bob JOIN #Family",
                ":whapp-irc 332 bob #Family :Family",
                ":whapp-irc 353 bob @ #Family :@Alice",
                ":whapp-irc 366 bob #Family :End of /NAMES list.",
                ":Alice PRIVMSG #Family :hi",
            ]
        );
    }

    #[tokio::test]
    async fn closed_writer_is_fatal() {
        let mut h = Harness::welcomed("bob", "200");
        h.close_writer();
        let err = handle_event(&mut h.ctx(), event("ok", vec![json!({"id": "x"})]))
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
