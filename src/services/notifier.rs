use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::NewMessageEvent;
use crate::services::store::NotificationSink;

/// Errors that can occur when publishing a notification
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Notifier returned error: {0}")]
    ApiError(String),
}

/// Body posted to the webhook for each event
#[derive(Debug, Serialize)]
struct WebhookEvent<'a> {
    channel: &'a str,
    name: &'a str,
    data: &'a NewMessageEvent,
}

/// Publishes chat events to an HTTP fan-out service
///
/// Each event is a `POST {endpoint}/events` carrying the channel, the event
/// name and the message payload. Delivery is best effort; callers log and
/// drop failures.
pub struct WebhookNotifier {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl WebhookNotifier {
    /// Create a new webhook notifier
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifierError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }

    fn events_url(&self) -> String {
        format!("{}/events", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn publish(
        &self,
        topic: &str,
        event: &str,
        payload: &NewMessageEvent,
    ) -> Result<(), NotifierError> {
        let body = WebhookEvent {
            channel: topic,
            name: event,
            data: payload,
        };

        let mut request = self.client.post(self.events_url()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("X-Notifier-Key", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(NotifierError::ApiError(format!(
                "Failed to publish {} on {}: {}",
                event,
                topic,
                response.status()
            )));
        }

        tracing::debug!("Published {} on {}", event, topic);
        Ok(())
    }
}

/// Sink used when no webhook is configured; events are only logged
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn publish(
        &self,
        topic: &str,
        event: &str,
        payload: &NewMessageEvent,
    ) -> Result<(), NotifierError> {
        tracing::debug!("{} on {} from {} (no notifier configured)", event, topic, payload.sender_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use mockito::Matcher;
    use serde_json::json;

    fn payload() -> NewMessageEvent {
        NewMessageEvent {
            sender_id: UserId::new(),
            content: "hello".to_string(),
        }
    }

    #[test]
    fn test_events_url_trims_trailing_slash() {
        let notifier =
            WebhookNotifier::new("https://push.test/v1/".to_string(), None, Duration::from_secs(1))
                .unwrap();
        assert_eq!(notifier.events_url(), "https://push.test/v1/events");
    }

    #[tokio::test]
    async fn test_publish_posts_event() {
        let mut server = mockito::Server::new_async().await;
        let payload = payload();

        let mock = server
            .mock("POST", "/events")
            .match_header("X-Notifier-Key", "secret")
            .match_body(Matcher::PartialJson(json!({
                "channel": "chat_room_1",
                "name": "new_message",
                "data": { "content": "hello", "senderId": payload.sender_id.to_string() }
            })))
            .with_status(200)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new(
            server.url(),
            Some("secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        notifier
            .publish("chat_room_1", "new_message", &payload)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_reports_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/events")
            .with_status(503)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new(server.url(), None, Duration::from_secs(5)).unwrap();
        let result = notifier.publish("chat_room_1", "new_message", &payload()).await;

        assert!(matches!(result, Err(NotifierError::ApiError(_))));
    }
}
