use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::warn;

use super::targets::Destination;
use crate::services::telegram::MessageTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub destination: Destination,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub union: String,
    pub chat_id: String,
    pub internal: bool,
    pub success: bool,
}

pub async fn dispatch(transport: &dyn MessageTransport, notification: &Notification) -> bool {
    let destination = &notification.destination;
    let success = transport.send_message(&destination.chat_id, &notification.text).await;
    if !success {
        warn!(
            "Delivery to {} ({}) failed",
            destination.chat_id, destination.union_name
        );
    }
    success
}

/// Sends every notification once. Up to `concurrency` sends are in flight;
/// results come back in input order and one failure never stops the rest.
pub async fn dispatch_all(
    transport: &dyn MessageTransport,
    notifications: Vec<Notification>,
    concurrency: usize,
) -> Vec<DispatchResult> {
    stream::iter(notifications)
        .map(|notification| async move {
            let success = dispatch(transport, &notification).await;
            let Notification { destination, .. } = notification;
            DispatchResult {
                union: destination.union_name,
                chat_id: destination.chat_id,
                internal: destination.is_internal,
                success,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::services::telegram::MessageTransport;

    /// Records every send and fails for the configured chats.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub failing: HashSet<String>,
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingTransport {
        pub fn failing_on(chats: &[&str]) -> Self {
            Self {
                failing: chats.iter().map(|c| c.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageTransport for RecordingTransport {
        async fn send_message(&self, chat_id: &str, text: &str) -> bool {
            self.sent.lock().unwrap().push((chat_id.to_string(), text.to_string()));
            !self.failing.contains(chat_id)
        }
    }
}
