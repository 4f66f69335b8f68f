use crate::share::{ShareError, ShareRequest, ShareTarget};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Forwards share requests to a host-owned receiver.
///
/// The host (a UI loop, a service) owns the [`mpsc::UnboundedReceiver`] and
/// decides how to present the file. Once the receiver is dropped, requests
/// become unresolvable.
#[derive(Clone)]
pub struct ChannelShare {
    sender: mpsc::UnboundedSender<ShareRequest>,
}

impl ChannelShare {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ShareRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ShareTarget for ChannelShare {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        self.sender
            .send(request.clone())
            .map_err(|_| ShareError::Unresolvable {
                path: request.path.clone(),
                reason: "no receiver registered".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request() -> ShareRequest {
        ShareRequest {
            path: PathBuf::from("/tmp/log.json"),
            mime_type: "application/x-ndjson".into(),
            title: "Export Video Log".into(),
        }
    }

    #[tokio::test]
    async fn delivers_to_receiver() {
        let (share, mut rx) = ChannelShare::new();
        share.share(&request()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), request());
    }

    #[tokio::test]
    async fn dropped_receiver_is_unresolvable() {
        let (share, rx) = ChannelShare::new();
        drop(rx);
        let err = share.share(&request()).await.unwrap_err();
        assert!(matches!(err, ShareError::Unresolvable { .. }));
    }
}
