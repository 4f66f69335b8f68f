use crate::share::{ShareError, ShareRequest, ShareTarget};
use async_trait::async_trait;

/// A share target that accepts every request and does nothing.
///
/// Useful when only the exported file matters, and in tests that don't
/// care about the hand-off.
#[derive(Clone, Default)]
pub struct NoopShare;

#[async_trait]
impl ShareTarget for NoopShare {
    async fn share(&self, _request: &ShareRequest) -> Result<(), ShareError> {
        Ok(())
    }
}
