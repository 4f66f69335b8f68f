use async_trait::async_trait;
use std::path::PathBuf;

/// A finished export handed to the host for sharing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    /// Exported file.
    pub path: PathBuf,
    /// MIME type advertised for the attachment.
    pub mime_type: String,
    /// Title of the chooser the host shows, if it shows one.
    pub title: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ShareError {
    /// No shareable reference could be produced for the file, e.g. nothing
    /// is registered to receive it.
    #[error("file cannot be shared: {reason}")]
    Unresolvable { path: PathBuf, reason: String },

    /// A reference was produced but handing it off failed.
    #[error("failed to dispatch share request: {0}")]
    Dispatch(String),
}

/// Destination for exported log files.
///
/// Implementations hand the file to something outside this crate (an
/// external program, a host UI, a channel) and return once the hand-off
/// happened. They do not wait for the receiving side to finish.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Hand one exported file to the host.
    ///
    /// **Returns**
    /// - `Ok(())` once the request was handed off.
    /// - `Err(ShareError::Unresolvable)` if the file cannot be referenced
    ///   by the receiving side.
    /// - `Err(ShareError::Dispatch)` if the hand-off itself failed.
    ///
    /// The logger logs and absorbs both errors; the exported file stays on
    /// disk either way.
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError>;
}
