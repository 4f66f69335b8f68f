use crate::share::{ShareError, ShareRequest, ShareTarget};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Configuration for [`CommandShare`].
///
/// The exported file path is appended as the last argument, e.g.
/// `xdg-open <path>` or `mail -A <path>`.
#[derive(Clone, Debug)]
pub struct CommandShareConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Export `SHARE_MIME_TYPE` and `SHARE_TITLE` into the child's environment.
    pub pass_metadata_env: bool,
}

impl CommandShareConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            pass_metadata_env: true,
        }
    }
}

/// Hands exported files to an external program.
///
/// The child is spawned and left running; its exit status is not awaited.
#[derive(Clone)]
pub struct CommandShare {
    config: CommandShareConfig,
}

impl CommandShare {
    pub fn new(config: CommandShareConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ShareTarget for CommandShare {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
        if !request.path.is_file() {
            return Err(ShareError::Unresolvable {
                path: request.path.clone(),
                reason: "exported file is missing".to_string(),
            });
        }

        let mut command = Command::new(&self.config.program);
        command.args(&self.config.args).arg(&request.path);
        if self.config.pass_metadata_env {
            command
                .env("SHARE_MIME_TYPE", &request.mime_type)
                .env("SHARE_TITLE", &request.title);
        }

        match command.spawn() {
            Ok(child) => {
                debug!(
                    program = %self.config.program,
                    pid = ?child.id(),
                    path = %request.path.display(),
                    "share program spawned"
                );
                Ok(())
            }
            Err(e) => Err(ShareError::Dispatch(format!("{}: {e}", self.config.program))),
        }
    }
}
