use crate::errors::{ConfigError, MirrorError};
use crate::sessions::errors::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Dispatch thread is no longer running")]
    ChannelClosed,
}

impl MirrorError for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            DispatchError::Session(e) => e.error_code(),
            DispatchError::Config(e) => e.error_code(),
            DispatchError::ChannelClosed => "DISPATCH_CHANNEL_CLOSED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            DispatchError::Session(e) => e.is_user_error(),
            DispatchError::Config(e) => e.is_user_error(),
            DispatchError::ChannelClosed => false,
        }
    }
}
