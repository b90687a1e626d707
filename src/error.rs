use crate::{encode, host};

/// Errors that fail a whole introspection request.
///
/// Failures of external metadata sources never end up here; they are logged and
/// the corresponding snapshot field is left empty.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    LocalSystem(#[from] host::Error),
    #[error(transparent)]
    Encode(#[from] encode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ResultOkLogExt<T, E> {
    /// Converts to an `Option`, logging a discarded error at `error` level.
    fn ok_log(self) -> Option<T>;

    /// Converts to an `Option`, logging a discarded error at `level`.
    fn ok_log_at(self, level: log::Level) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        self.ok_log_at(log::Level::Error)
    }

    fn ok_log_at(self, level: log::Level) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::log!(level, "{err}");
                None
            }
        }
    }
}
