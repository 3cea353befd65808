//! Error types for the scheduling engine.

use thiserror::Error;

use crate::parse::ParseError;
use crate::store::StoreError;

/// Why a reminder creation request was rejected.
///
/// The caller composes its user-facing reply from the variant alone; none of
/// these abort anything beyond the one request.
#[derive(Debug, Error)]
pub enum CreateTaskError {
    /// Input text does not spell a valid `dd.mm.yyyy hh:mm text` reminder.
    #[error(transparent)]
    Format(#[from] ParseError),

    /// The requested time is not in the future.
    #[error("due time is not in the future")]
    Expired,

    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
