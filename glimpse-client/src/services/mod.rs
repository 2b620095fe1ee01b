/// Service layer
///
/// Sequencing logic over the backend capability traits. Each service is
/// constructed with its collaborators injected; nothing here reads
/// ambient state.
use std::future::Future;

use resilience::{with_deadline, Deadline};

use crate::error::{AppError, Result};

pub mod feed;
pub mod posts;
pub mod saves;
pub mod tags;
pub mod users;

pub use feed::FeedService;
pub use posts::{MediaPolicy, PostService};
pub use saves::SaveService;
pub use users::UserService;

/// Run one backend call under its deadline, folding expiry into the
/// error taxonomy
pub(crate) async fn remote<T, F>(deadline: Deadline, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match with_deadline(deadline, call).await {
        Ok(result) => result,
        Err(elapsed) => Err(AppError::Timeout(elapsed.to_string())),
    }
}
