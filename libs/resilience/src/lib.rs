/// Resilience primitives for remote calls
///
/// Every suspend point that crosses the process boundary runs under a
/// deadline so a stalled backend call cannot hang an operation forever.
/// Cancellation is drop-based: dropping the wrapped future aborts the
/// call, so no separate cancellation token is threaded through APIs.
///
/// # Example
///
/// ```rust,no_run
/// use resilience::{with_deadline, CallBudgets};
///
/// #[tokio::main]
/// async fn main() {
///     let budgets = CallBudgets::default();
///
///     let result = with_deadline(budgets.documents, async {
///         // remote call here
///         Ok::<_, String>(())
///     })
///     .await;
/// }
/// ```
pub mod deadline;
pub mod presets;

pub use deadline::{with_deadline, Deadline, DeadlineError};
pub use presets::CallBudgets;
