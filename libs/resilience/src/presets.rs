/// Per-capability deadline budgets
///
/// The three backend capability classes have very different latency
/// profiles: storage moves whole file payloads, while document and
/// account calls are small JSON round-trips.
use crate::deadline::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallBudgets {
    /// Object upload/delete and preview derivation
    pub storage: Deadline,
    /// Document create/update/delete/get/list
    pub documents: Deadline,
    /// Account and session calls
    pub account: Deadline,
}

impl CallBudgets {
    pub const fn new(storage: Deadline, documents: Deadline, account: Deadline) -> Self {
        Self {
            storage,
            documents,
            account,
        }
    }

    pub const fn from_secs(storage: u64, documents: u64, account: u64) -> Self {
        Self::new(
            Deadline::from_secs(storage),
            Deadline::from_secs(documents),
            Deadline::from_secs(account),
        )
    }

    pub const fn from_millis(storage: u64, documents: u64, account: u64) -> Self {
        Self::new(
            Deadline::from_millis(storage),
            Deadline::from_millis(documents),
            Deadline::from_millis(account),
        )
    }
}

impl Default for CallBudgets {
    fn default() -> Self {
        Self::from_secs(120, 10, 10)
    }
}
