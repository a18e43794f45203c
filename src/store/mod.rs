//! In-memory storage for workflow definitions, execution history and tool
//! usage stats.
//!
//! Nothing is persisted; concurrent writers follow last-write-wins.

mod history;
mod stats;
mod store;
mod workflows;

use serde::{Deserialize, Serialize};

pub use history::{HistoryEntry, HistoryStore};
pub use stats::{StatsStore, ToolUsage};
pub use store::Store;
pub use workflows::WorkflowStore;

/// Paginated query result.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData<T> {
    /// Total number of matching records.
    pub count: usize,
    /// Current page number (1-based).
    pub page_num: usize,
    /// Total number of pages.
    pub page_count: usize,
    /// Number of records per page.
    pub page_size: usize,
    /// Records in the current page.
    pub rows: Vec<T>,
}

impl<T> PageData<T> {
    /// Cut one page out of `items`. `page_num` is 1-based; a zero page size is treated as 1.
    pub fn paginate(
        items: Vec<T>,
        page_num: usize,
        page_size: usize,
    ) -> Self {
        let page_size = page_size.max(1);
        let page_num = page_num.max(1);
        let count = items.len();
        let page_count = count.div_ceil(page_size);
        let rows = items.into_iter().skip((page_num - 1) * page_size).take(page_size).collect();
        Self {
            count,
            page_num,
            page_count,
            page_size,
            rows,
        }
    }
}
