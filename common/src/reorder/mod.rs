//! Reorder intents and the editor-side synchronisation queue.
//!
//! - `intent`: the `{id: rank}` value object submitted to the store.
//! - `sync`: optimistic ordering with strictly serialised submissions and rollback.
//! - `page`: the sortable lists of one page, serialised against each other and against
//!   band or slide creation and deletion.

mod intent;
mod page;
mod sync;

pub use intent::ReorderIntent;
pub use page::PageReorder;
pub use sync::{ReorderSync, Resolution};
