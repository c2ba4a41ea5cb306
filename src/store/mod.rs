pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use memory::MemoryPasteStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePasteStore;
pub use traits::{PasteStore, PurgeExpired, StoreError};
