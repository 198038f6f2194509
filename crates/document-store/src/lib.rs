pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod timeout;

pub use common::{CustomerId, WishlistId};
pub use document::{Document, Version};
pub use error::{Result, StoreError};
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use store::{DocumentStore, DocumentStoreExt};
pub use timeout::{DEFAULT_STORE_TIMEOUT, TimeoutStore};
