//! Storage contract and built-in backends for the singleton token record.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, token::TokenRecord};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the single app-wide brokerage credential.
///
/// The collection holds at most one record and writes replace it wholesale; no
/// query-by-field is needed. The authority assumes nothing beyond single-record
/// atomicity, so any durable key-value or document store can implement this.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the singleton record, if one has been persisted.
	fn load(&self) -> StoreFuture<'_, Option<TokenRecord>>;

	/// Persists the record, replacing any previous one as a complete unit.
	fn replace(&self, record: TokenRecord) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
