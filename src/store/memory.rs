//! Thread-safe in-memory [`TokenStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{StoreFuture, TokenStore},
	token::TokenRecord,
};

type Slot = Arc<RwLock<Option<TokenRecord>>>;

/// In-process singleton store used by tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	/// Returns a copy of the stored record without going through the trait.
	pub fn snapshot(&self) -> Option<TokenRecord> {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Option<TokenRecord>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn replace(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(record);

			Ok(())
		})
	}
}
