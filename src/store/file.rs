//! File-backed [`TokenStore`] persisting the singleton record as a JSON snapshot.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	store::{StoreError, StoreFuture, TokenStore},
	token::TokenRecord,
};

/// Persists the record to a JSON file after each replacement.
///
/// Writes go to a temporary sibling first and land via atomic rename, so a crash mid-write
/// never leaves a torn snapshot behind.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<TokenRecord>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading an existing record.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<Option<TokenRecord>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, record: &TokenRecord) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(record).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize token record: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn load(&self) -> StoreFuture<'_, Option<TokenRecord>> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn replace(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			self.persist_locked(&record)?;
			*guard = Some(record);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::token::TokenSecret;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"brokerage_auth_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn build_record() -> TokenRecord {
		let issued = OffsetDateTime::now_utc();

		TokenRecord {
			token_type: "Bearer".into(),
			access_token: TokenSecret::new("at-file"),
			access_token_issued_at: issued,
			access_token_expires_at: issued + Duration::minutes(30),
			refresh_token: TokenSecret::new("rt-file"),
			refresh_token_issued_at: issued,
			refresh_token_expires_at: issued + Duration::days(90),
		}
	}

	#[test]
	fn replace_and_reload_round_trip() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let record = build_record();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.replace(record.clone()))
			.expect("Failed to persist fixture record to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = rt
			.block_on(reopened.load())
			.expect("Failed to load fixture record from file store.")
			.expect("File store lost the record after reopen.");

		assert_eq!(fetched.access_token.expose(), record.access_token.expose());
		assert_eq!(fetched.refresh_token.expose(), record.refresh_token.expose());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn empty_snapshot_loads_as_no_record() {
		let path = temp_path();

		File::create(&path).expect("Failed to create empty snapshot file.");

		let store = FileStore::open(&path).expect("Failed to open empty file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		assert!(rt
			.block_on(store.load())
			.expect("Empty snapshot load should succeed.")
			.is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
