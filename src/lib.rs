//! OAuth 2.0 token lifecycle authority for a personal-brokerage dashboard—decides on every
//! scheduler tick and every inbound request whether the app holds a valid upstream credential,
//! and rotates it through the refresh grant before it lapses.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod authority;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod store;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		authority::TokenAuthority,
		config::UpstreamConfig,
		http::ReqwestHttpClient,
		oauth::OAuthClient,
		store::{MemoryStore, TokenStore},
		token::{TokenRecord, TokenSecret},
	};

	/// Authority type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAuthority = TokenAuthority<ReqwestHttpClient>;

	/// Builds an upstream configuration pointing at a mock token endpoint.
	pub fn test_upstream_config(token_endpoint: &str) -> UpstreamConfig {
		let endpoint =
			Url::parse(token_endpoint).expect("Failed to parse mock token endpoint URL.");
		let redirect = Url::parse("https://127.0.0.1/brokerage/callback")
			.expect("Failed to parse test redirect URI.");

		UpstreamConfig::new(endpoint, "test-client-id", redirect)
	}

	/// Constructs a [`TokenAuthority`] backed by an in-memory store and the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_authority(
		token_endpoint: &str,
	) -> (ReqwestTestAuthority, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let oauth =
			OAuthClient::new(test_upstream_config(token_endpoint), ReqwestHttpClient::default());
		let authority = TokenAuthority::new(store, oauth);

		(authority, store_backend)
	}

	/// Builds a complete token record fixture with lifetimes relative to the current clock.
	///
	/// Negative TTLs produce already-expired credentials, which is how tests seed the
	/// access-expired and terminal states.
	pub fn record_fixture(
		access_token: &str,
		refresh_token: &str,
		access_ttl: Duration,
		refresh_ttl: Duration,
	) -> TokenRecord {
		let now = OffsetDateTime::now_utc();
		let issued = now - Duration::minutes(5);

		TokenRecord {
			token_type: "Bearer".into(),
			access_token: TokenSecret::new(access_token),
			access_token_issued_at: issued,
			access_token_expires_at: now + access_ttl,
			refresh_token: TokenSecret::new(refresh_token),
			refresh_token_issued_at: issued,
			refresh_token_expires_at: now + refresh_ttl,
		}
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
