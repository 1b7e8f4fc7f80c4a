#![cfg(all(feature = "reqwest", feature = "test"))]

// self
use brokerage_auth::{
	_preludet::*,
	authority::TokenAuthority,
	error::ErrorKind,
	http::ReqwestHttpClient,
	oauth::OAuthClient,
	store::{StoreError, StoreFuture, TokenStore},
	token::TokenRecord,
};

/// Store whose every operation fails, standing in for an unreachable document store.
#[derive(Debug)]
struct FailingStore;
impl TokenStore for FailingStore {
	fn load(&self) -> StoreFuture<'_, Option<TokenRecord>> {
		Box::pin(async { Err(StoreError::Backend { message: "token store unreachable".into() }) })
	}

	fn replace(&self, _: TokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async { Err(StoreError::Backend { message: "token store unreachable".into() }) })
	}
}

#[tokio::test]
async fn missing_record_reads_as_not_found() {
	let (authority, _store) = build_reqwest_test_authority("https://127.0.0.1/token");
	let err = authority
		.access_token()
		.await
		.expect_err("An empty store must not hand out a token.");

	assert!(matches!(err, Error::NoTokenRecord));
	assert_eq!(err.kind(), ErrorKind::NotFound);
	assert_eq!(err.kind().http_status(), 404);
}

#[tokio::test]
async fn expired_access_token_reads_as_unauthorized_without_refreshing() {
	let (authority, store) = build_reqwest_test_authority("https://127.0.0.1/token");

	store
		.replace(record_fixture("at-stale", "rt-1", Duration::seconds(-1), Duration::days(80)))
		.await
		.expect("Failed to seed an access-expired record.");

	let err = authority
		.access_token()
		.await
		.expect_err("An expired access token must not be handed out.");

	assert!(matches!(err, Error::AccessTokenExpired));
	assert_eq!(err.kind(), ErrorKind::Unauthorized);
	assert_eq!(err.to_string(), "Access Token is Expired.");

	// The read path never rotates; the stale pair is still in place for authorize().
	assert_eq!(
		store.snapshot().expect("Record should be untouched.").access_token.expose(),
		"at-stale",
	);
}

#[tokio::test]
async fn valid_record_hands_out_the_bearer_secret() {
	let (authority, store) = build_reqwest_test_authority("https://127.0.0.1/token");

	store
		.replace(record_fixture("at-1", "rt-1", Duration::minutes(25), Duration::days(80)))
		.await
		.expect("Failed to seed a valid record.");

	let token = authority.access_token().await.expect("A valid record should hand out a token.");

	assert_eq!(token, "at-1");
}

#[tokio::test]
async fn unreadable_store_surfaces_the_storage_error() {
	let store: Arc<dyn TokenStore> = Arc::new(FailingStore);
	let oauth = OAuthClient::new(
		test_upstream_config("https://127.0.0.1/token"),
		ReqwestHttpClient::default(),
	);
	let authority = TokenAuthority::new(store, oauth);
	let err = authority
		.access_token()
		.await
		.expect_err("An unreachable store must not hand out a token.");

	assert!(matches!(err, Error::Storage(_)));
	assert_eq!(err.kind(), ErrorKind::InternalServerError);
	assert_eq!(err.kind().http_status(), 500);
}
