//! The token authority: request-time authorization decisions and credential rotation.

pub mod authorize;
pub mod exchange;

mod metrics;

pub use exchange::AuthorizationSummary;
pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	http::TokenHttpClient,
	oauth::OAuthClient,
	store::TokenStore,
	token::AuthState,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Authority specialized for the crate's default reqwest transport.
pub type ReqwestTokenAuthority = TokenAuthority<ReqwestHttpClient>;

/// Owns the authorization decision protocol for the app-wide brokerage credential.
///
/// The authority is the only writer of the token store; domain consumers read through
/// [`TokenAuthority::access_token`] before each upstream call, and an external scheduler
/// drives renewal through [`TokenAuthority::authorize`] on a cadence well below the
/// access-token TTL. State is derived from the persisted record plus the wall clock on
/// every call and never cached in memory, because the record can be replaced externally
/// (a manual re-login) between ticks.
pub struct TokenAuthority<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Store persisting the singleton record.
	pub store: Arc<dyn TokenStore>,
	/// Upstream client issuing grant exchanges.
	pub oauth: OAuthClient<C>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C> TokenAuthority<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates an authority over the provided store and upstream client.
	pub fn new(store: Arc<dyn TokenStore>, oauth: OAuthClient<C>) -> Self {
		Self { store, oauth, refresh_metrics: Default::default(), refresh_guard: Default::default() }
	}

	/// Derives the current authorization state from the store and wall clock.
	pub async fn state(&self) -> Result<AuthState> {
		let record = self.store.load().await?;

		Ok(AuthState::derive(record.as_ref(), OffsetDateTime::now_utc()))
	}

	/// Returns the bearer access token for an upstream call.
	///
	/// Pure read-time check with no network round trip; renewal is [`authorize`]'s job.
	/// Fails with [`Error::NoTokenRecord`] when the interactive login has never completed
	/// and with [`Error::AccessTokenExpired`] once the stored expiry has passed. Callers
	/// observing the latter during an in-flight refresh surface 401 to their own caller
	/// rather than blocking.
	///
	/// [`authorize`]: TokenAuthority::authorize
	pub async fn access_token(&self) -> Result<String> {
		let record = self.store.load().await?.ok_or(Error::NoTokenRecord)?;

		if !record.access_valid_at(OffsetDateTime::now_utc()) {
			return Err(Error::AccessTokenExpired);
		}

		Ok(record.access_token.expose().to_owned())
	}
}
impl<C> Clone for TokenAuthority<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
			oauth: self.oauth.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<C> Debug for TokenAuthority<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenAuthority").field("oauth", &self.oauth).finish()
	}
}
