//! Environment-injected configuration for the upstream brokerage OAuth endpoints.

// self
use crate::_prelude::*;

/// Upstream settings consumed by the authority.
///
/// Owned by the application shell (typically read from the process environment at startup)
/// and passed in explicitly; the authority keeps no process-wide singletons.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
	/// Fixed brokerage token endpoint URL.
	pub token_endpoint: Url,
	/// OAuth 2.0 client identifier sent with every grant.
	pub client_id: String,
	/// Redirect URI registered for the authorization-code grant.
	pub redirect_uri: Url,
	/// Timeout applied to every outbound grant exchange.
	pub request_timeout: Duration,
	/// Cadence at which the external scheduler should call `authorize`.
	///
	/// Must stay well below the access-token TTL so renewal always runs ahead of expiry;
	/// the default one-minute tick gives a 30x margin against the typical 30-minute TTL.
	pub tick_interval: Duration,
}
impl UpstreamConfig {
	/// Default outbound grant-exchange timeout.
	pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(30);
	/// Default scheduler cadence.
	pub const DEFAULT_TICK_INTERVAL: Duration = Duration::seconds(60);

	/// Creates a configuration with the default timeout and tick cadence.
	pub fn new(token_endpoint: Url, client_id: impl Into<String>, redirect_uri: Url) -> Self {
		Self {
			token_endpoint,
			client_id: client_id.into(),
			redirect_uri,
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
			tick_interval: Self::DEFAULT_TICK_INTERVAL,
		}
	}

	/// Overrides the outbound request timeout.
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the scheduler tick interval.
	pub fn with_tick_interval(mut self, interval: Duration) -> Self {
		self.tick_interval = interval;

		self
	}
}
