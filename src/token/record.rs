//! Singleton token record for the brokerage credential and its derived lifecycle state.

// self
use crate::{_prelude::*, error::ConfigError, oauth::GrantResponse, token::secret::TokenSecret};

/// Upper bound on grant lifetimes; anything larger is treated as a malformed response.
const MAX_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Authorization state derived from the stored record and the wall clock.
///
/// Recomputed from the record on every call and never cached in memory: the record can be
/// replaced externally (a manual re-login) between scheduler ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
	/// No record has been persisted yet.
	NoToken,
	/// The access token is valid; upstream calls may proceed.
	Authorized,
	/// The access token lapsed but the refresh token can still mint a new pair.
	AccessExpiredRefreshValid,
	/// Both credentials lapsed; only an interactive re-login can recover.
	BothExpired,
}
impl AuthState {
	/// Computes the state for an optional record at the provided instant.
	pub fn derive(record: Option<&TokenRecord>, now: OffsetDateTime) -> Self {
		let Some(record) = record else {
			return Self::NoToken;
		};

		match (record.access_valid_at(now), record.refresh_valid_at(now)) {
			(true, _) => Self::Authorized,
			(false, true) => Self::AccessExpiredRefreshValid,
			(false, false) => Self::BothExpired,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::NoToken => "no_token",
			Self::Authorized => "authorized",
			Self::AccessExpiredRefreshValid => "access_expired_refresh_valid",
			Self::BothExpired => "both_expired",
		}
	}
}
impl Display for AuthState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// The single persisted brokerage credential pair.
///
/// Written only as a complete unit: every successful grant returns a full new
/// access + refresh pair, so partial updates never happen. The authority is the sole
/// writer; every other component reads through its accessor methods.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Token scheme; the brokerage always issues `Bearer`.
	pub token_type: String,
	/// Bearer credential for upstream calls; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant the access token was granted.
	pub access_token_issued_at: OffsetDateTime,
	/// Instant the access token lapses (issued_at plus the upstream-supplied TTL).
	pub access_token_expires_at: OffsetDateTime,
	/// Long-lived credential used to mint new pairs without user interaction.
	pub refresh_token: TokenSecret,
	/// Instant the refresh token was granted.
	pub refresh_token_issued_at: OffsetDateTime,
	/// Instant the refresh token lapses.
	pub refresh_token_expires_at: OffsetDateTime,
}
impl TokenRecord {
	/// Builds a complete record from a validated grant response.
	///
	/// Both TTLs come from the response and are never assumed constant. Non-positive or
	/// absurdly large lifetimes are rejected rather than persisted.
	pub fn from_grant(
		grant: &GrantResponse,
		issued_at: OffsetDateTime,
	) -> Result<Self, ConfigError> {
		let access_ttl = validated_lifetime(grant.expires_in, "expires_in")?;
		let refresh_ttl =
			validated_lifetime(grant.refresh_token_expires_in, "refresh_token_expires_in")?;

		Ok(Self {
			token_type: grant.token_type.clone(),
			access_token: TokenSecret::new(grant.access_token.clone()),
			access_token_issued_at: issued_at,
			access_token_expires_at: issued_at + access_ttl,
			refresh_token: TokenSecret::new(grant.refresh_token.clone()),
			refresh_token_issued_at: issued_at,
			refresh_token_expires_at: issued_at + refresh_ttl,
		})
	}

	/// Returns `true` if the access token is still valid at the provided instant.
	pub fn access_valid_at(&self, now: OffsetDateTime) -> bool {
		self.access_token_expires_at > now
	}

	/// Returns `true` if the refresh token is still valid at the provided instant.
	pub fn refresh_valid_at(&self, now: OffsetDateTime) -> bool {
		self.refresh_token_expires_at > now
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("token_type", &self.token_type)
			.field("access_token", &"<redacted>")
			.field("access_token_issued_at", &self.access_token_issued_at)
			.field("access_token_expires_at", &self.access_token_expires_at)
			.field("refresh_token", &"<redacted>")
			.field("refresh_token_issued_at", &self.refresh_token_issued_at)
			.field("refresh_token_expires_at", &self.refresh_token_expires_at)
			.finish()
	}
}

fn validated_lifetime(seconds: i64, field: &'static str) -> Result<Duration, ConfigError> {
	if seconds <= 0 {
		return Err(ConfigError::NonPositiveExpiresIn { field });
	}
	if seconds > MAX_LIFETIME_SECONDS {
		return Err(ConfigError::ExpiresInOutOfRange { field });
	}

	Ok(Duration::seconds(seconds))
}
