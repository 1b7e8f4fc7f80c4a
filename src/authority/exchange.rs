//! Interactive authorization-code completion for the brokerage login flow.

// self
use crate::{
	_prelude::*,
	authority::TokenAuthority,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	token::TokenRecord,
};

/// JSON projection of a freshly exchanged record, shaped for the `GET /authorize` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationSummary {
	/// Token scheme, always `Bearer`.
	pub token_type: String,
	/// Bearer credential for upstream calls.
	pub access_token: String,
	/// Remaining access-token lifetime in whole seconds.
	pub access_token_expires_in_seconds: i64,
	/// Remaining refresh-token lifetime in whole seconds.
	pub refresh_token_expires_in_seconds: i64,
}
impl AuthorizationSummary {
	/// Projects a record's remaining lifetimes relative to the provided instant.
	pub fn from_record(record: &TokenRecord, now: OffsetDateTime) -> Self {
		Self {
			token_type: record.token_type.clone(),
			access_token: record.access_token.expose().to_owned(),
			access_token_expires_in_seconds: (record.access_token_expires_at - now)
				.whole_seconds(),
			refresh_token_expires_in_seconds: (record.refresh_token_expires_at - now)
				.whole_seconds(),
		}
	}
}

impl<C> TokenAuthority<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Completes the interactive login by exchanging the authorization code and persisting
	/// the resulting record as a complete unit.
	///
	/// Unlike the background refresh path, errors propagate to the HTTP layer unchanged
	/// for client display; map them to a reply status with
	/// [`ErrorKind::http_status`](crate::error::ErrorKind::http_status). A malformed grant
	/// is never persisted, so a prior record survives a failed exchange.
	pub async fn exchange_authorization_code(&self, code: &str) -> Result<TokenRecord> {
		const KIND: FlowKind = FlowKind::CodeExchange;

		let span = FlowSpan::new(KIND, "exchange_authorization_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let grant = self.oauth.exchange_code(code).await?;
				let record = TokenRecord::from_grant(&grant, OffsetDateTime::now_utc())
					.map_err(Error::from)?;

				self.store.replace(record.clone()).await?;

				Ok(record)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(err) => {
				obs::warn_flow_failure(KIND, err);
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}
}
