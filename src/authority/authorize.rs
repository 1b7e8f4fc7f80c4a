//! Scheduled authorization decisions with a single-flight refresh guard.
//!
//! [`TokenAuthority::authorize`] is invoked by the periodic scheduler tick and,
//! opportunistically, by request handlers that observe an expired token. The decision
//! re-derives state from the store on every call: a valid access token short-circuits to
//! `true` with zero writes and zero network calls, an access-expired/refresh-valid record
//! triggers exactly one refresh exchange behind the guard, and anything else is the
//! terminal state only an interactive re-login can leave.

// self
use crate::{
	_prelude::*,
	authority::TokenAuthority,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	token::{AuthState, TokenRecord},
};

impl<C> TokenAuthority<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Decides whether the app currently holds a valid upstream credential, refreshing the
	/// pair first when the access token lapsed but the refresh token is still live.
	///
	/// Never panics and never propagates errors: the scheduler must not crash, so every
	/// failure (store read, transport, upstream status, malformed grant) is logged and
	/// collapsed into `false`. A failed refresh leaves the store untouched; only elapsed
	/// time against `refresh_token_expires_at` downgrades refresh validity, and the next
	/// tick acts as the retry.
	pub async fn authorize(&self) -> bool {
		let span = FlowSpan::new(FlowKind::Refresh, "authorize");

		span.instrument(async move {
			match self.try_authorize().await {
				Ok(authorized) => authorized,
				Err(err) => {
					obs::warn_flow_failure(FlowKind::Refresh, &err);

					false
				},
			}
		})
		.await
	}

	async fn try_authorize(&self) -> Result<bool> {
		let now = OffsetDateTime::now_utc();
		let record = self.store.load().await?;

		match AuthState::derive(record.as_ref(), now) {
			AuthState::Authorized => Ok(true),
			AuthState::AccessExpiredRefreshValid => self.refresh().await,
			AuthState::NoToken | AuthState::BothExpired => Ok(false),
		}
	}

	/// Refresh path; at most one exchange in flight. The brokerage invalidates the old
	/// refresh token when issuing a new one, so a lost write race would permanently lock
	/// the app out until a human re-logs in. Losers of the race re-read the record after
	/// acquiring the guard and reuse the winner's write instead of issuing a second
	/// exchange.
	async fn refresh(&self) -> Result<bool> {
		let _singleflight = self.refresh_guard.lock().await;
		let now = OffsetDateTime::now_utc();
		let Some(current) = self.store.load().await? else {
			return Ok(false);
		};

		if current.access_valid_at(now) {
			// A concurrent caller rotated the pair while this one waited on the guard.
			return Ok(true);
		}
		if !current.refresh_valid_at(now) {
			return Ok(false);
		}

		// Counters move only when an exchange actually runs; fast-path reuses and
		// terminal states record nothing.
		self.observe_refresh(FlowOutcome::Attempt);

		match self.rotate(&current).await {
			Ok(()) => {
				self.observe_refresh(FlowOutcome::Success);

				Ok(true)
			},
			Err(err) => {
				self.observe_refresh(FlowOutcome::Failure);

				Err(err)
			},
		}
	}

	async fn rotate(&self, current: &TokenRecord) -> Result<()> {
		let grant = self.oauth.exchange_refresh_token(current.refresh_token.expose()).await?;
		let rotated = TokenRecord::from_grant(&grant, OffsetDateTime::now_utc())?;

		self.store.replace(rotated).await?;

		Ok(())
	}

	fn observe_refresh(&self, outcome: FlowOutcome) {
		self.refresh_metrics.record(outcome);
		obs::record_flow_outcome(FlowKind::Refresh, outcome);
	}
}
