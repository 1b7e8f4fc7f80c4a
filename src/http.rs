//! Transport primitives for brokerage token exchanges.
//!
//! [`TokenHttpClient`] is the authority's only dependency on an HTTP stack. Implementations
//! execute a single form-encoded POST and hand back the raw status + body; classifying the
//! reply into the error taxonomy stays in the OAuth layer so every transport behaves
//! identically. Timeouts and network failures must surface as
//! [`TransportError`](crate::error::TransportError) so the refresh policy can treat them as
//! retryable.

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::TransportError;

/// Boxed future returned by [`TokenHttpClient::post_form`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Form-encoded POST issued against the brokerage token endpoint.
#[derive(Clone)]
pub struct FormRequest {
	/// Token endpoint URL.
	pub url: Url,
	/// Body pairs encoded as `application/x-www-form-urlencoded`.
	pub params: Vec<(&'static str, String)>,
	/// Per-request timeout; expiry classifies the same as an upstream 503.
	pub timeout: Duration,
}
impl Debug for FormRequest {
	// Param values carry codes and refresh tokens, so only the keys are printed.
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FormRequest")
			.field("url", &self.url.as_str())
			.field("params", &self.params.iter().map(|(key, _)| *key).collect::<Vec<_>>())
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Raw token-endpoint reply prior to grant parsing.
#[derive(Clone, Debug)]
pub struct FormResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}

/// Abstraction over HTTP transports capable of executing token exchanges.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared behind `Arc`
/// across the authority and its callers, and the returned futures must be `Send` for the
/// lifetime of the in-flight request.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes a form-encoded POST and returns the raw status + body.
	fn post_form(&self, request: FormRequest) -> HttpFuture<'_, FormResponse>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Token requests should not follow redirects, matching OAuth 2.0 guidance that token
/// endpoints return results directly; configure any custom [`ReqwestClient`] accordingly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	fn post_form(&self, request: FormRequest) -> HttpFuture<'_, FormResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(request.url.as_str())
				.timeout(request.timeout.unsigned_abs())
				.form(&request.params)
				.send()
				.await
				.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(FormResponse { status, body })
		})
	}
}
