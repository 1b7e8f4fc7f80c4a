//! Upstream OAuth client issuing the two brokerage grant exchanges.
//!
//! Both operations POST to the fixed token endpoint with
//! `application/x-www-form-urlencoded` bodies and `access_type=offline`, and both return the
//! same five-field grant response. Parsing is strict: any missing field fails loudly with
//! the offending serde path, because a silently defaulted `expires_in` would later compute
//! an always-invalid or always-valid expiry.

// self
use crate::{
	_prelude::*,
	config::UpstreamConfig,
	http::{FormRequest, FormResponse, TokenHttpClient},
};

/// Longest response-body prefix carried inside an [`Error::Upstream`] message.
const BODY_DISPLAY_LIMIT: usize = 512;

/// Grant response returned by the brokerage token endpoint.
///
/// Every field is required; the brokerage issues a full new access + refresh pair on each
/// grant, including the nonstandard `refresh_token_expires_in` lifetime.
#[derive(Clone, Deserialize)]
pub struct GrantResponse {
	/// Token scheme, always `Bearer`.
	pub token_type: String,
	/// Newly minted bearer credential.
	pub access_token: String,
	/// Access token lifetime in seconds (~1800).
	pub expires_in: i64,
	/// Newly minted refresh token; the brokerage rotates it on every grant.
	pub refresh_token: String,
	/// Refresh token lifetime in seconds (~90 days).
	pub refresh_token_expires_in: i64,
}
impl Debug for GrantResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantResponse")
			.field("token_type", &self.token_type)
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("refresh_token", &"<redacted>")
			.field("refresh_token_expires_in", &self.refresh_token_expires_in)
			.finish()
	}
}

/// Client for the brokerage token endpoint.
///
/// Holds the injected configuration and the transport; grant classification happens here so
/// every consumer observes the same status-to-error table.
pub struct OAuthClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Transport used for every token-endpoint request.
	pub http_client: Arc<C>,
	/// Injected endpoint + client configuration.
	pub config: UpstreamConfig,
}
impl<C> OAuthClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a client over the provided configuration and transport.
	pub fn new(config: UpstreamConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), config }
	}

	/// Exchanges an authorization code for a fresh token pair.
	pub async fn exchange_code(&self, code: &str) -> Result<GrantResponse> {
		self.request_grant(code_params(&self.config, code)).await
	}

	/// Exchanges a refresh token for a rotated token pair.
	pub async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<GrantResponse> {
		self.request_grant(refresh_params(&self.config, refresh_token)).await
	}

	async fn request_grant(&self, params: Vec<(&'static str, String)>) -> Result<GrantResponse> {
		let request = FormRequest {
			url: self.config.token_endpoint.clone(),
			params,
			timeout: self.config.request_timeout,
		};
		let response = self.http_client.post_form(request).await?;

		parse_grant(&response)
	}
}
impl<C> Clone for OAuthClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), config: self.config.clone() }
	}
}
impl<C> Debug for OAuthClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("token_endpoint", &self.config.token_endpoint.as_str())
			.field("client_id", &self.config.client_id)
			.finish()
	}
}

fn code_params(config: &UpstreamConfig, code: &str) -> Vec<(&'static str, String)> {
	vec![
		("grant_type", "authorization_code".into()),
		("access_type", "offline".into()),
		("code", code.into()),
		("client_id", config.client_id.clone()),
		("redirect_uri", config.redirect_uri.to_string()),
	]
}

fn refresh_params(config: &UpstreamConfig, refresh_token: &str) -> Vec<(&'static str, String)> {
	vec![
		("grant_type", "refresh_token".into()),
		("access_type", "offline".into()),
		("refresh_token", refresh_token.into()),
		("client_id", config.client_id.clone()),
	]
}

fn parse_grant(response: &FormResponse) -> Result<GrantResponse> {
	if !(200..300).contains(&response.status) {
		return Err(Error::Upstream {
			status: response.status,
			body: display_body(&response.body),
		});
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::GrantParse { source, status: response.status })
}

fn display_body(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let mut text = text.trim().to_owned();

	if text.len() > BODY_DISPLAY_LIMIT {
		let cut = text
			.char_indices()
			.map(|(idx, _)| idx)
			.take_while(|idx| *idx <= BODY_DISPLAY_LIMIT)
			.last()
			.unwrap_or(0);

		text.truncate(cut);
		text.push('…');
	}

	text
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ErrorKind;

	fn config() -> UpstreamConfig {
		UpstreamConfig::new(
			Url::parse("https://api.example.com/v1/oauth2/token")
				.expect("Token endpoint fixture should parse."),
			"client-1",
			Url::parse("https://127.0.0.1/callback").expect("Redirect URI fixture should parse."),
		)
	}

	fn ok_response(body: &str) -> FormResponse {
		FormResponse { status: 200, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn code_exchange_sends_the_offline_grant_body() {
		let params = code_params(&config(), "auth-code-1");

		assert_eq!(params[0], ("grant_type", "authorization_code".into()));
		assert!(params.contains(&("access_type", "offline".into())));
		assert!(params.contains(&("code", "auth-code-1".into())));
		assert!(params.contains(&("client_id", "client-1".into())));
		assert!(params.contains(&("redirect_uri", "https://127.0.0.1/callback".into())));
	}

	#[test]
	fn refresh_exchange_omits_the_redirect_uri() {
		let params = refresh_params(&config(), "rt-1");

		assert_eq!(params[0], ("grant_type", "refresh_token".into()));
		assert!(params.contains(&("refresh_token", "rt-1".into())));
		assert!(params.iter().all(|(key, _)| *key != "redirect_uri"));
	}

	#[test]
	fn well_formed_grant_parses() {
		let grant = parse_grant(&ok_response(
			"{\"token_type\":\"Bearer\",\"access_token\":\"at-2\",\"expires_in\":1800,\
			 \"refresh_token\":\"rt-2\",\"refresh_token_expires_in\":7776000}",
		))
		.expect("Complete grant response should parse.");

		assert_eq!(grant.token_type, "Bearer");
		assert_eq!(grant.access_token, "at-2");
		assert_eq!(grant.expires_in, 1800);
		assert_eq!(grant.refresh_token, "rt-2");
		assert_eq!(grant.refresh_token_expires_in, 7_776_000);
	}

	#[test]
	fn missing_field_names_the_offending_path() {
		let err = parse_grant(&ok_response(
			"{\"token_type\":\"Bearer\",\"access_token\":\"at-2\",\"expires_in\":1800,\
			 \"refresh_token\":\"rt-2\"}",
		))
		.expect_err("Grant response without refresh_token_expires_in must not parse.");

		assert_eq!(err.kind(), ErrorKind::InternalServerError);
		assert!(source_chain_mentions(&err, "refresh_token_expires_in"));
	}

	#[test]
	fn non_success_statuses_classify_via_the_shared_table() {
		let cases = [
			(400, ErrorKind::BadRequest),
			(401, ErrorKind::Unauthorized),
			(403, ErrorKind::Forbidden),
			(404, ErrorKind::NotFound),
			(406, ErrorKind::NotAcceptable),
			(503, ErrorKind::ServiceUnavailable),
			(500, ErrorKind::InternalServerError),
		];

		for (status, expected) in cases {
			let err = parse_grant(&FormResponse {
				status,
				body: b"{\"error\":\"invalid_request\"}".to_vec(),
			})
			.expect_err("Non-2xx reply must classify as an upstream error.");

			assert_eq!(err.kind(), expected, "status {status}");
		}
	}

	#[test]
	fn long_error_bodies_are_truncated_for_display() {
		let body = "x".repeat(BODY_DISPLAY_LIMIT * 2);
		let rendered = display_body(body.as_bytes());

		assert!(rendered.len() <= BODY_DISPLAY_LIMIT + '…'.len_utf8());
		assert!(rendered.ends_with('…'));
	}

	fn source_chain_mentions(err: &Error, needle: &str) -> bool {
		let mut source = std::error::Error::source(err);

		while let Some(inner) = source {
			if inner.to_string().contains(needle) {
				return true;
			}

			source = inner.source();
		}

		err.to_string().contains(needle)
	}
}
