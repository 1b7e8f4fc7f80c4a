//! Authority-wide error types and the shared upstream status classification table.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Client-visible error classification shared by every consumer of the upstream API.
///
/// One table covers both directions of the wire contract: upstream statuses classify into a
/// kind via [`ErrorKind::from_status`], and the dashboard's own HTTP layer surfaces a kind
/// via [`ErrorKind::http_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
	/// Malformed authorization code, refresh token, or request body.
	BadRequest,
	/// Expired or rejected credential.
	Unauthorized,
	/// Valid credential with insufficient scope.
	Forbidden,
	/// No token record has been persisted yet.
	NotFound,
	/// Upstream rejected the negotiated representation.
	NotAcceptable,
	/// Transient upstream failure; safe to retry on the next scheduler tick.
	ServiceUnavailable,
	/// Malformed upstream response, programming defect, or unmapped status.
	InternalServerError,
}
impl ErrorKind {
	/// Classifies an upstream HTTP status code.
	pub const fn from_status(status: u16) -> Self {
		match status {
			400 => Self::BadRequest,
			401 => Self::Unauthorized,
			403 => Self::Forbidden,
			404 => Self::NotFound,
			406 => Self::NotAcceptable,
			503 => Self::ServiceUnavailable,
			_ => Self::InternalServerError,
		}
	}

	/// HTTP status the dashboard surfaces to its own callers for this kind.
	pub const fn http_status(self) -> u16 {
		match self {
			Self::BadRequest => 400,
			Self::Unauthorized => 401,
			Self::Forbidden => 403,
			Self::NotFound => 404,
			Self::NotAcceptable => 406,
			Self::ServiceUnavailable => 503,
			Self::InternalServerError => 500,
		}
	}

	/// Stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::BadRequest => "bad_request",
			Self::Unauthorized => "unauthorized",
			Self::Forbidden => "forbidden",
			Self::NotFound => "not_found",
			Self::NotAcceptable => "not_acceptable",
			Self::ServiceUnavailable => "service_unavailable",
			Self::InternalServerError => "internal_server_error",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical authority error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or grant validation problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {body}.")]
	Upstream {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Response body, truncated for display.
		body: String,
	},
	/// Token endpoint returned a grant response missing or mistyping a required field.
	#[error("Token endpoint returned a malformed grant response.")]
	GrantParse {
		/// Structured parsing failure naming the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the malformed reply.
		status: u16,
	},
	/// No token record exists; the interactive brokerage login has never completed.
	#[error("No token record exists; complete the brokerage login flow first.")]
	NoTokenRecord,
	/// The stored access token's expiry has passed.
	#[error("Access Token is Expired.")]
	AccessTokenExpired,
}
impl Error {
	/// Classifies the error per the shared wire-contract table.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Storage(_) | Self::Config(_) | Self::GrantParse { .. } =>
				ErrorKind::InternalServerError,
			Self::Transport(_) => ErrorKind::ServiceUnavailable,
			Self::Upstream { status, .. } => ErrorKind::from_status(*status),
			Self::NoTokenRecord => ErrorKind::NotFound,
			Self::AccessTokenExpired => ErrorKind::Unauthorized,
		}
	}
}

/// Configuration and grant validation failures raised by the authority.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Token endpoint returned a non-positive token lifetime.
	#[error("The {field} value must be positive.")]
	NonPositiveExpiresIn {
		/// Grant response field carrying the rejected lifetime.
		field: &'static str,
	},
	/// Token endpoint returned an excessively large token lifetime.
	#[error("The {field} value exceeds the supported range.")]
	ExpiresInOutOfRange {
		/// Grant response field carrying the rejected lifetime.
		field: &'static str,
	},
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Request exceeded the configured token endpoint timeout.
	#[error("Token endpoint request timed out.")]
	Timeout,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}
