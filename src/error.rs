//! Adapter-level error types shared across the provider, transport, and OAuth layers.

// std
use std::convert::Infallible;
// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider answered with one of the recognized error shapes.
	#[error(transparent)]
	Provider(#[from] ProviderError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a body the adapter cannot interpret.
	#[error(transparent)]
	Response(#[from] ResponseError),

	/// The `state` returned to the redirect handler does not match the session.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}
impl Error {
	/// Returns the normalized provider failure, if this error carries one.
	pub fn as_provider(&self) -> Option<&ProviderError> {
		match self {
			Self::Provider(e) => Some(e),
			_ => None,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// API version was supplied as a non-string value.
	#[error("API version must be a string, found {found}.")]
	InvalidApiVersion {
		/// JSON type of the rejected value.
		found: &'static str,
	},
	/// Tenant or API version failed identifier validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// A derived endpoint does not parse as an absolute URL.
	#[error("The {endpoint} endpoint is not a valid URL: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Option bag could not be decoded.
	#[error("Provider options are invalid.")]
	InvalidOptions {
		/// Structured decoding failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<Infallible> for ConfigError {
	fn from(e: Infallible) -> Self {
		match e {}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Which provider error envelope produced a [`ProviderError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
	/// OAuth 2.0 protocol error (`error` + `error_description` + `error_codes`).
	Protocol,
	/// Graph API business error (`error: { code, message }`).
	Api,
	/// Legacy OData envelope (`odata.error`).
	LegacyOData,
}
impl ProviderErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Protocol => "protocol",
			Self::Api => "api",
			Self::LegacyOData => "legacy_odata",
		}
	}
}
impl Display for ProviderErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Code attached to a [`ProviderError`].
///
/// API and OData errors carry the HTTP status; protocol errors carry the first entry of the
/// provider's `error_codes` list, which Microsoft emits as numbers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
	/// Numeric code.
	Numeric(i64),
	/// Non-numeric code.
	Text(String),
}
impl ErrorCode {
	/// Returns the numeric value, if any.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Numeric(code) => Some(*code),
			Self::Text(_) => None,
		}
	}
}
impl From<u16> for ErrorCode {
	fn from(status: u16) -> Self {
		Self::Numeric(status.into())
	}
}
impl Display for ErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Numeric(code) => write!(f, "{code}"),
			Self::Text(code) => f.write_str(code),
		}
	}
}

/// Normalized provider failure produced by the response classifier.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("{message}")]
pub struct ProviderError {
	/// Envelope that matched.
	pub kind: ProviderErrorKind,
	/// Human-readable message.
	pub message: String,
	/// Provider or HTTP code.
	pub code: ErrorCode,
	/// HTTP status of the response.
	pub status: u16,
	/// Raw decoded body, kept for diagnostics.
	pub payload: Value,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// HTTP client failed without a typed error.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Client-supplied description.
		message: String,
	},
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
		Self::network(e)
	}
}

/// Response bodies that cannot be interpreted.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Body is not valid JSON.
	#[error("Provider returned a body that is not valid JSON (HTTP {status}).")]
	InvalidJson {
		/// HTTP status code.
		status: u16,
		/// JSON decoding failure.
		#[source]
		source: serde_json::Error,
	},
	/// Body decoded but has the wrong top-level type.
	#[error("Provider returned a JSON {found} where an object was expected (HTTP {status}).")]
	UnexpectedShape {
		/// HTTP status code.
		status: u16,
		/// JSON type that was found instead.
		found: &'static str,
	},
	/// Token endpoint responded with JSON that does not match the token response schema.
	#[error("Token endpoint returned malformed JSON.")]
	TokenParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint returned something the OAuth client could not handle.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Client-supplied description.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Returns the JSON type name of `value`, used in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
