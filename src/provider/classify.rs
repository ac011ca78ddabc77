//! Provider response classification.
//!
//! Microsoft endpoints answer failures with three different envelopes. The classifier tries
//! them in a fixed order and the first match wins:
//!
//! 1. legacy OData (`odata.error`), kept first for older API versions,
//! 2. Graph business errors (`error` is an object with `code` + `message`),
//! 3. OAuth 2.0 protocol errors (`error` is a string, plus `error_description` and
//!    `error_codes`).
//!
//! A body that matches none of them is a success. Malformed envelopes never raise on their
//! own; they simply fail to match.

// self
use crate::{
	_prelude::*,
	error::{ErrorCode, ProviderError, ProviderErrorKind},
};

/// Decoded response handed to a [`ResponseClassifier`].
///
/// Only primitive data is carried so classifiers stay independent of any HTTP client.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResponseContext<'a> {
	/// HTTP status code.
	pub status: u16,
	/// HTTP reason phrase, when the transport knows one.
	pub reason: Option<&'a str>,
	/// Decoded JSON body.
	pub body: &'a Value,
}
impl<'a> ResponseContext<'a> {
	/// Creates a context without a reason phrase.
	pub fn new(status: u16, body: &'a Value) -> Self {
		Self { status, reason: None, body }
	}

	/// Adds the HTTP reason phrase.
	pub fn with_reason(mut self, reason: &'a str) -> Self {
		self.reason = Some(reason);

		self
	}

	fn field(&self, name: &str) -> Option<&'a Value> {
		self.body.get(name).filter(|value| !value.is_null())
	}

	fn fallback_message(&self) -> String {
		match self.reason {
			Some(reason) if !reason.is_empty() => reason.to_owned(),
			_ => format!("HTTP {}", self.status),
		}
	}

	fn failure(&self, kind: ProviderErrorKind, message: String, code: ErrorCode) -> ProviderError {
		ProviderError { kind, message, code, status: self.status, payload: self.body.clone() }
	}
}

/// Decides whether a decoded provider response is a failure.
pub trait ResponseClassifier: Send + Sync {
	/// Returns the normalized failure, or `None` when the response succeeded.
	fn classify(&self, response: &ResponseContext<'_>) -> Option<ProviderError>;

	/// Raises the failure returned by [`ResponseClassifier::classify`].
	fn check(&self, response: &ResponseContext<'_>) -> Result<(), ProviderError> {
		match self.classify(response) {
			Some(failure) => Err(failure),
			None => Ok(()),
		}
	}
}

/// Error envelopes recognized by [`GraphResponseClassifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorShape {
	/// `{"odata.error": {"message": {"value": ...}}}`
	LegacyOData,
	/// `{"error": {"code": ..., "message": ...}}`
	Api,
	/// `{"error": "...", "error_description": "...", "error_codes": [...]}`
	Protocol,
}
impl ErrorShape {
	/// Order in which shapes are attempted.
	pub const ORDER: [ErrorShape; 3] =
		[ErrorShape::LegacyOData, ErrorShape::Api, ErrorShape::Protocol];

	/// Attempts to read `response` as this shape.
	pub fn parse(self, response: &ResponseContext<'_>) -> Option<ProviderError> {
		match self {
			ErrorShape::LegacyOData => parse_legacy_odata(response),
			ErrorShape::Api => parse_api(response),
			ErrorShape::Protocol => parse_protocol(response),
		}
	}
}

/// Classifier for Microsoft identity platform and Graph responses.
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphResponseClassifier;
impl Display for GraphResponseClassifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("graph-response-classifier")
	}
}
impl ResponseClassifier for GraphResponseClassifier {
	fn classify(&self, response: &ResponseContext<'_>) -> Option<ProviderError> {
		let failure = ErrorShape::ORDER.into_iter().find_map(|shape| shape.parse(response));

		#[cfg(feature = "tracing")]
		if let Some(failure) = &failure {
			tracing::debug!(
				kind = failure.kind.as_str(),
				status = failure.status,
				code = %failure.code,
				"Provider response matched an error shape."
			);
		}

		failure
	}
}

fn parse_legacy_odata(response: &ResponseContext<'_>) -> Option<ProviderError> {
	let envelope = response.field("odata.error")?;
	let message = envelope
		.get("message")
		.and_then(|message| message.get("value"))
		.and_then(Value::as_str)
		.map(ToOwned::to_owned)
		.unwrap_or_else(|| response.fallback_message());

	Some(response.failure(ProviderErrorKind::LegacyOData, message, response.status.into()))
}

fn parse_api(response: &ResponseContext<'_>) -> Option<ProviderError> {
	let envelope = response.field("error")?.as_object()?;
	let code = envelope.get("code").and_then(Value::as_str)?;
	let message = envelope.get("message").and_then(Value::as_str)?;

	Some(response.failure(
		ProviderErrorKind::Api,
		format!("{code}: {message}"),
		response.status.into(),
	))
}

fn parse_protocol(response: &ResponseContext<'_>) -> Option<ProviderError> {
	let error = response.field("error")?.as_str()?;
	let message = match response.field("error_description").and_then(Value::as_str) {
		Some(description) => format!("{error}: {description}"),
		None => error.to_owned(),
	};
	let code = response
		.field("error_codes")
		.and_then(Value::as_array)
		.and_then(|codes| codes.first())
		.and_then(|code| match code {
			Value::Number(number) => number.as_i64().map(ErrorCode::Numeric),
			Value::String(text) => Some(ErrorCode::Text(text.clone())),
			_ => None,
		})
		.unwrap_or_else(|| response.status.into());

	Some(response.failure(ProviderErrorKind::Protocol, message, code))
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn classify(status: u16, body: Value) -> Option<ProviderError> {
		GraphResponseClassifier
			.classify(&ResponseContext::new(status, &body).with_reason("Bad Request"))
	}

	#[test]
	fn legacy_odata_message_falls_back_to_reason_phrase() {
		let failure = classify(400, json!({ "odata.error": { "message": { "value": "X" } } }))
			.expect("OData envelope should be classified.");

		assert_eq!(failure.kind, ProviderErrorKind::LegacyOData);
		assert_eq!(failure.message, "X");
		assert_eq!(failure.code, ErrorCode::Numeric(400));

		let failure = classify(400, json!({ "odata.error": { "code": "Request_BadRequest" } }))
			.expect("OData envelope without a message should still be classified.");

		assert_eq!(failure.message, "Bad Request");

		let failure = GraphResponseClassifier
			.classify(&ResponseContext::new(418, &json!({ "odata.error": {} })))
			.expect("OData envelope without a reason should still be classified.");

		assert_eq!(failure.message, "HTTP 418");
	}

	#[test]
	fn api_error_uses_code_and_status() {
		let body = json!({ "error": { "code": "C", "message": "M", "innerError": { "date": "x" } } });
		let failure = classify(400, body.clone()).expect("API envelope should be classified.");

		assert_eq!(failure.kind, ProviderErrorKind::Api);
		assert_eq!(failure.message, "C: M");
		assert_eq!(failure.code, ErrorCode::Numeric(400));
		assert_eq!(failure.payload, body);
	}

	#[test]
	fn api_error_requires_string_code_and_message() {
		assert_eq!(classify(400, json!({ "error": { "code": 123, "message": true } })), None);
		assert_eq!(classify(400, json!({ "error": { "code": "C", "message": 7 } })), None);
		assert_eq!(classify(400, json!({ "error": { "code": null, "message": "M" } })), None);
	}

	#[test]
	fn protocol_error_uses_first_error_code() {
		let failure = classify(
			400,
			json!({
				"error": "invalid_grant",
				"error_description": "D",
				"error_codes": [65001, 50076],
			}),
		)
		.expect("OAuth envelope should be classified.");

		assert_eq!(failure.kind, ProviderErrorKind::Protocol);
		assert_eq!(failure.message, "invalid_grant: D");
		assert_eq!(failure.code, ErrorCode::Numeric(65001));
	}

	#[test]
	fn protocol_error_without_codes_uses_status() {
		let failure = classify(401, json!({ "error": "invalid_client" }))
			.expect("OAuth envelope should be classified.");

		assert_eq!(failure.message, "invalid_client");
		assert_eq!(failure.code, ErrorCode::Numeric(401));
	}

	#[test]
	fn odata_wins_over_error_field() {
		let failure = classify(
			400,
			json!({ "error": "invalid_request", "odata.error": { "message": { "value": "legacy" } } }),
		)
		.expect("Mixed envelope should be classified.");

		assert_eq!(failure.kind, ProviderErrorKind::LegacyOData);
		assert_eq!(failure.message, "legacy");
	}

	#[test]
	fn success_and_malformed_bodies_pass() {
		assert_eq!(classify(200, json!({})), None);
		assert_eq!(classify(200, json!({ "id": "1", "displayName": "A" })), None);
		assert_eq!(classify(400, json!({ "error": { "message": "no code" } })), None);
		assert_eq!(classify(400, json!({ "error": null })), None);
		assert_eq!(classify(200, json!(["not", "an", "object"])), None);
		assert!(GraphResponseClassifier.check(&ResponseContext::new(200, &json!({}))).is_ok());
	}

	#[test]
	fn shape_order_is_fixed() {
		assert_eq!(
			ErrorShape::ORDER,
			[ErrorShape::LegacyOData, ErrorShape::Api, ErrorShape::Protocol]
		);
	}
}
