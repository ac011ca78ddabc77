//! Bearer secrets and the token grants returned by the token endpoint.

// crates.io
use oauth2::http::{HeaderValue, header::InvalidHeaderValue};
// self
use crate::{_prelude::*, auth::ScopeList};

/// Redacted bearer secret keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Builds the `Authorization` header value (`Bearer <token>`), marked sensitive.
	pub fn authorization_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl AsRef<str> for BearerToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Tokens issued by a successful code exchange.
///
/// A grant is handed back to the caller as-is; the adapter neither stores nor refreshes it.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenGrant {
	/// Access token sent as `Authorization: Bearer` on Graph calls.
	pub access_token: BearerToken,
	/// Refresh token, issued when `offline_access` was granted.
	pub refresh_token: Option<BearerToken>,
	/// Scopes reported by the provider, or the requested scopes when the response omits them.
	pub scope: ScopeList,
	/// Instant the response was received.
	pub issued_at: OffsetDateTime,
	/// Expiry derived from `expires_in`, when the provider reported one.
	pub expires_at: Option<OffsetDateTime>,
}
impl TokenGrant {
	/// Creates a grant issued at `issued_at` with no refresh token or expiry.
	pub fn new(access_token: BearerToken, scope: ScopeList, issued_at: OffsetDateTime) -> Self {
		Self { access_token, refresh_token: None, scope, issued_at, expires_at: None }
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: BearerToken) -> Self {
		self.refresh_token = Some(refresh_token);

		self
	}

	/// Sets the expiry relative to `issued_at`; non-positive values mark the grant expired.
	pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
		self.expires_at = Some(self.issued_at + expires_in.max(Duration::ZERO));

		self
	}

	/// Returns `true` if the access token has expired at `instant`.
	///
	/// Grants without an expiry never report as expired.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = BearerToken::new("super-secret");

		assert_eq!(format!("{secret:?}"), "BearerToken(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn authorization_header_is_bearer_and_sensitive() {
		let header = BearerToken::new("abc")
			.authorization_header()
			.expect("Plain ASCII tokens should form a valid header.");

		assert_eq!(header.to_str().expect("Header should be ASCII."), "Bearer abc");
		assert!(header.is_sensitive());
		assert!(BearerToken::new("line\nbreak").authorization_header().is_err());
	}

	#[test]
	fn grant_expiry_follows_expires_in() {
		let issued_at = datetime!(2025-01-01 00:00 UTC);
		let grant = TokenGrant::new(BearerToken::new("access"), ScopeList::defaults(), issued_at)
			.with_expires_in(Duration::seconds(3600));

		assert!(!grant.is_expired_at(issued_at + Duration::seconds(3599)));
		assert!(grant.is_expired_at(issued_at + Duration::seconds(3600)));

		let open_ended =
			TokenGrant::new(BearerToken::new("access"), ScopeList::default(), issued_at);

		assert!(!open_ended.is_expired_at(issued_at + Duration::days(365)));
	}

	#[test]
	fn grant_debug_redacts_secrets() {
		let grant = TokenGrant::new(
			BearerToken::new("access-secret"),
			ScopeList::defaults(),
			datetime!(2025-01-01 00:00 UTC),
		)
		.with_refresh_token(BearerToken::new("refresh-secret"));
		let rendered = format!("{grant:?}");

		assert!(!rendered.contains("access-secret"));
		assert!(!rendered.contains("refresh-secret"));
	}
}
