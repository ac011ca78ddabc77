// crates.io
use oauth2::{PkceCodeChallenge, PkceCodeVerifier};
// self
use crate::{_prelude::*, auth::ScopeList};

/// Supported PKCE challenge methods surfaced via [`AuthorizationSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Authorization Code + PKCE handshake metadata returned by
/// [`GraphClient::start_authorization`](crate::client::GraphClient::start_authorization).
///
/// Keep the session server-side until the redirect comes back; the PKCE verifier never leaves
/// it except through the code exchange.
#[derive(Clone)]
pub struct AuthorizationSession {
	/// Fully-formed authorize URL that callers should send end-users to.
	pub authorize_url: Url,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	/// Requested scopes, in the order they were sent.
	pub scope: ScopeList,
	/// Redirect URI embedded in the authorize URL.
	pub redirect_uri: Url,
	pkce: PkcePair,
}
impl AuthorizationSession {
	pub(crate) fn new(
		authorize_url: Url,
		state: String,
		scope: ScopeList,
		redirect_uri: Url,
		pkce: PkcePair,
	) -> Self {
		Self { authorize_url, state, scope, redirect_uri, pkce }
	}

	/// PKCE code challenge derived from the secret verifier.
	pub fn code_challenge(&self) -> &str {
		&self.pkce.challenge
	}

	/// PKCE challenge method (currently always `S256`).
	pub fn code_challenge_method(&self) -> PkceCodeChallengeMethod {
		self.pkce.method
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}

	pub(crate) fn pkce_verifier(&self) -> PkceCodeVerifier {
		PkceCodeVerifier::new(self.pkce.verifier.clone())
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("authorize_url", &self.authorize_url)
			.field("state", &self.state)
			.field("scope", &self.scope)
			.field("redirect_uri", &self.redirect_uri)
			.field("code_challenge", &self.pkce.challenge)
			.field("code_challenge_method", &self.pkce.method)
			.finish()
	}
}

#[derive(Clone)]
pub(crate) struct PkcePair {
	verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	pub(crate) fn generate() -> (Self, PkceCodeChallenge) {
		let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
		let pair = Self {
			verifier: verifier.secret().to_owned(),
			challenge: challenge.as_str().to_owned(),
			method: PkceCodeChallengeMethod::S256,
		};

		(pair, challenge)
	}
}
