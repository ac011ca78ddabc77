//! OAuth client facade over the `oauth2` crate.
//!
//! The facade owns the generic authorization-code machinery (state, PKCE, token request
//! encoding, token response parsing) and hands failures back through the provider's
//! [`ResponseClassifier`] so Microsoft-specific fields such as `error_codes` survive.

mod session;

pub use session::*;

// crates.io
use oauth2::{
	AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse},
	http::StatusCode,
};
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, ScopeList, TokenGrant},
	error::{ConfigError, ResponseError},
	http::{CapturedResponse, GraphHttpClient, ResponseSlot, map_client_error},
	provider::{EndpointResolver, ResponseClassifier, ResponseContext},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Status assumed for OAuth error bodies when the transport did not capture one.
const DEFAULT_ERROR_STATUS: u16 = 400;

/// Application registration used for the authorization code grant.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier (the app registration's application ID).
	pub client_id: String,
	/// Redirect URI registered for the application.
	pub redirect_uri: Url,
	client_secret: Option<String>,
}
impl ClientCredentials {
	/// Creates credentials for a public client.
	pub fn new(client_id: impl Into<String>, redirect_uri: Url) -> Self {
		Self { client_id: client_id.into(), redirect_uri, client_secret: None }
	}

	/// Sets or replaces the client secret used by confidential clients.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Returns the client secret, if any. Callers must avoid logging this string.
	pub fn client_secret(&self) -> Option<&str> {
		self.client_secret.as_deref()
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("client_id", &self.client_id)
			.field("redirect_uri", &self.redirect_uri)
			.field("client_secret_set", &self.client_secret.is_some())
			.finish()
	}
}

pub(crate) struct BasicFacade {
	oauth_client: ConfiguredBasicClient,
	redirect_uri: Url,
	scope_separator: char,
}
impl BasicFacade {
	pub(crate) fn from_resolver(
		resolver: &dyn EndpointResolver,
		credentials: &ClientCredentials,
	) -> Result<Self> {
		let endpoints = resolver.endpoints()?;
		let mut oauth_client = BasicClient::new(ClientId::new(credentials.client_id.clone()))
			.set_auth_uri(AuthUrl::from_url(endpoints.authorization))
			.set_token_uri(TokenUrl::from_url(endpoints.token))
			.set_redirect_uri(RedirectUrl::from_url(credentials.redirect_uri.clone()));

		if let Some(secret) = credentials.client_secret() {
			oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.to_owned()));
		}

		Ok(Self {
			oauth_client,
			redirect_uri: credentials.redirect_uri.clone(),
			scope_separator: resolver.scope_separator(),
		})
	}

	pub(crate) fn authorize(&self, scope: ScopeList) -> AuthorizationSession {
		let (pkce, challenge) = PkcePair::generate();
		let mut request =
			self.oauth_client.authorize_url(CsrfToken::new_random).set_pkce_challenge(challenge);

		if let Some(scope_value) = scope.join(self.scope_separator) {
			request = request.add_extra_param("scope", scope_value);
		}

		let (authorize_url, state) = request.url();

		AuthorizationSession::new(
			authorize_url,
			state.secret().to_owned(),
			scope,
			self.redirect_uri.clone(),
			pkce,
		)
	}

	pub(crate) async fn exchange_code<C>(
		&self,
		http_client: &C,
		classifier: &dyn ResponseClassifier,
		session: &AuthorizationSession,
		code: &str,
	) -> Result<TokenGrant>
	where
		C: ?Sized + GraphHttpClient,
	{
		let slot = ResponseSlot::default();
		let handle = http_client.with_capture(slot.clone());
		let mut request = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.set_pkce_verifier(session.pkce_verifier());

		if let Some(scope_value) = session.scope.join(self.scope_separator) {
			request = request.add_extra_param("scope", scope_value);
		}

		let response = request
			.request_async(&handle)
			.await
			.map_err(|err| map_request_error(classifier, slot.take(), err))?;

		map_token_response(&session.scope, response)
	}
}

fn map_token_response(requested: &ScopeList, response: BasicTokenResponse) -> Result<TokenGrant> {
	let scope = match response.scopes() {
		Some(scopes) => ScopeList::new(scopes.iter().map(|scope| scope.as_str()))
			.map_err(ConfigError::from)?,
		None => requested.clone(),
	};
	let mut grant = TokenGrant::new(
		BearerToken::new(response.access_token().secret().to_owned()),
		scope,
		OffsetDateTime::now_utc(),
	);

	if let Some(refresh) = response.refresh_token() {
		grant = grant.with_refresh_token(BearerToken::new(refresh.secret().to_owned()));
	}
	if let Some(expires_in) = response.expires_in() {
		let expires_in = Duration::try_from(expires_in).map_err(|_| ResponseError::Unexpected {
			message: "expires_in is out of range".into(),
			status: None,
		})?;

		grant = grant.with_expires_in(expires_in);
	}

	Ok(grant)
}

fn map_request_error<E>(
	classifier: &dyn ResponseClassifier,
	captured: Option<CapturedResponse>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let status = captured.as_ref().map(|response| response.status);

	match err {
		RequestTokenError::ServerResponse(response) => {
			let body = captured
				.as_ref()
				.and_then(CapturedResponse::json)
				.or_else(|| serde_json::to_value(&response).ok())
				.unwrap_or(Value::Null);

			classify_token_failure(classifier, status.unwrap_or(DEFAULT_ERROR_STATUS), &body)
				.unwrap_or_else(|| {
					ResponseError::Unexpected {
						message: format!("unrecognized OAuth error {}", response.error().as_ref()),
						status,
					}
					.into()
				})
		},
		RequestTokenError::Request(error) => map_client_error(error),
		RequestTokenError::Parse(source, _body) => classify_captured(classifier, captured.as_ref())
			.unwrap_or_else(|| ResponseError::TokenParse { source, status }.into()),
		RequestTokenError::Other(message) => classify_captured(classifier, captured.as_ref())
			.unwrap_or_else(|| ResponseError::Unexpected { message, status }.into()),
	}
}

fn classify_captured(
	classifier: &dyn ResponseClassifier,
	captured: Option<&CapturedResponse>,
) -> Option<Error> {
	let captured = captured?;

	classify_token_failure(classifier, captured.status, &captured.json()?)
}

fn classify_token_failure(
	classifier: &dyn ResponseClassifier,
	status: u16,
	body: &Value,
) -> Option<Error> {
	let mut context = ResponseContext::new(status, body);

	if let Some(reason) = StatusCode::from_u16(status).ok().and_then(|code| code.canonical_reason())
	{
		context = context.with_reason(reason);
	}

	classifier.classify(&context).map(Error::from)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		error::{ErrorCode, ProviderErrorKind},
		provider::{GraphProvider, GraphResponseClassifier},
	};

	fn credentials() -> ClientCredentials {
		ClientCredentials::new(
			"client-id",
			Url::parse("https://app.example.com/callback").expect("Redirect URI should parse."),
		)
	}

	#[test]
	fn credentials_debug_hides_secret() {
		let credentials = credentials().with_client_secret("hunter2");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("client_secret_set: true"));
		assert!(!rendered.contains("hunter2"));
		assert_eq!(credentials.client_secret(), Some("hunter2"));
	}

	#[test]
	fn authorize_url_carries_pkce_state_and_joined_scopes() {
		let facade = BasicFacade::from_resolver(&GraphProvider::default(), &credentials())
			.expect("Default provider should build a facade.");
		let session = facade.authorize(ScopeList::defaults());
		let url = &session.authorize_url;
		let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
		let param = |name: &str| {
			pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
		};

		assert_eq!(url.path(), "/common/oauth2/v2.0/authorize");
		assert_eq!(param("response_type"), Some("code"));
		assert_eq!(param("client_id"), Some("client-id"));
		assert_eq!(param("redirect_uri"), Some("https://app.example.com/callback"));
		assert_eq!(param("scope"), Some("openid profile offline_access"));
		assert_eq!(param("state"), Some(session.state.as_str()));
		assert_eq!(param("code_challenge"), Some(session.code_challenge()));
		assert_eq!(param("code_challenge_method"), Some("S256"));
	}

	#[test]
	fn empty_scope_list_omits_the_parameter() {
		let facade = BasicFacade::from_resolver(&GraphProvider::default(), &credentials())
			.expect("Default provider should build a facade.");
		let session = facade.authorize(ScopeList::default());

		assert!(!session.authorize_url.query_pairs().any(|(key, _)| key == "scope"));
	}

	#[test]
	fn invalid_login_base_is_a_config_error() {
		let mut provider = GraphProvider::default();

		provider.set_login_url_base("not a url");

		let err = BasicFacade::from_resolver(&provider, &credentials())
			.err()
			.expect("Unparsable endpoints must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidEndpoint { .. })));
	}

	#[test]
	fn captured_protocol_error_keeps_error_codes() {
		let captured = CapturedResponse {
			status: 400,
			body: serde_json::to_vec(&json!({
				"error": "invalid_grant",
				"error_description": "AADSTS70008: The code has expired.",
				"error_codes": [70008],
			}))
			.expect("Fixture should serialize."),
		};
		let failure = classify_captured(&GraphResponseClassifier, Some(&captured))
			.expect("Captured OAuth error should be classified.");
		let failure = failure.as_provider().expect("Failure should be a provider error.");

		assert_eq!(failure.kind, ProviderErrorKind::Protocol);
		assert_eq!(failure.code, ErrorCode::Numeric(70008));
		assert_eq!(failure.message, "invalid_grant: AADSTS70008: The code has expired.");
	}

	#[test]
	fn uncaptured_bodies_are_not_classified() {
		assert!(classify_captured(&GraphResponseClassifier, None).is_none());

		let captured = CapturedResponse { status: 502, body: b"<html>".to_vec() };

		assert!(classify_captured(&GraphResponseClassifier, Some(&captured)).is_none());
	}
}
