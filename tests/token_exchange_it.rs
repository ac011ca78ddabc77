#![cfg(all(feature = "reqwest", feature = "test"))]

// std
use std::collections::HashMap;
// crates.io
use httpmock::prelude::*;
// self
use oauth2_msgraph::{
	_preludet::*,
	auth::ScopeList,
	error::{ErrorCode, ProviderErrorKind, ResponseError},
	oauth::PkceCodeChallengeMethod,
};

const CLIENT_ID: &str = "client-it";
const CLIENT_SECRET: &str = "secret-it";

#[tokio::test]
async fn start_authorization_builds_the_authorize_url() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), CLIENT_ID, CLIENT_SECRET);
	let session = client.start_authorization().expect("Authorization session should start.");
	let pairs: HashMap<_, _> = session.authorize_url.query_pairs().into_owned().collect();

	assert_eq!(session.authorize_url.path(), "/common/oauth2/v2.0/authorize");
	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("client_id"), Some(&CLIENT_ID.into()));
	assert_eq!(pairs.get("redirect_uri"), Some(&TEST_REDIRECT_URI.into()));
	assert_eq!(pairs.get("scope"), Some(&"openid profile offline_access".into()));
	assert_eq!(pairs.get("state"), Some(&session.state));
	assert_eq!(pairs.get("code_challenge"), Some(&session.code_challenge().into()));
	assert_eq!(pairs.get("code_challenge_method"), Some(&"S256".into()));
	assert_eq!(session.code_challenge_method(), PkceCodeChallengeMethod::S256);
	assert_eq!(session.scope, ScopeList::defaults());
	assert!(session.validate_state(&session.state).is_ok());
}

#[tokio::test]
async fn exchange_code_returns_a_grant() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), CLIENT_ID, CLIENT_SECRET);
	let scope = ScopeList::new(["openid", "User.Read"]).expect("Scope fixture should be valid.");
	let session = client
		.start_authorization_with_scopes(scope.clone())
		.expect("Authorization session should start.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/common/oauth2/v2.0/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"access-success","refresh_token":"refresh-success","token_type":"bearer","expires_in":3599,"scope":"openid User.Read"}"#,
			);
		})
		.await;
	let state = session.state.clone();
	let grant = client
		.complete_authorization(&session, &state, "valid-code")
		.await
		.expect("Authorization code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(grant.access_token.expose(), "access-success");
	assert_eq!(
		grant.refresh_token.as_ref().map(|secret| secret.expose()),
		Some("refresh-success")
	);
	assert_eq!(grant.scope, scope);
	assert_eq!(grant.expires_at, Some(grant.issued_at + Duration::seconds(3599)));
	assert!(!grant.is_expired_at(grant.issued_at));
}

#[tokio::test]
async fn exchange_code_keeps_microsoft_error_codes() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), CLIENT_ID, CLIENT_SECRET);
	let session = client.start_authorization().expect("Authorization session should start.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/common/oauth2/v2.0/token");
			then.status(400).header("content-type", "application/json").body(
				r#"{"error":"invalid_grant","error_description":"AADSTS70008: The provided authorization code or refresh token has expired.","error_codes":[70008],"timestamp":"2025-01-01 00:00:00Z"}"#,
			);
		})
		.await;
	let err = client
		.exchange_code(&session, "stale-code")
		.await
		.expect_err("Expired codes should surface as protocol errors.");

	mock.assert_async().await;

	let failure = err.as_provider().expect("Error should carry a normalized provider failure.");

	assert_eq!(failure.kind, ProviderErrorKind::Protocol);
	assert_eq!(
		failure.message,
		"invalid_grant: AADSTS70008: The provided authorization code or refresh token has expired."
	);
	assert_eq!(failure.code, ErrorCode::Numeric(70008));
	assert_eq!(failure.status, 400);
	assert_eq!(failure.payload["timestamp"], "2025-01-01 00:00:00Z");
}

#[tokio::test]
async fn state_mismatch_skips_the_token_endpoint() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), CLIENT_ID, CLIENT_SECRET);
	let session = client.start_authorization().expect("Authorization session should start.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/common/oauth2/v2.0/token");
			then.status(200);
		})
		.await;
	let err = client
		.complete_authorization(&session, "forged-state", "code")
		.await
		.expect_err("Forged state must be rejected.");

	assert!(matches!(err, Error::StateMismatch));
	assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn malformed_token_responses_report_a_parse_error() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url(), CLIENT_ID, CLIENT_SECRET);
	let session = client.start_authorization().expect("Authorization session should start.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/common/oauth2/v2.0/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"token_type":"Bearer"}"#);
		})
		.await;
	let err = client
		.exchange_code(&session, "code")
		.await
		.expect_err("Responses without an access token must be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Response(ResponseError::TokenParse { status: None, .. })));
}
