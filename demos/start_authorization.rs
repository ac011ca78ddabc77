//! Walks through launching an authorization-code + PKCE session against a Microsoft Entra
//! tenant and keeping it for the redirect handler to later exchange.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
// self
use oauth2_msgraph::{
	auth::{ScopeList, TenantId},
	client::GraphClient,
	oauth::ClientCredentials,
	provider::{EndpointResolver, GraphConfig, GraphProvider},
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = GraphConfig::builder().tenant(TenantId::organizations()).build();
	let provider = GraphProvider::new(config);
	let credentials = ClientCredentials::new(
		"demo-client",
		Url::parse("https://app.example.com/oauth/callback")?,
	)
	.with_client_secret("demo-secret");
	let client = GraphClient::new(provider, credentials);

	println!("Token endpoint: {}.", client.provider.token_url());

	let scope = ScopeList::new(["openid", "profile", "offline_access", "User.Read"])?;
	let session = client.start_authorization_with_scopes(scope)?;

	println!("Send your user to {}.", &session.authorize_url);
	println!(
		"PKCE challenge ({:?}): {}.",
		session.code_challenge_method(),
		session.code_challenge()
	);

	let mut sessions: HashMap<String, _> = HashMap::new();

	sessions.insert(session.state.clone(), session.clone());

	// Simulate the redirect handler looking up the stored session by `state`.
	let returned_state = session.state.clone();

	if let Some(stashed) = sessions.remove(&returned_state) {
		stashed.validate_state(&returned_state)?;
		println!("Validated state for scopes `{}`.", &stashed.scope);
		println!("Persist this session to call GraphClient::complete_authorization in the callback.");
	} else {
		eprintln!("State `{returned_state}` was not recognized.");
	}

	Ok(())
}
