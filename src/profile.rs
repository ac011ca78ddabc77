//! Read-only view over the Graph `/me` payload.

// self
use crate::_prelude::*;

/// Resource owner returned by the Graph `/me` endpoint.
///
/// The view keeps the raw payload untouched (key order included) so fields without a named
/// accessor stay reachable through [`GraphUser::property`] and [`GraphUser::to_payload`].
///
/// Named accessors only return strings: a key holding any other JSON type reads as `None`
/// there while [`GraphUser::property`] still returns the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphUser(Map<String, Value>);
impl GraphUser {
	/// Key holding the stable object identifier.
	pub const ID_KEY: &'static str = "id";

	/// Wraps a raw payload.
	pub fn new(payload: Map<String, Value>) -> Self {
		Self(payload)
	}

	/// Returns the value stored under `key`, verbatim.
	pub fn property(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns the value stored under `key`, or `default` when the key is absent.
	pub fn property_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
		self.property(key).unwrap_or(default)
	}

	/// Object identifier (`id`).
	pub fn id(&self) -> Option<&str> {
		self.text(Self::ID_KEY)
	}

	/// Display name (`displayName`).
	pub fn display_name(&self) -> Option<&str> {
		self.text("displayName")
	}

	/// Given name (`givenName`).
	pub fn first_name(&self) -> Option<&str> {
		self.text("givenName")
	}

	/// Surname (`surname`).
	pub fn last_name(&self) -> Option<&str> {
		self.text("surname")
	}

	/// Primary SMTP address (`mail`).
	pub fn email(&self) -> Option<&str> {
		self.text("mail")
	}

	/// User principal name (`userPrincipalName`).
	pub fn principal_name(&self) -> Option<&str> {
		self.text("userPrincipalName")
	}

	/// The original payload.
	pub fn to_payload(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Consumes the view and returns the original payload.
	pub fn into_payload(self) -> Map<String, Value> {
		self.0
	}

	fn text(&self, key: &str) -> Option<&str> {
		self.property(key).and_then(Value::as_str)
	}
}
impl From<Map<String, Value>> for GraphUser {
	fn from(payload: Map<String, Value>) -> Self {
		Self::new(payload)
	}
}
impl From<GraphUser> for Map<String, Value> {
	fn from(user: GraphUser) -> Self {
		user.into_payload()
	}
}
