use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The profile returned by the identity provider's userinfo endpoint.
///
/// The payload is kept exactly as received; the accessors only read the
/// standard OIDC claims out of it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    pub fn new(claims: Map<String, Value>) -> Self {
        UserProfile(claims)
    }

    /// Parses a stored/serialized profile. Anything but a JSON object is rejected.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(UserProfile(map)),
            Ok(other) => Err(format!("expected a JSON object, got {}", kind(&other))),
            Err(e) => Err(format!("invalid JSON: {}", e)),
        }
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn subject(&self) -> Option<&str> {
        self.claim("sub")
    }

    pub fn name(&self) -> Option<&str> {
        self.claim("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.claim("email")
    }

    pub fn picture(&self) -> Option<&str> {
        self.claim("picture")
    }

    /// Any string-valued claim.
    pub fn claim(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Best label for display: name, then email, then subject.
    pub fn display_name(&self) -> &str {
        self.name()
            .or_else(|| self.email())
            .or_else(|| self.subject())
            .unwrap_or("unknown user")
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
