//! Player identity records.

use derive_getters::Getters;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;
use uuid::Uuid;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,16}$").expect("Valid username regex"));

/// Namespace for identities derived from a name alone (offline mode).
const OFFLINE_NAMESPACE: Uuid = Uuid::from_u128(0x4f66_666c_696e_6550_6c61_7965_723a_0000);

/// Whether `name` is a well-formed player username.
///
/// # Examples
///
/// ```
/// use emmy_core::is_valid_username;
///
/// assert!(is_valid_username("Player_A"));
/// assert!(!is_valid_username("way_too_long_username"));
/// assert!(!is_valid_username("bad name"));
/// ```
pub fn is_valid_username(name: &str) -> bool {
    USERNAME_PATTERN.is_match(name)
}

/// A player handle that compares and hashes without regard to ASCII case.
///
/// The spelling first typed is kept for display and handed to resolvers.
///
/// # Examples
///
/// ```
/// use emmy_core::PlayerName;
///
/// assert_eq!(PlayerName::from("Steve"), PlayerName::from("steve"));
/// assert_eq!(PlayerName::from("Steve").as_str(), "Steve");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// Wrap `name` as typed.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as typed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the name as typed.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl PartialEq for PlayerName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for PlayerName {}

impl Hash for PlayerName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl From<&str> for PlayerName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PlayerName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Signed property attached to a profile, such as skin textures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ProfileProperty {
    /// Property name (e.g. `textures`)
    name: String,
    /// Base64 property payload
    value: String,
    /// Optional signature over the payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

impl ProfileProperty {
    /// Create a property.
    pub fn new(name: impl Into<String>, value: impl Into<String>, signature: Option<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            signature,
        }
    }
}

/// Resolved identity for a player handle.
///
/// Deserializes from the session server profile shape, where `id` is a UUID without
/// hyphens.
///
/// # Examples
///
/// ```
/// use emmy_core::GameProfile;
///
/// let json = r#"{
///     "id": "069a79f444e94726a5befca90e38aaf5",
///     "name": "Notch",
///     "properties": [{ "name": "textures", "value": "e30=" }]
/// }"#;
/// let profile: GameProfile = serde_json::from_str(json).unwrap();
/// assert_eq!(profile.name(), "Notch");
/// assert_eq!(profile.textures().map(|p| p.value().as_str()), Some("e30="));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct GameProfile {
    /// Stable unique id
    id: Uuid,
    /// Current display name
    name: String,
    /// Signed properties
    #[serde(default)]
    properties: Vec<ProfileProperty>,
}

impl GameProfile {
    /// Create a profile without properties.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Profile whose id is derived deterministically from the name.
    ///
    /// Used where no authentication service is available.
    pub fn offline(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = Uuid::new_v3(&OFFLINE_NAMESPACE, name.to_lowercase().as_bytes());
        Self::new(id, name)
    }

    /// Add a property.
    pub fn with_property(mut self, property: ProfileProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// First property with the given name.
    pub fn property(&self, name: &str) -> Option<&ProfileProperty> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Skin and cape textures, if present.
    pub fn textures(&self) -> Option<&ProfileProperty> {
        self.property("textures")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_id_is_stable_and_case_insensitive() {
        let a = GameProfile::offline("PlayerA");
        let b = GameProfile::offline("playera");
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), GameProfile::offline("PlayerB").id());
        assert_eq!(a.name(), "PlayerA");
    }

    #[test]
    fn test_player_name_ignores_case() {
        use std::collections::HashSet;

        let names: HashSet<PlayerName> = ["Steve", "steve", "STEVE", "Alex"]
            .into_iter()
            .map(PlayerName::from)
            .collect();
        assert_eq!(names.len(), 2);
        assert_eq!(PlayerName::from("Steve").to_string(), "Steve");
        assert_ne!(PlayerName::from("Steve"), PlayerName::from("Steve_"));
    }

    #[test]
    fn test_property_lookup() {
        let profile = GameProfile::offline("Steve")
            .with_property(ProfileProperty::new("textures", "abc", Some("sig".to_string())));
        assert_eq!(profile.textures().and_then(|p| p.signature().clone()), Some("sig".to_string()));
        assert!(profile.property("cape").is_none());
    }

    #[test]
    fn test_serializes_without_missing_signature() {
        let profile = GameProfile::offline("Alex").with_property(ProfileProperty::new("textures", "xyz", None));
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["properties"][0].get("signature").is_none());
    }
}
