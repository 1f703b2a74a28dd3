use serde::{Deserialize, Serialize};
use sv_keys::DEFAULT_PREFIX;
use sv_store::DEFAULT_CONTENT_TYPE;

/// What a rename writes under the new key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenamePolicy {
    /// Write the body submitted with the rename request, then delete the old
    /// key.
    #[default]
    WriteSubmitted,
    /// Copy the previously stored object to the new key, then delete the old
    /// key. The submitted body is dropped; a follow-up save under the new
    /// name is needed to store it.
    CopyPrevious,
}

/// Configuration for a [`NamespaceManager`](crate::NamespaceManager).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Key prefix every sheet lives under.
    pub prefix: String,
    /// Payload handling for renames.
    pub rename_policy: RenamePolicy,
    /// Content type stored when a save does not name one.
    pub default_content_type: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            rename_policy: RenamePolicy::default(),
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = NamespaceConfig::default();
        assert_eq!(c.prefix, "character-sheets/");
        assert_eq!(c.rename_policy, RenamePolicy::WriteSubmitted);
        assert_eq!(c.default_content_type, "application/json");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: NamespaceConfig = toml::from_str("rename_policy = \"copy-previous\"").unwrap();
        assert_eq!(c.rename_policy, RenamePolicy::CopyPrevious);
        assert_eq!(c.prefix, "character-sheets/");
    }
}
