//! The composite key wire format.
//!
//! A stored object is addressed by `"<prefix><display name>|:|<identifier>.json"`.
//! [`KeyCodec`] is the only place that builds or parses that string; every
//! other crate handles [`CompositeKey`] values.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{KeyError, KeyResult};
use crate::names::{validate_display_name, validate_identifier};

/// Token separating the display name from the identifier.
pub const SEPARATOR: &str = "|:|";

/// Suffix appended to every encoded key.
pub const KEY_SUFFIX: &str = ".json";

/// Namespace used when none is configured.
pub const DEFAULT_PREFIX: &str = "character-sheets/";

/// A decoded composite key.
///
/// Holds the exact key string as stored alongside its two halves. A key read
/// back from the store may differ from a freshly encoded one (for example a
/// legacy key without the `.json` suffix), so store operations always use
/// [`CompositeKey::as_str`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    raw: String,
    name: String,
    id: String,
}

impl CompositeKey {
    /// The full store key.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The human-readable display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Consume the key, returning the full store key.
    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for CompositeKey {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl Serialize for CompositeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Encoder/decoder for composite keys under one namespace prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCodec {
    prefix: String,
}

impl KeyCodec {
    /// Create a codec for `prefix`.
    ///
    /// A non-empty prefix without a trailing `/` gets one appended.
    pub fn new(prefix: impl Into<String>) -> KeyResult<Self> {
        let mut prefix = prefix.into();
        if prefix.contains(SEPARATOR) {
            return Err(KeyError::InvalidPrefix {
                prefix,
                reason: format!("must not contain the separator {SEPARATOR:?}"),
            });
        }
        if prefix.starts_with('/') {
            return Err(KeyError::InvalidPrefix {
                prefix,
                reason: "must not start with '/'".into(),
            });
        }
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Ok(Self { prefix })
    }

    /// The namespace prefix, always empty or ending in `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Encode `(name, id)` into a composite key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sv_keys::KeyCodec;
    ///
    /// let codec = KeyCodec::default();
    /// let key = codec.encode("Alice", "id1").unwrap();
    /// assert_eq!(key.as_str(), "character-sheets/Alice|:|id1.json");
    /// assert_eq!(codec.decode(key.as_str()).unwrap(), key);
    /// ```
    pub fn encode(&self, name: &str, id: &str) -> KeyResult<CompositeKey> {
        validate_display_name(name)?;
        validate_identifier(id)?;

        let body = format!("{name}{SEPARATOR}{id}");
        // A name ending in a partial separator ("x|", "x|:") can shift where
        // the first separator is found.
        if body.find(SEPARATOR) != Some(name.len()) {
            return Err(KeyError::InvalidName {
                name: name.to_string(),
                reason: "ends with a fragment of the separator that makes the key ambiguous"
                    .into(),
            });
        }

        Ok(CompositeKey {
            raw: format!("{}{body}{KEY_SUFFIX}", self.prefix),
            name: name.to_string(),
            id: id.to_string(),
        })
    }

    /// Decode a stored key.
    ///
    /// The key must live directly under the prefix, and the part after it
    /// (minus an optional `.json` suffix) must contain exactly one separator.
    /// The identifier must be non-empty. The display name may come back
    /// empty; callers decide whether that is acceptable.
    pub fn decode(&self, key: &str) -> KeyResult<CompositeKey> {
        let malformed = |reason: &str| KeyError::MalformedKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        let rest = key
            .strip_prefix(self.prefix.as_str())
            .ok_or_else(|| malformed("not under the namespace prefix"))?;
        if rest.contains('/') {
            return Err(malformed("nested below the namespace prefix"));
        }
        let rest = rest.strip_suffix(KEY_SUFFIX).unwrap_or(rest);

        match rest.matches(SEPARATOR).count() {
            0 => return Err(malformed("no separator")),
            1 => {}
            _ => return Err(malformed("more than one separator")),
        }
        let (name, id) = rest
            .split_once(SEPARATOR)
            .ok_or_else(|| malformed("no separator"))?;
        if id.is_empty() {
            return Err(malformed("empty identifier"));
        }

        Ok(CompositeKey {
            raw: key.to_string(),
            name: name.to_string(),
            id: id.to_string(),
        })
    }

    /// Turn a load query into a full key prefix.
    ///
    /// Strips a trailing `.json` and qualifies bare names with the namespace
    /// prefix, so `"Alice"`, `"character-sheets/Alice"` and
    /// `"character-sheets/Alice|:|id1.json"` all become prefixes of the stored
    /// key for Alice.
    pub fn normalize_query(&self, query: &str) -> String {
        let query = query.strip_suffix(KEY_SUFFIX).unwrap_or(query);
        if query.starts_with(self.prefix.as_str()) {
            query.to_string()
        } else {
            format!("{}{query}", self.prefix)
        }
    }
}

impl Default for KeyCodec {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}
