//! Validation of the two halves of a composite key.
//!
//! Display names:
//! - Must be non-empty
//! - Must not contain the separator `|:|`
//! - Must not contain `/` (a name may never open a nested namespace)
//!
//! Identifiers follow the same rules. They are opaque otherwise: any other
//! character, including whitespace and unicode, is accepted.

use crate::error::{KeyError, KeyResult};
use crate::key::SEPARATOR;

/// Characters that are forbidden anywhere in a name or identifier.
const FORBIDDEN_CHARS: &[char] = &['/'];

/// Validate a display name, returning `Ok(())` if it can be encoded.
///
/// # Examples
///
/// ```
/// use sv_keys::names::validate_display_name;
///
/// assert!(validate_display_name("Aragorn").is_ok());
/// assert!(validate_display_name("Bilbo Baggins (lvl 3)").is_ok());
/// assert!(validate_display_name("").is_err());
/// assert!(validate_display_name("bad|:|name").is_err());
/// ```
pub fn validate_display_name(name: &str) -> KeyResult<()> {
    if name.is_empty() {
        return Err(KeyError::InvalidName {
            name: name.to_string(),
            reason: "display name must not be empty".into(),
        });
    }

    if name.contains(SEPARATOR) {
        return Err(KeyError::InvalidName {
            name: name.to_string(),
            reason: format!("must not contain the separator {SEPARATOR:?}"),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(KeyError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    Ok(())
}

/// Validate a caller-assigned identifier.
pub fn validate_identifier(id: &str) -> KeyResult<()> {
    if id.is_empty() {
        return Err(KeyError::InvalidIdentifier {
            id: id.to_string(),
            reason: "identifier must not be empty".into(),
        });
    }

    if id.contains(SEPARATOR) {
        return Err(KeyError::InvalidIdentifier {
            id: id.to_string(),
            reason: format!("must not contain the separator {SEPARATOR:?}"),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if id.contains(*ch) {
            return Err(KeyError::InvalidIdentifier {
                id: id.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    Ok(())
}
