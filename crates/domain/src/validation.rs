//! Input checks shared by the services.

use crate::error::{DomainError, Result};
use crate::settings::OperationalSettings;

/// Rejects empty or whitespace-only text, returning it trimmed.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Party sizes run from 1 up to the configured maximum.
pub(crate) fn require_party_size(party_size: u32, settings: &OperationalSettings) -> Result<u32> {
    if party_size == 0 {
        return Err(DomainError::InvalidInput(
            "party size must be at least 1".to_string(),
        ));
    }
    if party_size > settings.max_party_size {
        return Err(DomainError::InvalidInput(format!(
            "party size {party_size} exceeds the maximum of {}",
            settings.max_party_size
        )));
    }
    Ok(party_size)
}

/// Blank optional text collapses to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("name", "  Ada ").unwrap(), "Ada");
        assert!(matches!(
            require_text("name", "   "),
            Err(DomainError::InvalidInput(msg)) if msg == "name is required"
        ));
    }

    #[test]
    fn party_size_bounds() {
        let settings = OperationalSettings { max_party_size: 8 };
        assert!(require_party_size(0, &settings).is_err());
        assert_eq!(require_party_size(1, &settings).unwrap(), 1);
        assert_eq!(require_party_size(8, &settings).unwrap(), 8);
        assert!(require_party_size(9, &settings).is_err());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" window ".to_string())), Some("window".to_string()));
        assert_eq!(optional_text(None), None);
    }
}
