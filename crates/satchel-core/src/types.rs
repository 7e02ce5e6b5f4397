use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SatchelError;

/// Identity of a backup recipient: a `+` followed by one or more digits.
///
/// Every record name in the remote store starts with the owning
/// recipient's id, so the shape of this value is part of the wire
/// contract (see [`crate::namespace`]).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipientId(pub(crate) String);

impl RecipientId {
    /// Validate and wrap a raw id string.
    pub fn new(id: &str) -> Result<Self, SatchelError> {
        let digits = id
            .strip_prefix('+')
            .ok_or_else(|| SatchelError::InvalidRecipientId(id.to_string()))?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(SatchelError::InvalidRecipientId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecipientId({})", self.0)
    }
}

impl std::str::FromStr for RecipientId {
    type Err = SatchelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_recipient_ids_parse() {
        assert_eq!(
            "+15551234567".parse::<RecipientId>().unwrap().as_str(),
            "+15551234567"
        );
        assert!("+1".parse::<RecipientId>().is_ok());
    }

    #[test]
    fn invalid_recipient_ids_rejected() {
        assert!("15551234567".parse::<RecipientId>().is_err());
        assert!("+".parse::<RecipientId>().is_err());
        assert!("+abc".parse::<RecipientId>().is_err());
        assert!("+555x".parse::<RecipientId>().is_err());
        assert!("".parse::<RecipientId>().is_err());
    }
}
