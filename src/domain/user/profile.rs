//! Persisted shape of the `profiles` table.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserId, ValidationError};

/// One row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: UserId,
    pub username: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
}

/// Changes a user may make to their own profile.
///
/// `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// Trims fields and rejects a blank username.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let username = match self.username {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(ValidationError::empty_field("username"));
                }
                Some(name)
            }
            None => None,
        };
        let avatar_url = self
            .avatar_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            username,
            avatar_url,
        })
    }

    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.avatar_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_username() {
        let update = ProfileUpdate {
            username: Some("  sara ".to_string()),
            avatar_url: None,
        };
        assert_eq!(update.normalized().unwrap().username.as_deref(), Some("sara"));
    }

    #[test]
    fn normalized_rejects_blank_username() {
        let update = ProfileUpdate {
            username: Some("   ".to_string()),
            avatar_url: None,
        };
        assert!(update.normalized().is_err());
    }

    #[test]
    fn blank_avatar_is_dropped() {
        let update = ProfileUpdate {
            username: None,
            avatar_url: Some(" ".to_string()),
        }
        .normalized()
        .unwrap();
        assert!(update.is_empty());
    }
}
