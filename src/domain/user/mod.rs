//! User module - the signed-in account as the UI sees it.
//!
//! A `User` is built from a `profiles` row after the session bootstrap
//! finds one, replaced on profile edits, and dropped on sign-out.

mod profile;
mod role;

pub use profile::{ProfileRecord, ProfileUpdate};
pub use role::UserRole;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GroupId, UserId};

const AVATAR_PLACEHOLDER_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub is_verified: bool,
    /// Not populated by the flows in this crate.
    pub joined_groups: Vec<GroupId>,
}

impl User {
    /// Builds a user from their profile row.
    ///
    /// An unrecognised role column degrades to a regular account.
    pub fn from_profile(record: ProfileRecord) -> Self {
        let role = record.role.parse().unwrap_or_else(|err| {
            tracing::warn!(user_id = %record.id, "Profile has unusable role: {}", err);
            UserRole::Regular
        });

        Self {
            id: record.id,
            username: record.username,
            role,
            avatar: record.avatar_url.filter(|url| !url.is_empty()),
            is_verified: record.is_verified,
            joined_groups: Vec::new(),
        }
    }

    /// Returns true for moderators.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Avatar URL, or a generated placeholder seeded by the username.
    pub fn avatar_or_default(&self) -> String {
        match &self.avatar {
            Some(url) => url.clone(),
            None => format!("{}{}", AVATAR_PLACEHOLDER_BASE, self.username),
        }
    }

    /// Applies an already-normalized profile update.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(username) = &update.username {
            self.username = username.clone();
        }
        if let Some(avatar) = &update.avatar_url {
            self.avatar = Some(avatar.clone());
        }
    }
}
