//! Study group module.
//!
//! Groups are owned elsewhere; exam flows only read them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GroupId, UserId};

/// A study group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub creator_id: UserId,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>, creator_id: UserId) -> Self {
        Self {
            id,
            name: name.into(),
            creator_id,
        }
    }
}
