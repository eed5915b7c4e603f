use uuid::Uuid;

use crate::domain::models::user::UserId;

/// Photo attached to a user that has not been committed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    name: String,
    url: String,
}

impl Photo {
    pub fn new(name: String, url: String) -> Self {
        Self { name, url }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Photo as persisted, pointing back at its owner.
#[derive(Debug, Clone)]
pub struct PhotoRecord {
    id: Uuid,
    user_id: UserId,
    name: String,
    url: String,
}

impl PhotoRecord {
    pub fn reconstruct(id: Uuid, user_id: UserId, name: String, url: String) -> Self {
        Self {
            id,
            user_id,
            name,
            url,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn url(&self) -> &str {
        &self.url
    }
}
