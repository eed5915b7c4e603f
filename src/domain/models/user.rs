use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{
    credential::{HashedPassword, RawPassword},
    photo::{Photo, PhotoRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(Uuid);
impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Joins first and last name the way the full name is displayed.
fn full_name_of(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

/// A user under registration, before validation has accepted it.
///
/// Carries the plaintext password so the strength rules can see it.
/// The avatar always holds a usable reference: the default until a
/// stored avatar replaces it.
#[derive(Debug, Clone)]
pub struct UserCandidate {
    first_name: String,
    last_name: String,
    full_name: String,
    email: String,
    password: RawPassword,
    avatar: String,
    photos: Vec<Photo>,
}

impl UserCandidate {
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password: RawPassword,
        default_avatar: &str,
    ) -> Self {
        let full_name = full_name_of(&first_name, &last_name);
        Self {
            first_name,
            last_name,
            full_name,
            email,
            password,
            avatar: default_avatar.to_string(),
            photos: Vec::new(),
        }
    }

    /// Replace the default avatar with a stored one. Empty references are ignored.
    pub fn attach_avatar(&mut self, reference: String) {
        if !reference.is_empty() {
            self.avatar = reference;
        }
    }

    pub fn add_photo(&mut self, photo: Photo) {
        self.photos.push(photo);
    }

    /// Seal the candidate with its credential. The plaintext is dropped here.
    pub fn into_new_user(self, password_hash: HashedPassword) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            email: self.email,
            password_hash,
            avatar: self.avatar,
            active: false,
            photos: self.photos,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn password(&self) -> &RawPassword {
        &self.password
    }
    pub fn avatar(&self) -> &str {
        &self.avatar
    }
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }
}

/// A validated user with its photos, ready to be committed as one unit.
#[derive(Debug, Clone)]
pub struct NewUser {
    first_name: String,
    last_name: String,
    full_name: String,
    email: String,
    password_hash: HashedPassword,
    avatar: String,
    active: bool,
    photos: Vec<Photo>,
}

impl NewUser {
    /// Turn into the committed user once the store has assigned identities.
    ///
    /// `photo_ids` pairs up with `photos()` in order.
    pub fn into_user(
        self,
        id: UserId,
        created_at: DateTime<Utc>,
        photo_ids: impl IntoIterator<Item = Uuid>,
    ) -> User {
        let photos = self
            .photos
            .into_iter()
            .zip(photo_ids)
            .map(|(photo, photo_id)| {
                PhotoRecord::reconstruct(
                    photo_id,
                    id,
                    photo.name().to_string(),
                    photo.url().to_string(),
                )
            })
            .collect();

        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            email: self.email,
            password_hash: self.password_hash,
            avatar: self.avatar,
            active: self.active,
            created_at,
            photos,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn avatar(&self) -> &str {
        &self.avatar
    }
    pub fn active(&self) -> bool {
        self.active
    }
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }
}

#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    full_name: String,
    email: String,
    password_hash: HashedPassword,
    avatar: String,
    active: bool,
    created_at: DateTime<Utc>,
    photos: Vec<PhotoRecord>,
}

impl User {
    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn avatar(&self) -> &str {
        &self.avatar
    }
    pub fn active(&self) -> bool {
        self.active
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }
}
