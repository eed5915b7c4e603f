use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    config::RegistrationSettings,
    domain::{
        error::{DomainError, RepositoryError},
        models::{
            credential::RawPassword,
            photo::Photo,
            user::{User, UserCandidate},
        },
        repositories::user_registration_repository::UserRegistrationRepository,
        services::{
            blob_store::BlobStore,
            image_service::ImageDecoder,
            password_service::PasswordHasher,
            validation_service::{EMAIL_TAKEN, UserValidator},
        },
    },
};

pub const AVATAR_DIRECTORY: &str = "avatars";
pub const PHOTO_DIRECTORY: &str = "photos";
pub const REGISTERED_MESSAGE: &str = "User registered successfully";

/// Fields submitted by a client that wants an account
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// base64 image, `None` or empty for the default avatar
    pub avatar: Option<String>,
    /// base64 images
    pub photos: Vec<String>,
}

#[derive(Debug)]
pub enum RegistrationOutcome {
    Registered { user: User, message: String },
    Rejected { errors: Vec<String> },
}

impl RegistrationOutcome {
    fn rejected(errors: Vec<String>) -> Self {
        Self::Rejected { errors }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

pub struct RegisterUserUsecase<R: UserRegistrationRepository, P: PasswordHasher, D: ImageDecoder> {
    registration_repository: R,
    password_hasher: P,
    image_decoder: D,
    blob_store: Arc<dyn BlobStore>,
    validator: UserValidator,
    default_avatar: String,
}

impl<R: UserRegistrationRepository, P: PasswordHasher, D: ImageDecoder> RegisterUserUsecase<R, P, D> {
    pub fn new(
        registration_repository: R,
        password_hasher: P,
        image_decoder: D,
        blob_store: Arc<dyn BlobStore>,
        settings: &RegistrationSettings,
    ) -> Self {
        Self {
            registration_repository,
            password_hasher,
            image_decoder,
            blob_store,
            validator: UserValidator::new(settings.min_photo_count),
            default_avatar: settings.default_avatar.clone(),
        }
    }

    /// Decode an inline image and hand it to the blob store.
    ///
    /// Returns the original file name and the stored reference. The temp
    /// file is released when this returns, whatever the result.
    async fn store_image(&self, payload: &str, directory: &str) -> Result<(String, String), DomainError>
    where
        D: Send + Sync,
    {
        let image = self.image_decoder.decode(payload)?;
        let reference = self.blob_store.store(&image, directory).await?;
        Ok((image.original_name().to_string(), reference))
    }

    pub async fn register_user(&self, input: RegistrationInput) -> Result<RegistrationOutcome, DomainError>
    where
        R: Send + Sync,
        P: Send + Sync,
        D: Send + Sync,
    {
        let RegistrationInput {
            first_name,
            last_name,
            email,
            password,
            avatar,
            photos,
        } = input;

        let mut candidate = UserCandidate::new(
            first_name,
            last_name,
            email,
            RawPassword::new(password),
            &self.default_avatar,
        );

        // Nothing is uploaded for a submission the photo rule already rejects
        if self.validator.check_photo_count(photos.len()).is_none() {
            if let Some(avatar) = avatar.filter(|payload| !payload.trim().is_empty()) {
                let (_, reference) = self.store_image(&avatar, AVATAR_DIRECTORY).await?;
                candidate.attach_avatar(reference);
            }

            for payload in &photos {
                let (name, url) = self.store_image(payload, PHOTO_DIRECTORY).await?;
                candidate.add_photo(Photo::new(name, url));
            }
        } else {
            debug!(
                "Skipping media upload: {} photos submitted, {} required",
                photos.len(),
                self.validator.min_photo_count()
            );
        }

        let validation = self
            .validator
            .validate(&candidate, &self.registration_repository)
            .await?;
        if !validation.success() {
            info!(
                "Registration rejected with {} validation errors",
                validation.errors().len()
            );
            return Ok(RegistrationOutcome::rejected(validation.into_errors()));
        }

        // Hash the submitted password once, right before it is persisted
        let password_hash = self.password_hasher.hash(candidate.password().expose())?;
        let new_user = candidate.into_new_user(password_hash);

        match self
            .registration_repository
            .register_user_with_photos(new_user)
            .await
        {
            Ok(user) => {
                info!("Registered user {} with {} photos", user.id(), user.photos().len());
                Ok(RegistrationOutcome::Registered {
                    user,
                    message: REGISTERED_MESSAGE.to_string(),
                })
            }
            Err(RepositoryError::DuplicateEmail(_)) => {
                info!("Registration rejected at commit: email already registered");
                Ok(RegistrationOutcome::rejected(vec![EMAIL_TAKEN.to_string()]))
            }
            Err(e) => Err(e.into()),
        }
    }
}
