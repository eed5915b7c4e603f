use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid base64 image: {0}")]
    Decode(String),

    #[error("Failed to hash password: {0}")]
    PasswordHashing(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Provider returned no object URL for key {0}")]
    MissingLocator(String),

    #[error("Invalid storage reference: {0}")]
    InvalidReference(String),

    #[error("Stored object not found: {0}")]
    NotFound(String),
}
