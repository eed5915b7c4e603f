use crate::domain::{error::DomainError, models::image::DecodedImage};

/// Turns an inline image payload into a temp file ready for storage
pub trait ImageDecoder: Clone {
    /// Fails with `DomainError::Decode` when the payload is not valid base64
    fn decode(&self, payload: &str) -> Result<DecodedImage, DomainError>;
}
