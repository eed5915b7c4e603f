pub mod blob_store;
pub mod image_service;
pub mod password_service;
pub mod validation_service;
