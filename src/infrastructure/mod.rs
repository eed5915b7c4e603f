pub mod argon2_password_hasher;
pub mod aws_s3_provider;
pub mod base64_image_decoder;
pub mod entity;
pub mod local_blob_store;
pub mod s3_blob_store;
pub mod user_registration_repository;
