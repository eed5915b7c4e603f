pub mod credential;
pub mod image;
pub mod photo;
pub mod user;
pub mod validation;
