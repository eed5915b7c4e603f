//! SeaORM entities backing the registration tables

pub mod photos;
pub mod users;
