pub mod classify_types;
pub mod upload_types;
