pub mod classifier;
pub mod preview_service;
pub mod upload_session;
