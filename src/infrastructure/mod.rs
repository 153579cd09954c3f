pub mod auth;
pub mod cache;
pub mod observability;
pub mod persistence;
pub mod storage;
pub mod transcoding;
