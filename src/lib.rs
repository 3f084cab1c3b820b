//! Weighted-length validation and URL-preserving truncation for posts
//! bound for a 280-weight social network.
pub mod config;
pub mod text;
