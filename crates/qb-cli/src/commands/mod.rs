pub mod auth;
pub mod browse;
pub mod dispatch;
pub mod questions;
