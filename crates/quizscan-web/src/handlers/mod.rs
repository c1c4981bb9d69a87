pub mod auth;
pub mod grade;
pub mod index;
pub mod questions;
pub mod upload;
