//! Domain entities and the pure rules that operate on them.

pub mod auth;
pub mod authorization;
pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod types;
pub mod user;
pub mod visibility;
