//! View models returned by services and rendered by templates.

pub mod blog;
