//! Core library exports for the blog service.
//!
//! With only the `data` feature the crate exposes the domain types, Diesel
//! models and repositories over the `pushkind-common` connection pool. The
//! `server` feature adds forms, services, routes and middleware used by the
//! Actix-web application.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod identity;
#[cfg(feature = "server")]
pub mod media;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
