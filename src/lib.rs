//! The `cardstack` library crate.
//!
//! Cardstack is a multi-tenant task-card management API: users register,
//! authenticate with a bearer JWT, and perform CRUD plus filtered/sorted
//! search over card records they own. Admins may access every card.
//!
//! This crate contains the domain models, authentication mechanisms, the
//! card service with its search query builder, routing configuration, and
//! error handling. The main binary (`main.rs`) uses it to construct and run
//! the application.

pub mod auth;
pub mod cards;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
