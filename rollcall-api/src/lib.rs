//! # Rollcall API Server Library
//!
//! HTTP surface for the school administration service: login, teacher and
//! student provisioning, student profile workflow, and role-scoped
//! dashboards. All domain rules live in `rollcall-shared`; this crate maps
//! them onto routes and status codes.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session resolution and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
