//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs (register,
//!   login, profile edit, browsing, diary marking).
//! - Own input validation and user-facing error semantics.
//! - Keep the CLI (or any other front end) decoupled from storage details.

pub mod account_service;
pub mod catalog_service;
pub mod diary_service;
