//! Domain model for the movie diary.
//!
//! # Responsibility
//! - Define plain data structures shared by repositories and services.
//! - Own value-level invariants (rating range, wishlist rating reset,
//!   preference CSV normalization).
//!
//! # Invariants
//! - Users and movies are identified by SQLite integer row ids.
//! - Credentials never travel inside [`user::User`].

pub mod diary;
pub mod movie;
pub mod preferences;
pub mod user;
