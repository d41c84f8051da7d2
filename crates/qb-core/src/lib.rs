//! # qb-core
//!
//! Core types and error types for qbank.
//!
//! This crate provides the foundational types shared across all qbank crates:
//! - Entity structs for the backend rows (users, subjects, questions)
//! - The nested join projections returned by the content query
//! - Layout and notification enums used by the page
//! - The lightweight session identity passed from the auth provider
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
