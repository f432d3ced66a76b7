//! # parlor-entity
//!
//! Domain entity models for Parlor. Database rows derive `sqlx::FromRow`;
//! the remaining types describe writes against those rows.

pub mod user;
