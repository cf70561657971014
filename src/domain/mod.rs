/// Domain module containing core business logic and data types
///
/// This module defines the core entities (DiaryEntry, Analysis, Settings) and
/// their validation rules. These types represent the fundamental concepts in
/// our journaling system.

pub mod analysis;
pub mod entry;
pub mod settings;
pub mod types;

// Re-export public types for easy access
pub use analysis::*;
pub use entry::*;
pub use settings::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Diary content cannot be empty")]
    EmptyContent,

    #[error("Too many images: {count} attached, at most {max} allowed")]
    TooManyImages { count: usize, max: usize },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    #[error("Unknown {kind} '{value}'")]
    UnknownTag { kind: &'static str, value: String },
}
