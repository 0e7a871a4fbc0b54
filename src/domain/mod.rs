//! Domain layer - Core business logic and entities

pub mod error;
pub mod user;

pub use error::{DomainError, FieldViolation};
pub use user::{NewUser, Post, User, UserChanges, UserId, UserRepository};
