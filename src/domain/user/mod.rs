//! User domain
//!
//! Domain types for the user resource: the entity and its posts, payload
//! validation, and the entity store trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, Post, User, UserChanges, UserId};
pub use repository::UserRepository;
pub use validation::{validate_create_payload, validate_email, validate_update_payload};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
