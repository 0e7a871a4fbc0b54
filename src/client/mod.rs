//! Client side of the sample: a user list page driven against the backend
//! over HTTP, plus the health indicator polling.

pub mod api;
pub mod form;
pub mod health;
pub mod page;

pub use api::{BackendClient, ClientError, CreateUserRequest, HttpBackendClient};
pub use form::UserForm;
pub use health::{HealthFailure, HealthIndicator, HealthMonitor};
pub use page::{DeleteOutcome, Notifier, StderrNotifier, UserPage};
