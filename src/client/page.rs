//! User list page
//!
//! Holds the list, the loading flag and the set of rows with a delete in
//! flight. The page is cheap to clone; clones share the same state.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use super::api::{BackendClient, ClientError, CreateUserRequest};
use crate::domain::{User, UserId};

pub const LOADING_MESSAGE: &str = "Loading users...";
pub const EMPTY_MESSAGE: &str = "No users found. Add a user to get started.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete user";
pub const CONNECTION_FAILED_MESSAGE: &str = "Failed to connect to backend";

/// Blocking notification shown to the user
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes alerts to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        warn!(alert = %message, "Alert raised");
        eprintln!("{}", message);
    }
}

/// Result of a delete action on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// A delete for this row is still in flight; nothing was sent
    AlreadyDeleting,
    Failed,
}

#[derive(Debug)]
struct PageState {
    users: Vec<User>,
    loading: bool,
    mounted: bool,
    deleting: HashSet<UserId>,
}

#[derive(Clone)]
pub struct UserPage {
    client: Arc<dyn BackendClient>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<PageState>>,
}

impl UserPage {
    pub fn new(client: Arc<dyn BackendClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            state: Arc::new(Mutex::new(PageState {
                users: Vec::new(),
                loading: true,
                mounted: false,
                deleting: HashSet::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        // State is plain data, so a poisoned lock is still consistent
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Initial fetch; later calls are no-ops
    pub async fn mount(&self) {
        {
            let mut state = self.state();
            if state.mounted {
                return;
            }
            state.mounted = true;
        }

        self.fetch_users().await;
    }

    /// Replace the list with the backend's; a failure keeps the current list
    async fn fetch_users(&self) {
        let result = self.client.list_users().await;

        let mut state = self.state();
        match result {
            Ok(users) => state.users = users,
            Err(e) => error!(error = %e, "Error fetching users"),
        }
        state.loading = false;
    }

    /// Create a user, then refetch the whole list
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ClientError> {
        let user = self.client.create_user(request).await?;
        info!(user_id = %user.id(), "User created");

        self.fetch_users().await;
        Ok(user)
    }

    /// Delete a row
    ///
    /// While a delete for `id` is in flight further deletes for it are
    /// rejected. On failure the row stays and an alert is raised.
    pub async fn delete_user(&self, id: UserId) -> DeleteOutcome {
        if !self.state().deleting.insert(id) {
            return DeleteOutcome::AlreadyDeleting;
        }

        let result = self.client.delete_user(id).await;
        self.state().deleting.remove(&id);

        match result {
            Ok(()) => {
                info!(user_id = %id, "User deleted");
                self.fetch_users().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(user_id = %id, error = %e, "Error deleting user");

                let message = match e {
                    ClientError::Status(_) => DELETE_FAILED_MESSAGE,
                    ClientError::Network(_) | ClientError::Decode(_) => CONNECTION_FAILED_MESSAGE,
                };
                self.notifier.alert(message);

                DeleteOutcome::Failed
            }
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.state().users.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn is_deleting(&self, id: UserId) -> bool {
        self.state().deleting.contains(&id)
    }

    /// Text rendering of the list
    pub fn render(&self) -> String {
        let state = self.state();

        if state.loading {
            return LOADING_MESSAGE.to_string();
        }

        if state.users.is_empty() {
            return EMPTY_MESSAGE.to_string();
        }

        let mut out = String::new();
        for user in &state.users {
            let action = if state.deleting.contains(&user.id()) {
                "Deleting..."
            } else {
                "Delete"
            };

            let _ = writeln!(out, "#{} {}", user.id(), user.display_name());
            let _ = writeln!(out, "    {}", user.email());
            let _ = writeln!(
                out,
                "    Created: {}",
                user.created_at().format("%Y-%m-%d %H:%M:%S UTC")
            );
            let _ = writeln!(out, "    Posts: {}", user.posts().len());
            let _ = writeln!(out, "    [{}]", action);
        }

        out
    }
}
