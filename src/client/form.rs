//! Create-user form

use super::api::{ClientError, CreateUserRequest};
use super::page::UserPage;
use crate::domain::User;

/// Form values for a new user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub email: String,
    pub name: String,
}

impl UserForm {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Request body; a blank name is left out
    pub fn to_request(&self) -> CreateUserRequest {
        let name = self.name.trim();

        CreateUserRequest {
            email: self.email.clone(),
            name: (!name.is_empty()).then(|| self.name.clone()),
        }
    }

    /// Submit through the page. The fields are cleared on success and kept
    /// on failure.
    pub async fn submit(&mut self, page: &UserPage) -> Result<User, ClientError> {
        let user = page.create_user(&self.to_request()).await?;
        *self = Self::default();

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::page::tests::{page_for, user_json};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_blank_name_is_omitted() {
        let request = UserForm::new("a@b.com", "   ").to_request();
        assert_eq!(request.name, None);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({"email": "a@b.com"}));
    }

    #[test]
    fn test_name_is_sent() {
        let request = UserForm::new("a@b.com", "John Doe").to_request();
        assert_eq!(request.name.as_deref(), Some("John Doe"));
    }

    #[tokio::test]
    async fn test_submit_clears_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(json!({"email": "a@b.com", "name": "Al"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(user_json(1, "a@b.com", Some("Al"), 0)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([user_json(1, "a@b.com", Some("Al"), 0)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (page, _) = page_for(&server);
        let mut form = UserForm::new("a@b.com", "Al");

        let user = form.submit(&page).await.unwrap();

        assert_eq!(user.name(), Some("Al"));
        assert_eq!(form, UserForm::default());
        assert_eq!(page.users().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_keeps_values_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let (page, _) = page_for(&server);
        let mut form = UserForm::new("not-an-email", "");

        assert!(form.submit(&page).await.is_err());
        assert_eq!(form.email, "not-an-email");
    }
}
