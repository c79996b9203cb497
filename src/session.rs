#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::{
    error::{ClientError, Result},
    models::User,
};

/// Header carrying the project's anonymous key.
pub const API_KEY_HEADER: &str = "apikey";
/// Header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// The credential used for outgoing requests and who it belongs to.
///
/// Seeded with the anonymous key; replaced once per successful
/// authentication; never refreshed or invalidated. There is no interior
/// locking: mutation needs `&mut`, so sharing one session across tasks
/// requires the caller's own synchronization.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Project anonymous key, always sent as `apikey`.
    anon_key:     String,
    /// Current bearer credential.
    access_token: Option<String>,
    /// Authenticated user, once known.
    identity:     Option<User>,
}

impl SessionState {
    /// Starts an anonymous session. An empty key yields no credential.
    pub fn new(anon_key: impl Into<String>) -> Self {
        let anon_key = anon_key.into();
        let access_token = if anon_key.trim().is_empty() {
            None
        } else {
            Some(anon_key.clone())
        };

        Self {
            anon_key,
            access_token,
            identity: None,
        }
    }

    /// The anonymous key.
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// The bearer credential currently in use.
    pub fn current_credential(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The authenticated user, if authentication has happened.
    pub fn current_identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    /// Whether a user (not just the anonymous key) is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Records a successful authentication.
    pub fn on_authenticated(&mut self, credential: impl Into<String>, identity: User) {
        self.access_token = Some(credential.into());
        self.identity = Some(identity);
    }

    /// Headers every request carries.
    pub fn auth_headers(&self) -> Result<Vec<(String, String)>> {
        let token = self
            .current_credential()
            .ok_or(ClientError::NotAuthenticated)?;

        Ok(vec![
            (API_KEY_HEADER.to_string(), self.anon_key.clone()),
            (AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}")),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        serde_json::from_value(serde_json::json!({ "id": id, "email": "t@x.y" }))
            .expect("user fixture")
    }

    #[test]
    fn starts_with_the_anonymous_key() {
        let session = SessionState::new("anon");
        assert_eq!(session.current_credential(), Some("anon"));
        assert!(session.current_identity().is_none());
        assert_eq!(
            session.auth_headers().expect("headers"),
            vec![
                ("apikey".to_string(), "anon".to_string()),
                ("Authorization".to_string(), "Bearer anon".to_string())
            ]
        );
    }

    #[test]
    fn authentication_replaces_bearer_but_not_apikey() {
        let mut session = SessionState::new("anon");
        session.on_authenticated("jwt", user("u1"));

        assert!(session.is_authenticated());
        let headers = session.auth_headers().expect("headers");
        assert!(headers.contains(&("apikey".to_string(), "anon".to_string())));
        assert!(headers.contains(&("Authorization".to_string(), "Bearer jwt".to_string())));
    }

    #[test]
    fn empty_key_is_unauthenticated() {
        let session = SessionState::new("");
        assert!(session.current_credential().is_none());
        assert!(matches!(session.auth_headers(), Err(ClientError::NotAuthenticated)));
    }
}
