use serde::{Deserialize, Serialize};

/// Body of a password-grant token request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationRequest {
    /// Account email.
    pub email:    String,
    /// Account password.
    pub password: String,
}

/// An authenticated user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Auth-side identifier (matches `Profile::auth_id`).
    pub id:                 String,
    /// Audience.
    #[serde(default)]
    pub aud:                Option<String>,
    /// Role.
    #[serde(default)]
    pub role:               Option<String>,
    /// Email address.
    #[serde(default)]
    pub email:              Option<String>,
    /// When the email was confirmed.
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    /// When the account was confirmed.
    #[serde(default)]
    pub confirmed_at:       Option<String>,
    /// Last sign-in time.
    #[serde(default)]
    pub last_sign_in_at:    Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at:         Option<String>,
    /// Last update time.
    #[serde(default)]
    pub updated_at:         Option<String>,
}

/// Successful response of a token request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    /// Bearer token for subsequent requests.
    pub access_token:  String,
    /// Token type, normally `bearer`.
    #[serde(default)]
    pub token_type:    String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in:    u64,
    /// Refresh token. Unused: sessions are never refreshed.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// The authenticated user.
    pub user:          User,
}

/// Body of an invite-teacher call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteTeacherRequest {
    /// Email of the teacher sending the invitation.
    pub current_email: String,
    /// Email to invite.
    pub email:         String,
}
