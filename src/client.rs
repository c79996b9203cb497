#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use serde::Serialize;

use crate::{
    aggregate,
    config::ClientConfig,
    error::{ClientError, Result},
    models::{
        Assignment, AuthenticationRequest, AuthenticationResponse, AutograderClass, Enrollment,
        InviteTeacherRequest, Profile, StoredObject, Submission, SubmissionVersion,
    },
    query::FilterQueryBuilder,
    rest::RelationalClient,
    select::Select,
    session::SessionState,
    storage::{StorageClient, submission_object_path},
    transport::{ReqwestTransport, Transport},
};

/// Path of the password-grant token endpoint.
pub const AUTH_TOKEN_PATH: &str = "/auth/v1/token?grant_type=password";
/// Path of the invite endpoint on the companion web application.
pub const INVITE_TEACHER_PATH: &str = "/api/auth/inviteTeacher";

/// Client for the autograder backend.
///
/// Reads work with the anonymous key, restricted by the backend's row-level
/// policies; [`AutograderClient::authenticate`] widens access to whatever the
/// signed-in account can see. Every operation awaits its requests one after
/// another.
#[derive(Debug)]
pub struct AutograderClient<T> {
    /// Relational API access.
    rest:    RelationalClient<T>,
    /// Object storage access.
    storage: StorageClient<T>,
    /// Credential and identity used for every call.
    session: SessionState,
    /// Base URL of the companion web application.
    app_url: String,
}

impl AutograderClient<ReqwestTransport> {
    /// Builds a client over a fresh `reqwest` transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> AutograderClient<T> {
    /// Builds a client sending every request through `transport`.
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        let transport = Arc::new(transport);
        Self {
            rest:    RelationalClient::new(Arc::clone(&transport), config.supabase_url()),
            storage: StorageClient::new(transport, config.supabase_url()),
            session: SessionState::new(config.anon_key()),
            app_url: config.app_url().trim_end_matches('/').to_string(),
        }
    }

    /// The current session.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Fails fast when no credential is available.
    fn ensure_credential(&self) -> Result<()> {
        match self.session.current_credential() {
            Some(_) => Ok(()),
            None => Err(ClientError::NotAuthenticated),
        }
    }

    /// Signs in with email and password and uses the returned token for all
    /// later calls. `None` when the backend rejects the credentials.
    pub async fn authenticate(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticationResponse>> {
        self.ensure_credential()?;

        let url = self.rest.endpoint(AUTH_TOKEN_PATH);
        let body = AuthenticationRequest {
            email:    email.to_string(),
            password: password.to_string(),
        };

        let response: Option<AuthenticationResponse> =
            self.rest.insert(&self.session, &url, &body).await?;
        match response {
            Some(auth) => {
                tracing::info!("Authenticated as {email}");
                self.session
                    .on_authenticated(auth.access_token.clone(), auth.user.clone());
                Ok(Some(auth))
            }
            None => {
                tracing::warn!("Authentication failed for {email}");
                Ok(None)
            }
        }
    }

    /// Emails an invitation to a teacher on behalf of the signed-in user.
    pub async fn invite_teacher(&self, email: &str) -> Result<bool> {
        self.ensure_credential()?;
        let current_email = self
            .session
            .current_identity()
            .and_then(|user| user.email.clone())
            .ok_or(ClientError::NotAuthenticated)?;

        let url = format!("{}{INVITE_TEACHER_PATH}", self.app_url);
        let body = InviteTeacherRequest {
            current_email,
            email: email.to_string(),
        };

        let accepted: Option<bool> = self.rest.insert(&self.session, &url, &body).await?;
        Ok(accepted.unwrap_or(false))
    }

    /// A profile with its classes and their assignments.
    ///
    /// Profiles without any enrollment are read directly and keep `classes`
    /// unset.
    pub async fn get_user_profile(&self, profile_id: &str) -> Result<Option<Profile>> {
        self.ensure_credential()?;

        let query = FilterQueryBuilder::from("enrollment")
            .select(&Select::enrollment_graph())?
            .equals("profile_id", profile_id);
        let enrollments: Vec<Enrollment> = self.rest.query(&self.session, &query).await?;

        if let Some(profile) = aggregate::enrollments_to_profiles(enrollments)
            .into_iter()
            .next()
        {
            return Ok(Some(profile));
        }

        let query = FilterQueryBuilder::from("profile")
            .select(&Select::all())?
            .equals("id", profile_id);
        self.rest.query_one(&self.session, &query).await
    }

    /// Students of a class, teachers excluded.
    pub async fn get_students_in_class(&self, class_id: &str) -> Result<Vec<Profile>> {
        self.get_user_profiles_in_class(class_id, true).await
    }

    /// Everyone enrolled in a class, optionally students only.
    pub async fn get_user_profiles_in_class(
        &self,
        class_id: &str,
        students_only: bool,
    ) -> Result<Vec<Profile>> {
        self.ensure_credential()?;

        let mut query = FilterQueryBuilder::from("enrollment")
            .select(&Select::enrollment_graph())?
            .equals("class_id", class_id);
        if students_only {
            query = query.equals("type", "student");
        }

        let enrollments: Vec<Enrollment> = self.rest.query(&self.session, &query).await?;
        Ok(aggregate::enrollments_to_profiles(enrollments))
    }

    /// A class with its assignments.
    pub async fn get_class(&self, class_id: &str) -> Result<Option<AutograderClass>> {
        self.ensure_credential()?;

        let query = FilterQueryBuilder::from("class")
            .select(&Select::class_with_assignments())?
            .equals("id", class_id);
        self.rest.query_one(&self.session, &query).await
    }

    /// Every submitted file of a profile for an assignment, all versions.
    pub async fn get_assignment_submissions(
        &self,
        profile_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<Submission>> {
        self.ensure_credential()?;
        let query = submissions_query(profile_id, assignment_id)?;
        self.rest.query(&self.session, &query).await
    }

    /// One submitted file at one version.
    pub async fn get_assignment_submission(
        &self,
        profile_id: &str,
        assignment_id: &str,
        version: SubmissionVersion,
        file_name: &str,
    ) -> Result<Option<Submission>> {
        self.ensure_credential()?;
        let query = submissions_query(profile_id, assignment_id)?
            .equals("version", version.number())
            .equals("file_name", file_name);
        self.rest.query_one(&self.session, &query).await
    }

    /// All submitted versions of all files for an assignment.
    pub async fn get_submitted_versions(
        &self,
        profile_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<Submission>> {
        self.get_assignment_submissions(profile_id, assignment_id)
            .await
    }

    /// Highest submitted version, optionally for one file only. `None` when
    /// nothing was submitted.
    pub async fn get_latest_submitted_version(
        &self,
        profile_id: &str,
        assignment_id: &str,
        file_name: Option<&str>,
    ) -> Result<Option<SubmissionVersion>> {
        self.ensure_credential()?;

        let mut query = submissions_query(profile_id, assignment_id)?;
        if let Some(file_name) = file_name {
            query = query.equals("file_name", file_name);
        }
        let submissions: Vec<Submission> = self.rest.query(&self.session, &query).await?;
        Ok(aggregate::latest_version(&submissions, file_name))
    }

    /// Whether a profile has submitted every required file of `assignment`.
    pub async fn is_complete_submission(
        &self,
        profile_id: &str,
        assignment: &Assignment,
    ) -> Result<bool> {
        let submissions = self
            .get_assignment_submissions(profile_id, &assignment.id)
            .await?;
        Ok(aggregate::is_complete_for(&submissions, assignment))
    }

    /// Students of a class who submitted every required file of an
    /// assignment.
    ///
    /// Issues one submissions query per student.
    pub async fn get_submitted_students(
        &self,
        class_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<Profile>> {
        self.ensure_credential()?;

        let class = self
            .get_class(class_id)
            .await?
            .ok_or_else(|| ClientError::ClassNotFound(class_id.to_string()))?;
        let assignment = aggregate::find_assignment(&class, assignment_id)?;

        let students = self.get_students_in_class(class_id).await?;
        let mut submitted = Vec::new();
        for student in students {
            if self.is_complete_submission(&student.id, assignment).await? {
                submitted.push(student);
            }
        }

        tracing::debug!(
            "{} student(s) completed {assignment_id} in {class_id}",
            submitted.len()
        );
        Ok(submitted)
    }

    /// Contents of a submitted file as text. `None` on a non-success status.
    pub async fn download_file(
        &self,
        profile_id: &str,
        assignment_id: &str,
        version: SubmissionVersion,
        file_name: &str,
    ) -> Result<Option<String>> {
        let path = self
            .resolve_object_path(profile_id, assignment_id, version, file_name)
            .await?;
        self.storage.download_text(&self.session, &path).await
    }

    /// Raw bytes of a submitted file. `None` on a non-success status.
    pub async fn get_file_bytes(
        &self,
        profile_id: &str,
        assignment_id: &str,
        version: SubmissionVersion,
        file_name: &str,
    ) -> Result<Option<Vec<u8>>> {
        let path = self
            .resolve_object_path(profile_id, assignment_id, version, file_name)
            .await?;
        self.storage.download_bytes(&self.session, &path).await
    }

    /// Version folders in the storage bucket for one assignment.
    pub async fn list_storage_versions(
        &self,
        root: &str,
        assignment_id: &str,
    ) -> Result<Vec<StoredObject>> {
        self.ensure_credential()?;
        self.storage
            .list_versions(&self.session, root, assignment_id)
            .await
    }

    /// Files in the storage bucket for one assignment version.
    pub async fn list_storage_files(
        &self,
        root: &str,
        assignment_id: &str,
        version: SubmissionVersion,
    ) -> Result<Vec<StoredObject>> {
        self.ensure_credential()?;
        self.storage
            .list_files(&self.session, root, assignment_id, version)
            .await
    }

    /// Resolves `submissions/<authId>/<submissionId>` for a submitted file.
    async fn resolve_object_path(
        &self,
        profile_id: &str,
        assignment_id: &str,
        version: SubmissionVersion,
        file_name: &str,
    ) -> Result<String> {
        self.ensure_credential()?;

        let profile = self
            .get_user_profile(profile_id)
            .await?
            .ok_or_else(|| ClientError::ProfileNotFound(profile_id.to_string()))?;
        let submission = self
            .get_assignment_submission(profile_id, assignment_id, version, file_name)
            .await?
            .ok_or_else(|| ClientError::SubmissionNotFound {
                file_name: file_name.to_string(),
                version:   version.number(),
            })?;

        Ok(submission_object_path(&profile.auth_id, &submission.id))
    }
}

/// `submission` rows of one profile for one assignment.
fn submissions_query(profile_id: &str, assignment_id: &str) -> Result<FilterQueryBuilder> {
    Ok(FilterQueryBuilder::from("submission")
        .select(&Select::all())?
        .equals("assignment_id", assignment_id)
        .equals("profile_id", profile_id))
}

/// Renders any record as JSON.
pub fn to_json<S: Serialize + ?Sized>(value: &S, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| ClientError::encode("record", e))
}
