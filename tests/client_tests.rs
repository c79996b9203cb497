
use autograder_client::{
    AutograderClient, ClientConfig, ClientError, client::to_json, models::SubmissionVersion,
};
use fake_transport::{ANON, APP, BASE, FakeTransport, body_json, param};
use serde_json::{Value, json};

fn class_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Data Structures",
        "quarter": "Fall 2024",
        "assignment": [{
            "id": "a1",
            "name": "Linked Lists",
            "description": "Implement a list",
            "required_files": ["A.java", "B.java"],
            "due_date": "2024-10-01",
            "class_id": id
        }]
    })
}

fn profile_json(id: &str) -> Value {
    json!({ "id": id, "email": format!("{id}@school.edu"), "auth_id": format!("auth-{id}") })
}

fn enrollment_json(profile_id: &str, class_id: &str, kind: &str) -> Value {
    json!({
        "type": kind,
        "profile_id": profile_id,
        "class_id": class_id,
        "class": class_json(class_id),
        "profile": profile_json(profile_id)
    })
}

fn submission_json(profile_id: &str, file: &str, version: u32) -> Value {
    json!({
        "id": format!("{profile_id}-{file}-v{version}"),
        "profile_id": profile_id,
        "assignment_id": "a1",
        "file_name": file,
        "version": version,
        "created_at": "2024-09-30T12:00:00Z"
    })
}

fn client(transport: FakeTransport) -> AutograderClient<FakeTransport> {
    AutograderClient::new(&fake_transport::config(), transport)
}

#[tokio::test]
async fn profile_is_flattened_from_enrollments() {
    let transport = FakeTransport::new().on_get(
        "/rest/v1/enrollment",
        &[("profile_id", "eq.p1")],
        200,
        json!([
            enrollment_json("p1", "c1", "student"),
            enrollment_json("p1", "c2", "student")
        ]),
    );
    let log = transport.log();

    let profile = client(transport)
        .get_user_profile("p1")
        .await
        .expect("request")
        .expect("profile exists");

    let classes = profile.classes.expect("classes populated");
    assert_eq!(profile.auth_id, "auth-p1");
    assert_eq!(
        classes.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        vec!["c1", "c2"]
    );
    assert_eq!(classes[0].assignments[0].required_files, vec!["A.java", "B.java"]);

    let request = log.last();
    assert_eq!(param(&request, "select").as_deref(), Some("*,profile(*),class(*,assignment(*))"));
    assert_eq!(request.header("apikey"), Some(ANON));
    assert_eq!(request.header("Authorization"), Some("Bearer anon-key"));
}

#[tokio::test]
async fn profile_without_enrollments_falls_back_to_profile_row() {
    let transport = FakeTransport::new()
        .on_get("/rest/v1/enrollment", &[], 200, json!([]))
        .on_get("/rest/v1/profile", &[("id", "eq.p9")], 200, json!([profile_json("p9")]));

    let profile = client(transport)
        .get_user_profile("p9")
        .await
        .expect("request")
        .expect("profile exists");

    assert_eq!(profile.id, "p9");
    assert!(profile.classes.is_none());
}

#[tokio::test]
async fn students_query_filters_on_type() {
    let transport = FakeTransport::new().on_get(
        "/rest/v1/enrollment",
        &[("class_id", "eq.c1"), ("type", "eq.student")],
        200,
        json!([
            enrollment_json("s1", "c1", "student"),
            enrollment_json("s2", "c1", "student")
        ]),
    );
    let log = transport.log();

    let students = client(transport)
        .get_students_in_class("c1")
        .await
        .expect("request");

    assert_eq!(students.len(), 2);
    assert_eq!(param(&log.last(), "type").as_deref(), Some("eq.student"));
}

#[tokio::test]
async fn everyone_in_class_omits_type_filter() {
    let transport = FakeTransport::new().on_get(
        "/rest/v1/enrollment",
        &[("class_id", "eq.c1")],
        200,
        json!([
            enrollment_json("t1", "c1", "teacher"),
            enrollment_json("s1", "c1", "student")
        ]),
    );
    let log = transport.log();

    let everyone = client(transport)
        .get_user_profiles_in_class("c1", false)
        .await
        .expect("request");

    assert_eq!(everyone.len(), 2);
    assert!(param(&log.last(), "type").is_none());
}

#[tokio::test]
async fn non_success_read_is_empty_not_an_error() {
    let transport = FakeTransport::new().on_get(
        "/rest/v1/submission",
        &[],
        500,
        json!({"message": "boom"}),
    );

    let submissions = client(transport)
        .get_assignment_submissions("p1", "a1")
        .await
        .expect("status is not an error");
    assert!(submissions.is_empty());
}

#[tokio::test]
async fn transport_failures_propagate() {
    let transport = FakeTransport::new().fail_get("/rest/v1/class", "connection refused");

    let err = client(transport).get_class("c1").await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn submitted_students_only_includes_complete_submissions() {
    let transport = FakeTransport::new()
        .on_get("/rest/v1/class", &[("id", "eq.c1")], 200, json!([class_json("c1")]))
        .on_get(
            "/rest/v1/enrollment",
            &[("class_id", "eq.c1"), ("type", "eq.student")],
            200,
            json!([
                enrollment_json("s1", "c1", "student"),
                enrollment_json("s2", "c1", "student")
            ]),
        )
        .on_get(
            "/rest/v1/submission",
            &[("profile_id", "eq.s1"), ("assignment_id", "eq.a1")],
            200,
            json!([
                submission_json("s1", "A.java", 1),
                submission_json("s1", "B.java", 1),
                submission_json("s1", "A.java", 2)
            ]),
        )
        .on_get(
            "/rest/v1/submission",
            &[("profile_id", "eq.s2"), ("assignment_id", "eq.a1")],
            200,
            json!([submission_json("s2", "A.java", 1)]),
        );
    let log = transport.log();

    let submitted = client(transport)
        .get_submitted_students("c1", "a1")
        .await
        .expect("request");

    assert_eq!(submitted.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["s1"]);
    assert_eq!(log.to("/rest/v1/submission").len(), 2);
}

#[tokio::test]
async fn submitted_students_rejects_foreign_assignment() {
    let transport =
        FakeTransport::new().on_get("/rest/v1/class", &[("id", "eq.c1")], 200, json!([class_json("c1")]));
    let log = transport.log();

    let err = client(transport)
        .get_submitted_students("c1", "a404")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::AssignmentNotInClass { ref assignment_id, ref class_id }
            if assignment_id == "a404" && class_id == "c1"
    ));
    assert!(log.to("/rest/v1/enrollment").is_empty());
}

#[tokio::test]
async fn submitted_students_rejects_missing_class() {
    let transport = FakeTransport::new().on_get("/rest/v1/class", &[], 200, json!([]));

    let err = client(transport)
        .get_submitted_students("c9", "a1")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ClassNotFound(id) if id == "c9"));
}

#[tokio::test]
async fn latest_version_is_the_maximum() {
    let transport = FakeTransport::new().on_get(
        "/rest/v1/submission",
        &[("profile_id", "eq.p1")],
        200,
        json!([
            submission_json("p1", "A.java", 1),
            submission_json("p1", "A.java", 3),
            submission_json("p1", "A.java", 2)
        ]),
    );

    let latest = client(transport)
        .get_latest_submitted_version("p1", "a1", None)
        .await
        .expect("request");
    assert_eq!(latest.map(|v| v.to_string()).as_deref(), Some("v3"));
}

#[tokio::test]
async fn latest_version_without_submissions_is_none() {
    let transport = FakeTransport::new().on_get("/rest/v1/submission", &[], 200, json!([]));

    let latest = client(transport)
        .get_latest_submitted_version("p1", "a1", None)
        .await
        .expect("request");
    assert_eq!(latest, None);
}

#[tokio::test]
async fn latest_version_for_one_file_ignores_other_files() {
    let transport = FakeTransport::new()
        .on_get(
            "/rest/v1/submission",
            &[("file_name", "eq.Test.java")],
            200,
            json!([
                submission_json("p1", "Test.java", 1),
                submission_json("p1", "Test.java", 2)
            ]),
        )
        .on_get(
            "/rest/v1/submission",
            &[],
            200,
            json!([submission_json("p1", "Other.java", 5)]),
        );
    let log = transport.log();

    let latest = client(transport)
        .get_latest_submitted_version("p1", "a1", Some("Test.java"))
        .await
        .expect("request");

    assert_eq!(latest, Some(SubmissionVersion(2)));
    assert_eq!(param(&log.last(), "file_name").as_deref(), Some("eq.Test.java"));
}

#[tokio::test]
async fn authentication_switches_the_bearer_token() {
    let transport = FakeTransport::new()
        .on_post(
            &format!("{BASE}/auth/v1/token"),
            200,
            json!({
                "access_token": "user-jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "user": {"id": "auth-t1", "aud": "authenticated", "email": "teacher@school.edu"}
            }),
        )
        .on_get("/rest/v1/class", &[], 200, json!([class_json("c1")]));
    let log = transport.log();
    let mut client = client(transport);

    let auth = client
        .authenticate("teacher@school.edu", "hunter2")
        .await
        .expect("request")
        .expect("accepted");
    assert_eq!(auth.user.id, "auth-t1");

    let token_request = log.last();
    assert_eq!(param(&token_request, "grant_type").as_deref(), Some("password"));
    assert_eq!(
        body_json(&token_request),
        json!({"email": "teacher@school.edu", "password": "hunter2"})
    );

    client.get_class("c1").await.expect("request");
    let request = log.last();
    assert_eq!(request.header("apikey"), Some(ANON));
    assert_eq!(request.header("Authorization"), Some("Bearer user-jwt"));
    assert_eq!(
        client
            .session()
            .current_identity()
            .and_then(|u| u.email.as_deref()),
        Some("teacher@school.edu")
    );
}

#[tokio::test]
async fn rejected_authentication_keeps_anonymous_session() {
    let transport = FakeTransport::new().on_post(
        &format!("{BASE}/auth/v1/token"),
        400,
        json!({"error": "invalid_grant"}),
    );
    let mut client = client(transport);

    let auth = client
        .authenticate("x@y.z", "wrong")
        .await
        .expect("request");

    assert!(auth.is_none());
    assert_eq!(client.session().current_credential(), Some(ANON));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn invite_requires_a_signed_in_user() {
    let transport = FakeTransport::new();
    let log = transport.log();

    let err = client(transport)
        .invite_teacher("new@school.edu")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
    assert_eq!(log.len(), 0);
}

#[tokio::test]
async fn invite_posts_both_emails() {
    let transport = FakeTransport::new()
        .on_post(
            &format!("{BASE}/auth/v1/token"),
            200,
            json!({
                "access_token": "user-jwt",
                "user": {"id": "auth-t1", "email": "teacher@school.edu"}
            }),
        )
        .on_post(&format!("{APP}/api/auth/inviteTeacher"), 200, json!(true));
    let log = transport.log();
    let mut client = client(transport);
    client
        .authenticate("teacher@school.edu", "pw")
        .await
        .expect("request")
        .expect("accepted");

    assert!(client.invite_teacher("new@school.edu").await.expect("request"));

    let request = log.last();
    assert_eq!(request.header("Authorization"), Some("Bearer user-jwt"));
    assert_eq!(
        body_json(&request),
        json!({"currentEmail": "teacher@school.edu", "email": "new@school.edu"})
    );
}

#[tokio::test]
async fn missing_credential_never_reaches_the_transport() {
    let config = ClientConfig::builder()
        .supabase_url(BASE)
        .anon_key("")
        .build();
    let transport = FakeTransport::new();
    let log = transport.log();
    let client = AutograderClient::new(&config, transport);

    assert!(matches!(
        client.get_students_in_class("c1").await,
        Err(ClientError::NotAuthenticated)
    ));
    assert!(matches!(
        client.get_user_profile("p1").await,
        Err(ClientError::NotAuthenticated)
    ));
    assert_eq!(log.len(), 0);
}

#[test]
fn records_that_cannot_be_serialized_are_encode_errors() {
    let mut record = std::collections::HashMap::new();
    record.insert((1, 2), "pair keys are not JSON object keys");

    let err = to_json(&record, false).unwrap_err();
    assert!(matches!(err, ClientError::Encode { ref context, .. } if context == "record"));

    let rendered = to_json(&json!({"id": "p1"}), false).expect("encode");
    assert_eq!(rendered, r#"{"id":"p1"}"#);
}
