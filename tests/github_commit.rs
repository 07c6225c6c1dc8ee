use serde_json::json;
use showcase::configuration::GithubSettings;
use showcase::helpers::{CommitError, GithubClient};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn github_settings(api_url: &str) -> GithubSettings {
    GithubSettings {
        repo: "acme/site".to_string(),
        branch: "main".to_string(),
        remote_path: "projects.json".to_string(),
        api_url: api_url.to_string(),
        token: "test-token".to_string(),
    }
}

#[tokio::test]
async fn test_upsert_includes_revision_marker_for_existing_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/projects.json"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/projects.json"))
        .and(body_partial_json(json!({"sha": "abc123", "branch": "main"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = GithubClient::new(&github_settings(&server.uri())).unwrap();
    let status = client
        .upsert_file("projects.json", b"{}", "chore(editor): update projects.json")
        .await
        .unwrap();

    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_upsert_creates_file_when_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/projects.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/projects.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"content": {}})))
        .mount(&server)
        .await;

    let client = GithubClient::new(&github_settings(&server.uri())).unwrap();
    let status = client
        .upsert_file("projects.json", b"{}", "add projects.json")
        .await
        .unwrap();

    assert_eq!(status, 201);
}

#[tokio::test]
async fn test_rejected_commit_surfaces_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/projects.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/projects.json"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Invalid request"})),
        )
        .mount(&server)
        .await;

    let client = GithubClient::new(&github_settings(&server.uri())).unwrap();
    let err = client
        .upsert_file("projects.json", b"{}", "update")
        .await
        .unwrap_err();

    match err {
        CommitError::Rejected { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Invalid request");
        }
        other => panic!("expected rejected commit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unconfigured_client_refuses_to_commit() {
    let mut settings = github_settings("https://api.github.com");
    settings.token = String::new();

    let client = GithubClient::new(&settings).unwrap();
    assert!(!client.is_configured());

    let err = client.upsert_file("projects.json", b"{}", "update").await;
    assert!(matches!(err, Err(CommitError::NotConfigured)));
}
