use crate::configuration::Settings;
use crate::forms;
use crate::helpers::{GithubClient, JsonResponse};
use crate::models::Document;
use crate::services::readme;
use actix_web::{post, web, web::Data, Responder, Result};
use serde_derive::Serialize;

const TOKEN_FIELD: &str = "token";
const COMMIT_MESSAGE_FIELD: &str = "commit_message";
const DEFAULT_COMMIT_MESSAGE: &str = "chore(editor): update projects.json";

/// Per-step save report: the local write, README regeneration, and the
/// remote commit succeed or fail independently.
#[derive(Debug, Default, Serialize)]
pub struct SaveReport {
    pub sections: usize,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[tracing::instrument(name = "Save editor submission.", skip_all)]
#[post("/save")]
pub async fn item(
    form: web::Form<Vec<(String, String)>>,
    settings: Data<Settings>,
    github: Data<GithubClient>,
) -> Result<impl Responder> {
    let pairs = form.into_inner();

    if let Some(expected) = settings.access_token.as_deref() {
        let supplied = last_value(&pairs, TOKEN_FIELD).unwrap_or("");
        if supplied != expected {
            return Err(JsonResponse::<SaveReport>::build().unauthorized("Invalid access token"));
        }
    }

    let commit_message = last_value(&pairs, COMMIT_MESSAGE_FIELD)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(DEFAULT_COMMIT_MESSAGE)
        .to_string();

    let prior = Document::load(&settings.data_file).ok();
    let document = forms::Submission::from_pairs(pairs).into_document(prior.as_ref());

    // The local write is the save. Everything below is advisory, reported
    // separately, and never rolls it back.
    document.save(&settings.data_file).map_err(|err| {
        tracing::error!("Failed to write canonical document: {:?}", err);
        JsonResponse::<SaveReport>::build().internal_server_error("Failed to write document")
    })?;

    let mut report = SaveReport {
        sections: document.sections.len(),
        records: document.record_count(),
        readme: None,
        commit: None,
    };
    let mut notes = vec![format!(
        "Saved {} records across {} sections",
        report.records, report.sections
    )];

    if let Some(readme_file) = settings.readme_file.as_deref() {
        match readme::regenerate(&document, readme_file) {
            Ok(()) => {
                report.readme = Some("regenerated".to_string());
                notes.push("README regenerated".to_string());
            }
            Err(err) => {
                tracing::warn!("README regeneration failed: {:?}", err);
                report.readme = Some(format!("failed: {}", err));
                notes.push("README regeneration failed".to_string());
            }
        }
    }

    if github.is_configured() {
        match commit_document(&github, &settings, &document, &commit_message).await {
            Ok(status) => {
                report.commit = Some(format!("committed ({})", status));
                notes.push(format!(
                    "committed to {}@{}",
                    settings.github.repo, settings.github.branch
                ));
            }
            Err(err) => {
                tracing::warn!("Commit failed: {}", err);
                report.commit = Some(format!("failed: {}", err));
                notes.push("commit failed".to_string());
            }
        }
    }

    Ok(JsonResponse::build().set_item(report).ok(notes.join("; ")))
}

async fn commit_document(
    github: &GithubClient,
    settings: &Settings,
    document: &Document,
    commit_message: &str,
) -> Result<u16, String> {
    let content =
        serde_json::to_vec_pretty(document).map_err(|err| err.to_string())?;
    github
        .upsert_file(&settings.github.remote_path, &content, commit_message)
        .await
        .map_err(|err| err.to_string())
}

// When a key repeats, the last value wins.
fn last_value<'a>(pairs: &'a [(String, String)], field: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == field)
        .map(|(_, value)| value.as_str())
}
