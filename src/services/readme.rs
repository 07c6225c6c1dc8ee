//! README block regeneration.
//!
//! Each section of the canonical document maps to a pair of
//! `<!-- GENERATED: <KEY> START -->` / `<!-- GENERATED: <KEY> END -->`
//! markers in the README; everything between them is replaced with rendered
//! table rows. Sections without markers are left untouched.

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::models::{Document, ProjectRecord, Visibility};

lazy_static! {
    static ref GITHUB_SLUG: Regex =
        Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").expect("valid slug regex");
}

fn visibility_badge(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "🌐 Public",
        Visibility::Private => "🔒 Private",
    }
}

/// Strips wrappers that get pasted along with a URL and normalizes the
/// result to something linkable. `owner/repo` slugs become GitHub links
/// when `for_repo` is set; placeholder values come back as None.
pub fn clean_url(url: Option<&str>, for_repo: bool) -> Option<String> {
    let mut value = url?.trim().to_string();
    if value.len() >= 2 && value.starts_with('<') && value.ends_with('>') {
        value = value[1..value.len() - 1].trim().to_string();
    }
    if value.starts_with('@') {
        value = value.trim_start_matches('@').trim().to_string();
    }
    if value.is_empty() {
        return None;
    }
    if matches!(
        value.to_lowercase().as_str(),
        "none" | "null" | "n/a" | "na" | "-" | "—" | "#"
    ) {
        return None;
    }
    if for_repo && GITHUB_SLUG.is_match(&value) {
        return Some(format!("https://github.com/{}", value));
    }
    if value.starts_with("http://")
        || value.starts_with("https://")
        || value.starts_with("mailto:")
        || value.starts_with("tel:")
    {
        return Some(value);
    }
    if value.starts_with("//") {
        return Some(format!("https:{}", value));
    }
    Some(format!("https://{}", value))
}

fn link_or_text(url: Option<&str>, text: &str) -> String {
    match clean_url(url, false) {
        Some(url) => format!(r#"<a href="{}">{}</a>"#, url, text),
        None => "—".to_string(),
    }
}

pub fn render_row(record: &ProjectRecord) -> String {
    let project_cell = match clean_url(record.repo.as_deref(), true) {
        Some(url) => format!(r#"<a href="{}"><strong>{}</strong></a>"#, url, record.name),
        None => format!("<strong>{}</strong>", record.name),
    };
    let deploy_cell = link_or_text(record.deploy.as_deref(), "site");
    let desc = if record.desc.is_empty() {
        "—"
    } else {
        record.desc.as_str()
    };
    format!(
        "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        project_cell,
        visibility_badge(record.visibility),
        deploy_cell,
        desc
    )
}

fn render_section(records: &[ProjectRecord]) -> String {
    records
        .iter()
        .map(render_row)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn marker_key(section: &str) -> String {
    section.to_uppercase()
}

pub fn replace_block(text: &str, key: &str, replacement: &str) -> String {
    let start = format!("<!-- GENERATED: {} START -->", key);
    let end = format!("<!-- GENERATED: {} END -->", key);
    let pattern = Regex::new(&format!(
        r"(?s)({})(.*?)({})",
        regex::escape(&start),
        regex::escape(&end)
    ))
    .expect("valid marker regex");
    pattern
        .replace_all(text, |caps: &regex::Captures| {
            format!("{}\n{}\n        {}", &caps[1], replacement, &caps[3])
        })
        .into_owned()
}

pub fn regenerate(document: &Document, readme_path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = readme_path.as_ref();
    let mut markdown = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    for (section, records) in &document.sections {
        markdown = replace_block(&markdown, &marker_key(section), &render_section(records));
    }
    fs::write(path, markdown).with_context(|| format!("could not write {}", path.display()))
}
