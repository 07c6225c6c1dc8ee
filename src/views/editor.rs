//! Single-page editor view, rendered from a raw Tera template.

use lazy_static::lazy_static;
use serde_derive::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::models::{Document, ProjectRecord};

#[derive(Debug, Serialize)]
struct DbView {
    id: String,
    title: String,
    year: String,
    description: String,
    image: String,
    preview_image: String,
    url: String,
    category: String,
}

#[derive(Debug, Serialize)]
struct RowView {
    name: String,
    repo: String,
    visibility: String,
    deploy: String,
    desc: String,
    sync: bool,
    db: DbView,
}

#[derive(Debug, Serialize)]
struct SectionView {
    name: String,
    rows: Vec<RowView>,
}

impl From<&ProjectRecord> for RowView {
    fn from(record: &ProjectRecord) -> Self {
        let db = record.db_attributes.clone().unwrap_or_default();
        let text = |value: Option<String>| value.unwrap_or_default();
        RowView {
            name: record.name.clone(),
            repo: record.repo.clone().unwrap_or_default(),
            visibility: record.visibility.as_str().to_string(),
            deploy: record.deploy.clone().unwrap_or_default(),
            desc: record.desc.clone(),
            sync: record.sync_with_db,
            db: DbView {
                id: text(db.id),
                title: text(db.title),
                year: text(db.year),
                description: text(db.description),
                image: text(db.image),
                preview_image: text(db.preview_image),
                url: text(db.url),
                category: text(db.category),
            },
        }
    }
}

lazy_static! {
    static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        tera.add_raw_template("editor.html", EDITOR_TEMPLATE)
            .expect("editor template parses");
        tera
    };
}

pub fn render(
    document: &Document,
    github_configured: bool,
    token_required: bool,
) -> tera::Result<String> {
    let sections: Vec<SectionView> = document
        .sections
        .iter()
        .map(|(name, records)| SectionView {
            name: name.clone(),
            rows: records.iter().map(RowView::from).collect(),
        })
        .collect();

    let mut context = TeraContext::new();
    context.insert("sections", &sections);
    context.insert("github", &github_configured);
    context.insert("token_required", &token_required);
    TEMPLATES.render("editor.html", &context)
}

const EDITOR_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8" />
<title>Projects Editor</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<style>
  body { font-family: system-ui, sans-serif; margin: 24px; color: #111827; }
  h1 { margin-bottom: 8px; }
  .section { margin: 24px 0; }
  table { border-collapse: collapse; width: 100%; table-layout: fixed; }
  thead th { position: sticky; top: 0; background: #f6f8fa; z-index: 1; }
  th, td { border: 1px solid #e5e7eb; padding: 8px; vertical-align: top; }
  th { text-align: left; font-weight: 600; }
  tbody tr:nth-child(odd) { background: #fcfcfd; }
  input[type=text], textarea, select { width: 100%; box-sizing: border-box; padding: 6px; border: 1px solid #d1d5db; border-radius: 6px; }
  textarea { height: 60px; resize: vertical; }
  .db-attrs { display: none; grid-template-columns: repeat(2, 1fr); gap: 6px; margin-top: 6px; }
  tr.row-sync .db-attrs { display: grid; }
  .actions { margin-top: 16px; display: flex; gap: 12px; align-items: center; }
  .btn { border: 0; background: #111827; color: #fff; padding: 10px 14px; border-radius: 8px; cursor: pointer; font-weight: 600; }
  .muted { color: #4b5563; font-size: 14px; }
  .row-check { text-align: center; }
</style>
</head>
<body>
<h1>Projects Editor</h1>
<p class="muted">Edit, add, and remove rows. Saving rewrites the projects file and regenerates the README.</p>
<form method="post" action="/editor/save">
{% if token_required %}
  <p><label>Access token: <input type="password" name="token" required></label></p>
{% endif %}
{% for section in sections %}
  <div class="section">
    <h2>{{ section.name }}</h2>
    <table>
      <thead>
        <tr>
          <th style="width: 16%">name</th>
          <th style="width: 18%">repo</th>
          <th style="width: 10%">visibility</th>
          <th style="width: 16%">deploy</th>
          <th>desc</th>
          <th style="width: 6%">sync</th>
          <th style="width: 6%">remove</th>
        </tr>
      </thead>
      <tbody>
        {% for row in section.rows %}
        <tr{% if row.sync %} class="row-sync"{% endif %}>
          <td><input type="text" name="{{ section.name }}[{{ loop.index0 }}][name]" value="{{ row.name }}" required></td>
          <td><input type="text" name="{{ section.name }}[{{ loop.index0 }}][repo]" value="{{ row.repo }}"></td>
          <td>
            <select name="{{ section.name }}[{{ loop.index0 }}][visibility]">
              <option value="public" {% if row.visibility == "public" %}selected{% endif %}>public</option>
              <option value="private" {% if row.visibility == "private" %}selected{% endif %}>private</option>
            </select>
          </td>
          <td><input type="text" name="{{ section.name }}[{{ loop.index0 }}][deploy]" value="{{ row.deploy }}"></td>
          <td>
            <textarea name="{{ section.name }}[{{ loop.index0 }}][desc]">{{ row.desc }}</textarea>
            <div class="db-attrs">
              <input type="text" placeholder="id" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][id]" value="{{ row.db.id }}">
              <input type="text" placeholder="title" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][title]" value="{{ row.db.title }}">
              <input type="text" placeholder="year" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][year]" value="{{ row.db.year }}">
              <input type="text" placeholder="description" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][description]" value="{{ row.db.description }}">
              <input type="text" placeholder="image" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][image]" value="{{ row.db.image }}">
              <input type="text" placeholder="preview_image" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][preview_image]" value="{{ row.db.preview_image }}">
              <input type="text" placeholder="url" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][url]" value="{{ row.db.url }}">
              <input type="text" placeholder="category" name="{{ section.name }}[{{ loop.index0 }}][db-attribute][category]" value="{{ row.db.category }}">
            </div>
          </td>
          <td class="row-check"><input type="checkbox" name="{{ section.name }}[{{ loop.index0 }}][sync-with-db]" {% if row.sync %}checked{% endif %} data-sync></td>
          <td class="row-check"><input type="checkbox" name="{{ section.name }}[{{ loop.index0 }}][_remove]"></td>
        </tr>
        {% endfor %}
        <tr>
          <td><input type="text" name="{{ section.name }}[new][name]" placeholder="Add new..."></td>
          <td><input type="text" name="{{ section.name }}[new][repo]" placeholder="org/repo"></td>
          <td>
            <select name="{{ section.name }}[new][visibility]">
              <option value="public" selected>public</option>
              <option value="private">private</option>
            </select>
          </td>
          <td><input type="text" name="{{ section.name }}[new][deploy]"></td>
          <td><textarea name="{{ section.name }}[new][desc]" placeholder="Short description"></textarea></td>
          <td class="row-check"><input type="checkbox" name="{{ section.name }}[new][sync-with-db]" data-sync></td>
          <td></td>
        </tr>
      </tbody>
    </table>
  </div>
{% endfor %}
  <div class="actions">
{% if github %}
    <input type="text" name="commit_message" placeholder="Commit message" value="chore(editor): update projects.json">
{% endif %}
    <button type="submit" class="btn">Save changes</button>
  </div>
</form>
<script>
document.querySelectorAll("input[type='checkbox'][data-sync]").forEach(function (cb) {
  cb.addEventListener('change', function () {
    var tr = cb.closest('tr');
    if (tr) { tr.classList.toggle('row-sync', cb.checked); }
  });
});
</script>
</body>
</html>
"#;
