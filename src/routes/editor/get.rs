use crate::configuration::Settings;
use crate::helpers::JsonResponse;
use crate::models::Document;
use crate::views;
use actix_web::{get, web::Data, HttpResponse, Responder, Result};

#[tracing::instrument(name = "Render editor page.", skip_all)]
#[get("")]
pub async fn index(settings: Data<Settings>) -> Result<impl Responder> {
    // A missing document just renders an empty editor.
    let document = Document::load(&settings.data_file).unwrap_or_default();
    let page = views::editor::render(
        &document,
        settings.github.is_configured(),
        settings.access_token.is_some(),
    )
    .map_err(|err| {
        tracing::error!("Failed to render editor page: {:?}", err);
        JsonResponse::<String>::build().internal_server_error("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", "/editor"))
        .finish()
}
