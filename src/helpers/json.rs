use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web::Json;
use actix_web::{Error, HttpResponse};
use serde_derive::Serialize;

/// Response envelope shared by every handler.
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub status: String,
    pub message: String,
    pub code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<T>>,
}

#[derive(Default)]
pub struct JsonResponseBuilder<T>
where
    T: serde::Serialize + Default,
{
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize + Default,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder::default()
    }
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize + Default,
{
    pub fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    fn envelope(self, code: StatusCode, message: String) -> JsonResponse<T> {
        let status = if code.is_success() { "OK" } else { "Error" };
        JsonResponse {
            status: status.to_string(),
            message,
            code: code.as_u16() as u32,
            item: self.item,
            list: self.list,
        }
    }

    pub fn ok(self, message: impl Into<String>) -> Json<JsonResponse<T>> {
        Json(self.envelope(StatusCode::OK, message.into()))
    }

    fn error(self, code: StatusCode, message: String) -> Error {
        let body = serde_json::to_string(&self.envelope(code, message.clone())).unwrap_or_default();
        let response = HttpResponse::build(code)
            .content_type("application/json")
            .body(body);
        InternalError::from_response(message, response).into()
    }

    pub fn bad_request(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn unauthorized(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::UNAUTHORIZED, message.into())
    }

    pub fn not_found(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::NOT_FOUND, message.into())
    }

    pub fn internal_server_error(self, message: impl Into<String>) -> Error {
        self.error(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }
}
