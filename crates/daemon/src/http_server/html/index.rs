use askama::Template;
use askama_axum::IntoResponse;
use tracing::instrument;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub example_path: &'static str,
}

#[instrument]
pub async fn handler() -> askama_axum::Response {
    IndexTemplate {
        example_path: "dumdum",
    }
    .into_response()
}
