use std::collections::HashMap;

use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
use axum::Form;
use serde::Deserialize;
use tracing::instrument;

use common::prelude::{decode as decode_text, encode as encode_text, CodebookView};

use crate::ServiceState;

/// Form field carrying the secret on a save
const SECRET_FIELD: &str = "pathPass";

/// One letter row of the edit form
pub struct LetterField {
    pub key: char,
    pub value: String,
}

#[derive(Template)]
#[template(path = "code.html")]
pub struct CodeTemplate {
    pub path: String,
    pub is_claimed: bool,
    pub error_msg: String,
    pub fields: Vec<LetterField>,
    pub encoded: String,
    pub decoded: String,
}

impl From<&CodebookView> for CodeTemplate {
    fn from(view: &CodebookView) -> Self {
        Self {
            path: view.path.clone(),
            is_claimed: view.is_claimed,
            error_msg: view
                .notice
                .map(|notice| notice.message().to_string())
                .unwrap_or_default(),
            fields: view
                .codebook
                .iter()
                .map(|(key, value)| LetterField {
                    key,
                    value: value.to_string(),
                })
                .collect(),
            encoded: String::new(),
            decoded: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EncodeForm {
    #[serde(rename = "encInput", default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct DecodeForm {
    #[serde(rename = "decInput", default)]
    pub input: String,
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
) -> askama_axum::Response {
    let view = state.registry().resolve(&path).await;
    CodeTemplate::from(&view).into_response()
}

#[instrument(skip(state, form))]
pub async fn encode(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
    Form(form): Form<EncodeForm>,
) -> askama_axum::Response {
    let view = state.registry().resolve(&path).await;
    let mut template = CodeTemplate::from(&view);
    if view.notice.is_none() {
        template.encoded = encode_text(&view.codebook, &form.input);
    }
    template.into_response()
}

#[instrument(skip(state, form))]
pub async fn decode(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
    Form(form): Form<DecodeForm>,
) -> askama_axum::Response {
    let view = state.registry().resolve(&path).await;
    let mut template = CodeTemplate::from(&view);
    if view.notice.is_none() {
        template.decoded = decode_text(&view.codebook, &form.input);
    }
    template.into_response()
}

/// Claim-or-verify with `pathPass`, then store the letter fields as the codebook
#[instrument(skip(state, fields))]
pub async fn save(
    State(state): State<ServiceState>,
    Path(path): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> askama_axum::Response {
    let mut fields = fields;
    let secret = fields.remove(SECRET_FIELD).unwrap_or_default();
    let view = state.registry().save(&path, &secret, &fields).await;
    if let Some(notice) = view.notice {
        tracing::info!(path = %path, "save rejected: {}", notice);
    }
    CodeTemplate::from(&view).into_response()
}
