use axum::routing::get;
use axum::Router;

mod codebook;
mod index;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/:path", get(codebook::show))
        .route("/:path/encode", get(codebook::show).post(codebook::encode))
        .route("/:path/decode", get(codebook::show).post(codebook::decode))
        .route("/:path/save", get(codebook::show).post(codebook::save))
        .with_state(state)
}
