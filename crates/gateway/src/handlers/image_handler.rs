//! Image handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use common::AppResult;
use domain::{CreateImage, Image};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Create image routes
pub fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_image))
        .route("/:id", get(get_image))
}

/// Store a transformed image owned by the signed-in user
pub async fn add_image(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(mut input): ValidatedJson<CreateImage>,
) -> AppResult<(StatusCode, Json<Image>)> {
    let author = state
        .services
        .users()
        .get_user_by_clerk_id(&current_user.clerk_id)
        .await?;
    input.author_id = Some(author.id);

    let image = state.services.images().add_image(input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// Get image by ID
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Image>> {
    let image = state.services.images().get_image(id).await?;
    Ok(Json(image))
}
