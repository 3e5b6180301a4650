//! Current-user handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use common::AppResult;
use domain::{Image, Transaction, User};

use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/me/images", get(list_my_images))
        .route("/me/transactions", get(list_my_transactions))
}

/// Get the signed-in user's record
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<User>> {
    let user = state
        .services
        .users()
        .get_user_by_clerk_id(&current_user.clerk_id)
        .await?;
    Ok(Json(user))
}

/// List images created by the signed-in user
pub async fn list_my_images(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Image>>> {
    let user = state
        .services
        .users()
        .get_user_by_clerk_id(&current_user.clerk_id)
        .await?;
    let images = state.services.images().list_images_by_author(user.id).await?;
    Ok(Json(images))
}

/// List the signed-in user's purchases
pub async fn list_my_transactions(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Transaction>>> {
    let user = state
        .services
        .users()
        .get_user_by_clerk_id(&current_user.clerk_id)
        .await?;
    let transactions = state
        .services
        .transactions()
        .list_transactions_by_buyer(user.id)
        .await?;
    Ok(Json(transactions))
}
