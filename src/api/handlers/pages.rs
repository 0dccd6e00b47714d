use axum::response::Html;

use crate::api::views;

/// GET /
pub async fn entry() -> Html<String> {
    Html(views::render_entry())
}

/// GET /index
pub async fn index() -> Html<String> {
    Html(views::render_index())
}
