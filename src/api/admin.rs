//! Unlisted page showing every submission

use crate::api::render;
use crate::core::traits::FeedbackService;
use axum::http::StatusCode;
use axum::response::Html;
use di_axum::Inject;
use minijinja::context;

pub async fn list_messages(
    Inject(feedback_service): Inject<dyn FeedbackService>,
) -> Result<Html<String>, StatusCode> {
    let messages = feedback_service.list_messages().await;

    render(
        "admin.html",
        context! {
            count => messages.len(),
            messages => messages,
        },
    )
}
