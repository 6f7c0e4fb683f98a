//! Form page and submission endpoint

use crate::api::{redirect_with_notice, render};
use crate::core::traits::{FeedbackService, SUBMIT_SUCCESS_NOTICE};
use crate::core::validation::{
    FoodQuality, OverallRating, SubmissionForm, UploadedImage, CATEGORY,
};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use di_axum::Inject;
use log::{info, warn};
use minijinja::context;
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct IndexQuery {
    pub notice: Option<String>,
}

pub async fn index(Query(query): Query<IndexQuery>) -> Result<Html<String>, StatusCode> {
    render(
        "index.html",
        context! {
            notice => query.notice,
            category => CATEGORY,
            service_attitudes => [0, 20, 60, 100],
            food_qualities => [
                FoodQuality::Awful,
                FoodQuality::Passable,
                FoodQuality::Tasty,
                FoodQuality::Delicious,
            ].map(FoodQuality::as_str),
            overall_ratings => [
                OverallRating::NeverAgain,
                OverallRating::Sometimes,
                OverallRating::EveryDay,
            ].map(OverallRating::as_str),
        },
    )
}

pub async fn submit(
    Inject(feedback_service): Inject<dyn FeedbackService>,
    mut multipart: Multipart,
) -> Response {
    let (form, image) = match read_submission(&mut multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!("unreadable submission: {e}");
            return (e.status(), e.body_text()).into_response();
        }
    };

    let notice = match feedback_service.submit(form, image).await {
        Ok(id) => {
            info!("stored message {id}");
            SUBMIT_SUCCESS_NOTICE.to_owned()
        }
        Err(e) => e.to_string(),
    };

    redirect_with_notice(&notice).into_response()
}

async fn read_submission(
    multipart: &mut Multipart,
) -> Result<(SubmissionForm, Option<UploadedImage>), MultipartError> {
    let mut form = SubmissionForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                image = Some(UploadedImage {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "category" => form.category = field.text().await?,
            "content" => form.content = field.text().await?,
            "service_attitude" => form.service_attitude = field.text().await?,
            "food_quality" => form.food_quality = field.text().await?,
            "overall_rating" => form.overall_rating = field.text().await?,
            _ => {}
        }
    }

    Ok((form, image))
}
