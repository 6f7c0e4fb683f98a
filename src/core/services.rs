//! Implementations for the service the app needs.
//!

use crate::config::AppConfig;
use crate::core::traits::FeedbackService;
use crate::core::uploads;
use crate::core::validation::{self, SubmissionError, SubmissionForm, UploadedImage};
use crate::infrastructure::entities::{Message, NewMessage};
use crate::infrastructure::traits::MessageRepository;
use async_trait::async_trait;
use chrono::Local;
use di::{Ref, injectable};
use log::{error, info};

#[injectable(FeedbackService)]
pub struct MyFeedbackService {
    repo: Ref<dyn MessageRepository>,
    config: Ref<AppConfig>,
}

impl MyFeedbackService {
    pub fn new(repo: Ref<dyn MessageRepository>, config: Ref<AppConfig>) -> MyFeedbackService {
        MyFeedbackService { repo, config }
    }
}

#[async_trait]
impl FeedbackService for MyFeedbackService {
    async fn submit(
        &self,
        form: SubmissionForm,
        image: Option<UploadedImage>,
    ) -> Result<i64, SubmissionError> {
        let valid =
            validation::validate(&form).inspect_err(|e| info!("rejected submission: {e:?}"))?;

        // a blank file input arrives as a part with an empty name
        let upload = match image.filter(|image| !image.file_name.is_empty()) {
            Some(image) => match uploads::allowed_extension(&image.file_name) {
                Some(extension) => Some((image, extension)),
                None => {
                    info!("rejected upload {:?}", image.file_name);
                    return Err(SubmissionError::UnsupportedImageType);
                }
            },
            None => None,
        };

        let now = Local::now().naive_local();

        let image_path = match upload {
            Some((image, extension)) => Some(
                uploads::save_image(
                    &self.config.upload_dir(),
                    &image.file_name,
                    &extension,
                    &image.bytes,
                    now,
                )
                .await
                .map_err(|e| {
                    error!("failed to save upload: {e}");
                    SubmissionError::ImageNotSaved(e)
                })?,
            ),
            None => None,
        };

        let message = NewMessage {
            category: valid.category,
            content: valid.content,
            image: image_path,
            time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            service_attitude: Some(valid.service_attitude.score()),
            food_quality: Some(valid.food_quality.as_str().to_owned()),
            overall_rating: Some(valid.overall_rating.as_str().to_owned()),
        };

        self.repo.insert_message(message).await.map_err(|e| {
            error!("failed to store message: {e}");
            SubmissionError::StorageUnavailable(e)
        })
    }

    async fn list_messages(&self) -> Vec<Message> {
        self.repo.list_messages().await.unwrap_or_else(|e| {
            error!("failed to list messages: {e}");
            Vec::new()
        })
    }
}
