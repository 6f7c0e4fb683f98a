//! DI "Interfaces"

use crate::core::validation::{SubmissionError, SubmissionForm, UploadedImage};
use crate::infrastructure::entities;
use async_trait::async_trait;

/// Notice shown after a stored submission.
pub const SUBMIT_SUCCESS_NOTICE: &str = "提交成功，谢谢你的留言！";

#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Validates the form, stores the optional image and persists the message.
    ///
    /// Returns the new message id, or the single reason the submission was
    /// rejected. Nothing is stored on `Err`, except an image file written
    /// before a failing insert.
    async fn submit(
        &self,
        form: SubmissionForm,
        image: Option<UploadedImage>,
    ) -> Result<i64, SubmissionError>;

    /// Lists all messages, newest first. Empty if the store cannot be read.
    async fn list_messages(&self) -> Vec<entities::Message>;
}
