//! Survey form validation.
//!
//! Checks run in a fixed order and the first failure wins; callers get exactly
//! one reason back.

use std::fmt;
use std::str::FromStr;

/// The only category currently offered.
pub const CATEGORY: &str = "炸串";

/// Raw form fields as received from the submitter.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub category: String,
    pub content: String,
    pub service_attitude: String,
    pub food_quality: String,
    pub overall_rating: String,
}

/// An uploaded file, possibly with an empty name when the field was left blank.
#[derive(Debug, Clone, Default)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyField {
    ServiceAttitude,
    FoodQuality,
    OverallRating,
}

impl SurveyField {
    pub fn name(self) -> &'static str {
        match self {
            SurveyField::ServiceAttitude => "service_attitude",
            SurveyField::FoodQuality => "food_quality",
            SurveyField::OverallRating => "overall_rating",
        }
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a submission was not stored. `Display` is the notice shown to the submitter.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("留言内容不能为空")]
    EmptyContent,

    #[error("{}", invalid_field_notice(.0))]
    InvalidSurveyField(SurveyField),

    #[error("图片格式不支持，请上传 png/jpg/jpeg/gif/webp")]
    UnsupportedImageType,

    #[error("图片保存失败，请稍后再试")]
    ImageNotSaved(#[source] std::io::Error),

    #[error("提交失败，请稍后再试")]
    StorageUnavailable(#[source] crate::infrastructure::traits::StoreError),
}

fn invalid_field_notice(field: &SurveyField) -> &'static str {
    match field {
        SurveyField::ServiceAttitude => "请选择：服务态度（0 / 20 / 60 / 100）",
        SurveyField::FoodQuality => "请选择：食物品质（难吞 / 还行 / 好吃 / 超级好吃）",
        SurveyField::OverallRating => "请选择：综合评分（饿死都不来 / 偶尔会来 / 天天都来）",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAttitude {
    Zero,
    Twenty,
    Sixty,
    Hundred,
}

impl ServiceAttitude {
    pub fn score(self) -> i32 {
        match self {
            ServiceAttitude::Zero => 0,
            ServiceAttitude::Twenty => 20,
            ServiceAttitude::Sixty => 60,
            ServiceAttitude::Hundred => 100,
        }
    }
}

impl FromStr for ServiceAttitude {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i32>() {
            Ok(0) => Ok(ServiceAttitude::Zero),
            Ok(20) => Ok(ServiceAttitude::Twenty),
            Ok(60) => Ok(ServiceAttitude::Sixty),
            Ok(100) => Ok(ServiceAttitude::Hundred),
            _ => Err(SubmissionError::InvalidSurveyField(
                SurveyField::ServiceAttitude,
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodQuality {
    Awful,
    Passable,
    Tasty,
    Delicious,
}

impl FoodQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            FoodQuality::Awful => "难吞",
            FoodQuality::Passable => "还行",
            FoodQuality::Tasty => "好吃",
            FoodQuality::Delicious => "超级好吃",
        }
    }
}

impl FromStr for FoodQuality {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "难吞" => Ok(FoodQuality::Awful),
            "还行" => Ok(FoodQuality::Passable),
            "好吃" => Ok(FoodQuality::Tasty),
            "超级好吃" => Ok(FoodQuality::Delicious),
            _ => Err(SubmissionError::InvalidSurveyField(SurveyField::FoodQuality)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallRating {
    NeverAgain,
    Sometimes,
    EveryDay,
}

impl OverallRating {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallRating::NeverAgain => "饿死都不来",
            OverallRating::Sometimes => "偶尔会来",
            OverallRating::EveryDay => "天天都来",
        }
    }
}

impl FromStr for OverallRating {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "饿死都不来" => Ok(OverallRating::NeverAgain),
            "偶尔会来" => Ok(OverallRating::Sometimes),
            "天天都来" => Ok(OverallRating::EveryDay),
            _ => Err(SubmissionError::InvalidSurveyField(
                SurveyField::OverallRating,
            )),
        }
    }
}

/// A form that passed every field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub category: String,
    pub content: String,
    pub service_attitude: ServiceAttitude,
    pub food_quality: FoodQuality,
    pub overall_rating: OverallRating,
}

pub fn validate(form: &SubmissionForm) -> Result<ValidSubmission, SubmissionError> {
    let content = form.content.trim();
    if content.is_empty() {
        return Err(SubmissionError::EmptyContent);
    }

    Ok(ValidSubmission {
        // any other category is replaced, there is only one
        category: CATEGORY.to_owned(),
        content: content.to_owned(),
        service_attitude: form.service_attitude.trim().parse()?,
        food_quality: form.food_quality.trim().parse()?,
        overall_rating: form.overall_rating.trim().parse()?,
    })
}
