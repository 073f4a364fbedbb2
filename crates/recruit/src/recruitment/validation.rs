//! Request payloads accepted at the HTTP boundary and their field validation.
//!
//! Validation runs before a service is invoked and turns a raw payload into a typed command;
//! the services themselves never re-validate.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, JobPostFields, JobPostId, UserId};

/// One violated field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field rule a payload violated, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|error| error.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.first() {
            Some(first) => write!(f, "{}", first.message),
            None => write!(f, "check the request payload"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Payload for publishing a posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostRequest {
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub reward: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
}

/// Payload replacing a posting's mutable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostUpdateRequest {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub reward: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
}

/// Payload submitting an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub job_post_id: Option<i64>,
}

/// Validated input for `JobPostCatalogService::save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobPost {
    pub company_id: CompanyId,
    pub fields: JobPostFields,
}

/// Validated input for `ApplicationSubmissionService::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitApplication {
    pub user_id: UserId,
    pub job_post_id: JobPostId,
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn not_blank(&mut self, field: &'static str, value: Option<String>, message: &str) -> String {
        match value {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                self.0.push(FieldError::new(field, message));
                String::new()
            }
        }
    }

    fn non_negative(&mut self, field: &'static str, value: i64, message: &str) -> i64 {
        if value < 0 {
            self.0.push(FieldError::new(field, message));
        }
        value
    }

    fn present_id(
        &mut self,
        field: &'static str,
        value: Option<i64>,
        missing: &str,
        negative: &str,
    ) -> i64 {
        match value {
            Some(id) if id >= 0 => id,
            Some(id) => {
                self.0.push(FieldError::new(field, negative));
                id
            }
            None => {
                self.0.push(FieldError::new(field, missing));
                0
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

fn posting_fields(
    collector: &mut Collector,
    position: Option<String>,
    reward: i64,
    content: Option<String>,
    tech_stack: Option<String>,
) -> JobPostFields {
    JobPostFields {
        position: collector.not_blank("position", position, "enter the hiring position"),
        reward: collector.non_negative("reward", reward, "reward must be zero or greater"),
        content: collector.not_blank("content", content, "enter the posting content"),
        tech_stack: collector.not_blank("techStack", tech_stack, "enter the tech stack"),
    }
}

impl JobPostRequest {
    pub fn validate(self) -> Result<CreateJobPost, ValidationErrors> {
        let mut collector = Collector::default();
        let company_id = collector.present_id(
            "companyId",
            self.company_id,
            "enter the company",
            "check the company id",
        );
        let fields = posting_fields(
            &mut collector,
            self.position,
            self.reward,
            self.content,
            self.tech_stack,
        );
        collector.finish(CreateJobPost {
            company_id: CompanyId(company_id),
            fields,
        })
    }
}

impl JobPostUpdateRequest {
    pub fn validate(self) -> Result<JobPostFields, ValidationErrors> {
        let mut collector = Collector::default();
        let fields = posting_fields(
            &mut collector,
            self.position,
            self.reward,
            self.content,
            self.tech_stack,
        );
        collector.finish(fields)
    }
}

impl ApplyRequest {
    /// `path_job_post_id` is the posting addressed by the route; the body may repeat it but
    /// never contradict it.
    pub fn validate(self, path_job_post_id: i64) -> Result<SubmitApplication, ValidationErrors> {
        let mut collector = Collector::default();
        let user_id = collector.present_id(
            "userId",
            self.user_id,
            "enter the user",
            "check the user id",
        );
        let job_post_id = collector.present_id(
            "jobPostId",
            Some(self.job_post_id.unwrap_or(path_job_post_id)),
            "enter the job post",
            "check the job post id",
        );
        if job_post_id != path_job_post_id {
            collector.0.push(FieldError::new(
                "jobPostId",
                "job post id does not match the requested posting",
            ));
        }
        collector.finish(SubmitApplication {
            user_id: UserId(user_id),
            job_post_id: JobPostId(job_post_id),
        })
    }
}
