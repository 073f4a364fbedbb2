use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered user.
    UserId
);
entity_id!(
    /// Identifier of an employer.
    CompanyId
);
entity_id!(
    /// Identifier of a published job posting.
    JobPostId
);
entity_id!(
    /// Identifier of a submitted application.
    ApplyId
);

/// Registered user able to apply to postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// Employer owning zero or more job postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub nation: String,
    pub region: String,
}

impl Company {
    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            company_id: self.id,
            name: self.name.clone(),
            nation: self.nation.clone(),
            region: self.region.clone(),
        }
    }
}

/// The four fields of a posting that may be replaced after publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostFields {
    pub position: String,
    pub reward: i64,
    pub content: String,
    pub tech_stack: String,
}

/// Open position published by a company. The owning company never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: JobPostId,
    pub company_id: CompanyId,
    pub fields: JobPostFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPost {
    /// Replace the mutable fields in place, leaving identity and ownership untouched.
    pub fn update(&mut self, fields: JobPostFields, at: DateTime<Utc>) {
        self.fields = fields;
        self.updated_at = at;
    }

    /// Case-sensitive containment over the posting and its company's descriptive fields.
    pub fn matches(&self, company: &Company, query: &str) -> bool {
        [
            company.name.as_str(),
            company.nation.as_str(),
            company.region.as_str(),
            self.fields.content.as_str(),
            self.fields.position.as_str(),
            self.fields.tech_stack.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.contains(query))
    }
}

/// Posting payload before the gateway assigns identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobPost {
    pub company_id: CompanyId,
    pub fields: JobPostFields,
}

/// One user's submission to one posting; unique per `(user_id, job_post_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apply {
    pub id: ApplyId,
    pub job_post_id: JobPostId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewApply {
    pub job_post_id: JobPostId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub nation: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
}

/// Company fields exposed alongside every posting view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub company_id: CompanyId,
    pub name: String,
    pub nation: String,
    pub region: String,
}

/// Posting view paired with its owning company's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostRecord {
    pub job_post_id: JobPostId,
    pub position: String,
    pub reward: i64,
    pub content: String,
    pub tech_stack: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company: CompanySummary,
}

impl JobPostRecord {
    pub fn new(post: &JobPost, company: &Company) -> Self {
        Self {
            job_post_id: post.id,
            position: post.fields.position.clone(),
            reward: post.fields.reward,
            content: post.fields.content.clone(),
            tech_stack: post.fields.tech_stack.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            company: company.summary(),
        }
    }
}

/// Detail view: the full posting plus the ids of its sibling postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostDetail {
    #[serde(flatten)]
    pub post: JobPostRecord,
    pub other_job_posts: Vec<JobPostId>,
}

/// Denormalized view of a stored application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRecord {
    pub user_id: UserId,
    pub name: String,
    pub job_post_id: JobPostId,
    pub position: String,
    pub created_at: DateTime<Utc>,
}

impl ApplyRecord {
    pub fn new(apply: &Apply, user: &User, post: &JobPost) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            job_post_id: post.id,
            position: post.fields.position.clone(),
            created_at: apply.created_at,
        }
    }
}
