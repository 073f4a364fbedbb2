use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{
    CompanyId, JobPostDetail, JobPostFields, JobPostId, JobPostRecord, NewJobPost,
};
use super::gateway::{GatewayError, RecruitmentGateway};
use super::search::{self, InvalidSearchQuery};

/// Publishing, editing, listing, and searching job postings.
pub struct JobPostCatalogService<G> {
    gateway: Arc<G>,
}

impl<G> JobPostCatalogService<G>
where
    G: RecruitmentGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Publish a posting owned by `company_id`.
    pub fn save(
        &self,
        company_id: CompanyId,
        fields: JobPostFields,
    ) -> Result<JobPostRecord, CatalogError> {
        let record = self.gateway.atomically::<_, CatalogError, _>(|tx| {
            let company = tx
                .find_company(company_id)?
                .ok_or(CatalogError::CompanyNotFound(company_id))?;
            let post = tx.save_job_post(NewJobPost { company_id, fields })?;
            Ok(JobPostRecord::new(&post, &company))
        });

        match &record {
            Ok(record) => debug!(job_post_id = %record.job_post_id, %company_id, "job post saved"),
            Err(err) => warn!(%company_id, error = %err, "job post rejected"),
        }
        record
    }

    /// Replace position, reward, content, and tech stack. The owning company is kept.
    pub fn update(
        &self,
        id: JobPostId,
        fields: JobPostFields,
    ) -> Result<JobPostRecord, CatalogError> {
        let record = self.gateway.atomically::<_, CatalogError, _>(|tx| {
            let post = tx
                .update_job_post_fields(id, fields)?
                .ok_or(CatalogError::JobPostNotFound(id))?;
            let company = tx
                .find_company(post.company_id)?
                .ok_or(GatewayError::MissingReference {
                    entity: "company",
                    id: post.company_id.0,
                })?;
            Ok(JobPostRecord::new(&post, &company))
        });

        match &record {
            Ok(_) => debug!(job_post_id = %id, "job post updated"),
            Err(err) => warn!(job_post_id = %id, error = %err, "job post update rejected"),
        }
        record
    }

    /// Remove a posting and its applications. Removing an unknown posting is an error.
    pub fn delete(&self, id: JobPostId) -> Result<(), CatalogError> {
        let outcome = self.gateway.atomically::<_, CatalogError, _>(|tx| {
            if tx.find_job_post(id)?.is_none() {
                return Err(CatalogError::JobPostNotFound(id));
            }
            tx.delete_job_post(id)?;
            Ok(())
        });

        match &outcome {
            Ok(()) => debug!(job_post_id = %id, "job post deleted"),
            Err(err) => warn!(job_post_id = %id, error = %err, "job post delete rejected"),
        }
        outcome
    }

    pub fn get_all(&self) -> Result<Vec<JobPostRecord>, CatalogError> {
        let records = self
            .gateway
            .atomically::<_, CatalogError, _>(|tx| Ok(tx.list_all_job_posts()?));

        match &records {
            Ok(records) => debug!(count = records.len(), "job posts listed"),
            Err(err) => warn!(error = %err, "job post listing failed"),
        }
        records
    }

    /// Postings whose company name, nation, region, content, position, or tech stack contains
    /// `query`. The term is validated before storage is touched.
    pub fn search(&self, query: &str) -> Result<Vec<JobPostRecord>, CatalogError> {
        let records = search::validate(query)
            .map_err(CatalogError::from)
            .and_then(|valid| {
                self.gateway
                    .atomically::<_, CatalogError, _>(|tx| Ok(tx.search_job_posts(&valid)?))
            });

        match &records {
            Ok(records) => debug!(query, count = records.len(), "job posts searched"),
            Err(err) => warn!(query, error = %err, "job post search rejected"),
        }
        records
    }

    /// Listing entry point: no term (or an empty one) lists everything.
    pub fn get_list(&self, query: Option<&str>) -> Result<Vec<JobPostRecord>, CatalogError> {
        match query {
            None | Some("") => self.get_all(),
            Some(query) => self.search(query),
        }
    }

    /// The posting plus the ids of the other postings its company publishes.
    pub fn get_detail(&self, id: JobPostId) -> Result<JobPostDetail, CatalogError> {
        let detail = self.gateway.atomically::<_, CatalogError, _>(|tx| {
            let post = tx
                .find_job_post(id)?
                .ok_or(CatalogError::JobPostNotFound(id))?;
            let company = tx
                .find_company(post.company_id)?
                .ok_or(GatewayError::MissingReference {
                    entity: "company",
                    id: post.company_id.0,
                })?;
            let other_job_posts = tx.list_sibling_job_post_ids(post.company_id, id)?;
            Ok(JobPostDetail {
                post: JobPostRecord::new(&post, &company),
                other_job_posts,
            })
        });

        match &detail {
            Ok(detail) => debug!(
                job_post_id = %id,
                siblings = detail.other_job_posts.len(),
                "job post detail loaded"
            ),
            Err(err) => warn!(job_post_id = %id, error = %err, "job post detail rejected"),
        }
        detail
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    InvalidSearchQuery(#[from] InvalidSearchQuery),
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    #[error("job post {0} not found")]
    JobPostNotFound(JobPostId),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
