use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use crate::recruitment::domain::{
    Apply, Company, CompanyId, JobPost, JobPostFields, JobPostId, JobPostRecord, NewApply,
    NewCompany, NewJobPost, NewUser, User, UserId,
};
use crate::recruitment::gateway::{GatewayError, GatewayTransaction, RecruitmentGateway};
use crate::recruitment::memory::InMemoryGateway;
use crate::recruitment::search::SearchQuery;
use crate::recruitment::{
    recruitment_router, ApplicationSubmissionService, JobPostCatalogService, RecruitmentServices,
};

pub(super) fn fields(position: &str, tech_stack: &str) -> JobPostFields {
    JobPostFields {
        position: position.to_string(),
        reward: 1_000_000,
        content: format!("{position} wanted"),
        tech_stack: tech_stack.to_string(),
    }
}

pub(super) fn company(name: &str, nation: &str, region: &str) -> NewCompany {
    NewCompany {
        name: name.to_string(),
        nation: nation.to_string(),
        region: region.to_string(),
    }
}

/// Gateway preloaded with two companies and two users.
pub(super) struct Fixture {
    pub(super) gateway: Arc<InMemoryGateway>,
    pub(super) acme: Company,
    pub(super) globex: Company,
    pub(super) alice: User,
    pub(super) bob: User,
}

impl Fixture {
    pub(super) fn new() -> Self {
        let gateway = Arc::new(InMemoryGateway::new());
        let (acme, globex, alice, bob) = gateway
            .atomically::<_, GatewayError, _>(|tx| {
                let acme = tx.insert_company(company("Acme", "X", "Y"))?;
                let globex = tx.insert_company(company("Globex", "Korea", "Seoul"))?;
                let alice = tx.insert_user(NewUser {
                    name: "Alice".to_string(),
                })?;
                let bob = tx.insert_user(NewUser {
                    name: "Bob".to_string(),
                })?;
                Ok((acme, globex, alice, bob))
            })
            .expect("fixture seeds");

        Self {
            gateway,
            acme,
            globex,
            alice,
            bob,
        }
    }

    pub(super) fn catalog(&self) -> JobPostCatalogService<InMemoryGateway> {
        JobPostCatalogService::new(self.gateway.clone())
    }

    pub(super) fn submissions(&self) -> ApplicationSubmissionService<InMemoryGateway> {
        ApplicationSubmissionService::new(self.gateway.clone())
    }

    pub(super) fn router(&self) -> axum::Router {
        recruitment_router(Arc::new(RecruitmentServices::new(self.gateway.clone())))
    }

    pub(super) fn post(&self, company: CompanyId, position: &str, tech_stack: &str) -> JobPostRecord {
        self.catalog()
            .save(company, fields(position, tech_stack))
            .expect("posting saved")
    }

    pub(super) fn find_job_post(&self, id: JobPostId) -> Option<JobPost> {
        self.gateway
            .atomically::<_, GatewayError, _>(|tx| tx.find_job_post(id))
            .expect("lookup succeeds")
    }

    pub(super) fn applies_for(&self, id: JobPostId) -> usize {
        self.gateway
            .atomically::<_, GatewayError, _>(|tx| tx.count_applies_for_job_post(id))
            .expect("count succeeds")
    }
}

/// Wraps the in-memory gateway and counts units of work.
#[derive(Default)]
pub(super) struct CountingGateway {
    inner: InMemoryGateway,
    units_of_work: AtomicUsize,
}

impl CountingGateway {
    pub(super) fn units_of_work(&self) -> usize {
        self.units_of_work.load(Ordering::SeqCst)
    }
}

impl RecruitmentGateway for CountingGateway {
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GatewayTransaction) -> Result<T, E>,
        E: From<GatewayError>,
    {
        self.units_of_work.fetch_add(1, Ordering::SeqCst);
        self.inner.atomically(work)
    }
}

/// Gateway whose existence check never sees committed applications, as when two requests race
/// past the pre-check. Only the uniqueness constraint can reject the duplicate.
pub(super) struct StaleCheckGateway {
    pub(super) inner: Arc<InMemoryGateway>,
}

impl RecruitmentGateway for StaleCheckGateway {
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GatewayTransaction) -> Result<T, E>,
        E: From<GatewayError>,
    {
        self.inner.atomically(|tx| {
            let mut stale = StaleCheck { inner: tx };
            work(&mut stale)
        })
    }
}

struct StaleCheck<'a, T: ?Sized> {
    inner: &'a mut T,
}

impl<T> GatewayTransaction for StaleCheck<'_, T>
where
    T: GatewayTransaction + ?Sized,
{
    fn exists_apply(&self, _user_id: UserId, _job_post_id: JobPostId) -> Result<bool, GatewayError> {
        Ok(false)
    }

    fn insert_apply(&mut self, apply: NewApply) -> Result<Apply, GatewayError> {
        self.inner.insert_apply(apply)
    }

    fn count_applies_for_job_post(&self, job_post_id: JobPostId) -> Result<usize, GatewayError> {
        self.inner.count_applies_for_job_post(job_post_id)
    }

    fn find_job_post(&self, id: JobPostId) -> Result<Option<JobPost>, GatewayError> {
        self.inner.find_job_post(id)
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        self.inner.find_user(id)
    }

    fn find_company(&self, id: CompanyId) -> Result<Option<Company>, GatewayError> {
        self.inner.find_company(id)
    }

    fn save_job_post(&mut self, post: NewJobPost) -> Result<JobPost, GatewayError> {
        self.inner.save_job_post(post)
    }

    fn update_job_post_fields(
        &mut self,
        id: JobPostId,
        fields: JobPostFields,
    ) -> Result<Option<JobPost>, GatewayError> {
        self.inner.update_job_post_fields(id, fields)
    }

    fn delete_job_post(&mut self, id: JobPostId) -> Result<bool, GatewayError> {
        self.inner.delete_job_post(id)
    }

    fn list_all_job_posts(&self) -> Result<Vec<JobPostRecord>, GatewayError> {
        self.inner.list_all_job_posts()
    }

    fn search_job_posts(&self, query: &SearchQuery) -> Result<Vec<JobPostRecord>, GatewayError> {
        self.inner.search_job_posts(query)
    }

    fn list_sibling_job_post_ids(
        &self,
        company_id: CompanyId,
        exclude: JobPostId,
    ) -> Result<Vec<JobPostId>, GatewayError> {
        self.inner.list_sibling_job_post_ids(company_id, exclude)
    }

    fn insert_company(&mut self, company: NewCompany) -> Result<Company, GatewayError> {
        self.inner.insert_company(company)
    }

    fn insert_user(&mut self, user: NewUser) -> Result<User, GatewayError> {
        self.inner.insert_user(user)
    }

    fn delete_company(&mut self, id: CompanyId) -> Result<bool, GatewayError> {
        self.inner.delete_company(id)
    }

    fn delete_user(&mut self, id: UserId) -> Result<bool, GatewayError> {
        self.inner.delete_user(id)
    }
}

/// Gateway that cannot open a unit of work.
pub(super) struct UnavailableGateway;

impl RecruitmentGateway for UnavailableGateway {
    fn atomically<T, E, F>(&self, _work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GatewayTransaction) -> Result<T, E>,
        E: From<GatewayError>,
    {
        Err(GatewayError::Unavailable("database offline".to_string()).into())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Shared sink for formatted log lines.
#[derive(Clone, Default)]
pub(super) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer lock");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a debug-level subscriber installed on this thread and return what it logged.
pub(super) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, buffer.contents())
}
