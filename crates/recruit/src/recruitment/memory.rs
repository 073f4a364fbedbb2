//! Process-local gateway used by the API service, the demo, and tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;

use super::domain::{
    Apply, ApplyId, Company, CompanyId, JobPost, JobPostFields, JobPostId, JobPostRecord,
    NewApply, NewCompany, NewJobPost, NewUser, User, UserId,
};
use super::gateway::{
    GatewayError, GatewayTransaction, RecruitmentGateway, APPLY_USER_JOB_POST_UNIQUE,
};
use super::search::SearchQuery;

#[derive(Debug, Clone, Default)]
struct Sequences {
    user: i64,
    company: i64,
    job_post: i64,
    apply: i64,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    companies: BTreeMap<CompanyId, Company>,
    job_posts: BTreeMap<JobPostId, JobPost>,
    applies: BTreeMap<ApplyId, Apply>,
    apply_pairs: HashSet<(UserId, JobPostId)>,
    sequences: Sequences,
}

/// Gateway keeping all rows behind one mutex.
///
/// A unit of work holds the lock from start to finish. Reads go straight to the committed rows;
/// the first write copies them into a staged set, which replaces the committed rows only when
/// the work succeeds. Units of work are therefore serialized and all-or-nothing.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: Mutex<StoreState>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecruitmentGateway for InMemoryGateway {
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn GatewayTransaction) -> Result<T, E>,
        E: From<GatewayError>,
    {
        // committed rows only change after a successful unit of work, so a panic mid-work
        // leaves them intact
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let (outcome, staged) = {
            let mut transaction = MemoryTransaction::new(&guard);
            let outcome = work(&mut transaction);
            (outcome, transaction.staged)
        };

        let value = outcome?;
        if let Some(staged) = staged {
            *guard = staged;
        }
        Ok(value)
    }
}

struct MemoryTransaction<'a> {
    committed: &'a StoreState,
    staged: Option<StoreState>,
}

impl<'a> MemoryTransaction<'a> {
    fn new(committed: &'a StoreState) -> Self {
        Self {
            committed,
            staged: None,
        }
    }

    fn rows(&self) -> &StoreState {
        self.staged.as_ref().unwrap_or(self.committed)
    }

    fn rows_mut(&mut self) -> &mut StoreState {
        let committed = self.committed;
        self.staged.get_or_insert_with(|| committed.clone())
    }

    fn company_of(&self, post: &JobPost) -> Result<&Company, GatewayError> {
        self.rows()
            .companies
            .get(&post.company_id)
            .ok_or(GatewayError::MissingReference {
                entity: "company",
                id: post.company_id.0,
            })
    }

    fn records_where<P>(&self, predicate: P) -> Result<Vec<JobPostRecord>, GatewayError>
    where
        P: Fn(&JobPost, &Company) -> bool,
    {
        let mut records = Vec::new();
        for post in self.rows().job_posts.values() {
            let company = self.company_of(post)?;
            if predicate(post, company) {
                records.push(JobPostRecord::new(post, company));
            }
        }
        Ok(records)
    }

    fn remove_applies_where<P>(&mut self, predicate: P)
    where
        P: Fn(&Apply) -> bool,
    {
        let doomed: Vec<ApplyId> = self
            .rows()
            .applies
            .values()
            .filter(|apply| predicate(apply))
            .map(|apply| apply.id)
            .collect();
        if doomed.is_empty() {
            return;
        }

        let rows = self.rows_mut();
        for id in doomed {
            if let Some(apply) = rows.applies.remove(&id) {
                rows.apply_pairs.remove(&(apply.user_id, apply.job_post_id));
            }
        }
    }
}

impl GatewayTransaction for MemoryTransaction<'_> {
    fn exists_apply(&self, user_id: UserId, job_post_id: JobPostId) -> Result<bool, GatewayError> {
        Ok(self.rows().apply_pairs.contains(&(user_id, job_post_id)))
    }

    fn insert_apply(&mut self, apply: NewApply) -> Result<Apply, GatewayError> {
        let rows = self.rows();
        if !rows.job_posts.contains_key(&apply.job_post_id) {
            return Err(GatewayError::MissingReference {
                entity: "job post",
                id: apply.job_post_id.0,
            });
        }
        if !rows.users.contains_key(&apply.user_id) {
            return Err(GatewayError::MissingReference {
                entity: "user",
                id: apply.user_id.0,
            });
        }
        if rows
            .apply_pairs
            .contains(&(apply.user_id, apply.job_post_id))
        {
            return Err(GatewayError::UniqueViolation {
                constraint: APPLY_USER_JOB_POST_UNIQUE,
            });
        }

        let rows = self.rows_mut();
        rows.sequences.apply += 1;
        let stored = Apply {
            id: ApplyId(rows.sequences.apply),
            job_post_id: apply.job_post_id,
            user_id: apply.user_id,
            created_at: Utc::now(),
        };
        rows.apply_pairs.insert((apply.user_id, apply.job_post_id));
        rows.applies.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn count_applies_for_job_post(&self, job_post_id: JobPostId) -> Result<usize, GatewayError> {
        Ok(self
            .rows()
            .applies
            .values()
            .filter(|apply| apply.job_post_id == job_post_id)
            .count())
    }

    fn find_job_post(&self, id: JobPostId) -> Result<Option<JobPost>, GatewayError> {
        Ok(self.rows().job_posts.get(&id).cloned())
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        Ok(self.rows().users.get(&id).cloned())
    }

    fn find_company(&self, id: CompanyId) -> Result<Option<Company>, GatewayError> {
        Ok(self.rows().companies.get(&id).cloned())
    }

    fn save_job_post(&mut self, post: NewJobPost) -> Result<JobPost, GatewayError> {
        if !self.rows().companies.contains_key(&post.company_id) {
            return Err(GatewayError::MissingReference {
                entity: "company",
                id: post.company_id.0,
            });
        }

        let rows = self.rows_mut();
        rows.sequences.job_post += 1;
        let now = Utc::now();
        let stored = JobPost {
            id: JobPostId(rows.sequences.job_post),
            company_id: post.company_id,
            fields: post.fields,
            created_at: now,
            updated_at: now,
        };
        rows.job_posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update_job_post_fields(
        &mut self,
        id: JobPostId,
        fields: JobPostFields,
    ) -> Result<Option<JobPost>, GatewayError> {
        if !self.rows().job_posts.contains_key(&id) {
            return Ok(None);
        }
        Ok(self.rows_mut().job_posts.get_mut(&id).map(|post| {
            post.update(fields, Utc::now());
            post.clone()
        }))
    }

    fn delete_job_post(&mut self, id: JobPostId) -> Result<bool, GatewayError> {
        if !self.rows().job_posts.contains_key(&id) {
            return Ok(false);
        }
        self.rows_mut().job_posts.remove(&id);
        self.remove_applies_where(|apply| apply.job_post_id == id);
        Ok(true)
    }

    fn list_all_job_posts(&self) -> Result<Vec<JobPostRecord>, GatewayError> {
        self.records_where(|_, _| true)
    }

    fn search_job_posts(&self, query: &SearchQuery) -> Result<Vec<JobPostRecord>, GatewayError> {
        self.records_where(|post, company| post.matches(company, query.as_str()))
    }

    fn list_sibling_job_post_ids(
        &self,
        company_id: CompanyId,
        exclude: JobPostId,
    ) -> Result<Vec<JobPostId>, GatewayError> {
        Ok(self
            .rows()
            .job_posts
            .values()
            .filter(|post| post.company_id == company_id && post.id != exclude)
            .map(|post| post.id)
            .collect())
    }

    fn insert_company(&mut self, company: NewCompany) -> Result<Company, GatewayError> {
        let rows = self.rows_mut();
        rows.sequences.company += 1;
        let stored = Company {
            id: CompanyId(rows.sequences.company),
            name: company.name,
            nation: company.nation,
            region: company.region,
        };
        rows.companies.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn insert_user(&mut self, user: NewUser) -> Result<User, GatewayError> {
        let rows = self.rows_mut();
        rows.sequences.user += 1;
        let stored = User {
            id: UserId(rows.sequences.user),
            name: user.name,
        };
        rows.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn delete_company(&mut self, id: CompanyId) -> Result<bool, GatewayError> {
        if !self.rows().companies.contains_key(&id) {
            return Ok(false);
        }
        self.rows_mut().companies.remove(&id);

        let owned: Vec<JobPostId> = self
            .rows()
            .job_posts
            .values()
            .filter(|post| post.company_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in owned {
            self.delete_job_post(post_id)?;
        }
        Ok(true)
    }

    fn delete_user(&mut self, id: UserId) -> Result<bool, GatewayError> {
        if !self.rows().users.contains_key(&id) {
            return Ok(false);
        }
        self.rows_mut().users.remove(&id);
        self.remove_applies_where(|apply| apply.user_id == id);
        Ok(true)
    }
}
