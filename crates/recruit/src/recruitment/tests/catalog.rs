use std::sync::Arc;

use super::common::*;
use crate::recruitment::domain::{CompanyId, JobPostFields, JobPostId};
use crate::recruitment::gateway::GatewayError;
use crate::recruitment::{CatalogError, JobPostCatalogService};

#[test]
fn save_returns_record_with_company_summary() {
    let fixture = Fixture::new();
    let record = fixture
        .catalog()
        .save(fixture.acme.id, fields("Backend Engineer", "Rust"))
        .expect("saved");

    assert_eq!(record.job_post_id, JobPostId(1));
    assert_eq!(record.position, "Backend Engineer");
    assert_eq!(record.company.company_id, fixture.acme.id);
    assert_eq!(record.company.name, "Acme");
    assert_eq!(record.created_at, record.updated_at);
}

#[test]
fn save_rejects_unknown_company() {
    let fixture = Fixture::new();
    match fixture
        .catalog()
        .save(CompanyId(99), fields("Backend Engineer", "Rust"))
    {
        Err(CatalogError::CompanyNotFound(CompanyId(99))) => {}
        other => panic!("expected company not found, got {other:?}"),
    }
    assert!(fixture.catalog().get_all().expect("listed").is_empty());
}

#[test]
fn update_replaces_mutable_fields_only() {
    let fixture = Fixture::new();
    let before = fixture.post(fixture.acme.id, "Backend Engineer", "Java/Spring");

    let updated = fixture
        .catalog()
        .update(
            before.job_post_id,
            JobPostFields {
                position: "Platform Engineer".to_string(),
                reward: 0,
                content: "Run the clusters".to_string(),
                tech_stack: "Kubernetes".to_string(),
            },
        )
        .expect("updated");

    assert_eq!(updated.job_post_id, before.job_post_id);
    assert_eq!(updated.company, before.company);
    assert_eq!(updated.created_at, before.created_at);
    assert!(updated.updated_at >= before.updated_at);
    assert_eq!(updated.position, "Platform Engineer");
    assert_eq!(updated.reward, 0);
    assert_eq!(updated.tech_stack, "Kubernetes");

    let stored = fixture
        .find_job_post(before.job_post_id)
        .expect("still stored");
    assert_eq!(stored.company_id, fixture.acme.id);
    assert_eq!(stored.fields.content, "Run the clusters");
}

#[test]
fn update_rejects_unknown_posting() {
    let fixture = Fixture::new();
    assert!(matches!(
        fixture.catalog().update(JobPostId(5), fields("x", "y")),
        Err(CatalogError::JobPostNotFound(JobPostId(5)))
    ));
}

#[test]
fn update_does_not_validate_fields() {
    let fixture = Fixture::new();
    let before = fixture.post(fixture.acme.id, "Backend Engineer", "Rust");

    let updated = fixture
        .catalog()
        .update(before.job_post_id, fields("", "Rust"))
        .expect("core persists whatever it is given");
    assert_eq!(updated.position, "");
}

#[test]
fn delete_twice_reports_not_found_the_second_time() {
    let fixture = Fixture::new();
    let catalog = fixture.catalog();
    let post = fixture.post(fixture.acme.id, "Backend Engineer", "Rust");

    catalog.delete(post.job_post_id).expect("first delete succeeds");
    assert!(fixture.find_job_post(post.job_post_id).is_none());

    match catalog.delete(post.job_post_id) {
        Err(CatalogError::JobPostNotFound(id)) => assert_eq!(id, post.job_post_id),
        other => panic!("expected not found on second delete, got {other:?}"),
    }
}

#[test]
fn delete_of_unknown_posting_removes_nothing() {
    let fixture = Fixture::new();
    fixture.post(fixture.acme.id, "Backend Engineer", "Rust");

    assert!(matches!(
        fixture.catalog().delete(JobPostId(42)),
        Err(CatalogError::JobPostNotFound(JobPostId(42)))
    ));
    assert_eq!(fixture.catalog().get_all().expect("listed").len(), 1);
}

#[test]
fn delete_cascades_to_applications() {
    let fixture = Fixture::new();
    let post = fixture.post(fixture.acme.id, "Backend Engineer", "Rust");
    fixture
        .submissions()
        .apply(fixture.alice.id, post.job_post_id)
        .expect("applied");
    assert_eq!(fixture.applies_for(post.job_post_id), 1);

    fixture.catalog().delete(post.job_post_id).expect("deleted");

    assert_eq!(fixture.applies_for(post.job_post_id), 0);
}

#[test]
fn get_all_pairs_every_posting_with_its_company() {
    let fixture = Fixture::new();
    fixture.post(fixture.acme.id, "Backend Engineer", "Rust");
    fixture.post(fixture.globex.id, "Designer", "Figma");

    let all = fixture.catalog().get_all().expect("listed");
    let owners: Vec<_> = all
        .iter()
        .map(|record| record.company.name.as_str())
        .collect();
    assert_eq!(owners, vec!["Acme", "Globex"]);
}

#[test]
fn search_matches_tech_stack() {
    let fixture = Fixture::new();
    let python = fixture.post(fixture.acme.id, "Backend Engineer", "Python/Django");
    let react = fixture.post(fixture.acme.id, "Frontend Engineer", "React");
    let catalog = fixture.catalog();

    let found = catalog.search("Python").expect("search runs");
    assert_eq!(
        found.iter().map(|r| r.job_post_id).collect::<Vec<_>>(),
        vec![python.job_post_id]
    );

    let found = catalog.search("React").expect("search runs");
    assert_eq!(
        found.iter().map(|r| r.job_post_id).collect::<Vec<_>>(),
        vec![react.job_post_id]
    );
}

#[test]
fn search_matches_company_fields() {
    let fixture = Fixture::new();
    fixture.post(fixture.acme.id, "Backend Engineer", "Rust");
    let globex = fixture.post(fixture.globex.id, "Designer", "Figma");
    let catalog = fixture.catalog();

    for query in ["Globex", "Korea", "Seoul"] {
        let found = catalog.search(query).expect("search runs");
        assert_eq!(found.len(), 1, "query {query}");
        assert_eq!(found[0].job_post_id, globex.job_post_id);
    }
}

#[test]
fn search_is_case_sensitive() {
    let fixture = Fixture::new();
    fixture.post(fixture.acme.id, "Backend Engineer", "Python/Django");
    assert!(fixture.catalog().search("python").expect("runs").is_empty());
}

#[test]
fn invalid_search_never_touches_storage() {
    let gateway = Arc::new(CountingGateway::default());
    let catalog = JobPostCatalogService::new(gateway.clone());

    match catalog.search("abc$") {
        Err(CatalogError::InvalidSearchQuery(err)) => assert_eq!(err.query, "abc$"),
        other => panic!("expected invalid search query, got {other:?}"),
    }
    assert!(matches!(
        catalog.get_list(Some("50%")),
        Err(CatalogError::InvalidSearchQuery(_))
    ));
    assert_eq!(gateway.units_of_work(), 0);

    catalog.search("abc").expect("valid search runs");
    assert_eq!(gateway.units_of_work(), 1);
}

#[test]
fn get_list_without_term_equals_get_all() {
    let fixture = Fixture::new();
    fixture.post(fixture.acme.id, "Backend Engineer", "Rust");
    fixture.post(fixture.globex.id, "Designer", "Figma");
    let catalog = fixture.catalog();

    let all = catalog.get_all().expect("listed");
    assert_eq!(catalog.get_list(None).expect("listed"), all);
    assert_eq!(catalog.get_list(Some("")).expect("listed"), all);
}

#[test]
fn get_list_with_term_searches() {
    let fixture = Fixture::new();
    fixture.post(fixture.acme.id, "Backend Engineer", "Rust");
    let designer = fixture.post(fixture.globex.id, "Designer", "Figma");

    let found = fixture.catalog().get_list(Some("Figma")).expect("searched");
    assert_eq!(found, vec![designer]);
}

#[test]
fn detail_lists_siblings_from_same_company_only() {
    let fixture = Fixture::new();
    let j1 = fixture.post(fixture.acme.id, "Backend Engineer", "Rust");
    let j2 = fixture.post(fixture.acme.id, "Frontend Engineer", "React");
    fixture.post(fixture.globex.id, "Designer", "Figma");
    let j3 = fixture.post(fixture.acme.id, "Data Engineer", "Spark");

    let detail = fixture.catalog().get_detail(j1.job_post_id).expect("detail");

    assert_eq!(detail.post, j1);
    assert_eq!(detail.other_job_posts, vec![j2.job_post_id, j3.job_post_id]);
}

#[test]
fn detail_of_only_posting_has_no_siblings() {
    let fixture = Fixture::new();
    let only = fixture.post(fixture.globex.id, "Designer", "Figma");
    let detail = fixture
        .catalog()
        .get_detail(only.job_post_id)
        .expect("detail");
    assert!(detail.other_job_posts.is_empty());
}

#[test]
fn detail_rejects_unknown_posting() {
    let fixture = Fixture::new();
    assert!(matches!(
        fixture.catalog().get_detail(JobPostId(3)),
        Err(CatalogError::JobPostNotFound(JobPostId(3)))
    ));
}

#[test]
fn rejected_operations_log_a_warning() {
    let fixture = Fixture::new();
    let catalog = fixture.catalog();

    let cases: [(&str, Box<dyn Fn() -> bool>); 4] = [
        (
            "job post update rejected",
            Box::new(|| catalog.update(JobPostId(7), fields("x", "y")).is_err()),
        ),
        (
            "job post delete rejected",
            Box::new(|| catalog.delete(JobPostId(7)).is_err()),
        ),
        (
            "job post detail rejected",
            Box::new(|| catalog.get_detail(JobPostId(7)).is_err()),
        ),
        (
            "job post search rejected",
            Box::new(|| catalog.search("abc$").is_err()),
        ),
    ];

    for (message, operation) in cases {
        let (failed, logs) = capture_logs(|| operation());
        assert!(failed, "{message}");
        assert!(logs.contains("WARN"), "{message}: {logs}");
        assert!(logs.contains(message), "{message}: {logs}");
        assert!(!logs.contains("DEBUG"), "{message}: {logs}");
    }
}

#[test]
fn successful_update_logs_at_debug_only() {
    let fixture = Fixture::new();
    let post = fixture.post(fixture.acme.id, "Backend Engineer", "Rust");

    let (updated, logs) = capture_logs(|| {
        fixture
            .catalog()
            .update(post.job_post_id, fields("Staff Engineer", "Rust"))
    });

    updated.expect("updated");
    assert!(logs.contains("DEBUG"), "{logs}");
    assert!(logs.contains("job post updated"), "{logs}");
    assert!(!logs.contains("WARN"), "{logs}");
}

#[test]
fn gateway_outage_is_reported_not_swallowed() {
    let catalog = JobPostCatalogService::new(Arc::new(UnavailableGateway));
    assert!(matches!(
        catalog.get_all(),
        Err(CatalogError::Gateway(GatewayError::Unavailable(_)))
    ));
    assert!(matches!(
        catalog.delete(JobPostId(1)),
        Err(CatalogError::Gateway(GatewayError::Unavailable(_)))
    ));
}
