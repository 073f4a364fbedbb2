use chrono::Local;
use clap::Args;
use recruit::error::AppError;
use recruit::recruitment::seed::{
    import_companies, import_companies_from_path, import_users, import_users_from_path,
};
use recruit::recruitment::{
    ApplicationSubmissionService, Company, CompanyId, InMemoryGateway, JobPostCatalogService,
    JobPostFields, JobPostId, JobPostRecord, User, UserId,
};
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_COMPANIES: &str = "name,nation,region\n\
    Wanted,Korea,Seoul\n\
    Naver,Korea,Pangyo\n";

const SAMPLE_USERS: &str = "name\nJimin\nSora\n";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Companies CSV (`name,nation,region`). Defaults to a built-in sample.
    #[arg(long)]
    pub(crate) companies: Option<PathBuf>,
    /// Users CSV (`name`). Defaults to a built-in sample.
    #[arg(long)]
    pub(crate) users: Option<PathBuf>,
    /// Search term used in the listing step
    #[arg(long, default_value = "Python")]
    pub(crate) search: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let gateway = Arc::new(InMemoryGateway::new());
    let (companies, users) = seed_demo_directory(gateway.as_ref(), &args)?;
    let catalog = JobPostCatalogService::new(gateway.clone());
    let submissions = ApplicationSubmissionService::new(gateway.clone());

    println!("Recruitment demo ({})", Local::now().format("%Y-%m-%d %H:%M"));
    println!(
        "Directory: {} companies, {} users",
        companies.len(),
        users.len()
    );

    let (Some(first_company), Some(first_user)) = (companies.first(), users.first()) else {
        println!("Nothing to demonstrate: seed at least one company and one user");
        return Ok(());
    };
    let second_company = companies.get(1).unwrap_or(first_company);

    println!("\nPublishing postings");
    let postings = [
        (
            first_company.id,
            posting("Backend Engineer", 1_500_000, "Python/Django"),
        ),
        (
            first_company.id,
            posting("Frontend Engineer", 1_000_000, "React"),
        ),
        (
            second_company.id,
            posting("Data Engineer", 1_200_000, "Python/Spark"),
        ),
    ];
    let mut published = Vec::new();
    for (company_id, fields) in postings {
        match catalog.save(company_id, fields) {
            Ok(record) => {
                print_record(&record);
                published.push(record);
            }
            Err(err) => println!("  Posting rejected: {}", err),
        }
    }
    match catalog.save(CompanyId(i64::MAX), posting("Ghost", 0, "None")) {
        Ok(record) => print_record(&record),
        Err(err) => println!("  Posting for unknown company rejected: {}", err),
    }

    println!("\nSearching for '{}'", args.search);
    match catalog.get_list(Some(&args.search)) {
        Ok(hits) if hits.is_empty() => println!("  No postings matched"),
        Ok(hits) => hits.iter().for_each(print_record),
        Err(err) => println!("  Search rejected: {}", err),
    }
    match catalog.search("abc$") {
        Ok(hits) => println!("  Unexpected match count for 'abc$': {}", hits.len()),
        Err(err) => println!("  Search for 'abc$' rejected: {}", err),
    }

    let Some(target) = published.first() else {
        return Ok(());
    };

    println!("\nDetail of job post {}", target.job_post_id);
    match catalog.get_detail(target.job_post_id) {
        Ok(detail) => {
            print_record(&detail.post);
            println!(
                "  Other postings by {}: {:?}",
                detail.post.company.name, detail.other_job_posts
            );
        }
        Err(err) => println!("  Detail unavailable: {}", err),
    }

    println!("\nApplications");
    demo_apply(&submissions, first_user, target.job_post_id);
    demo_apply(&submissions, first_user, target.job_post_id);
    demo_apply(&submissions, first_user, JobPostId(i64::MAX));
    if let Some(second_user) = users.get(1) {
        demo_apply(&submissions, second_user, target.job_post_id);
    }
    match submissions.apply(UserId(i64::MAX), target.job_post_id) {
        Ok(record) => println!("  Unexpected application by {}", record.name),
        Err(err) => println!("  Unknown user rejected: {}", err),
    }

    println!("\nUpdating and removing job post {}", target.job_post_id);
    match catalog.update(
        target.job_post_id,
        posting("Senior Backend Engineer", 2_000_000, "Python/Django"),
    ) {
        Ok(record) => print_record(&record),
        Err(err) => println!("  Update rejected: {}", err),
    }
    match catalog.delete(target.job_post_id) {
        Ok(()) => println!("  Removed job post {}", target.job_post_id),
        Err(err) => println!("  Removal rejected: {}", err),
    }
    match catalog.delete(target.job_post_id) {
        Ok(()) => println!("  Unexpected second removal"),
        Err(err) => println!("  Second removal rejected: {}", err),
    }

    match catalog.get_all() {
        Ok(remaining) => println!("\nRemaining postings: {}", remaining.len()),
        Err(err) => println!("\nListing unavailable: {}", err),
    }
    Ok(())
}

fn seed_demo_directory(
    gateway: &InMemoryGateway,
    args: &DemoArgs,
) -> Result<(Vec<Company>, Vec<User>), AppError> {
    let companies = match &args.companies {
        Some(path) => import_companies_from_path(gateway, path)?,
        None => import_companies(gateway, SAMPLE_COMPANIES.as_bytes())?,
    };
    let users = match &args.users {
        Some(path) => import_users_from_path(gateway, path)?,
        None => import_users(gateway, SAMPLE_USERS.as_bytes())?,
    };
    Ok((companies, users))
}

fn demo_apply(
    submissions: &ApplicationSubmissionService<InMemoryGateway>,
    user: &User,
    job_post_id: JobPostId,
) {
    match submissions.apply(user.id, job_post_id) {
        Ok(record) => println!(
            "  {} applied to #{} {} at {}",
            record.name,
            record.job_post_id,
            record.position,
            record.created_at.format("%H:%M:%S")
        ),
        Err(err) => println!("  {} rejected: {}", user.name, err),
    }
}

fn posting(position: &str, reward: i64, tech_stack: &str) -> JobPostFields {
    JobPostFields {
        position: position.to_string(),
        reward,
        content: format!("Join us as a {position}"),
        tech_stack: tech_stack.to_string(),
    }
}

fn print_record(record: &JobPostRecord) {
    println!(
        "  #{} {} at {} ({}/{}) reward {} [{}]",
        record.job_post_id,
        record.position,
        record.company.name,
        record.company.nation,
        record.company.region,
        record.reward,
        record.tech_stack
    );
}
