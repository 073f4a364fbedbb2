//! CSV import of the companies and users that postings and applications refer to.
//!
//! Companies use the header `name,nation,region`, users the header `name`. Each file is loaded
//! in a single unit of work, so a malformed row leaves the store untouched.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::domain::{Company, NewCompany, NewUser, User};
use super::gateway::{GatewayError, RecruitmentGateway};

#[derive(Debug, Deserialize)]
struct CompanyRow {
    name: String,
    nation: String,
    region: String,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to open seed file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("row {row}: {source}")]
    Row { row: usize, source: csv::Error },
    #[error("row {row}: `{field}` must not be blank")]
    BlankField { row: usize, field: &'static str },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn read_rows<R, T>(reader: R) -> Result<Vec<T>, SeedError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize()
        .enumerate()
        // header is line 1, first data row is line 2
        .map(|(index, row)| row.map_err(|source| SeedError::Row { row: index + 2, source }))
        .collect()
}

fn require(row: usize, field: &'static str, value: String) -> Result<String, SeedError> {
    if value.is_empty() {
        Err(SeedError::BlankField { row, field })
    } else {
        Ok(value)
    }
}

pub fn import_companies<G, R>(gateway: &G, reader: R) -> Result<Vec<Company>, SeedError>
where
    G: RecruitmentGateway,
    R: Read,
{
    let rows: Vec<CompanyRow> = read_rows(reader)?;
    let companies = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let line = index + 2;
            Ok(NewCompany {
                name: require(line, "name", row.name)?,
                nation: require(line, "nation", row.nation)?,
                region: require(line, "region", row.region)?,
            })
        })
        .collect::<Result<Vec<_>, SeedError>>()?;

    let stored: Vec<Company> = gateway.atomically::<_, SeedError, _>(|tx| {
        companies
            .into_iter()
            .map(|company| tx.insert_company(company).map_err(SeedError::from))
            .collect()
    })?;
    info!(count = stored.len(), "companies imported");
    Ok(stored)
}

pub fn import_users<G, R>(gateway: &G, reader: R) -> Result<Vec<User>, SeedError>
where
    G: RecruitmentGateway,
    R: Read,
{
    let rows: Vec<UserRow> = read_rows(reader)?;
    let users = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            Ok(NewUser {
                name: require(index + 2, "name", row.name)?,
            })
        })
        .collect::<Result<Vec<_>, SeedError>>()?;

    let stored: Vec<User> = gateway.atomically::<_, SeedError, _>(|tx| {
        users
            .into_iter()
            .map(|user| tx.insert_user(user).map_err(SeedError::from))
            .collect()
    })?;
    info!(count = stored.len(), "users imported");
    Ok(stored)
}

pub fn import_companies_from_path<G>(
    gateway: &G,
    path: impl AsRef<Path>,
) -> Result<Vec<Company>, SeedError>
where
    G: RecruitmentGateway,
{
    import_companies(gateway, open(path.as_ref())?)
}

pub fn import_users_from_path<G>(
    gateway: &G,
    path: impl AsRef<Path>,
) -> Result<Vec<User>, SeedError>
where
    G: RecruitmentGateway,
{
    import_users(gateway, open(path.as_ref())?)
}

fn open(path: &Path) -> Result<File, SeedError> {
    File::open(path).map_err(|source| SeedError::Open {
        path: path.display().to_string(),
        source,
    })
}
