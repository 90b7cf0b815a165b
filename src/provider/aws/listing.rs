//! # Owned Job Listing
//!
//! Paginated lookup of Glue jobs tagged as owned by this controller.

use crate::constants::{LIST_JOBS_PAGE_SIZE, OWNER_TAG_KEY, OWNER_TAG_VALUE};
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_glue::Client as GlueClient;

/// One page of job names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPage {
    pub job_names: Vec<String>,
    pub next_token: Option<String>,
}

/// Source of owned job pages
#[async_trait]
pub trait JobLister: Send + Sync {
    async fn list_page(&self, next_token: Option<String>) -> Result<JobPage>;
}

/// Walk pages until `name` is found or the listing is exhausted
///
/// Stops at the first page containing the name. Any page failure aborts the walk.
pub async fn contains_job<L>(lister: &L, name: &str) -> Result<bool>
where
    L: JobLister + ?Sized,
{
    let mut next_token: Option<String> = None;
    let mut page_number = 0_usize;

    loop {
        page_number += 1;
        let page = lister
            .list_page(next_token.take())
            .await
            .with_context(|| format!("failed to get page {page_number} of owned Glue jobs"))?;

        if page.job_names.iter().any(|job_name| job_name == name) {
            return Ok(true);
        }

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => return Ok(false),
        }
    }
}

/// Lists jobs carrying the ownership tag through the Glue `ListJobs` API
#[derive(Debug)]
pub struct OwnedJobLister<'a> {
    client: &'a GlueClient,
}

impl<'a> OwnedJobLister<'a> {
    #[must_use]
    pub fn new(client: &'a GlueClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobLister for OwnedJobLister<'_> {
    async fn list_page(&self, next_token: Option<String>) -> Result<JobPage> {
        let output = self
            .client
            .list_jobs()
            .max_results(LIST_JOBS_PAGE_SIZE)
            .tags(OWNER_TAG_KEY, OWNER_TAG_VALUE)
            .set_next_token(next_token)
            .send()
            .await
            .context("ListJobs request failed")?;

        Ok(JobPage {
            job_names: output.job_names().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}
