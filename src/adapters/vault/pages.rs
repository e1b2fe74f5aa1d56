//! Offset/limit pagination over vault collections
//!
//! Drives the pagination cursor for any [`PagedRecord`] collection and
//! streams each page to a caller-supplied sink, so the full collection
//! is never held in memory. Identifiers are tracked across the whole
//! fetch: a duplicate means the cursor has cycled or overlapped, and the
//! fetch aborts with a pagination-integrity failure instead of looping
//! forever or silently deduplicating.

use crate::adapters::vault::models::PageEnvelope;
use crate::adapters::vault::requester::VaultClient;
use crate::domain::records::PagedRecord;
use crate::domain::{CofferError, Result, VaultError};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

/// Drives offset/limit pagination for one collection fetch
///
/// The seen-identifier set and the offset cursor are scoped to a single
/// `fetch_all` call; the fetcher itself is cheap and can be rebuilt per
/// report.
pub struct PaginatedFetcher<'a> {
    client: &'a mut VaultClient,
    page_size: u64,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(client: &'a mut VaultClient, page_size: u64) -> Self {
        Self { client, page_size }
    }

    /// Fetch every page of a collection, streaming pages to `on_page`
    ///
    /// Pages are requested in strictly increasing offset order. The
    /// sequence ends on an empty page or one shorter than the page
    /// size. Returns the total number of records yielded.
    ///
    /// # Errors
    ///
    /// - request failures propagate from the requester (the fetch is
    ///   aborted, never resumed at a later offset)
    /// - a malformed page body is `VaultError::InvalidResponse`
    /// - a repeated record identifier is `VaultError::PaginationIntegrity`
    /// - errors from `on_page` abort the fetch
    pub async fn fetch_all<T, F>(
        &mut self,
        path: &str,
        filters: &[(String, String)],
        mut on_page: F,
    ) -> Result<u64>
    where
        T: DeserializeOwned + PagedRecord,
        F: FnMut(Vec<T>) -> Result<()>,
    {
        let mut offset: u64 = 0;
        let mut seen: HashSet<String> = HashSet::new();
        let mut total: u64 = 0;

        loop {
            let mut query: Vec<(String, String)> = vec![
                ("offset".to_string(), offset.to_string()),
                ("limit".to_string(), self.page_size.to_string()),
            ];
            query.extend(filters.iter().cloned());

            let body = self.client.get_json(path, &query).await?;
            let page: PageEnvelope<T> = serde_json::from_value(body).map_err(|e| {
                CofferError::Vault(VaultError::InvalidResponse(format!(
                    "unexpected page shape from {path}: {e}"
                )))
            })?;

            if page.value.is_empty() {
                tracing::debug!(endpoint = %path, offset, "Empty page, pagination complete");
                break;
            }

            let page_len = page.value.len() as u64;
            verify_unique_into(&page.value, &mut seen, path, offset)?;

            tracing::debug!(
                endpoint = %path,
                offset,
                records = page_len,
                kind = T::kind_name(),
                "Fetched page"
            );

            total += page_len;
            on_page(page.value)?;

            if page_len < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        tracing::info!(
            endpoint = %path,
            kind = T::kind_name(),
            total_records = total,
            "Pagination complete"
        );
        Ok(total)
    }
}

/// Check a batch of records against the seen-identifier set, adding
/// each new identifier as it goes.
fn verify_unique_into<T: PagedRecord>(
    records: &[T],
    seen: &mut HashSet<String>,
    endpoint: &str,
    offset: u64,
) -> Result<()> {
    for record in records {
        let id = record.record_id();
        if !seen.insert(id.clone()) {
            tracing::error!(
                endpoint = %endpoint,
                offset,
                record_id = %id,
                "Duplicate record identifier, pagination cursor is unreliable"
            );
            return Err(CofferError::Vault(VaultError::PaginationIntegrity {
                endpoint: endpoint.to_string(),
                offset,
                record_id: id,
            }));
        }
    }
    Ok(())
}

/// Verify that a single-shot listing carries no duplicate identifiers.
///
/// Used for collections the API serves in one response; the invariant
/// is the same as for paginated fetches.
pub fn verify_unique<T: PagedRecord>(records: &[T], endpoint: &str) -> Result<()> {
    let mut seen = HashSet::new();
    verify_unique_into(records, &mut seen, endpoint, 0)
}
