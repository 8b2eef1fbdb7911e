//! Cursor pagination over sponsorship connections.
//!
//! Pages are fetched strictly in sequence: each query depends on the
//! previous page's `endCursor`.

use tracing::debug;

use crate::credentials::GitHubToken;
use crate::error::Result;
use crate::query::sponsorships_query;
use crate::transport::{decode_response, extract, Transport};
use crate::types::{AccountType, Direction, RawSponsorship, SponsorshipConnection};

/// What to page through.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub login: &'a str,
    pub account_type: AccountType,
    pub direction: Direction,
    pub active_only: bool,
}

/// Fetch every node of a sponsorship connection.
///
/// Nodes come back in API order: page order, then node order within each
/// page. Any failure aborts the whole fetch.
pub async fn fetch_all_sponsorships<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    token: &GitHubToken,
    request: PageRequest<'_>,
) -> Result<Vec<RawSponsorship>> {
    let path = [
        request.account_type.as_field(),
        request.direction.connection_field(),
    ];
    let mut nodes = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 0usize;

    loop {
        let query = sponsorships_query(
            request.login,
            request.account_type,
            request.direction,
            request.active_only,
            cursor.as_deref(),
        );

        let body = transport.execute(endpoint, &query, token).await?;
        let data = decode_response(endpoint, body)?;
        let connection: SponsorshipConnection = extract(&data, &path)?;

        page += 1;
        let page_nodes = connection.nodes.unwrap_or_default();
        debug!(
            login = request.login,
            connection = request.direction.connection_field(),
            page,
            count = page_nodes.len(),
            total = connection.total_count,
            "Fetched sponsorship page"
        );
        nodes.extend(page_nodes.into_iter().flatten());

        let info = connection.page_info;
        cursor = if info.has_next_page {
            info.end_cursor
        } else {
            None
        };
        if cursor.is_none() {
            break;
        }
    }

    Ok(nodes)
}
