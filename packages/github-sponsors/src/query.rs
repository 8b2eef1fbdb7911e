//! GraphQL query construction.
//!
//! Pure string building. Logins are interpolated verbatim, so callers must
//! validate them first (the client does this in `validate_login`).

use chrono::SecondsFormat;

use crate::types::{AccountType, Direction, TotalAmountFilter};

/// Nodes requested per page (the API maximum).
pub const PAGE_SIZE: u32 = 100;

/// Field holding the lifetime amount an account has given.
pub const TOTAL_AMOUNT_FIELD: &str = "totalSponsorshipAmountAsSponsorInCents";

/// Build one page query over a sponsorship connection.
///
/// `after` is only emitted when a cursor is present.
pub fn sponsorships_query(
    login: &str,
    account_type: AccountType,
    direction: Direction,
    active_only: bool,
    cursor: Option<&str>,
) -> String {
    let after = cursor
        .map(|cursor| format!(", after: \"{cursor}\""))
        .unwrap_or_default();

    format!(
        r#"{{
  {account}(login: "{login}") {{
    {connection}(activeOnly: {active_only}, first: {page_size}{after}) {{
      totalCount
      pageInfo {{
        endCursor
        hasNextPage
      }}
      nodes {{
        createdAt
        privacyLevel
        isActive
        tier {{
          name
          isOneTime
          monthlyPriceInCents
          monthlyPriceInDollars
        }}
        {entity} {{
          __typename
          ...on Organization {{
            login
            name
            avatarUrl
            websiteUrl
          }}
          ...on User {{
            login
            name
            avatarUrl
            websiteUrl
          }}
        }}
      }}
    }}
  }}
}}"#,
        account = account_type.as_field(),
        connection = direction.connection_field(),
        entity = direction.entity_field(),
        page_size = PAGE_SIZE,
    )
}

/// Build the lifetime total-amount query.
///
/// Each filter argument is emitted only when set; an empty login list is omitted.
pub fn total_amount_query(
    login: &str,
    account_type: AccountType,
    filter: &TotalAmountFilter,
) -> String {
    let mut args = Vec::new();

    if let Some(since) = filter.since {
        args.push(format!(
            "since: \"{}\"",
            since.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    if let Some(until) = filter.until {
        args.push(format!(
            "until: \"{}\"",
            until.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    if !filter.sponsorable_logins.is_empty() {
        let logins = filter
            .sponsorable_logins
            .iter()
            .map(|login| format!("\"{login}\""))
            .collect::<Vec<_>>()
            .join(", ");
        args.push(format!("sponsorableLogins: [{logins}]"));
    }

    let args = if args.is_empty() {
        String::new()
    } else {
        format!("({})", args.join(", "))
    };

    format!(
        "{{\n  {account}(login: \"{login}\") {{\n    {TOTAL_AMOUNT_FIELD}{args}\n  }}\n}}",
        account = account_type.as_field(),
    )
}
