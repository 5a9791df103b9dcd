//! Lookup of custom domain associations
//!
//! App Runner only lists custom domains per service, so finding one
//! association means paging through the service's listing and filtering
//! client-side.
//!
//! A missing parent service (`ResourceNotFoundException`) and an absent
//! association both surface as [`Error::NotFound`].

use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::AppRunnerApi;
use crate::types::{
    CustomDomainAssociation, DescribeCustomDomainsInput, DescribeCustomDomainsPage,
};

/// Position in a paginated listing
enum PageCursor {
    Start,
    Next(String),
    Done,
}

/// Lazily page through the custom domains of a service
///
/// Nothing is fetched until the stream is polled. Calling this again starts
/// a fresh listing from the first page.
pub fn custom_domain_pages<'a>(
    api: &'a dyn AppRunnerApi,
    service_arn: &'a str,
) -> impl Stream<Item = Result<DescribeCustomDomainsPage>> + Send + 'a {
    stream::try_unfold(PageCursor::Start, move |cursor| async move {
        let next_token = match cursor {
            PageCursor::Done => return Ok::<_, Error>(None),
            PageCursor::Start => None,
            PageCursor::Next(token) => Some(token),
        };

        let input = DescribeCustomDomainsInput {
            service_arn: service_arn.to_string(),
            next_token,
            max_results: None,
        };

        let page = api.describe_custom_domains(&input).await.map_err(|e| {
            if e.is_resource_not_found() {
                Error::not_found(format!("App Runner Service ({service_arn}): {e}"))
            } else {
                e
            }
        })?;

        debug!(
            "Fetched page of {} custom domain(s) for {}",
            page.custom_domains.len(),
            service_arn
        );

        let cursor = match page.next_token.as_deref() {
            Some(token) if !token.is_empty() => PageCursor::Next(token.to_string()),
            _ => PageCursor::Done,
        };

        Ok(Some((page, cursor)))
    })
}

/// Collect every association of a service that matches `filter`
pub async fn find_custom_domains<F>(
    api: &dyn AppRunnerApi,
    service_arn: &str,
    filter: F,
) -> Result<Vec<CustomDomainAssociation>>
where
    F: Fn(&CustomDomainAssociation) -> bool,
{
    let mut output = Vec::new();
    let mut pages = Box::pin(custom_domain_pages(api, service_arn));

    while let Some(page) = pages.try_next().await? {
        let page_service_arn = if page.service_arn.is_empty() {
            service_arn.to_string()
        } else {
            page.service_arn.clone()
        };

        for custom_domain in page.custom_domains {
            let association = CustomDomainAssociation {
                custom_domain,
                service_arn: page_service_arn.clone(),
                dns_target: page.dns_target.clone(),
            };

            if filter(&association) {
                output.push(association);
            }
        }
    }

    Ok(output)
}

/// Find the association for `domain_name` under `service_arn`
///
/// # Errors
///
/// - `Error::NotFound`: The service is gone or has no such custom domain
/// - `Error::MultipleResults`: More than one listed domain matched
/// - Anything else the API reported
pub async fn find_custom_domain_by_two_part_key(
    api: &dyn AppRunnerApi,
    domain_name: &str,
    service_arn: &str,
) -> Result<CustomDomainAssociation> {
    let matches = find_custom_domains(api, service_arn, |association| {
        association.custom_domain.domain_name == domain_name
    })
    .await?;

    assert_single_result(matches)
}

fn assert_single_result<T>(mut results: Vec<T>) -> Result<T> {
    match results.len() {
        0 => Err(Error::not_found("empty result")),
        1 => Ok(results.remove(0)),
        count => Err(Error::MultipleResults { count }),
    }
}
