// # App Runner API Trait
//
// Defines the remote operations needed to manage a custom domain association.
//
// ## Implementations
//
// - HTTPS client with SigV4 signing: `apprunner-domain-aws` crate
// - In-memory doubles: `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use apprunner_domain_core::AppRunnerApi;
// use apprunner_domain_core::types::DescribeCustomDomainsInput;
//
// let page = api
//     .describe_custom_domains(&DescribeCustomDomainsInput {
//         service_arn: service_arn.to_string(),
//         next_token: None,
//         max_results: None,
//     })
//     .await?;
// ```

use async_trait::async_trait;

use crate::types::{
    AssociateCustomDomainInput, AssociateCustomDomainOutput, DescribeCustomDomainsInput,
    DescribeCustomDomainsPage, DisassociateCustomDomainInput,
};

/// Trait for App Runner API clients
///
/// Implementations execute exactly one remote call per method and report
/// remote failures as [`crate::Error::Api`] with the error code intact, so
/// callers can recognize `ResourceNotFoundException`.
///
/// # Retries
///
/// Implementations must not poll or wait for status changes. Waiting is owned
/// by the state poller in [`crate::waiter`].
#[async_trait]
pub trait AppRunnerApi: Send + Sync {
    /// Associate a custom domain with a service
    ///
    /// # Returns
    ///
    /// - `Ok(AssociateCustomDomainOutput)`: Includes the DNS target to point the domain at
    /// - `Err(Error)`: If the request failed
    async fn associate_custom_domain(
        &self,
        input: &AssociateCustomDomainInput,
    ) -> Result<AssociateCustomDomainOutput, crate::Error>;

    /// Disassociate a custom domain from a service
    ///
    /// Returns `Error::Api` with code `ResourceNotFoundException` when the
    /// service is gone.
    async fn disassociate_custom_domain(
        &self,
        input: &DisassociateCustomDomainInput,
    ) -> Result<(), crate::Error>;

    /// Fetch one page of the custom domains of a service
    ///
    /// The page's `next_token` is the cursor for the following page; `None`
    /// (or an empty token) means the listing is exhausted.
    async fn describe_custom_domains(
        &self,
        input: &DescribeCustomDomainsInput,
    ) -> Result<DescribeCustomDomainsPage, crate::Error>;

    /// Get the client name (for logging/debugging)
    fn api_name(&self) -> &'static str;
}
