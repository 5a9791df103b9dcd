// # apprunner-domain-core
//
// Core library for managing App Runner custom domain associations
// (`aws_apprunner_custom_domain_association`).
//
// ## Architecture Overview
//
// - **AppRunnerApi**: Trait for the remote App Runner operations
// - **id**: Composite `domain_name,service_arn` identifier codec
// - **finder**: Paged lookup of one association by its two-part key
// - **waiter**: Generic wait-for-state loop and the create/delete pollers
// - **resource**: Schema, typed local state and the lifecycle handlers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Lifecycle logic is separate from the API client
// 2. **Poller-Owned Waiting**: API clients make single calls; only the waiter sleeps
// 3. **Explicit Not Found**: A missing service and a missing association are one error
// 4. **Library-First**: The CLI is a thin layer over this crate

pub mod config;
pub mod error;
pub mod finder;
pub mod id;
pub mod resource;
pub mod traits;
pub mod types;
pub mod waiter;

// Re-export core types for convenience
pub use config::{CredentialsConfig, ProviderConfig, WaiterConfig};
pub use error::{Error, Result};
pub use resource::{CustomDomainAssociationResource, ResourceData, ResourceEvent};
pub use traits::AppRunnerApi;
pub use waiter::StateChangeConf;
