//! State poller for custom domain associations
//!
//! Create waits until App Runner has handed the domain over to certificate
//! validation. It does not wait for `active`, since DNS validation is a manual
//! step outside of this process. Delete waits until the association is no
//! longer listed.

use std::future::Future;

use tracing::debug;

use super::StateChangeConf;
use crate::config::WaiterConfig;
use crate::error::Result;
use crate::finder::find_custom_domain_by_two_part_key;
use crate::traits::AppRunnerApi;
use crate::types::{CustomDomainAssociation, CustomDomainAssociationStatus};

/// Refresh function reporting the current association and its raw status
///
/// Reports `Ok(None)` when the association (or its service) is gone.
pub fn status_custom_domain<'a>(
    api: &'a dyn AppRunnerApi,
    domain_name: &'a str,
    service_arn: &'a str,
) -> impl FnMut() -> std::pin::Pin<
    Box<dyn Future<Output = Result<Option<(CustomDomainAssociation, String)>>> + Send + 'a>,
> + 'a {
    move || {
        Box::pin(async move {
            match find_custom_domain_by_two_part_key(api, domain_name, service_arn).await {
                Ok(association) => {
                    let status = association.status().as_str().to_string();
                    debug!("Custom domain {} on {} is {}", domain_name, service_arn, status);
                    Ok(Some((association, status)))
                }
                Err(e) if e.is_not_found() => {
                    debug!("Custom domain {} on {} not found", domain_name, service_arn);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
    }
}

/// Wait until a new association is pending certificate validation
pub async fn wait_custom_domain_association_created(
    api: &dyn AppRunnerApi,
    domain_name: &str,
    service_arn: &str,
    config: &WaiterConfig,
) -> Result<Option<CustomDomainAssociation>> {
    let conf = StateChangeConf::new(
        status_custom_domain(api, domain_name, service_arn),
        config.create_timeout(),
    )
    .with_pending([CustomDomainAssociationStatus::Creating.as_str()])
    .with_target([
        CustomDomainAssociationStatus::PendingCertificateDnsValidation.as_str(),
        CustomDomainAssociationStatus::BindingCertificate.as_str(),
    ]);

    configure(conf, config).wait_for_state().await
}

/// Wait until an association is no longer listed
pub async fn wait_custom_domain_association_deleted(
    api: &dyn AppRunnerApi,
    domain_name: &str,
    service_arn: &str,
    config: &WaiterConfig,
) -> Result<Option<CustomDomainAssociation>> {
    let conf = StateChangeConf::new(
        status_custom_domain(api, domain_name, service_arn),
        config.delete_timeout(),
    )
    .with_pending([
        CustomDomainAssociationStatus::Active.as_str(),
        CustomDomainAssociationStatus::Deleting.as_str(),
    ])
    .with_target(Vec::<String>::new());

    configure(conf, config).wait_for_state().await
}

fn configure<F, Fut, T>(conf: StateChangeConf<F>, config: &WaiterConfig) -> StateChangeConf<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<(T, String)>>>,
{
    conf.with_poll_interval(config.poll_interval())
        .with_min_timeout(config.min_timeout())
        .with_not_found_checks(config.not_found_checks)
}
