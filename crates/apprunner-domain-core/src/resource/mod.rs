//! Lifecycle handlers of `aws_apprunner_custom_domain_association`
//!
//! [`CustomDomainAssociationResource`] implements create, read, delete and
//! import on top of the identity codec, the finder and the state poller.
//!
//! ## Create
//!
//! ```text
//! encode id ─► AssociateCustomDomain ─► store id + dns_target
//!           ─► wait (creating → pending_certificate_dns_validation | binding_certificate)
//!           ─► read
//! ```
//!
//! A failed wait leaves the identifier in state; nothing is rolled back.
//!
//! ## Delete
//!
//! ```text
//! decode id ─► DisassociateCustomDomain ─► wait (active | deleting → gone)
//! ```
//!
//! `ResourceNotFoundException` from the disassociate call means the service
//! is already gone, and the delete succeeds without waiting.

pub mod data;
pub mod schema;

pub use data::ResourceData;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::WaiterConfig;
use crate::error::{Error, Result};
use crate::finder::find_custom_domain_by_two_part_key;
use crate::id;
use crate::traits::AppRunnerApi;
use crate::types::{AssociateCustomDomainInput, DisassociateCustomDomainInput};
use crate::waiter::{wait_custom_domain_association_created, wait_custom_domain_association_deleted};

/// Resource type name
pub const RESOURCE_TYPE: &str = "aws_apprunner_custom_domain_association";

/// Human-readable resource name used in error messages and logs
const RESOURCE_NAME: &str = "App Runner Custom Domain Association";

/// Events emitted by the lifecycle handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    /// AssociateCustomDomain succeeded
    AssociationRequested { id: String, dns_target: String },

    /// The create wait finished
    Created { id: String, status: Option<String> },

    /// Read found no association; the identifier was cleared
    RemovedFromState { id: String },

    /// DisassociateCustomDomain succeeded
    DisassociationRequested { id: String },

    /// The association is gone
    Deleted { id: String },
}

/// Lifecycle handlers for custom domain associations
///
/// ## Threading
///
/// The handle holds no mutable state of its own. Every operation runs to
/// completion on the calling task; independent associations can be managed
/// from concurrent tasks through separate handles.
pub struct CustomDomainAssociationResource {
    /// App Runner API client
    api: Box<dyn AppRunnerApi>,

    /// Poller settings
    waiter: WaiterConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<ResourceEvent>,
}

impl CustomDomainAssociationResource {
    /// Create the handlers
    ///
    /// # Returns
    ///
    /// A tuple of (resource, event_receiver) where event_receiver yields lifecycle events
    pub fn new(
        api: Box<dyn AppRunnerApi>,
        waiter: WaiterConfig,
    ) -> Result<(Self, mpsc::Receiver<ResourceEvent>)> {
        waiter.validate()?;

        let (tx, rx) = mpsc::channel(waiter.event_channel_capacity);

        let resource = Self {
            api,
            waiter,
            event_tx: tx,
        };

        Ok((resource, rx))
    }

    /// Associate the planned domain with its service and wait for it to settle
    ///
    /// On success `data` holds the identifier and every computed attribute.
    pub async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let domain_name = data.domain_name.clone();
        let service_arn = data.service_arn.clone();
        let id = id::encode(&domain_name, &service_arn);

        let input = AssociateCustomDomainInput {
            domain_name: domain_name.clone(),
            enable_www_subdomain: data.enable_www_subdomain,
            service_arn: service_arn.clone(),
        };

        info!("Creating {}: {}", RESOURCE_NAME, id);

        let output = self
            .api
            .associate_custom_domain(&input)
            .await
            .map_err(|e| Error::context(format!("creating {RESOURCE_NAME} ({id})"), e))?;

        data.set_id(id.clone());
        data.mark_new_resource();
        data.dns_target = Some(output.dns_target.clone());

        self.emit_event(ResourceEvent::AssociationRequested {
            id: id.clone(),
            dns_target: output.dns_target,
        });

        let settled = wait_custom_domain_association_created(
            self.api.as_ref(),
            &domain_name,
            &service_arn,
            &self.waiter,
        )
        .await
        .map_err(|e| Error::context(format!("waiting for {RESOURCE_NAME} ({id}) create"), e))?;

        self.emit_event(ResourceEvent::Created {
            id,
            status: settled.map(|association| association.status().as_str().to_string()),
        });

        self.read(data).await
    }

    /// Refresh `data` from the remote association
    ///
    /// If the association is gone and `data` was not created in this run, the
    /// identifier is cleared and `Ok(())` is returned.
    pub async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data
            .id()
            .ok_or_else(|| Error::config(format!("{RESOURCE_NAME} has no ID to read")))?
            .to_string();

        let (domain_name, service_arn) = id::decode(&id)?;

        let found =
            find_custom_domain_by_two_part_key(self.api.as_ref(), &domain_name, &service_arn).await;

        let association = match found {
            Err(e) if e.is_not_found() && !data.is_new_resource() => {
                warn!("{} ({}) not found, removing from state", RESOURCE_NAME, id);
                data.clear_id();
                self.emit_event(ResourceEvent::RemovedFromState { id });
                return Ok(());
            }
            Err(e) => return Err(Error::context(format!("reading {RESOURCE_NAME} ({id})"), e)),
            Ok(association) => association,
        };

        debug!(
            "Read {} ({}): status {}",
            RESOURCE_NAME,
            id,
            association.status()
        );

        data.apply_remote(&association, &service_arn);
        Ok(())
    }

    /// Disassociate the domain and wait until it is gone
    pub async fn delete(&self, data: &ResourceData) -> Result<()> {
        let id = data
            .id()
            .ok_or_else(|| Error::config(format!("{RESOURCE_NAME} has no ID to delete")))?
            .to_string();

        let (domain_name, service_arn) = id::decode(&id)?;

        info!("Deleting {}: {}", RESOURCE_NAME, id);

        let input = DisassociateCustomDomainInput {
            domain_name: domain_name.clone(),
            service_arn: service_arn.clone(),
        };

        match self.api.disassociate_custom_domain(&input).await {
            Err(e) if e.is_resource_not_found() => {
                debug!("{} ({}) already gone", RESOURCE_NAME, id);
                self.emit_event(ResourceEvent::Deleted { id });
                return Ok(());
            }
            Err(e) => return Err(Error::context(format!("deleting {RESOURCE_NAME} ({id})"), e)),
            Ok(()) => {}
        }

        self.emit_event(ResourceEvent::DisassociationRequested { id: id.clone() });

        wait_custom_domain_association_deleted(
            self.api.as_ref(),
            &domain_name,
            &service_arn,
            &self.waiter,
        )
        .await
        .map_err(|e| Error::context(format!("waiting for {RESOURCE_NAME} ({id}) delete"), e))?;

        info!("Deleted {}: {}", RESOURCE_NAME, id);
        self.emit_event(ResourceEvent::Deleted { id });
        Ok(())
    }

    /// Import an existing association by its identifier
    ///
    /// The identifier is passed through unchanged and the state is filled by
    /// a read. An import of a missing association yields state without an
    /// identifier.
    pub async fn import(&self, id: &str) -> Result<ResourceData> {
        let mut data = ResourceData::from_id(id);
        self.read(&mut data).await?;
        Ok(data)
    }

    /// Emit a lifecycle event
    fn emit_event(&self, event: ResourceEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            // Nobody is listening
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}
