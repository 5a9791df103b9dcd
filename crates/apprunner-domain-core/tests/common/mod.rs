//! Test doubles and common utilities for lifecycle contract tests
//!
//! [`MockAppRunnerApi`] replays a script of listings: every listing started
//! without a `NextToken` consumes the next snapshot, and the last snapshot
//! repeats forever. Snapshots are served in pages of `page_size` domains.

#![allow(dead_code)]

use apprunner_domain_core::error::{Error, RESOURCE_NOT_FOUND_EXCEPTION, Result};
use apprunner_domain_core::traits::AppRunnerApi;
use apprunner_domain_core::types::{
    AssociateCustomDomainInput, AssociateCustomDomainOutput, CertificateValidationRecord,
    CustomDomain, CustomDomainAssociationStatus, DescribeCustomDomainsInput,
    DescribeCustomDomainsPage, DisassociateCustomDomainInput,
};
use apprunner_domain_core::WaiterConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Service identifier used by the end-to-end scenarios
pub const SERVICE_ID: &str = "svc-1";

/// A well-formed service ARN
pub const SERVICE_ARN: &str =
    "arn:aws:apprunner:us-east-1:123456789012:service/example/8fe1e10304f84fd2";

/// DNS target returned by AssociateCustomDomain
pub const DNS_TARGET: &str = "abc123xyz.us-east-1.awsapprunner.com";

/// Everything a listing can see at one point in time
type Snapshot = Vec<CustomDomain>;

struct MockState {
    /// Remaining snapshots; the last one repeats
    script: VecDeque<Snapshot>,
    /// Snapshot served by the listing in progress
    current: Snapshot,
    /// Domains per page; 0 serves everything in one page
    page_size: usize,
    /// DNSTarget reported on every page
    page_dns_target: Option<String>,
    /// Describe reports ResourceNotFoundException
    service_missing: bool,
    /// Error returned by AssociateCustomDomain
    associate_error: Option<(String, String)>,
    /// Error returned by DisassociateCustomDomain
    disassociate_error: Option<(String, String)>,
    /// Recorded inputs
    associate_inputs: Vec<AssociateCustomDomainInput>,
    describe_inputs: Vec<DescribeCustomDomainsInput>,
}

impl MockState {
    fn start_listing(&mut self) {
        self.current = if self.script.len() > 1 {
            self.script.pop_front().unwrap_or_default()
        } else {
            self.script.front().cloned().unwrap_or_default()
        };
    }
}

/// A scripted AppRunnerApi that tracks calls
pub struct MockAppRunnerApi {
    /// Call counter for associate_custom_domain()
    associate_call_count: Arc<AtomicUsize>,
    /// Call counter for disassociate_custom_domain()
    disassociate_call_count: Arc<AtomicUsize>,
    /// Call counter for describe_custom_domains() (one per page)
    describe_call_count: Arc<AtomicUsize>,
    state: Arc<Mutex<MockState>>,
}

impl MockAppRunnerApi {
    /// A service with no custom domains
    pub fn new() -> Self {
        Self {
            associate_call_count: Arc::new(AtomicUsize::new(0)),
            disassociate_call_count: Arc::new(AtomicUsize::new(0)),
            describe_call_count: Arc::new(AtomicUsize::new(0)),
            state: Arc::new(Mutex::new(MockState {
                script: VecDeque::new(),
                current: Vec::new(),
                page_size: 0,
                page_dns_target: None,
                service_missing: false,
                associate_error: None,
                disassociate_error: None,
                associate_inputs: Vec::new(),
                describe_inputs: Vec::new(),
            })),
        }
    }

    /// Replay these snapshots, one per listing
    pub fn with_listings(self, listings: Vec<Snapshot>) -> Self {
        self.state.lock().unwrap().script = listings.into();
        self
    }

    /// Replay the status of a single domain, one entry per listing
    ///
    /// `None` means the domain is not listed.
    pub fn with_statuses(self, domain_name: &str, statuses: &[Option<&str>]) -> Self {
        let listings = statuses
            .iter()
            .map(|status| match status {
                Some(status) => vec![custom_domain(domain_name, status)],
                None => Vec::new(),
            })
            .collect();
        self.with_listings(listings)
    }

    /// Serve listings in pages of `page_size` domains
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().unwrap().page_size = page_size;
        self
    }

    /// Report a service-level DNSTarget on every page
    pub fn with_page_dns_target(self, dns_target: &str) -> Self {
        self.state.lock().unwrap().page_dns_target = Some(dns_target.to_string());
        self
    }

    /// Make every describe call report ResourceNotFoundException
    pub fn with_service_missing(self) -> Self {
        self.state.lock().unwrap().service_missing = true;
        self
    }

    /// Make AssociateCustomDomain fail with this remote error
    pub fn with_associate_error(self, code: &str, message: &str) -> Self {
        self.state.lock().unwrap().associate_error = Some((code.to_string(), message.to_string()));
        self
    }

    /// Make DisassociateCustomDomain fail with this remote error
    pub fn with_disassociate_error(self, code: &str, message: &str) -> Self {
        self.state.lock().unwrap().disassociate_error =
            Some((code.to_string(), message.to_string()));
        self
    }

    /// Get the number of times associate_custom_domain() was called
    pub fn associate_call_count(&self) -> usize {
        self.associate_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times disassociate_custom_domain() was called
    pub fn disassociate_call_count(&self) -> usize {
        self.disassociate_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times describe_custom_domains() was called
    pub fn describe_call_count(&self) -> usize {
        self.describe_call_count.load(Ordering::SeqCst)
    }

    /// Inputs passed to associate_custom_domain()
    pub fn associate_inputs(&self) -> Vec<AssociateCustomDomainInput> {
        self.state.lock().unwrap().associate_inputs.clone()
    }

    /// Inputs passed to describe_custom_domains()
    pub fn describe_inputs(&self) -> Vec<DescribeCustomDomainsInput> {
        self.state.lock().unwrap().describe_inputs.clone()
    }

    /// Create a new MockAppRunnerApi that shares counters and script with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            associate_call_count: Arc::clone(&other.associate_call_count),
            disassociate_call_count: Arc::clone(&other.disassociate_call_count),
            describe_call_count: Arc::clone(&other.describe_call_count),
            state: Arc::clone(&other.state),
        }
    }
}

#[async_trait::async_trait]
impl AppRunnerApi for MockAppRunnerApi {
    async fn associate_custom_domain(
        &self,
        input: &AssociateCustomDomainInput,
    ) -> Result<AssociateCustomDomainOutput> {
        self.associate_call_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.associate_inputs.push(input.clone());

        if let Some((code, message)) = &state.associate_error {
            return Err(Error::api(code.clone(), message.clone()));
        }

        Ok(AssociateCustomDomainOutput {
            dns_target: DNS_TARGET.to_string(),
            service_arn: input.service_arn.clone(),
            custom_domain: CustomDomain {
                domain_name: input.domain_name.clone(),
                enable_www_subdomain: input.enable_www_subdomain,
                certificate_validation_records: Vec::new(),
                status: CustomDomainAssociationStatus::Creating,
            },
        })
    }

    async fn disassociate_custom_domain(&self, _input: &DisassociateCustomDomainInput) -> Result<()> {
        self.disassociate_call_count.fetch_add(1, Ordering::SeqCst);

        match &self.state.lock().unwrap().disassociate_error {
            Some((code, message)) => Err(Error::api(code.clone(), message.clone())),
            None => Ok(()),
        }
    }

    async fn describe_custom_domains(
        &self,
        input: &DescribeCustomDomainsInput,
    ) -> Result<DescribeCustomDomainsPage> {
        self.describe_call_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.describe_inputs.push(input.clone());

        if state.service_missing {
            return Err(Error::api(
                RESOURCE_NOT_FOUND_EXCEPTION,
                format!("Service not found: {}", input.service_arn),
            ));
        }

        let start = match input.next_token.as_deref() {
            None => {
                state.start_listing();
                0
            }
            Some(token) => token.parse::<usize>().unwrap(),
        };

        let total = state.current.len();
        let end = if state.page_size == 0 {
            total
        } else {
            (start + state.page_size).min(total)
        };

        Ok(DescribeCustomDomainsPage {
            dns_target: state.page_dns_target.clone(),
            service_arn: input.service_arn.clone(),
            custom_domains: state.current[start..end].to_vec(),
            next_token: (end < total).then(|| end.to_string()),
        })
    }

    fn api_name(&self) -> &'static str {
        "mock"
    }
}

/// A listed custom domain with one certificate validation record
pub fn custom_domain(domain_name: &str, status: &str) -> CustomDomain {
    CustomDomain {
        domain_name: domain_name.to_string(),
        enable_www_subdomain: true,
        certificate_validation_records: vec![CertificateValidationRecord {
            name: format!("_1234.{domain_name}."),
            status: "PENDING_VALIDATION".to_string(),
            record_type: "CNAME".to_string(),
            value: "_5678.acm-validations.aws.".to_string(),
        }],
        status: CustomDomainAssociationStatus::from(status),
    }
}

/// Poller settings with the production timeouts
///
/// Tests run on paused time, so the full five minutes elapse instantly.
pub fn test_waiter() -> WaiterConfig {
    WaiterConfig::default()
}
