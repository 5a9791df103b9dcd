//! Remote data model for App Runner custom domains
//!
//! These types mirror the App Runner API shapes. Field names follow the
//! JSON wire format so API clients can (de)serialize them directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a custom domain association, as reported by App Runner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomDomainAssociationStatus {
    Creating,
    CreateFailed,
    Active,
    Deleting,
    DeleteFailed,
    PendingCertificateDnsValidation,
    BindingCertificate,
    /// A status this crate doesn't know about, kept verbatim
    Unknown(String),
}

impl CustomDomainAssociationStatus {
    /// The raw status string used on the wire and by the poller
    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "creating",
            Self::CreateFailed => "create_failed",
            Self::Active => "active",
            Self::Deleting => "deleting",
            Self::DeleteFailed => "delete_failed",
            Self::PendingCertificateDnsValidation => "pending_certificate_dns_validation",
            Self::BindingCertificate => "binding_certificate",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for CustomDomainAssociationStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "creating" => Self::Creating,
            "create_failed" => Self::CreateFailed,
            "active" => Self::Active,
            "deleting" => Self::Deleting,
            "delete_failed" => Self::DeleteFailed,
            "pending_certificate_dns_validation" => Self::PendingCertificateDnsValidation,
            "binding_certificate" => Self::BindingCertificate,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for CustomDomainAssociationStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<CustomDomainAssociationStatus> for String {
    fn from(status: CustomDomainAssociationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CustomDomainAssociationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record the operator must create to validate the domain certificate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CertificateValidationRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Type", default)]
    pub record_type: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

/// A custom domain as listed under an App Runner service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDomain {
    #[serde(rename = "DomainName")]
    pub domain_name: String,

    #[serde(rename = "EnableWWWSubdomain", default)]
    pub enable_www_subdomain: bool,

    #[serde(rename = "CertificateValidationRecords", default)]
    pub certificate_validation_records: Vec<CertificateValidationRecord>,

    #[serde(rename = "Status")]
    pub status: CustomDomainAssociationStatus,
}

/// A custom domain together with the service-level facts the finder knows about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDomainAssociation {
    /// The listed custom domain
    pub custom_domain: CustomDomain,
    /// ARN of the owning service
    pub service_arn: String,
    /// DNS target reported for the service, if any
    pub dns_target: Option<String>,
}

impl CustomDomainAssociation {
    /// Current status of the association
    pub fn status(&self) -> &CustomDomainAssociationStatus {
        &self.custom_domain.status
    }
}

/// Input of `AssociateCustomDomain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociateCustomDomainInput {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "EnableWWWSubdomain")]
    pub enable_www_subdomain: bool,
    #[serde(rename = "ServiceArn")]
    pub service_arn: String,
}

/// Output of `AssociateCustomDomain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociateCustomDomainOutput {
    #[serde(rename = "DNSTarget")]
    pub dns_target: String,
    #[serde(rename = "ServiceArn")]
    pub service_arn: String,
    #[serde(rename = "CustomDomain")]
    pub custom_domain: CustomDomain,
}

/// Input of `DisassociateCustomDomain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisassociateCustomDomainInput {
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "ServiceArn")]
    pub service_arn: String,
}

/// Input of `DescribeCustomDomains`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeCustomDomainsInput {
    #[serde(rename = "ServiceArn")]
    pub service_arn: String,
    #[serde(rename = "NextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(rename = "MaxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

/// One page of `DescribeCustomDomains` output
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescribeCustomDomainsPage {
    #[serde(rename = "DNSTarget", default)]
    pub dns_target: Option<String>,
    #[serde(rename = "ServiceArn", default)]
    pub service_arn: String,
    #[serde(rename = "CustomDomains", default)]
    pub custom_domains: Vec<CustomDomain>,
    #[serde(rename = "NextToken", default)]
    pub next_token: Option<String>,
}
