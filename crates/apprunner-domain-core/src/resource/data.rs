//! Typed local state of a custom domain association
//!
//! [`ResourceData`] is the cache of the last observed remote state. It maps
//! to and from the flat attribute object stored in state files with
//! [`ResourceData::to_attributes`] and [`ResourceData::from_attributes`].

use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

use super::schema::{
    ATTR_CERTIFICATE_VALIDATION_RECORDS, ATTR_DNS_TARGET, ATTR_DOMAIN_NAME,
    ATTR_ENABLE_WWW_SUBDOMAIN, ATTR_SERVICE_ARN, ATTR_STATUS, DEFAULT_ENABLE_WWW_SUBDOMAIN,
    validate_arn, validate_domain_name,
};
use crate::error::{Error, Result};
use crate::types::{CertificateValidationRecord, CustomDomainAssociation};

/// Key of the resource identifier in the attribute object
pub const ATTR_ID: &str = "id";

/// Local state of one `aws_apprunner_custom_domain_association`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceData {
    /// Composite identifier; `None` before create and after removal
    id: Option<String>,

    /// Set during create so the trailing read doesn't treat "not found" as drift
    is_new_resource: bool,

    pub domain_name: String,
    pub enable_www_subdomain: bool,
    pub service_arn: String,
    pub dns_target: Option<String>,
    pub status: Option<String>,
    pub certificate_validation_records: BTreeSet<CertificateValidationRecord>,
}

impl ResourceData {
    /// Planned state for a new association
    pub fn new(domain_name: impl Into<String>, service_arn: impl Into<String>) -> Self {
        Self {
            id: None,
            is_new_resource: false,
            domain_name: domain_name.into(),
            enable_www_subdomain: DEFAULT_ENABLE_WWW_SUBDOMAIN,
            service_arn: service_arn.into(),
            dns_target: None,
            status: None,
            certificate_validation_records: BTreeSet::new(),
        }
    }

    /// State holding only an identifier (import, or state loaded elsewhere)
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new("", "")
        }
    }

    /// Set `enable_www_subdomain`
    pub fn with_enable_www_subdomain(mut self, enable_www_subdomain: bool) -> Self {
        self.enable_www_subdomain = enable_www_subdomain;
        self
    }

    /// The resource identifier, if the association exists
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether this state belongs to an association created in this run
    pub fn is_new_resource(&self) -> bool {
        self.is_new_resource
    }

    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Forget the identifier; the association is gone
    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    pub(crate) fn mark_new_resource(&mut self) {
        self.is_new_resource = true;
    }

    /// Validate the user-supplied attributes against the schema
    pub fn validate_plan(&self) -> Result<()> {
        validate_domain_name(&self.domain_name)?;
        validate_arn(&self.service_arn)?;
        Ok(())
    }

    /// Copy the observed remote state into this state
    ///
    /// `dns_target` is only replaced when the listing reports one, since the
    /// associate response is the authoritative source.
    pub fn apply_remote(&mut self, association: &CustomDomainAssociation, service_arn: &str) {
        let custom_domain = &association.custom_domain;

        self.certificate_validation_records = custom_domain
            .certificate_validation_records
            .iter()
            .cloned()
            .collect();
        self.domain_name = custom_domain.domain_name.clone();
        self.enable_www_subdomain = custom_domain.enable_www_subdomain;
        self.service_arn = service_arn.to_string();
        self.status = Some(custom_domain.status.as_str().to_string());

        if let Some(ref dns_target) = association.dns_target {
            self.dns_target = Some(dns_target.clone());
        }
    }

    /// Flatten into the attribute object stored in state
    pub fn to_attributes(&self) -> Value {
        let records: Vec<Value> = self
            .certificate_validation_records
            .iter()
            .map(|record| {
                json!({
                    "name": record.name,
                    "status": record.status,
                    "type": record.record_type,
                    "value": record.value,
                })
            })
            .collect();

        json!({
            ATTR_ID: self.id,
            ATTR_CERTIFICATE_VALIDATION_RECORDS: records,
            ATTR_DNS_TARGET: self.dns_target,
            ATTR_DOMAIN_NAME: self.domain_name,
            ATTR_ENABLE_WWW_SUBDOMAIN: self.enable_www_subdomain,
            ATTR_SERVICE_ARN: self.service_arn,
            ATTR_STATUS: self.status,
        })
    }

    /// Rebuild state from an attribute object
    ///
    /// Missing attributes take their schema defaults.
    pub fn from_attributes(attributes: &Value) -> Result<Self> {
        let object = attributes
            .as_object()
            .ok_or_else(|| Error::validation("attributes", "expected a JSON object"))?;

        let mut data = Self::new(
            get_string(object, ATTR_DOMAIN_NAME)?.unwrap_or_default(),
            get_string(object, ATTR_SERVICE_ARN)?.unwrap_or_default(),
        );

        data.id = get_string(object, ATTR_ID)?.filter(|id| !id.is_empty());
        data.dns_target = get_string(object, ATTR_DNS_TARGET)?;
        data.status = get_string(object, ATTR_STATUS)?;

        data.enable_www_subdomain = match object.get(ATTR_ENABLE_WWW_SUBDOMAIN) {
            None | Some(Value::Null) => DEFAULT_ENABLE_WWW_SUBDOMAIN,
            Some(Value::Bool(enabled)) => *enabled,
            Some(_) => {
                return Err(Error::validation(ATTR_ENABLE_WWW_SUBDOMAIN, "expected a boolean"));
            }
        };

        if let Some(records) = object.get(ATTR_CERTIFICATE_VALIDATION_RECORDS) {
            data.certificate_validation_records = parse_records(records)?;
        }

        Ok(data)
    }
}

fn get_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::validation(key, "expected a string")),
    }
}

fn parse_records(records: &Value) -> Result<BTreeSet<CertificateValidationRecord>> {
    let items = match records {
        Value::Null => return Ok(BTreeSet::new()),
        Value::Array(items) => items,
        _ => {
            return Err(Error::validation(
                ATTR_CERTIFICATE_VALIDATION_RECORDS,
                "expected a list",
            ));
        }
    };

    items
        .iter()
        .map(|item| {
            let object = item.as_object().ok_or_else(|| {
                Error::validation(ATTR_CERTIFICATE_VALIDATION_RECORDS, "expected objects")
            })?;

            Ok(CertificateValidationRecord {
                name: get_string(object, "name")?.unwrap_or_default(),
                status: get_string(object, "status")?.unwrap_or_default(),
                record_type: get_string(object, "type")?.unwrap_or_default(),
                value: get_string(object, "value")?.unwrap_or_default(),
            })
        })
        .collect()
}
