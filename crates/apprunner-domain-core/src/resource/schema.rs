//! Attribute schema of `aws_apprunner_custom_domain_association`

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Bool,
    /// Set of `{name, status, type, value}` objects
    CertificateValidationRecordSet,
}

/// Who supplies an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    /// Must be supplied by the user
    Required,
    /// May be supplied by the user; has a default
    Optional,
    /// Set from remote state only
    Computed,
}

/// Declaration of one resource attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub attr_type: AttributeType,
    pub mode: AttributeMode,
    /// Changing the value requires replacing the association
    pub force_new: bool,
}

impl AttributeSchema {
    const fn new(
        name: &'static str,
        attr_type: AttributeType,
        mode: AttributeMode,
        force_new: bool,
    ) -> Self {
        Self {
            name,
            attr_type,
            mode,
            force_new,
        }
    }
}

pub const ATTR_CERTIFICATE_VALIDATION_RECORDS: &str = "certificate_validation_records";
pub const ATTR_DNS_TARGET: &str = "dns_target";
pub const ATTR_DOMAIN_NAME: &str = "domain_name";
pub const ATTR_ENABLE_WWW_SUBDOMAIN: &str = "enable_www_subdomain";
pub const ATTR_SERVICE_ARN: &str = "service_arn";
pub const ATTR_STATUS: &str = "status";

/// Default of `enable_www_subdomain`
pub const DEFAULT_ENABLE_WWW_SUBDOMAIN: bool = true;

/// Length bounds of `domain_name`
pub const DOMAIN_NAME_MIN_LEN: usize = 1;
pub const DOMAIN_NAME_MAX_LEN: usize = 255;

/// All attributes of the resource
pub const SCHEMA: &[AttributeSchema] = &[
    AttributeSchema::new(
        ATTR_CERTIFICATE_VALIDATION_RECORDS,
        AttributeType::CertificateValidationRecordSet,
        AttributeMode::Computed,
        false,
    ),
    AttributeSchema::new(ATTR_DNS_TARGET, AttributeType::String, AttributeMode::Computed, false),
    AttributeSchema::new(ATTR_DOMAIN_NAME, AttributeType::String, AttributeMode::Required, true),
    AttributeSchema::new(
        ATTR_ENABLE_WWW_SUBDOMAIN,
        AttributeType::Bool,
        AttributeMode::Optional,
        true,
    ),
    AttributeSchema::new(ATTR_SERVICE_ARN, AttributeType::String, AttributeMode::Required, true),
    AttributeSchema::new(ATTR_STATUS, AttributeType::String, AttributeMode::Computed, false),
];

/// Look up an attribute declaration by name
pub fn attribute(name: &str) -> Option<&'static AttributeSchema> {
    SCHEMA.iter().find(|attr| attr.name == name)
}

/// Validate `domain_name` (1 to 255 characters)
pub fn validate_domain_name(domain_name: &str) -> Result<()> {
    let len = domain_name.chars().count();
    if !(DOMAIN_NAME_MIN_LEN..=DOMAIN_NAME_MAX_LEN).contains(&len) {
        return Err(Error::validation(
            ATTR_DOMAIN_NAME,
            format!(
                "expected length to be in the range ({} - {}), got {}",
                DOMAIN_NAME_MIN_LEN, DOMAIN_NAME_MAX_LEN, len
            ),
        ));
    }
    Ok(())
}

/// Validate `service_arn` is a well-formed ARN
///
/// `arn:partition:service:region:account-id:resource`, where the partition is
/// `aws` or `aws-<suffix>`, the region (if present) looks like `us-east-1`,
/// and the account (if present) is twelve digits, `aws`, `aws-managed`,
/// `third-party` or a `cw` identifier.
pub fn validate_arn(arn: &str) -> Result<()> {
    let invalid = |why: &str| Error::validation(ATTR_SERVICE_ARN, format!("invalid ARN ({arn}): {why}"));

    let mut sections = arn.splitn(6, ':');
    let (Some(prefix), Some(partition), Some(service), Some(region), Some(account), Some(resource)) = (
        sections.next(),
        sections.next(),
        sections.next(),
        sections.next(),
        sections.next(),
        sections.next(),
    ) else {
        return Err(invalid("not enough sections"));
    };

    if prefix != "arn" {
        return Err(invalid("must start with \"arn:\""));
    }

    if !is_valid_partition(partition) {
        return Err(invalid("invalid partition value"));
    }

    if service.is_empty() {
        return Err(invalid("missing service"));
    }

    if !region.is_empty() && !is_valid_region(region) {
        return Err(invalid("invalid region value"));
    }

    if !account.is_empty() && !is_valid_account_id(account) {
        return Err(invalid("invalid account ID value"));
    }

    if resource.is_empty() {
        return Err(invalid("missing resource value"));
    }

    Ok(())
}

static PARTITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^aws(-[a-z]+)*$").expect("partition pattern is valid")
});

static REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2}(-[a-z]+)+-[0-9]{1,2}$").expect("region pattern is valid")
});

static ACCOUNT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(aws|aws-managed|third-party|[0-9]{12}|cw.{10})$")
        .expect("account ID pattern is valid")
});

fn is_valid_partition(partition: &str) -> bool {
    PARTITION.is_match(partition)
}

fn is_valid_region(region: &str) -> bool {
    REGION.is_match(region)
}

fn is_valid_account_id(account: &str) -> bool {
    ACCOUNT_ID.is_match(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        assert_eq!(SCHEMA.len(), 6);

        let domain = attribute(ATTR_DOMAIN_NAME).unwrap();
        assert_eq!(domain.mode, AttributeMode::Required);
        assert!(domain.force_new);

        let www = attribute(ATTR_ENABLE_WWW_SUBDOMAIN).unwrap();
        assert_eq!(www.attr_type, AttributeType::Bool);
        assert_eq!(www.mode, AttributeMode::Optional);

        assert_eq!(attribute(ATTR_STATUS).unwrap().mode, AttributeMode::Computed);
        assert!(attribute("nonexistent").is_none());
    }

    #[test]
    fn test_validate_domain_name() {
        assert!(validate_domain_name("example.com").is_ok());
        assert!(validate_domain_name(&"a".repeat(255)).is_ok());
        assert!(validate_domain_name("").is_err());
        assert!(validate_domain_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_arn() {
        assert!(
            validate_arn("arn:aws:apprunner:us-east-1:123456789012:service/example/8fe1e10304f84fd2")
                .is_ok()
        );
        assert!(validate_arn("arn:aws-us-gov:apprunner:us-gov-west-1:123456789012:service/x").is_ok());
        assert!(validate_arn("arn:aws:iam::aws:policy/ReadOnly").is_ok());

        assert!(validate_arn("").is_err());
        assert!(validate_arn("svc-1").is_err());
        assert!(validate_arn("arn:aws:apprunner").is_err());
        assert!(validate_arn("urn:aws:apprunner:us-east-1:123456789012:service/x").is_err());
        assert!(validate_arn("arn:gcp:apprunner:us-east-1:123456789012:service/x").is_err());
        assert!(validate_arn("arn:aws:apprunner:useast1:123456789012:service/x").is_err());
        assert!(validate_arn("arn:aws:apprunner:us-east-1:1234:service/x").is_err());
        assert!(validate_arn("arn:aws:apprunner:us-east-1:123456789012:").is_err());
    }

    #[test]
    fn test_validate_arn_sections() {
        for partition in ["aws", "aws-cn", "aws-us-gov", "aws-iso-b"] {
            assert!(is_valid_partition(partition), "{partition}");
        }
        for partition in ["", "aws-", "aws-US", "aws-1", "awsx", "-aws"] {
            assert!(!is_valid_partition(partition), "{partition}");
        }

        for region in ["us-east-1", "eu-central-1", "us-gov-west-1", "ap-southeast-10"] {
            assert!(is_valid_region(region), "{region}");
        }
        for region in ["us-east", "use-east-1", "us-east-123", "US-EAST-1", "us--1", "us-east-1a"] {
            assert!(!is_valid_region(region), "{region}");
        }

        for account in ["aws", "aws-managed", "third-party", "123456789012", "cw0123456789"] {
            assert!(is_valid_account_id(account), "{account}");
        }
        for account in ["", "1234", "1234567890123", "12345678901a", "cw123", "aws-other"] {
            assert!(!is_valid_account_id(account), "{account}");
        }

        assert!(validate_arn("arn:aws:iam::aws-managed:policy/Example").is_ok());
        assert!(validate_arn("arn:aws:events:us-east-1:third-party:rule/x").is_ok());
    }
}
