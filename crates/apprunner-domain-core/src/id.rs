//! Composite resource identifier
//!
//! A custom domain association is identified by `domain_name,service_arn`.
//! Neither part is escaped, so a domain name containing the separator can't
//! round-trip. Domain names can't contain commas, and the split happens on
//! the first separator, so a comma inside the ARN part survives decoding.

use crate::error::{Error, Result};

/// Separator between the domain name and the service ARN
pub const ID_SEPARATOR: char = ',';

/// Build the resource identifier for a domain name and service ARN
pub fn encode(domain_name: &str, service_arn: &str) -> String {
    format!("{domain_name}{ID_SEPARATOR}{service_arn}")
}

/// Split a resource identifier into `(domain_name, service_arn)`
///
/// # Errors
///
/// `Error::MalformedIdentifier` when the separator is missing or either part
/// is empty.
pub fn decode(id: &str) -> Result<(String, String)> {
    match id.split_once(ID_SEPARATOR) {
        Some((domain_name, service_arn)) if !domain_name.is_empty() && !service_arn.is_empty() => {
            Ok((domain_name.to_string(), service_arn.to_string()))
        }
        _ => Err(Error::malformed_identifier(id, ID_SEPARATOR)),
    }
}
