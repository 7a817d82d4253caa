//! Email address validation against the configured domain allow-list.
//!
//! Entries in `domain_names` are matched exactly (case-insensitive). Entries
//! starting with `*` are wildcards: `*.isaf.nato.int` accepts any domain that
//! ends in `.isaf.nato.int`, but not `.isaf.nato.int` itself.

use crate::error::{AnetError, Result};
use crate::settings::Settings;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const WILDCARD: char = '*';

// ---------------------------------------------------------------------------
// EmailCheck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmailCheck {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// EmailPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EmailPolicy {
    domain_names: Vec<String>,
    wildcard_domains: Vec<String>,
    support_email: Option<String>,
}

impl EmailPolicy {
    pub fn new<I, S>(domain_names: I, support_email: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domain_names: Vec<String> = domain_names
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        let wildcard_domains = domain_names
            .iter()
            .filter(|d| d.starts_with(WILDCARD))
            .cloned()
            .collect();
        Self {
            domain_names,
            wildcard_domains,
            support_email,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.domain_names, settings.support_email_addr.clone())
    }

    pub fn domain_names(&self) -> &[String] {
        &self.domain_names
    }

    /// Check one address. Malformed input (no `@`, empty domain) is an error;
    /// a well-formed address on a domain that is not allowed is `Ok(false)`.
    pub fn validate_email(&self, value: &str) -> Result<bool> {
        let Some((local, domain)) = value.split_once('@') else {
            return Err(AnetError::InvalidEmail(value.to_string()));
        };
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            return Err(AnetError::InvalidEmail(value.to_string()));
        }
        let local = local.trim();
        if local.is_empty() {
            return Ok(false);
        }
        Ok(self.matches_allow_list(&domain) || self.matches_wildcard(&domain))
    }

    fn matches_allow_list(&self, domain: &str) -> bool {
        self.domain_names.iter().any(|d| d == domain)
    }

    fn matches_wildcard(&self, domain: &str) -> bool {
        if domain.starts_with('.') {
            return false;
        }
        self.wildcard_domains
            .iter()
            .any(|wildcard| domain.ends_with(&wildcard[WILDCARD.len_utf8()..]))
    }

    /// The message shown when an address is on a domain that is not allowed.
    pub fn error_message(&self) -> String {
        let contact = match &self.support_email {
            Some(addr) => format!(" at {addr}"),
            None => String::new(),
        };
        let mut msg = format!(
            "Only the following email domain names are allowed. If your email domain name is not in the list, please contact the support team{contact}."
        );
        for name in &self.domain_names {
            msg.push_str("\n- ");
            msg.push_str(name);
        }
        msg
    }

    pub fn handle_email_validation(&self, value: &str, should_validate: bool) -> EmailCheck {
        if !should_validate {
            return EmailCheck::valid();
        }
        match self.validate_email(value) {
            Ok(true) => EmailCheck::valid(),
            Ok(false) => EmailCheck::invalid(self.error_message()),
            Err(e) => EmailCheck::invalid(e.to_string()),
        }
    }

    /// Parse a free-text recipient list (`a@x.mil, "B" <b@y.mil>; c@z.mil`)
    /// and validate every address. The first invalid address wins.
    pub fn parse_email_addresses(&self, addressees: &str) -> Result<Vec<String>> {
        let addresses = parse_address_list(addressees).ok_or(AnetError::NoAddresses)?;
        for address in &addresses {
            if !self.validate_email(address)? {
                return Err(AnetError::DomainNotAllowed {
                    address: address.clone(),
                    message: self.error_message(),
                    allowed: self.domain_names.clone(),
                });
            }
        }
        Ok(addresses)
    }
}

// ---------------------------------------------------------------------------
// Address-list parsing
// ---------------------------------------------------------------------------

static ADDR_SPEC_RE: OnceLock<Regex> = OnceLock::new();

fn addr_spec_re() -> &'static Regex {
    ADDR_SPEC_RE.get_or_init(|| Regex::new(r#"^[^\s@<>",;()]+@[^\s@<>",;()]+$"#).unwrap())
}

/// Split on `,` / `;` outside of quotes and angle brackets, then pull out the
/// bare address of each entry. Returns `None` when any entry is unparseable
/// or the list is empty.
fn parse_address_list(input: &str) -> Option<Vec<String>> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_angle = false;

    for c in input.chars() {
        match c {
            '"' if !in_angle => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '<' if !in_quotes => {
                in_angle = true;
                current.push(c);
            }
            '>' if !in_quotes => {
                in_angle = false;
                current.push(c);
            }
            ',' | ';' if !in_quotes && !in_angle => {
                entries.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if in_quotes || in_angle {
        return None;
    }
    entries.push(current);

    let mut addresses = Vec::new();
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let address = match (entry.rfind('<'), entry.rfind('>')) {
            (Some(open), Some(close)) if open < close && entry[close + 1..].trim().is_empty() => {
                entry[open + 1..close].trim()
            }
            (None, None) => entry,
            _ => return None,
        };
        if !addr_spec_re().is_match(address) {
            return None;
        }
        addresses.push(address.to_string());
    }

    if addresses.is_empty() {
        None
    } else {
        Some(addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> EmailPolicy {
        EmailPolicy::new(
            ["cmil.mil", "Mission.ITA", "nato.int", "*.isaf.nato.int"],
            Some("support@dds.mil".to_string()),
        )
    }

    #[test]
    fn allow_listed_domains_validate() {
        let p = policy();
        for domain in ["cmil.mil", "mission.ita", "nato.int"] {
            assert!(p.validate_email(&format!("erin@{domain}")).unwrap(), "{domain}");
        }
        assert!(p.validate_email("erin@CMIL.MIL").unwrap());
    }

    #[test]
    fn unknown_domains_fail() {
        let p = policy();
        for domain in ["example.com", "mil", "cmil.mil.evil.com", "nato.int.x"] {
            assert!(!p.validate_email(&format!("erin@{domain}")).unwrap(), "{domain}");
        }
    }

    #[test]
    fn wildcard_suffix_matches_subdomains() {
        let p = policy();
        assert!(p.validate_email("a@kabul.isaf.nato.int").unwrap());
        assert!(p.validate_email("a@x.y.isaf.nato.int").unwrap());
        assert!(!p.validate_email("a@.isaf.nato.int").unwrap());
        assert!(!p.validate_email("a@isaf.nato.int").unwrap());
    }

    #[test]
    fn empty_local_part_fails() {
        let p = policy();
        assert!(!p.validate_email("@cmil.mil").unwrap());
        assert!(!p.validate_email("   @kabul.isaf.nato.int").unwrap());
    }

    #[test]
    fn malformed_addresses_are_errors() {
        let p = policy();
        assert!(matches!(
            p.validate_email("no-at-sign"),
            Err(AnetError::InvalidEmail(_))
        ));
        assert!(matches!(
            p.validate_email("erin@"),
            Err(AnetError::InvalidEmail(_))
        ));
    }

    #[test]
    fn handle_email_validation_skips_when_disabled() {
        let p = policy();
        assert_eq!(
            p.handle_email_validation("garbage", false),
            EmailCheck::valid()
        );
    }

    #[test]
    fn handle_email_validation_reports_support_contact() {
        let p = policy();
        let check = p.handle_email_validation("erin@example.com", true);
        assert!(!check.is_valid);
        let msg = check.message.unwrap();
        assert!(msg.contains("contact the support team at support@dds.mil."));
        assert!(msg.contains("- nato.int"));

        let check = p.handle_email_validation("erin", true);
        assert_eq!(
            check.message.as_deref(),
            Some("Please provide a valid email address")
        );
    }

    #[test]
    fn parse_addresses_returns_all_when_valid() {
        let p = policy();
        let addrs = p
            .parse_email_addresses(r#"erin@cmil.mil, "Jack, J." <jack@nato.int>; liz@kabul.isaf.nato.int"#)
            .unwrap();
        assert_eq!(
            addrs,
            vec!["erin@cmil.mil", "jack@nato.int", "liz@kabul.isaf.nato.int"]
        );
    }

    #[test]
    fn parse_addresses_stops_at_first_invalid() {
        let p = policy();
        let err = p
            .parse_email_addresses("erin@cmil.mil, bob@example.com, eve@evil.org")
            .unwrap_err();
        match err {
            AnetError::DomainNotAllowed { address, allowed, .. } => {
                assert_eq!(address, "bob@example.com");
                assert_eq!(allowed.len(), 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_addresses_rejects_empty_and_garbage() {
        let p = policy();
        assert!(matches!(
            p.parse_email_addresses("   "),
            Err(AnetError::NoAddresses)
        ));
        assert!(matches!(
            p.parse_email_addresses("not an address"),
            Err(AnetError::NoAddresses)
        ));
        assert!(matches!(
            p.parse_email_addresses("<erin@cmil.mil"),
            Err(AnetError::NoAddresses)
        ));
    }
}
