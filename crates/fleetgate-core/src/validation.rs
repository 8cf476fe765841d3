//! Device validation rule set.
//!
//! All rules run on every call; nothing short-circuits on the first failure,
//! so the caller always gets the full picture of violations in one
//! [`ErrorMap`]. Field-shape rules apply uniformly; the hostname rules are
//! conditioned on the device's single selected tag.

use std::sync::LazyLock;

use regex::Regex;

use crate::device::{Device, DeviceImportRow};
use crate::error_map::ErrorMap;
use crate::policy::PolicyCache;
use crate::tag::DeviceTag;

static MAKE_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_.,&\(\)\s]+$").unwrap());
static MODEL_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_.,&\(\)+\s]+$").unwrap());
static SERIAL_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_.\s]+$").unwrap());
static HOSTNAME_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^$|^[0-9a-zA-Z](?:[0-9a-zA-Z-]*[0-9a-zA-Z])?$").unwrap());

/// Maximum hostname length accepted by the directory.
const MAX_HOSTNAME_LEN: usize = 15;

/// Resolves the device's selected tag against the in-scope tag set.
///
/// First tag whose id matches by string equality, or `None`. Absence is not
/// an error: an unresolvable tag id means "no policy".
#[must_use]
pub fn resolve_tag<'a>(tag_id: &str, tags: &'a [DeviceTag]) -> Option<&'a DeviceTag> {
    tags.iter().find(|t| t.id.to_string() == tag_id)
}

/// Validates a device against the field-shape rules and the naming policy of
/// its selected tag.
///
/// Convenience wrapper that compiles tag policies transiently; batch callers
/// validating many devices should hold a [`PolicyCache`] for the run and use
/// [`validate_device_with_cache`].
#[must_use]
pub fn validate_device(device: &Device, tags_in_scope: &[DeviceTag]) -> ErrorMap {
    let mut cache = PolicyCache::new();
    validate_device_with_cache(device, tags_in_scope, &mut cache)
}

/// Validates a transient bulk-import row.
///
/// The row carries the caller-selected tag objects directly. An equivalent
/// in-memory device is built and fed through the same rule evaluation, so the
/// two entry points can never drift apart.
#[must_use]
pub fn validate_import_row(row: &DeviceImportRow, selected_tags: &[DeviceTag]) -> ErrorMap {
    let mut device = Device::new();
    device.make = row.make.clone();
    device.model = row.model.clone();
    device.serial_number = row.serial_number.clone();
    device.preferred_hostname = row.preferred_hostname.clone();
    device.os = row.os;
    device.tags = selected_tags.iter().map(|t| t.id.to_string()).collect();

    validate_device(&device, selected_tags)
}

/// Validates a device, reusing an existing per-run policy cache.
#[must_use]
pub fn validate_device_with_cache(
    device: &Device,
    tags_in_scope: &[DeviceTag],
    policies: &mut PolicyCache,
) -> ErrorMap {
    let mut errors = ErrorMap::new();

    validate_field_shapes(device, &mut errors);
    validate_tag_cardinality(device, &mut errors);
    validate_hostname_policy(device, tags_in_scope, policies, &mut errors);

    errors
}

fn validate_field_shapes(device: &Device, errors: &mut ErrorMap) {
    required_with_charset(
        errors,
        "Make",
        &device.make,
        &MAKE_CHARSET,
        "Make is Required",
        "Only use letters, numbers, or the following special characters: -_&().,",
    );
    required_with_charset(
        errors,
        "Model",
        &device.model,
        &MODEL_CHARSET,
        "Model is Required",
        "Only use letters, numbers, or the following special characters: -_&().+,",
    );
    required_with_charset(
        errors,
        "SerialNumber",
        &device.serial_number,
        &SERIAL_CHARSET,
        "Serial Number is Required",
        "Only use letters, numbers, -, _, or . for SerialNumber value.",
    );

    let hostname = device.preferred_hostname.as_str();
    if !HOSTNAME_CHARSET.is_match(hostname) {
        errors.add(
            "PreferredHostname",
            "Only use letters, numbers, or hyphen for Preferred Hostname value. \
             Hyphens may not be at beginning or end.",
        );
    }
    if hostname.len() > MAX_HOSTNAME_LEN {
        errors.add(
            "PreferredHostname",
            "Preferred Hostname cannot exceed 15 characters.",
        );
    }
}

/// The required check and the charset check mirror the record store's own
/// field contract: a blank value reports only the required message, a
/// non-blank value is only charset-checked.
fn required_with_charset(
    errors: &mut ErrorMap,
    field: &str,
    value: &str,
    charset: &Regex,
    required_message: &str,
    charset_message: &str,
) {
    if value.trim().is_empty() {
        errors.add(field, required_message);
    } else if !charset.is_match(value) {
        errors.add(field, charset_message);
    }
}

fn validate_tag_cardinality(device: &Device, errors: &mut ErrorMap) {
    if device.tags.is_empty() {
        errors.add("Tags", "Device must have at least one Tag.");
    } else if device.tags.len() > 1 {
        errors.add("Tags", "Device must only have one Tag.");
    }
}

fn validate_hostname_policy(
    device: &Device,
    tags_in_scope: &[DeviceTag],
    policies: &mut PolicyCache,
    errors: &mut ErrorMap,
) {
    // Only with exactly one selected tag, and only when that tag resolves.
    let tag = match device.tags.as_slice() {
        [tag_id] => match resolve_tag(tag_id, tags_in_scope) {
            Some(tag) => tag,
            None => return,
        },
        _ => return,
    };

    let hostname = device.preferred_hostname.as_str();

    // The rename requirement does not depend on the pattern compiling.
    if tag.device_rename_enabled && hostname.trim().is_empty() {
        errors.add(
            "PreferredHostname",
            "Preferred Hostname is required for this tag.",
        );
    }

    match policies.policy_for(tag) {
        Ok(policy) => {
            // Pattern conformance is independent of the rename requirement.
            if policy.has_pattern() && !policy.hostname_matches(hostname) {
                errors.add(
                    "PreferredHostname",
                    format!(
                        "Does not match regex pattern required for this tag: {}",
                        policy.pattern_source().unwrap_or_default()
                    ),
                );
            }
        }
        Err(err) => {
            tracing::warn!(tag_id = %tag.id, error = %err, "Tag has an invalid device name pattern");
            errors.add(
                "PreferredHostname",
                "Cannot validate field. Contact administrator.",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceOs, ImportAction};
    use uuid::Uuid;

    fn scope_tags() -> Vec<DeviceTag> {
        let mut no_rename = DeviceTag::new("NoRenameNoRegex");
        no_rename.id = Uuid::from_u128(1);

        let mut rename_only = DeviceTag::new("RenameNoRegex");
        rename_only.id = Uuid::from_u128(2);
        rename_only.device_rename_enabled = true;

        let mut regex_only = DeviceTag::new("RegexNoRename");
        regex_only.id = Uuid::from_u128(3);
        regex_only.device_name_regex = Some("^match$".to_string());

        let mut rename_and_regex = DeviceTag::new("RenameAndRegex");
        rename_and_regex.id = Uuid::from_u128(4);
        rename_and_regex.device_rename_enabled = true;
        rename_and_regex.device_name_regex = Some("^match$".to_string());

        vec![no_rename, rename_only, regex_only, rename_and_regex]
    }

    fn device_with(tag: Option<&DeviceTag>, hostname: &str) -> Device {
        let mut device = Device::new();
        device.make = "Make".to_string();
        device.model = "Model".to_string();
        device.serial_number = "12345".to_string();
        device.preferred_hostname = hostname.to_string();
        device.os = Some(DeviceOs::Windows);
        device.tags = tag.map(|t| vec![t.id.to_string()]).unwrap_or_default();
        device
    }

    #[test]
    fn no_tags_reports_at_least_one() {
        let tags = scope_tags();
        let device = device_with(None, "hostname");

        let errors = validate_device(&device, &tags);
        assert!(errors.get("Tags").unwrap()[0].contains("at least one Tag"));
        assert!(errors.get("PreferredHostname").is_none());
    }

    #[test]
    fn multiple_tags_reports_only_one() {
        let tags = scope_tags();
        let mut device = device_with(None, "hostname");
        device.tags = vec![tags[0].id.to_string(), tags[1].id.to_string()];

        let errors = validate_device(&device, &tags);
        assert!(errors.get("Tags").unwrap()[0].contains("only have one Tag"));
        assert!(errors.get("PreferredHostname").is_none());
    }

    #[test]
    fn unknown_tag_id_means_no_policy() {
        let tags = scope_tags();
        let mut device = device_with(None, "");
        device.tags = vec![Uuid::from_u128(99).to_string()];

        let errors = validate_device(&device, &tags);
        assert!(errors.is_empty());
    }

    #[test]
    fn no_rename_no_regex_allows_any_hostname() {
        let tags = scope_tags();
        for hostname in ["", "hostname", "UPPER-lower-9"] {
            let device = device_with(Some(&tags[0]), hostname);
            assert!(validate_device(&device, &tags).is_empty(), "{hostname:?}");
        }
    }

    #[test]
    fn rename_required_rejects_blank_hostnames() {
        let tags = scope_tags();
        for hostname in ["", "   "] {
            let device = device_with(Some(&tags[1]), hostname);
            let errors = validate_device(&device, &tags);
            assert!(
                errors.get("PreferredHostname").unwrap()[0].contains("required for this tag"),
                "{hostname:?}"
            );
        }
    }

    #[test]
    fn rename_required_accepts_any_nonempty_hostname() {
        let tags = scope_tags();
        let device = device_with(Some(&tags[1]), "any-hostname");
        assert!(validate_device(&device, &tags).is_empty());
    }

    #[test]
    fn pattern_enforced_without_rename_requirement() {
        let tags = scope_tags();

        let mismatch = device_with(Some(&tags[2]), "nomatch");
        let errors = validate_device(&mismatch, &tags);
        let messages = errors.get("PreferredHostname").unwrap();
        assert_eq!(messages.len(), 1);
        assert!(
            messages[0].contains("Does not match regex pattern required for this tag: ^match$")
        );

        let matching = device_with(Some(&tags[2]), "match");
        assert!(validate_device(&matching, &tags).is_empty());
    }

    #[test]
    fn rename_and_pattern_accepts_matching_hostname() {
        let tags = scope_tags();
        let device = device_with(Some(&tags[3]), "match");
        assert!(validate_device(&device, &tags).is_empty());
    }

    #[test]
    fn rename_and_pattern_rejects_mismatch_with_single_error() {
        let tags = scope_tags();
        let device = device_with(Some(&tags[3]), "nomatch");
        let errors = validate_device(&device, &tags);
        let messages = errors.get("PreferredHostname").unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Does not match regex pattern"));
    }

    #[test]
    fn invalid_pattern_degrades_to_contact_administrator() {
        let mut tag = DeviceTag::new("InvalidRegex");
        tag.id = Uuid::from_u128(10);
        tag.device_rename_enabled = true;
        tag.device_name_regex = Some("[invalid(regex".to_string());
        let tags = vec![tag.clone()];

        for hostname in ["hostname", "match"] {
            let device = device_with(Some(&tag), hostname);
            let errors = validate_device(&device, &tags);
            let messages = errors.get("PreferredHostname").unwrap();
            assert!(messages.iter().any(|m| m.contains("Cannot validate")));
            assert!(
                !messages.iter().any(|m| m.contains("Does not match")),
                "no match attempt may follow a compile failure"
            );
        }
    }

    #[test]
    fn rename_requirement_survives_invalid_pattern() {
        // A compile failure suppresses only the match attempt; a blank
        // hostname on a rename-required tag still reports as missing.
        let mut tag = DeviceTag::new("InvalidRegexRename");
        tag.id = Uuid::from_u128(11);
        tag.device_rename_enabled = true;
        tag.device_name_regex = Some("[invalid(".to_string());
        let tags = vec![tag.clone()];

        let device = device_with(Some(&tag), "");
        let errors = validate_device(&device, &tags);
        let messages = errors.get("PreferredHostname").unwrap();
        assert!(messages.iter().any(|m| m.contains("required for this tag")));
        assert!(messages.iter().any(|m| m.contains("Cannot validate")));
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn field_shape_required_messages() {
        let tags = scope_tags();
        let mut device = device_with(Some(&tags[0]), "");
        device.make = String::new();
        device.model = "  ".to_string();
        device.serial_number = String::new();

        let errors = validate_device(&device, &tags);
        assert_eq!(errors.get("Make").unwrap(), &["Make is Required"]);
        assert_eq!(errors.get("Model").unwrap(), &["Model is Required"]);
        assert_eq!(
            errors.get("SerialNumber").unwrap(),
            &["Serial Number is Required"]
        );
    }

    #[test]
    fn field_shape_charset_messages() {
        let tags = scope_tags();
        let mut device = device_with(Some(&tags[0]), "");
        device.make = "Acme|Inc".to_string();
        device.serial_number = "SN#1".to_string();

        let errors = validate_device(&device, &tags);
        assert!(errors.get("Make").unwrap()[0].contains("special characters"));
        assert!(errors.get("SerialNumber").unwrap()[0].contains("SerialNumber value"));
        assert!(errors.get("Model").is_none());
    }

    #[test]
    fn hostname_shape_rules_accumulate() {
        let tags = scope_tags();

        let leading_hyphen = device_with(Some(&tags[0]), "-host");
        let errors = validate_device(&leading_hyphen, &tags);
        assert!(errors.get("PreferredHostname").unwrap()[0].contains("Hyphens may not be"));

        let too_long = device_with(Some(&tags[0]), "a-very-long-hostname");
        let errors = validate_device(&too_long, &tags);
        assert!(errors
            .get("PreferredHostname")
            .unwrap()
            .iter()
            .any(|m| m.contains("cannot exceed 15 characters")));
    }

    #[test]
    fn shape_and_tag_errors_report_together() {
        // No short-circuit: a blank make and a policy violation both surface.
        let tags = scope_tags();
        let mut device = device_with(Some(&tags[2]), "nomatch");
        device.make = String::new();

        let errors = validate_device(&device, &tags);
        assert!(errors.get("Make").is_some());
        assert!(errors.get("PreferredHostname").is_some());
    }

    #[test]
    fn import_row_matches_device_validation() {
        let tags = scope_tags();
        let selected = vec![tags[3].clone()];

        let row = DeviceImportRow {
            make: "Make".to_string(),
            model: "Model".to_string(),
            serial_number: "12345".to_string(),
            preferred_hostname: "nomatch".to_string(),
            os: Some(DeviceOs::Windows),
            action: ImportAction::Add,
        };
        let row_errors = validate_import_row(&row, &selected);

        let device = device_with(Some(&tags[3]), "nomatch");
        let device_errors = validate_device(&device, &selected);

        assert_eq!(row_errors, device_errors);
        assert!(row_errors.get("PreferredHostname").unwrap()[0].contains("Does not match"));
    }

    #[test]
    fn import_row_with_no_tags_reports_cardinality() {
        let row = DeviceImportRow {
            make: "Make".to_string(),
            model: "Model".to_string(),
            serial_number: "12345".to_string(),
            ..DeviceImportRow::default()
        };
        let errors = validate_import_row(&row, &[]);
        assert!(errors.get("Tags").unwrap()[0].contains("at least one Tag"));
    }
}
