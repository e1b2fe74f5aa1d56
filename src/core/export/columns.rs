//! Column schemas and row projection
//!
//! Each report kind declares its CSV columns once, and every record is
//! projected through exactly one function here. Absent optional values
//! always render as [`PLACEHOLDER`], so readers never have to guess
//! between an empty field and a missing one. Epoch-second timestamps
//! render as calendar dates.

use crate::domain::records::{Account, Safe, User};
use chrono::DateTime;

/// Rendering for absent optional fields
pub const PLACEHOLDER: &str = "N/A";

/// Accounts report columns
pub const ACCOUNT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "address",
    "username",
    "platform",
    "safe",
    "secret_type",
    "automatic_management",
    "manual_management_reason",
    "management_status",
    "last_modified_date",
    "last_reconciled_date",
    "last_verified_date",
    "created_date",
    "category_modification_date",
    "database",
    "port",
    "logon_domain",
    "dual_account_status",
    "virtual_username",
    "index",
    "group_name",
    "remote_machines",
    "remote_machines_restricted",
];

/// Safes report columns
pub const SAFE_COLUMNS: &[&str] = &[
    "safe",
    "description",
    "location",
    "creator",
    "managing_cpm",
    "olac_enabled",
    "days_retention",
    "versions_retention",
    "created_date",
    "last_modified_date",
];

/// Users details report columns
pub const USER_COLUMNS: &[&str] = &[
    "id",
    "username",
    "source",
    "user_type",
    "location",
    "component_user",
    "enabled",
    "suspended",
    "vault_authorizations",
];

/// User group membership report columns
pub const USER_GROUP_COLUMNS: &[&str] = &[
    "user_id",
    "username",
    "group_id",
    "group_name",
    "membership_type",
];

/// Project an account into its report row
pub fn account_row(account: &Account) -> Vec<String> {
    let mgmt = account.secret_management.as_ref();
    let remote = account.remote_machines_access.as_ref();

    vec![
        account.id.clone(),
        opt_str(account.name.as_deref()),
        opt_str(account.address.as_deref()),
        opt_str(account.user_name.as_deref()),
        opt_str(account.platform_id.as_deref()),
        opt_str(account.safe_name.as_deref()),
        opt_str(account.secret_type.as_deref()),
        opt_bool(mgmt.and_then(|m| m.automatic_management_enabled)),
        opt_str(mgmt.and_then(|m| m.manual_management_reason.as_deref())),
        opt_str(mgmt.and_then(|m| m.status.as_deref())),
        epoch_date(mgmt.and_then(|m| m.last_modified_time)),
        epoch_date(mgmt.and_then(|m| m.last_reconciled_time)),
        epoch_date(mgmt.and_then(|m| m.last_verified_time)),
        epoch_date(account.created_time),
        epoch_date(account.category_modification_time),
        opt_owned(account.platform_property("Database")),
        opt_owned(account.platform_property("Port")),
        opt_owned(account.platform_property("LogonDomain")),
        opt_owned(account.platform_property("DualAccountStatus")),
        opt_owned(account.platform_property("VirtualUsername")),
        opt_owned(account.platform_property("Index")),
        opt_owned(account.platform_property("GroupName")),
        opt_str(remote.and_then(|r| r.remote_machines.as_deref())),
        opt_bool(remote.and_then(|r| r.access_restricted_to_remote_machines)),
    ]
}

/// Project a safe into its report row
pub fn safe_row(safe: &Safe) -> Vec<String> {
    vec![
        safe.safe_name.clone(),
        opt_str(safe.description.as_deref()),
        opt_str(safe.location.as_deref()),
        opt_str(
            safe.creator
                .as_ref()
                .and_then(|c| c.name.as_deref().or(c.id.as_deref())),
        ),
        opt_str(safe.managing_cpm.as_deref().filter(|s| !s.is_empty())),
        opt_bool(safe.olac_enabled),
        opt_num(safe.number_of_days_retention),
        opt_num(safe.number_of_versions_retention),
        epoch_date(safe.creation_time),
        epoch_date(safe.last_modification_time),
    ]
}

/// Project a user into its details row
pub fn user_row(user: &User) -> Vec<String> {
    vec![
        user.id.to_string(),
        user.username.clone(),
        opt_str(user.source.as_deref()),
        opt_str(user.user_type.as_deref()),
        opt_str(user.location.as_deref()),
        opt_bool(user.component_user),
        opt_bool(user.enabled),
        opt_bool(user.suspended),
        if user.vault_authorization.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            user.vault_authorization.join(";")
        },
    ]
}

/// Project a user into one membership row per group
pub fn user_group_rows(user: &User) -> Vec<Vec<String>> {
    user.groups_membership
        .iter()
        .map(|group| {
            vec![
                user.id.to_string(),
                user.username.clone(),
                group
                    .group_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                opt_str(group.group_name.as_deref()),
                opt_str(group.membership_type.as_deref()),
            ]
        })
        .collect()
}

fn opt_str(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn opt_owned(value: Option<String>) -> String {
    opt_str(value.as_deref())
}

fn opt_bool(value: Option<bool>) -> String {
    match value {
        Some(b) => b.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

fn opt_num(value: Option<u32>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render Unix epoch seconds as a calendar date
fn epoch_date(value: Option<i64>) -> String {
    value
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
