//! Vault domain records
//!
//! The three record kinds the vault API serves: safes (containers),
//! accounts (privileged credentials), and users. These deserialize
//! directly from the API's JSON and carry the unique identifier used
//! for pagination duplicate detection.

use serde::{Deserialize, Serialize};

/// A record type that can be paginated over.
///
/// Every paginated collection exposes one unique identifier per record.
/// The fetcher uses it to detect a cursor that has cycled or duplicated.
pub trait PagedRecord {
    /// The unique identifier of this record within its collection
    fn record_id(&self) -> String;

    /// Collection name used in log fields and error messages
    fn kind_name() -> &'static str;
}

/// A safe: a named container of privileged accounts with its own
/// retention and ownership policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Safe {
    /// Safe name, the unique identifier within the vault
    pub safe_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// The user or component that created the safe
    #[serde(default)]
    pub creator: Option<SafeMember>,

    /// Central policy manager assigned to the safe, if any
    #[serde(default, rename = "managingCPM")]
    pub managing_cpm: Option<String>,

    /// Object-level access control enabled
    #[serde(default)]
    pub olac_enabled: Option<bool>,

    /// Retention in days; mutually exclusive with version retention
    #[serde(default)]
    pub number_of_days_retention: Option<u32>,

    /// Retention in object versions
    #[serde(default)]
    pub number_of_versions_retention: Option<u32>,

    /// Creation time as Unix epoch seconds
    #[serde(default)]
    pub creation_time: Option<i64>,

    /// Last modification time as Unix epoch seconds
    #[serde(default)]
    pub last_modification_time: Option<i64>,
}

/// Creator reference embedded in a safe record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeMember {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl PagedRecord for Safe {
    fn record_id(&self) -> String {
        self.safe_name.clone()
    }

    fn kind_name() -> &'static str {
        "safes"
    }
}

/// A privileged account stored in a safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account identifier, unique across the vault
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub user_name: Option<String>,

    /// Platform the account is onboarded to
    #[serde(default)]
    pub platform_id: Option<String>,

    /// Safe holding the account
    #[serde(default)]
    pub safe_name: Option<String>,

    #[serde(default)]
    pub secret_type: Option<String>,

    /// Free-form platform properties (database, port, logon domain, ...)
    #[serde(default)]
    pub platform_account_properties: Option<serde_json::Map<String, serde_json::Value>>,

    #[serde(default)]
    pub secret_management: Option<SecretManagement>,

    #[serde(default)]
    pub remote_machines_access: Option<RemoteMachinesAccess>,

    /// Creation time as Unix epoch seconds
    #[serde(default)]
    pub created_time: Option<i64>,

    /// Time of the last property modification as Unix epoch seconds
    #[serde(default)]
    pub category_modification_time: Option<i64>,
}

/// Secret lifecycle status attached to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretManagement {
    #[serde(default)]
    pub automatic_management_enabled: Option<bool>,

    #[serde(default)]
    pub manual_management_reason: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub last_modified_time: Option<i64>,

    #[serde(default)]
    pub last_reconciled_time: Option<i64>,

    #[serde(default)]
    pub last_verified_time: Option<i64>,
}

/// Remote machine restrictions attached to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMachinesAccess {
    #[serde(default)]
    pub remote_machines: Option<String>,

    #[serde(default)]
    pub access_restricted_to_remote_machines: Option<bool>,
}

impl Account {
    /// Look up a platform property by key, if present and scalar
    pub fn platform_property(&self, key: &str) -> Option<String> {
        let props = self.platform_account_properties.as_ref()?;
        match props.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl PagedRecord for Account {
    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn kind_name() -> &'static str {
        "accounts"
    }
}

/// A vault user, with group memberships and vault-level authorizations.
///
/// The users endpoint returns every user in one response, so this type
/// is fetched through the requester rather than the paginated fetcher;
/// it still carries `PagedRecord` so the same duplicate check applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Numeric user identifier
    pub id: u64,

    pub username: String,

    /// Directory the user originates from (vault-internal or LDAP)
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub user_type: Option<String>,

    #[serde(default)]
    pub component_user: Option<bool>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default, rename = "enableUser")]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub suspended: Option<bool>,

    /// Vault-level authorizations granted directly to the user
    #[serde(default, rename = "vaultAuthorization")]
    pub vault_authorization: Vec<String>,

    #[serde(default, rename = "groupsMembership")]
    pub groups_membership: Vec<GroupMembership>,
}

/// One group membership entry on a user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    #[serde(default, rename = "groupID")]
    pub group_id: Option<u64>,

    #[serde(default)]
    pub group_name: Option<String>,

    #[serde(default)]
    pub membership_type: Option<String>,
}

impl PagedRecord for User {
    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn kind_name() -> &'static str {
        "users"
    }
}
