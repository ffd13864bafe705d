//! POSIX ACLs as reported by the NameNode.

use std::fmt;

use hdfs_rpc::proto::hdfs::acl_entry_proto::{AclEntryScopeProto, AclEntryTypeProto};
use hdfs_rpc::proto::hdfs::{AclEntryProto, AclStatusProto, GetAclStatusRequestProto, GetAclStatusResponseProto};
use hdfs_rpc::RpcError;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{PathError, Result};
use crate::permission;

/// Entry type names, indexed by [`AclEntryType`] discriminant.
pub const ENTRY_TYPE_NAMES: [&str; 4] = ["user", "group", "mask", "other"];

/// Whether an entry applies to the inode itself or is inherited by children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclScope {
    /// Checked on access to this inode.
    Access,
    /// Copied to new children of a directory.
    Default,
}

/// Who an entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclEntryType {
    /// Owner or a named user.
    User = 0,
    /// Owning group or a named group.
    Group = 1,
    /// Upper bound for group class entries.
    Mask = 2,
    /// Everyone else.
    Other = 3,
}

impl AclEntryType {
    /// Name used in `getfacl` output.
    pub fn as_str(&self) -> &'static str {
        ENTRY_TYPE_NAMES[*self as usize]
    }
}

/// One ACL entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    /// Access or default entry.
    pub scope: AclScope,
    /// Who the entry applies to.
    pub entry_type: AclEntryType,
    /// Named user or group; `None` for the owner, owning group, mask and other.
    pub name: Option<String>,
    /// 3-bit `rwx` value.
    pub permissions: u32,
}

impl AclEntry {
    fn from_proto(proto: &AclEntryProto) -> Self {
        let scope = match proto.scope() {
            AclEntryScopeProto::Access => AclScope::Access,
            AclEntryScopeProto::Default => AclScope::Default,
        };
        let entry_type = match proto.r#type() {
            AclEntryTypeProto::User => AclEntryType::User,
            AclEntryTypeProto::Group => AclEntryType::Group,
            AclEntryTypeProto::Mask => AclEntryType::Mask,
            AclEntryTypeProto::Other => AclEntryType::Other,
        };
        Self {
            scope,
            entry_type,
            name: proto.name.clone().filter(|n| !n.is_empty()),
            permissions: proto.permissions() as u32,
        }
    }

    /// Permissions as `rwx`.
    pub fn permission_string(&self) -> &'static str {
        permission::rwx(self.permissions)
    }
}

/// `[default:]type:name:rwx`
impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope == AclScope::Default {
            f.write_str("default:")?;
        }
        write!(
            f,
            "{}:{}:{}",
            self.entry_type.as_str(),
            self.name.as_deref().unwrap_or_default(),
            self.permission_string()
        )
    }
}

/// ACL of one path. The base owner/group/other bits are not repeated as
/// entries; only extended entries are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclStatus {
    /// Path the ACL was read from.
    pub path: String,
    /// Owning user.
    pub owner: String,
    /// Owning group.
    pub group: String,
    /// Whether the sticky bit is set.
    pub sticky: bool,
    /// Permission bits, when the NameNode reports them.
    pub permission: Option<u32>,
    /// Entries in NameNode order.
    pub entries: Vec<AclEntry>,
}

impl AclStatus {
    pub(crate) fn from_proto(path: &str, proto: AclStatusProto) -> Self {
        Self {
            path: path.to_string(),
            entries: proto.entries.iter().map(AclEntry::from_proto).collect(),
            owner: proto.owner,
            group: proto.group,
            sticky: proto.sticky,
            permission: proto.permission.map(|p| p.perm),
        }
    }
}

impl Client {
    /// Returns the ACL of `path`.
    pub async fn getfacl(&self, path: &str) -> Result<AclStatus> {
        let req = GetAclStatusRequestProto {
            src: path.to_string(),
        };
        let resp: GetAclStatusResponseProto = self
            .call("getAclStatus", &req)
            .await
            .map_err(|e| PathError::new("getfacl", path, e))?;
        let result = resp.result.ok_or_else(|| {
            PathError::new(
                "getfacl",
                path,
                RpcError::ProtocolViolation {
                    method: "getAclStatus".to_string(),
                    reason: "response has no result".to_string(),
                },
            )
        })?;
        Ok(AclStatus::from_proto(path, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdfs_rpc::proto::hdfs::acl_entry_proto::FsActionProto;

    fn entry(scope: AclEntryScopeProto, ty: AclEntryTypeProto, name: Option<&str>, perm: FsActionProto) -> AclEntryProto {
        AclEntryProto {
            r#type: ty as i32,
            scope: scope as i32,
            permissions: perm as i32,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_entry_display() {
        let e = AclEntry::from_proto(&entry(
            AclEntryScopeProto::Default,
            AclEntryTypeProto::Group,
            Some("eng"),
            FsActionProto::ReadWrite,
        ));
        assert_eq!(e.to_string(), "default:group:eng:rw-");

        let e = AclEntry::from_proto(&entry(
            AclEntryScopeProto::Access,
            AclEntryTypeProto::User,
            Some("bob"),
            FsActionProto::ReadExecute,
        ));
        assert_eq!(e.to_string(), "user:bob:r-x");

        let e = AclEntry::from_proto(&entry(
            AclEntryScopeProto::Access,
            AclEntryTypeProto::Mask,
            Some(""),
            FsActionProto::PermAll,
        ));
        assert_eq!(e.name, None);
        assert_eq!(e.to_string(), "mask::rwx");
    }

    #[test]
    fn test_status_from_proto() {
        let proto = AclStatusProto {
            owner: "hdfs".to_string(),
            group: "supergroup".to_string(),
            sticky: true,
            entries: vec![
                entry(AclEntryScopeProto::Access, AclEntryTypeProto::User, Some("bob"), FsActionProto::Read),
                entry(AclEntryScopeProto::Default, AclEntryTypeProto::Other, None, FsActionProto::None),
            ],
            permission: None,
        };
        let status = AclStatus::from_proto("/shared", proto);
        assert_eq!(status.path, "/shared");
        assert!(status.sticky);
        assert_eq!(status.entries.len(), 2);
        assert_eq!(status.entries[0].entry_type, AclEntryType::User);
        assert_eq!(status.entries[1].to_string(), "default:other::---");
    }

    #[test]
    fn test_type_table_matches_enum() {
        assert_eq!(AclEntryType::User.as_str(), "user");
        assert_eq!(AclEntryType::Other.as_str(), "other");
    }
}
