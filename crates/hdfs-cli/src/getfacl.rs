//! `hdfs getfacl`: print the ACLs of files and directories.

use std::io::{self, Write};

use hdfs_client::{AclStatus, Client, FileStatus};
use tracing::debug;

/// Writes one `getfacl` block for `status`, followed by a blank line.
pub fn format_acl<W: Write>(out: &mut W, status: &FileStatus, acl: &AclStatus) -> io::Result<()> {
    writeln!(out, "# file: {}", status.path)?;
    writeln!(out, "# owner: {}", acl.owner)?;
    writeln!(out, "# group: {}", acl.group)?;
    writeln!(out, "# perm: {}", status.mode_string())?;
    if acl.sticky {
        writeln!(out, "# flags: --t")?;
    }
    for entry in &acl.entries {
        writeln!(out, "{}", entry)?;
    }
    writeln!(out)
}

/// Prints the ACL of every path, descending into directories when
/// `recursive` is set. Per-path failures go to `err` and make the returned
/// exit status 1; remaining paths are still processed.
pub async fn run<W: Write, E: Write>(
    client: &Client,
    paths: &[String],
    recursive: bool,
    out: &mut W,
    err: &mut E,
) -> io::Result<i32> {
    let mut status = 0;
    for path in paths {
        let targets = if recursive {
            let mut visited = Vec::new();
            match client.walk(path, |st| visited.push(st.clone())).await {
                Ok(()) => visited,
                Err(e) => {
                    writeln!(err, "{}", e)?;
                    status = 1;
                    visited
                }
            }
        } else {
            match client.stat(path).await {
                Ok(st) => vec![st],
                Err(e) => {
                    writeln!(err, "{}", e)?;
                    status = 1;
                    continue;
                }
            }
        };

        for target in &targets {
            match client.getfacl(&target.path).await {
                Ok(acl) => format_acl(out, target, &acl)?,
                Err(e) => {
                    writeln!(err, "{}", e)?;
                    status = 1;
                }
            }
        }
        debug!(path = %path, entries = targets.len(), "getfacl done");
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdfs_client::{AclEntry, AclEntryType, AclScope, FileType};

    fn dir_status(path: &str, permission: u32) -> FileStatus {
        FileStatus {
            path: path.to_string(),
            file_type: FileType::Dir,
            length: 0,
            permission,
            owner: "hdfs".to_string(),
            group: "eng".to_string(),
            modification_time: 0,
            access_time: 0,
            replication: 0,
            block_size: 0,
            symlink: None,
        }
    }

    #[test]
    fn test_format_sticky_with_default_entry() {
        let acl = AclStatus {
            path: "/shared".to_string(),
            owner: "hdfs".to_string(),
            group: "eng".to_string(),
            sticky: true,
            permission: Some(0o1770),
            entries: vec![AclEntry {
                scope: AclScope::Default,
                entry_type: AclEntryType::Group,
                name: Some("eng".to_string()),
                permissions: 6,
            }],
        };
        let mut out = Vec::new();
        format_acl(&mut out, &dir_status("/shared", 0o1770), &acl).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# file: /shared\n\
             # owner: hdfs\n\
             # group: eng\n\
             # perm: drwxrwx--T\n\
             # flags: --t\n\
             default:group:eng:rw-\n\
             \n"
        );
    }

    #[test]
    fn test_format_without_sticky() {
        let acl = AclStatus {
            path: "/data".to_string(),
            owner: "alice".to_string(),
            group: "eng".to_string(),
            sticky: false,
            permission: None,
            entries: vec![
                AclEntry {
                    scope: AclScope::Access,
                    entry_type: AclEntryType::User,
                    name: Some("bob".to_string()),
                    permissions: 5,
                },
                AclEntry {
                    scope: AclScope::Access,
                    entry_type: AclEntryType::Mask,
                    name: None,
                    permissions: 7,
                },
            ],
        };
        let mut out = Vec::new();
        format_acl(&mut out, &dir_status("/data", 0o755), &acl).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("# flags"));
        assert!(text.contains("# perm: drwxr-xr-x\n"));
        assert!(text.contains("user:bob:r-x\n"));
        assert!(text.contains("mask::rwx\n"));
    }
}
