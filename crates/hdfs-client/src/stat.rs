//! File status, directory listings and tree walks.

use hdfs_rpc::exception;
use hdfs_rpc::proto::hdfs::hdfs_file_status_proto::FileType as FileTypeProto;
use hdfs_rpc::proto::hdfs::{
    GetFileInfoRequestProto, GetFileInfoResponseProto, GetListingRequestProto,
    GetListingResponseProto, HdfsFileStatusProto,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::{ClientError, PathError, Result};
use crate::permission;

/// Kind of inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Directory.
    Dir,
    /// Regular file.
    File,
    /// Symbolic link.
    Symlink,
}

impl FileType {
    fn from_proto(file_type: FileTypeProto) -> Self {
        match file_type {
            FileTypeProto::IsDir => FileType::Dir,
            FileTypeProto::IsFile => FileType::File,
            FileTypeProto::IsSymlink => FileType::Symlink,
        }
    }

    /// First character of an `ls -l` mode string.
    pub fn type_char(&self) -> char {
        match self {
            FileType::Dir => 'd',
            FileType::File => '-',
            FileType::Symlink => 'l',
        }
    }
}

/// Metadata of one file or directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    /// Absolute path.
    pub path: String,
    /// Directory, file or symlink.
    pub file_type: FileType,
    /// Size in bytes, 0 for directories.
    pub length: u64,
    /// Permission bits including the sticky bit.
    pub permission: u32,
    /// Owning user.
    pub owner: String,
    /// Owning group.
    pub group: String,
    /// Milliseconds since the epoch.
    pub modification_time: u64,
    /// Milliseconds since the epoch.
    pub access_time: u64,
    /// Block replication factor, 0 for directories.
    pub replication: u32,
    /// Block size in bytes.
    pub block_size: u64,
    /// Link target for symlinks.
    pub symlink: Option<String>,
}

impl FileStatus {
    pub(crate) fn from_proto(path: String, proto: HdfsFileStatusProto) -> Self {
        Self {
            path,
            file_type: FileType::from_proto(proto.file_type()),
            length: proto.length,
            permission: proto.permission.map(|p| p.perm).unwrap_or_default(),
            owner: proto.owner,
            group: proto.group,
            modification_time: proto.modification_time,
            access_time: proto.access_time,
            replication: proto.block_replication.unwrap_or_default(),
            block_size: proto.blocksize.unwrap_or_default(),
            symlink: proto
                .symlink
                .map(|target| String::from_utf8_lossy(&target).into_owned()),
        }
    }

    /// Whether this is a directory.
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Dir
    }

    /// Whether the sticky bit is set.
    pub fn is_sticky(&self) -> bool {
        self.permission & permission::STICKY_BIT != 0
    }

    /// Last path component; `/` for the root.
    pub fn name(&self) -> &str {
        match self.path.trim_end_matches('/').rsplit('/').next() {
            Some("") | None => "/",
            Some(name) => name,
        }
    }

    /// Mode string such as `drwxr-xr-x`.
    pub fn mode_string(&self) -> String {
        permission::mode_string(self.file_type.type_char(), self.permission)
    }
}

/// Joins a directory path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

fn not_found(op: &'static str, path: &str) -> PathError {
    let err = exception::interpret(
        "java.io.FileNotFoundException",
        &format!("File does not exist: {}", path),
    );
    PathError::new(op, path, ClientError::Server(err))
}

impl Client {
    /// Returns the status of `path`.
    pub async fn stat(&self, path: &str) -> Result<FileStatus> {
        self.file_info(path)
            .await
            .map_err(|e| PathError::new("stat", path, e))?
            .ok_or_else(|| not_found("stat", path))
    }

    /// `getFileInfo`; `None` when the path does not exist.
    pub(crate) async fn file_info(
        &self,
        path: &str,
    ) -> std::result::Result<Option<FileStatus>, ClientError> {
        let req = GetFileInfoRequestProto {
            src: path.to_string(),
        };
        let resp: GetFileInfoResponseProto = self.call("getFileInfo", &req).await?;
        Ok(resp
            .fs
            .map(|fs| FileStatus::from_proto(path.to_string(), fs)))
    }

    /// Lists the entries of a directory, following pagination until the
    /// NameNode reports no remaining entries.
    pub async fn read_dir(&self, path: &str) -> Result<Vec<FileStatus>> {
        let mut entries = Vec::new();
        let mut start_after = Vec::new();
        loop {
            let req = GetListingRequestProto {
                src: path.to_string(),
                start_after: start_after.clone(),
                need_location: false,
            };
            let resp: GetListingResponseProto = self
                .call("getListing", &req)
                .await
                .map_err(|e| PathError::new("readdir", path, e))?;
            let listing = resp.dir_list.ok_or_else(|| not_found("readdir", path))?;

            let remaining = listing.remaining_entries;
            let page_len = listing.partial_listing.len();
            if let Some(last) = listing.partial_listing.last() {
                start_after = last.path.clone();
            }
            for proto in listing.partial_listing {
                let name = String::from_utf8_lossy(&proto.path).into_owned();
                entries.push(FileStatus::from_proto(join_path(path, &name), proto));
            }
            debug!(path, page_len, remaining, "listing page");
            if remaining == 0 || page_len == 0 {
                break;
            }
        }
        Ok(entries)
    }

    /// Visits `root` and everything below it, depth first and pre-order,
    /// children in listing order. Stops at the first error.
    pub async fn walk<F>(&self, root: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&FileStatus),
    {
        let mut stack = vec![self.stat(root).await?];
        while let Some(status) = stack.pop() {
            visit(&status);
            if status.is_dir() {
                let children = self.read_dir(&status.path).await?;
                stack.extend(children.into_iter().rev());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdfs_rpc::proto::hdfs::FsPermissionProto;

    fn proto(name: &str, file_type: FileTypeProto, perm: u32) -> HdfsFileStatusProto {
        HdfsFileStatusProto {
            file_type: file_type as i32,
            path: name.as_bytes().to_vec(),
            length: 42,
            permission: Some(FsPermissionProto { perm }),
            owner: "alice".to_string(),
            group: "eng".to_string(),
            modification_time: 1,
            access_time: 2,
            symlink: None,
            block_replication: Some(3),
            blocksize: Some(134_217_728),
            file_id: Some(16386),
            children_num: None,
        }
    }

    #[test]
    fn test_from_proto() {
        let status = FileStatus::from_proto(
            "/data/x".to_string(),
            proto("x", FileTypeProto::IsFile, 0o644),
        );
        assert_eq!(status.file_type, FileType::File);
        assert_eq!(status.name(), "x");
        assert_eq!(status.mode_string(), "-rw-r--r--");
        assert_eq!(status.replication, 3);
        assert!(!status.is_dir());
    }

    #[test]
    fn test_sticky_dir() {
        let status =
            FileStatus::from_proto("/tmp".to_string(), proto("", FileTypeProto::IsDir, 0o1777));
        assert!(status.is_sticky());
        assert_eq!(status.mode_string(), "drwxrwxrwt");
    }

    #[test]
    fn test_join_and_name() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
        assert_eq!(join_path("/a/", "b"), "/a/b");
        let root = FileStatus::from_proto("/".to_string(), proto("", FileTypeProto::IsDir, 0o755));
        assert_eq!(root.name(), "/");
    }
}
