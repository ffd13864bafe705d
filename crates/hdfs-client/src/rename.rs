//! Rename (move) with `rename2` overwrite semantics.

use hdfs_rpc::exception;
use hdfs_rpc::proto::hdfs::{Rename2RequestProto, Rename2ResponseProto};
use tracing::debug;

use crate::client::Client;
use crate::error::{ClientError, PathError, Result};
use crate::flags::{merge_flags, Flag};

impl Client {
    /// Renames `old` to `new`.
    ///
    /// An existing `new` is replaced unless [`Flag::NO_REPLACE`] is given, in
    /// which case the call fails with an already-exists error. Failures to
    /// look up `new` are reported against `new`; failures of the rename
    /// itself against `old`.
    pub async fn rename(&self, old: &str, new: &str, flags: &[Flag]) -> Result<()> {
        let flag = merge_flags(flags);
        let overwrite = !flag.contains(Flag::NO_REPLACE);

        let existing = match self.file_info(new).await {
            Ok(existing) => existing,
            Err(e) if e.kind() == Some(hdfs_rpc::ErrorKind::NotFound) => None,
            Err(e) => return Err(PathError::new("rename", new, e)),
        };
        if existing.is_some() && !overwrite {
            let err = exception::interpret(
                "org.apache.hadoop.fs.FileAlreadyExistsException",
                &format!("rename destination {} already exists", new),
            );
            return Err(PathError::new("rename", new, ClientError::Server(err)));
        }

        let req = Rename2RequestProto {
            src: old.to_string(),
            dst: new.to_string(),
            overwrite_dest: overwrite,
            move_to_trash: None,
        };
        let _: Rename2ResponseProto = self
            .call("rename2", &req)
            .await
            .map_err(|e| PathError::new("rename", old, e))?;
        debug!(old, new, overwrite, "renamed");
        Ok(())
    }
}
