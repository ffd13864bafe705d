//! Messages from Hadoop's `hadoop_hdfs` protocol package used by the client
//! operations: file status, listings, rename and ACLs.

/// POSIX permission bits of a file or directory, including the sticky bit.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct FsPermissionProto {
    #[prost(uint32, required, tag = "1")]
    pub perm: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HdfsFileStatusProto {
    #[prost(enumeration = "hdfs_file_status_proto::FileType", required, tag = "1")]
    pub file_type: i32,
    /// Local name of the inode, encoded as java UTF8.
    #[prost(bytes = "vec", required, tag = "2")]
    pub path: Vec<u8>,
    #[prost(uint64, required, tag = "3")]
    pub length: u64,
    #[prost(message, optional, tag = "4")]
    pub permission: Option<FsPermissionProto>,
    #[prost(string, required, tag = "5")]
    pub owner: String,
    #[prost(string, required, tag = "6")]
    pub group: String,
    #[prost(uint64, required, tag = "7")]
    pub modification_time: u64,
    #[prost(uint64, required, tag = "8")]
    pub access_time: u64,
    #[prost(bytes = "vec", optional, tag = "9")]
    pub symlink: Option<Vec<u8>>,
    #[prost(uint32, optional, tag = "10", default = "0")]
    pub block_replication: Option<u32>,
    #[prost(uint64, optional, tag = "11", default = "0")]
    pub blocksize: Option<u64>,
    #[prost(uint64, optional, tag = "13", default = "0")]
    pub file_id: Option<u64>,
    #[prost(int32, optional, tag = "14", default = "-1")]
    pub children_num: Option<i32>,
}

pub mod hdfs_file_status_proto {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum FileType {
        IsDir = 1,
        IsFile = 2,
        IsSymlink = 3,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DirectoryListingProto {
    #[prost(message, repeated, tag = "1")]
    pub partial_listing: Vec<HdfsFileStatusProto>,
    #[prost(uint32, required, tag = "2")]
    pub remaining_entries: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetFileInfoRequestProto {
    #[prost(string, required, tag = "1")]
    pub src: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetFileInfoResponseProto {
    /// Absent when the path does not exist.
    #[prost(message, optional, tag = "1")]
    pub fs: Option<HdfsFileStatusProto>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetListingRequestProto {
    #[prost(string, required, tag = "1")]
    pub src: String,
    /// Name of the last entry of the previous page, empty for the first page.
    #[prost(bytes = "vec", required, tag = "2")]
    pub start_after: Vec<u8>,
    #[prost(bool, required, tag = "3")]
    pub need_location: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetListingResponseProto {
    #[prost(message, optional, tag = "1")]
    pub dir_list: Option<DirectoryListingProto>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Rename2RequestProto {
    #[prost(string, required, tag = "1")]
    pub src: String,
    #[prost(string, required, tag = "2")]
    pub dst: String,
    #[prost(bool, required, tag = "3")]
    pub overwrite_dest: bool,
    #[prost(bool, optional, tag = "4")]
    pub move_to_trash: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Rename2ResponseProto {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AclEntryProto {
    #[prost(enumeration = "acl_entry_proto::AclEntryTypeProto", required, tag = "1")]
    pub r#type: i32,
    #[prost(enumeration = "acl_entry_proto::AclEntryScopeProto", required, tag = "2")]
    pub scope: i32,
    #[prost(enumeration = "acl_entry_proto::FsActionProto", required, tag = "3")]
    pub permissions: i32,
    #[prost(string, optional, tag = "4")]
    pub name: Option<String>,
}

pub mod acl_entry_proto {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum AclEntryScopeProto {
        Access = 0,
        Default = 1,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum AclEntryTypeProto {
        User = 0,
        Group = 1,
        Mask = 2,
        Other = 3,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum FsActionProto {
        None = 0,
        Execute = 1,
        Write = 2,
        WriteExecute = 3,
        Read = 4,
        ReadExecute = 5,
        ReadWrite = 6,
        PermAll = 7,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AclStatusProto {
    #[prost(string, required, tag = "1")]
    pub owner: String,
    #[prost(string, required, tag = "2")]
    pub group: String,
    #[prost(bool, required, tag = "3")]
    pub sticky: bool,
    #[prost(message, repeated, tag = "4")]
    pub entries: Vec<AclEntryProto>,
    #[prost(message, optional, tag = "5")]
    pub permission: Option<FsPermissionProto>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAclStatusRequestProto {
    #[prost(string, required, tag = "1")]
    pub src: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAclStatusResponseProto {
    #[prost(message, optional, tag = "1")]
    pub result: Option<AclStatusProto>,
}
