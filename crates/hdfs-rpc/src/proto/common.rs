//! Messages from Hadoop's `hadoop_common` protocol package: RPC headers,
//! SASL negotiation, the connection context and the protobuf engine header.

/// Serialization kind of an RPC call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RpcKindProto {
    /// Used for built-in calls by tests
    RpcBuiltin = 0,
    /// Use WritableRpcEngine
    RpcWritable = 1,
    /// Use ProtobufRpcEngine
    RpcProtocolBuffer = 2,
}

/// Header sent in front of every request frame.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcRequestHeaderProto {
    #[prost(enumeration = "RpcKindProto", optional, tag = "1")]
    pub rpc_kind: Option<i32>,
    #[prost(enumeration = "rpc_request_header_proto::OperationProto", optional, tag = "2")]
    pub rpc_op: Option<i32>,
    /// Sequence number, negative values are reserved for control traffic.
    #[prost(sint32, required, tag = "3")]
    pub call_id: i32,
    /// Globally unique client id, empty during SASL negotiation.
    #[prost(bytes = "vec", required, tag = "4")]
    pub client_id: Vec<u8>,
    /// Number of times the caller has retried this call.
    #[prost(sint32, optional, tag = "5", default = "-1")]
    pub retry_count: Option<i32>,
}

/// Nested types of [`RpcRequestHeaderProto`].
pub mod rpc_request_header_proto {
    /// Packet operation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum OperationProto {
        /// The final RPC packet
        RpcFinalPacket = 0,
        /// Not implemented yet
        RpcContinuationPacket = 1,
        /// Close the RPC connection
        RpcCloseConnection = 2,
    }
}

/// Header received in front of every response frame.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcResponseHeaderProto {
    /// Call id echoed from the request, transported unsigned.
    #[prost(uint32, required, tag = "1")]
    pub call_id: u32,
    #[prost(enumeration = "rpc_response_header_proto::RpcStatusProto", required, tag = "2")]
    pub status: i32,
    #[prost(uint32, optional, tag = "3")]
    pub server_ipc_version_num: Option<u32>,
    #[prost(string, optional, tag = "4")]
    pub exception_class_name: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub error_msg: Option<String>,
    #[prost(enumeration = "rpc_response_header_proto::RpcErrorCodeProto", optional, tag = "6")]
    pub error_detail: Option<i32>,
    #[prost(bytes = "vec", optional, tag = "7")]
    pub client_id: Option<Vec<u8>>,
    #[prost(sint32, optional, tag = "8", default = "-1")]
    pub retry_count: Option<i32>,
}

/// Nested types of [`RpcResponseHeaderProto`].
pub mod rpc_response_header_proto {
    /// Outcome of a call.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum RpcStatusProto {
        /// RPC succeeded
        Success = 0,
        /// RPC failed, the connection stays open
        Error = 1,
        /// Fatal error, the server closes the connection
        Fatal = 2,
    }

    /// Detail code attached to failed calls.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum RpcErrorCodeProto {
        /// Application-level exception thrown by the method
        ErrorApplication = 1,
        /// Unknown method
        ErrorNoSuchMethod = 2,
        /// Unknown protocol
        ErrorNoSuchProtocol = 3,
        /// Server side RPC failure
        ErrorRpcServer = 4,
        /// Response could not be serialized
        ErrorSerializingResponse = 5,
        /// RPC protocol version mismatch
        ErrorRpcVersionMismatch = 6,
        /// Unknown fatal error
        FatalUnknown = 10,
        /// Serialization type not supported
        FatalUnsupportedSerialization = 11,
        /// Bad RPC header fields
        FatalInvalidRpcHeader = 12,
        /// Request could not be deserialized
        FatalDeserializingRequest = 13,
        /// IPC layer version mismatch
        FatalVersionMismatch = 14,
        /// Authentication failed
        FatalUnauthorized = 15,
    }
}

/// SASL negotiation message, carried as the payload of frames with call id -33.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcSaslProto {
    #[prost(uint32, optional, tag = "1")]
    pub version: Option<u32>,
    #[prost(enumeration = "rpc_sasl_proto::SaslState", required, tag = "2")]
    pub state: i32,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub token: Option<Vec<u8>>,
    #[prost(message, repeated, tag = "4")]
    pub auths: Vec<rpc_sasl_proto::SaslAuth>,
}

/// Nested types of [`RpcSaslProto`].
pub mod rpc_sasl_proto {
    /// Negotiation state announced by either side.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum SaslState {
        Success = 0,
        Negotiate = 1,
        Initiate = 2,
        Challenge = 3,
        Response = 4,
        Wrap = 5,
    }

    impl SaslState {
        /// Wire name of the state, as Hadoop spells it.
        pub fn as_str(&self) -> &'static str {
            match self {
                SaslState::Success => "SUCCESS",
                SaslState::Negotiate => "NEGOTIATE",
                SaslState::Initiate => "INITIATE",
                SaslState::Challenge => "CHALLENGE",
                SaslState::Response => "RESPONSE",
                SaslState::Wrap => "WRAP",
            }
        }
    }

    /// One authentication method offered by the server.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SaslAuth {
        #[prost(string, required, tag = "1")]
        pub method: String,
        #[prost(string, required, tag = "2")]
        pub mechanism: String,
        #[prost(string, optional, tag = "3")]
        pub protocol: Option<String>,
        #[prost(string, optional, tag = "4")]
        pub server_id: Option<String>,
        #[prost(bytes = "vec", optional, tag = "5")]
        pub challenge: Option<Vec<u8>>,
    }
}

/// Identity of the caller.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UserInformationProto {
    #[prost(string, optional, tag = "1")]
    pub effective_user: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub real_user: Option<String>,
}

/// Sent once per connection, after authentication, with call id -3.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IpcConnectionContextProto {
    #[prost(message, optional, tag = "2")]
    pub user_info: Option<UserInformationProto>,
    #[prost(string, optional, tag = "3")]
    pub protocol: Option<String>,
}

/// Method header of `ProtobufRpcEngine`, written between the RPC header and
/// the request message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequestHeaderProto {
    #[prost(string, required, tag = "1")]
    pub method_name: String,
    #[prost(string, required, tag = "2")]
    pub declaring_class_protocol_name: String,
    #[prost(uint64, required, tag = "3")]
    pub client_protocol_version: u64,
}
