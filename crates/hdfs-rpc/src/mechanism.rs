//! Local SASL mechanisms used by the authenticator.
//!
//! The authenticator only sees [`SaslMechanism`]; which implementation backs
//! a negotiated auth tuple is decided by a [`MechanismFactory`]. The GSSAPI
//! (Kerberos v5) mechanism links the system GSSAPI library and is compiled
//! only with the `kerberos` feature.

use crate::error::{Result, RpcError};
use crate::proto::common::rpc_sasl_proto::SaslAuth;

/// Client side of one SASL mechanism exchange.
pub trait SaslMechanism: Send {
    /// Mechanism name, e.g. `GSSAPI`.
    fn name(&self) -> &str;

    /// Produces the token sent with `INITIATE`.
    fn initial_response(&mut self) -> Result<Vec<u8>>;

    /// Consumes a server token and produces the reply token.
    ///
    /// Fails once the mechanism has nothing left to send.
    fn evaluate_challenge(&mut self, challenge: &[u8]) -> Result<Vec<u8>>;

    /// Whether the exchange has concluded on the client side.
    fn is_complete(&self) -> bool;
}

/// Builds a mechanism for the auth tuple selected from the server's offer.
pub trait MechanismFactory: Send + Sync {
    /// Creates a fresh mechanism for `auth`.
    fn create(&self, auth: &SaslAuth) -> Result<Box<dyn SaslMechanism>>;
}

/// Factory for the `KERBEROS` method, backed by GSSAPI.
#[derive(Debug, Clone, Copy, Default)]
pub struct KerberosFactory;

impl MechanismFactory for KerberosFactory {
    #[cfg(feature = "kerberos")]
    fn create(&self, auth: &SaslAuth) -> Result<Box<dyn SaslMechanism>> {
        if auth.mechanism != gssapi::MECHANISM {
            return Err(RpcError::Sasl {
                mechanism: auth.mechanism.clone(),
                reason: "only GSSAPI is supported for KERBEROS".to_string(),
            });
        }
        let protocol = auth.protocol.as_deref().unwrap_or_default();
        let server_id = auth.server_id.as_deref().unwrap_or_default();
        Ok(Box::new(gssapi::GssapiMechanism::new(protocol, server_id)?))
    }

    #[cfg(not(feature = "kerberos"))]
    fn create(&self, auth: &SaslAuth) -> Result<Box<dyn SaslMechanism>> {
        Err(RpcError::Config {
            reason: format!(
                "{} authentication requires building with the `kerberos` feature",
                auth.method
            ),
        })
    }
}

#[cfg(feature = "kerberos")]
mod gssapi {
    //! RFC 4752 GSSAPI mechanism: context establishment followed by the
    //! security layer exchange. Only the "no security layer" option is
    //! accepted, which matches Hadoop's default `authentication` QOP.

    use libgssapi::context::{ClientCtx, CtxFlags, SecurityContext};
    use libgssapi::credential::{Cred, CredUsage};
    use libgssapi::name::Name;
    use libgssapi::oid::{OidSet, GSS_MECH_KRB5, GSS_NT_HOSTBASED_SERVICE};

    use super::SaslMechanism;
    use crate::error::{Result, RpcError};

    pub(super) const MECHANISM: &str = "GSSAPI";

    const NO_SECURITY_LAYER: u8 = 0x01;

    enum Phase {
        Establishing,
        SecurityLayer,
        Done,
    }

    pub(super) struct GssapiMechanism {
        ctx: ClientCtx,
        phase: Phase,
    }

    fn gss_err(e: libgssapi::error::Error) -> RpcError {
        RpcError::Sasl {
            mechanism: MECHANISM.to_string(),
            reason: e.to_string(),
        }
    }

    fn sasl_err(reason: &str) -> RpcError {
        RpcError::Sasl {
            mechanism: MECHANISM.to_string(),
            reason: reason.to_string(),
        }
    }

    impl GssapiMechanism {
        pub(super) fn new(protocol: &str, server_id: &str) -> Result<Self> {
            let service = format!("{}@{}", protocol, server_id);
            let target = Name::new(service.as_bytes(), Some(&GSS_NT_HOSTBASED_SERVICE))
                .and_then(|name| name.canonicalize(Some(&GSS_MECH_KRB5)))
                .map_err(gss_err)?;
            let mut mechs = OidSet::new().map_err(gss_err)?;
            mechs.add(&GSS_MECH_KRB5).map_err(gss_err)?;
            let cred =
                Cred::acquire(None, None, CredUsage::Initiate, Some(&mechs)).map_err(gss_err)?;
            let ctx = ClientCtx::new(
                Some(cred),
                target,
                CtxFlags::GSS_C_MUTUAL_FLAG | CtxFlags::GSS_C_SEQUENCE_FLAG,
                Some(&GSS_MECH_KRB5),
            );
            Ok(Self {
                ctx,
                phase: Phase::Establishing,
            })
        }

        fn establish(&mut self, token: Option<&[u8]>) -> Result<Vec<u8>> {
            let out = self.ctx.step(token, None).map_err(gss_err)?;
            if self.ctx.is_complete() {
                self.phase = Phase::SecurityLayer;
            }
            Ok(out.map(|buf| buf.to_vec()).unwrap_or_default())
        }

        fn negotiate_layer(&mut self, challenge: &[u8]) -> Result<Vec<u8>> {
            let offer = self.ctx.unwrap(challenge).map_err(gss_err)?;
            if offer.len() != 4 {
                return Err(sasl_err("security layer offer must be 4 bytes"));
            }
            if offer[0] & NO_SECURITY_LAYER == 0 {
                return Err(sasl_err(
                    "server requires integrity or privacy protection, which is not supported",
                ));
            }
            let reply = self
                .ctx
                .wrap(false, &[NO_SECURITY_LAYER, 0, 0, 0])
                .map_err(gss_err)?;
            self.phase = Phase::Done;
            Ok(reply.to_vec())
        }
    }

    impl SaslMechanism for GssapiMechanism {
        fn name(&self) -> &str {
            MECHANISM
        }

        fn initial_response(&mut self) -> Result<Vec<u8>> {
            self.establish(None)
        }

        fn evaluate_challenge(&mut self, challenge: &[u8]) -> Result<Vec<u8>> {
            match self.phase {
                Phase::Establishing => self.establish(Some(challenge)),
                Phase::SecurityLayer => self.negotiate_layer(challenge),
                Phase::Done => Err(sasl_err("exchange already complete, no more steps")),
            }
        }

        fn is_complete(&self) -> bool {
            matches!(self.phase, Phase::Done)
        }
    }
}
