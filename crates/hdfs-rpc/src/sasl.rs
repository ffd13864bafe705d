//! SASL negotiation run once per connection before any call.
//!
//! The server drives the exchange: every reply announces a [`SaslState`]
//! and the client's next step is looked up in [`TRANSITIONS`] from its own
//! [`NegotiationState`] and the announced state. A pair missing from the
//! table is a protocol violation.
//!
//! ```text
//! client                                 server
//!   NEGOTIATE ----------------------------->
//!   <------------------- NEGOTIATE (auths)
//!   INITIATE (auth, token) ---------------->
//!   <--------------------- CHALLENGE (token)   } 0..N times
//!   RESPONSE (token) ---------------------->   }
//!   <----------------------------- SUCCESS
//! ```

use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::{Result, RpcError};
use crate::frame::{self, FrameReader};
use crate::mechanism::{MechanismFactory, SaslMechanism};
use crate::proto::common::rpc_sasl_proto::{SaslAuth, SaslState};
use crate::proto::common::{RpcResponseHeaderProto, RpcSaslProto};
use crate::rpc;

/// Call id reserved for SASL traffic.
pub const SASL_CALL_ID: i32 = -33;

/// Method name attached to errors raised during the handshake.
pub const SASL_METHOD: &str = "sasl";

/// The only auth method this client selects.
pub const KERBEROS_METHOD: &str = "KERBEROS";

/// Client side state of one negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// Nothing sent yet.
    Unstarted,
    /// `NEGOTIATE` sent, waiting for the server's offer.
    Negotiating,
    /// `INITIATE` sent, exchanging challenge tokens.
    Challenging,
    /// Server reported `SUCCESS`.
    Succeeded,
    /// Negotiation aborted; the connection is closed.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Select a mechanism from the offer and send `INITIATE`.
    Initiate,
    /// Step the mechanism with the challenge and send `RESPONSE`.
    Respond,
    /// Finish, feeding any final token to the mechanism.
    Complete,
}

/// Allowed (client state, server state) pairs.
const TRANSITIONS: &[(NegotiationState, SaslState, Action)] = &[
    (NegotiationState::Negotiating, SaslState::Negotiate, Action::Initiate),
    (NegotiationState::Negotiating, SaslState::Success, Action::Complete),
    (NegotiationState::Challenging, SaslState::Challenge, Action::Respond),
    (NegotiationState::Challenging, SaslState::Success, Action::Complete),
];

fn transition(current: NegotiationState, server: SaslState) -> Result<Action> {
    if let Some((_, _, action)) = TRANSITIONS
        .iter()
        .find(|(state, announced, _)| *state == current && *announced == server)
    {
        return Ok(*action);
    }
    let reason = match (current, server) {
        (NegotiationState::Negotiating, SaslState::Challenge) => {
            "received CHALLENGE before NEGOTIATE".to_string()
        }
        _ => format!("unexpected {} while {:?}", server.as_str(), current),
    };
    Err(RpcError::violation(SASL_METHOD, reason))
}

/// Picks the first offered auth whose method is `KERBEROS`.
pub fn select_auth(auths: &[SaslAuth]) -> Result<SaslAuth> {
    auths
        .iter()
        .find(|auth| auth.method == KERBEROS_METHOD)
        .cloned()
        .ok_or_else(|| RpcError::UnsupportedMechanism {
            offered: auths
                .iter()
                .map(|auth| format!("{}/{}", auth.method, auth.mechanism))
                .collect(),
        })
}

/// Drives one negotiation over a borrowed connection.
pub struct SaslAuthenticator<'a> {
    conn: &'a mut Connection,
    factory: &'a dyn MechanismFactory,
    state: NegotiationState,
    mechanism: Option<Box<dyn SaslMechanism>>,
    requests_sent: usize,
}

impl<'a> SaslAuthenticator<'a> {
    /// Creates an authenticator in the `Unstarted` state.
    pub fn new(conn: &'a mut Connection, factory: &'a dyn MechanismFactory) -> Self {
        Self {
            conn,
            factory,
            state: NegotiationState::Unstarted,
            mechanism: None,
            requests_sent: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Name of the mechanism chosen from the server's offer, once selected.
    pub fn mechanism_name(&self) -> Option<&str> {
        self.mechanism.as_ref().map(|m| m.name())
    }

    /// Frames written so far.
    pub fn requests_sent(&self) -> usize {
        self.requests_sent
    }

    /// Runs the negotiation to completion.
    ///
    /// On failure the state becomes `Failed` and the connection is closed.
    pub async fn run(&mut self) -> Result<()> {
        if self.state != NegotiationState::Unstarted {
            return Err(RpcError::violation(
                SASL_METHOD,
                format!("negotiation already ran, state {:?}", self.state),
            ));
        }
        match self.negotiate().await {
            Ok(()) => {
                self.state = NegotiationState::Succeeded;
                debug!(
                    addr = %self.conn.peer_addr(),
                    requests = self.requests_sent,
                    "SASL negotiation succeeded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(addr = %self.conn.peer_addr(), state = ?self.state, error = %e, "SASL negotiation failed");
                self.state = NegotiationState::Failed;
                self.conn.close();
                Err(e)
            }
        }
    }

    async fn negotiate(&mut self) -> Result<()> {
        self.send(SaslState::Negotiate, None, None).await?;
        self.state = NegotiationState::Negotiating;

        loop {
            let reply = self.receive().await?;
            let announced = SaslState::try_from(reply.state).map_err(|_| {
                RpcError::violation(SASL_METHOD, format!("unknown SASL state {}", reply.state))
            })?;
            debug!(state = ?self.state, server = announced.as_str(), "SASL transition");

            match transition(self.state, announced)? {
                Action::Initiate => {
                    let auth = select_auth(&reply.auths)?;
                    let mut mechanism = self.factory.create(&auth)?;
                    let token = mechanism.initial_response()?;
                    debug!(
                        method = %auth.method,
                        mechanism = mechanism.name(),
                        "selected SASL mechanism"
                    );
                    self.mechanism = Some(mechanism);
                    self.send(SaslState::Initiate, Some(token), Some(auth)).await?;
                    self.state = NegotiationState::Challenging;
                }
                Action::Respond => {
                    let challenge = reply.token.unwrap_or_default();
                    let token = self.mechanism_mut()?.evaluate_challenge(&challenge)?;
                    self.send(SaslState::Response, Some(token), None).await?;
                }
                Action::Complete => {
                    if let (Some(token), Some(mechanism)) = (reply.token, self.mechanism.as_mut()) {
                        if !mechanism.is_complete() {
                            mechanism.evaluate_challenge(&token)?;
                        }
                    }
                    return Ok(());
                }
            }
        }
    }

    fn mechanism_mut(&mut self) -> Result<&mut Box<dyn SaslMechanism>> {
        self.mechanism
            .as_mut()
            .ok_or_else(|| RpcError::violation(SASL_METHOD, "no mechanism selected"))
    }

    async fn send(
        &mut self,
        state: SaslState,
        token: Option<Vec<u8>>,
        auth: Option<SaslAuth>,
    ) -> Result<()> {
        let header = rpc::request_header(SASL_CALL_ID, -1, &[]);
        let message = RpcSaslProto {
            version: None,
            state: state as i32,
            token,
            auths: auth.into_iter().collect(),
        };
        let frame = frame::encode(&header, &message)?;
        self.conn.write_frame(&frame).await?;
        self.requests_sent += 1;
        Ok(())
    }

    async fn receive(&mut self) -> Result<RpcSaslProto> {
        let frame = self.conn.read_frame().await?;
        let mut reader = FrameReader::new(frame)?;
        let header: RpcResponseHeaderProto = reader.next_message()?;
        rpc::check_response(&header, SASL_METHOD, SASL_CALL_ID)?;
        let reply = reader.next_message()?;
        reader.finish()?;
        Ok(reply)
    }
}
