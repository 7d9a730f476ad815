// AccountChannel - RPC channel abstraction
//
// The account service is reached through an opaque RPC channel with named
// methods and structured errors; the wire format and transport encryption
// live behind this trait. A channel carries process-visible connection
// state (its data-center binding), so one channel must never be shared by
// concurrent login attempts: every method takes `&mut self` and a
// `LoginSession` owns its channel outright.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use telelogin_shared::auth::srp::{ClientProof, ServerChallenge};

/// Data-center identifier
pub type DcId = i32;

/// Response to a code request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentCode {
    pub phone_code_hash: String,
}

/// Outcome of the sign-in call. A required password challenge is a flow
/// signal, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    Complete,
    PasswordNeeded,
}

/// A message from the account's saved-messages history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMessage {
    pub id: i32,
    pub date: i64,
    pub message: String,
}

/// Channel failures, already classified into the closed set the
/// orchestrator dispatches on. Implementations funnel every raw service
/// error through [`ChannelError::from_rpc`] so string matching happens in
/// exactly one place.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The account lives on another data center; the request must be
    /// retried there.
    #[error("redirected to data center {0}")]
    Migrate(DcId),
    /// The service demands a fresh authorization flow over a clean channel.
    #[error("authorization restart required")]
    RestartRequired,
    /// Any other structured service error, surfaced verbatim.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i32, message: String },
    /// The channel itself is unreachable.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ChannelError {
    /// Classify a raw `{code, message}` service error.
    ///
    /// A `_MIGRATE_` marker carries the target data-center id in its
    /// suffix; code 500 is the forced-restart signal. Everything else
    /// stays a plain rpc error.
    pub fn from_rpc(code: i32, message: &str) -> ChannelError {
        if let Some((_, suffix)) = message.split_once("_MIGRATE_") {
            if let Ok(dc) = suffix.parse::<DcId>() {
                return ChannelError::Migrate(dc);
            }
        }
        if code == 500 {
            return ChannelError::RestartRequired;
        }
        ChannelError::Rpc {
            code,
            message: message.to_string(),
        }
    }

    /// True for the error classes a step may recover from with its single
    /// automatic retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChannelError::Migrate(_) | ChannelError::RestartRequired
        )
    }
}

/// The named methods of the account service consumed by the login flow.
#[allow(async_fn_in_trait)]
pub trait AccountChannel {
    /// Resolve the closest data center; also serves as a connection warm-up
    /// after a reset.
    async fn nearest_dc(&mut self) -> Result<DcId, ChannelError>;

    /// Ask the service to deliver a verification code to `phone`.
    async fn request_code(&mut self, phone: &str) -> Result<SentCode, ChannelError>;

    /// Submit the received code.
    async fn sign_in(
        &mut self,
        phone: &str,
        code: &str,
        phone_code_hash: &str,
    ) -> Result<SignInOutcome, ChannelError>;

    /// Fetch a fresh password challenge. Challenges are single-use.
    async fn password_challenge(&mut self) -> Result<ServerChallenge, ChannelError>;

    /// Submit the client proof for the current challenge.
    async fn check_password(&mut self, proof: &ClientProof) -> Result<(), ChannelError>;

    /// Fetch the newest saved messages, up to `limit`.
    async fn saved_messages(&mut self, limit: i32) -> Result<Vec<SavedMessage>, ChannelError>;

    /// Rebind the connection to another data center.
    async fn rebind_dc(&mut self, dc: DcId) -> Result<(), ChannelError>;

    /// Tear down and rebuild the connection, discarding session state.
    async fn reset(&mut self) -> Result<(), ChannelError>;
}
