// LoginSession - Authentication orchestrator
//
// Drives the multi-step login flow against the account service:
// 1. request_code  -> the service delivers a verification code
// 2. sign_in       -> submit the code; may demand the account password
// 3. verify_password -> SRP proof of the password, never the password itself
//
// Each step must finish before the next begins. The session owns its
// channel, so a data-center rebind during one attempt can never corrupt
// another attempt's in-flight call.

use thiserror::Error;

use telelogin_shared::auth::srp::{compute_proof, SrpError};

use crate::channel::{AccountChannel, ChannelError, SavedMessage, SentCode, SignInOutcome};
use crate::codes;

/// Login state machine. `Failed` absorbs from any step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    CodeRequested,
    PasswordPending,
    PasswordVerifying,
    Authenticated,
    Failed(String),
}

/// Read-only snapshot of the session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub phone: String,
    pub phone_code_hash: Option<String>,
    pub awaiting_password: bool,
    pub authenticated: bool,
}

/// Classified login failures surfaced to the caller
#[derive(Debug, Error)]
pub enum LoginError {
    /// A recoverable protocol signal persisted after the single automatic
    /// retry. The caller may start the attempt over.
    #[error("transient protocol failure persisted after retry: {0}")]
    Transient(ChannelError),
    /// The service rejected the request; retrying with the same input
    /// cannot succeed.
    #[error("rejected by the account service: {message} (code {code})")]
    Rejected { code: i32, message: String },
    /// Proof computation failed; carries no secret material.
    #[error(transparent)]
    Crypto(#[from] SrpError),
    /// The channel is unreachable; the whole attempt may be retried later.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The operation does not apply to the current state.
    #[error("{operation} is not valid in the current login state")]
    InvalidState { operation: &'static str },
    #[error("internal failure: {0}")]
    Internal(String),
}

impl LoginError {
    /// Fixed user-facing message for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            LoginError::Rejected { message, .. } => codes::describe(message),
            LoginError::Transient(_) => codes::describe("AUTH_RESTART"),
            _ => codes::FALLBACK_MESSAGE,
        }
    }

    fn from_channel(err: ChannelError) -> LoginError {
        match err {
            ChannelError::Migrate(_) | ChannelError::RestartRequired => LoginError::Transient(err),
            ChannelError::Rpc { code, message } => LoginError::Rejected { code, message },
            ChannelError::Transport(message) => LoginError::Transport(message),
        }
    }
}

/// One login attempt for one phone number, owning its channel.
pub struct LoginSession<C: AccountChannel> {
    channel: C,
    state: LoginState,
    phone: String,
    phone_code_hash: Option<String>,
}

impl<C: AccountChannel> LoginSession<C> {
    pub fn new(channel: C, phone: impl Into<String>) -> Self {
        LoginSession {
            channel,
            state: LoginState::Idle,
            phone: phone.into(),
            phone_code_hash: None,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Whether the password step is still ahead of this session
    pub fn password_required(&self) -> bool {
        matches!(
            self.state,
            LoginState::PasswordPending | LoginState::PasswordVerifying
        )
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            phone: self.phone.clone(),
            phone_code_hash: self.phone_code_hash.clone(),
            awaiting_password: self.password_required(),
            authenticated: matches!(self.state, LoginState::Authenticated),
        }
    }

    /// Ask the service to deliver a verification code.
    ///
    /// Always starts from a clean connection: a previous failed attempt may
    /// have left the channel bound to the wrong data center. Recoverable
    /// signals (data-center redirect, forced restart) are retried exactly
    /// once; anything else ends the step.
    pub async fn request_code(&mut self) -> Result<(), LoginError> {
        self.phone_code_hash = None;

        self.channel
            .reset()
            .await
            .map_err(|e| self.fail(LoginError::from_channel(e)))?;
        let dc = self
            .channel
            .nearest_dc()
            .await
            .map_err(|e| self.fail(LoginError::from_channel(e)))?;
        tracing::debug!(dc, "channel reset before code request");

        let sent = match self.channel.request_code(&self.phone).await {
            Ok(sent) => sent,
            Err(ChannelError::Migrate(dc)) => {
                tracing::info!(dc, "account lives on another data center, retrying there");
                self.channel
                    .rebind_dc(dc)
                    .await
                    .map_err(|e| self.fail(LoginError::from_channel(e)))?;
                self.retry_request_code().await?
            }
            Err(ChannelError::RestartRequired) => {
                tracing::info!("service forced an authorization restart, retrying once");
                self.channel
                    .reset()
                    .await
                    .map_err(|e| self.fail(LoginError::from_channel(e)))?;
                self.retry_request_code().await?
            }
            Err(e) => return Err(self.fail(LoginError::from_channel(e))),
        };

        self.phone_code_hash = Some(sent.phone_code_hash);
        self.state = LoginState::CodeRequested;
        tracing::info!("verification code requested");
        Ok(())
    }

    /// The single automatic retry. A second recoverable signal in a row is
    /// surfaced as transient rather than retried again.
    async fn retry_request_code(&mut self) -> Result<SentCode, LoginError> {
        match self.channel.request_code(&self.phone).await {
            Ok(sent) => Ok(sent),
            Err(e) if e.is_recoverable() => Err(self.fail(LoginError::Transient(e))),
            Err(e) => Err(self.fail(LoginError::from_channel(e))),
        }
    }

    /// Submit the verification code the user received.
    ///
    /// A password-required response is a normal transition, not an error.
    pub async fn sign_in(&mut self, code: &str) -> Result<(), LoginError> {
        if self.state != LoginState::CodeRequested {
            return Err(LoginError::InvalidState {
                operation: "sign_in",
            });
        }
        let hash = self
            .phone_code_hash
            .clone()
            .ok_or(LoginError::InvalidState {
                operation: "sign_in",
            })?;

        match self.channel.sign_in(&self.phone, code, &hash).await {
            Ok(SignInOutcome::Complete) => {
                self.state = LoginState::Authenticated;
                tracing::info!("signed in");
                Ok(())
            }
            Ok(SignInOutcome::PasswordNeeded) => {
                self.state = LoginState::PasswordPending;
                tracing::info!("two-step verification required");
                Ok(())
            }
            Err(e) => Err(self.fail(LoginError::from_channel(e))),
        }
    }

    /// Prove knowledge of the account password.
    ///
    /// Fetches a fresh challenge (challenges are single-use), computes the
    /// SRP proof on a blocking worker so the key stretching stays off the
    /// async scheduler, and submits it.
    pub async fn verify_password(&mut self, password: &str) -> Result<(), LoginError> {
        if self.state != LoginState::PasswordPending {
            return Err(LoginError::InvalidState {
                operation: "verify_password",
            });
        }
        self.state = LoginState::PasswordVerifying;

        let challenge = self
            .channel
            .password_challenge()
            .await
            .map_err(|e| self.fail(LoginError::from_channel(e)))?;

        let password = password.to_owned();
        let proof = tokio::task::spawn_blocking(move || compute_proof(&password, &challenge))
            .await
            .map_err(|e| self.fail(LoginError::Internal(format!("proof task failed: {e}"))))?
            .map_err(|e| self.fail(LoginError::Crypto(e)))?;

        match self.channel.check_password(&proof).await {
            Ok(()) => {
                self.state = LoginState::Authenticated;
                tracing::info!("password accepted");
                Ok(())
            }
            Err(e) => Err(self.fail(LoginError::from_channel(e))),
        }
    }

    /// Fetch the account's saved messages. Only valid once authenticated;
    /// a failure here does not disturb the authenticated state.
    pub async fn saved_messages(&mut self, limit: i32) -> Result<Vec<SavedMessage>, LoginError> {
        if self.state != LoginState::Authenticated {
            return Err(LoginError::InvalidState {
                operation: "saved_messages",
            });
        }
        self.channel
            .saved_messages(limit)
            .await
            .map_err(LoginError::from_channel)
    }

    fn fail(&mut self, err: LoginError) -> LoginError {
        tracing::warn!(error = %err, "login step failed");
        self.state = LoginState::Failed(err.to_string());
        err
    }
}
