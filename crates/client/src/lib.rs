// telelogin - Login Client
//
// Client-side authentication against an SRP-protected account service:
// phone-code request, code sign-in, and two-factor password proof, driven
// as an explicit state machine over an owned RPC channel.

pub mod channel;
pub mod codes;
pub mod session;
pub mod settings;

pub use channel::{
    AccountChannel, ChannelError, DcId, SavedMessage, SentCode, SignInOutcome,
};
pub use session::{LoginError, LoginSession, LoginState, SessionInfo};
pub use settings::{ApiCredentials, ClientSettings, SettingsError};
