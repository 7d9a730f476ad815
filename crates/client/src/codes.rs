// Service error strings and their user-facing messages
//
// The service reports rejections as bare uppercase identifiers. Known ones
// map to fixed user-facing text; anything unrecognized gets the generic
// fallback so raw protocol strings never reach the user.

/// Shown when no specific message is known for an error
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Look up the user-facing message for a known service error string
pub fn user_message(error: &str) -> Option<&'static str> {
    match error {
        "PHONE_NUMBER_INVALID" => Some("Invalid phone number format"),
        "PHONE_CODE_INVALID" => Some("Invalid verification code"),
        "PHONE_CODE_EXPIRED" => Some("Verification code expired"),
        "SESSION_PASSWORD_NEEDED" => Some("Two-step verification required"),
        "PASSWORD_HASH_INVALID" => Some("Invalid password"),
        "AUTH_RESTART" => Some("Authentication failed, please try again"),
        _ => None,
    }
}

/// User-facing message for any service error string
pub fn describe(error: &str) -> &'static str {
    user_message(error).unwrap_or(FALLBACK_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_errors_mapped() {
        assert_eq!(describe("PHONE_CODE_INVALID"), "Invalid verification code");
        assert_eq!(describe("PASSWORD_HASH_INVALID"), "Invalid password");
    }

    #[test]
    fn test_unknown_error_falls_back() {
        assert_eq!(describe("FLOOD_WAIT_42"), FALLBACK_MESSAGE);
        assert_eq!(user_message("FLOOD_WAIT_42"), None);
    }
}
