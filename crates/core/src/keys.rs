//! Document key layout
//!
//! ```text
//! stats/{user}     → PlayerStats
//! cards/{user}     → CardCollection (including fragment balance)
//! season-pass      → SeasonPassState (shared by all users)
//! shop/rotation    → ShopRotation
//! ```
//!
//! Keys compare as plain strings; that ordering is the global lock order.

use crate::error::{Error, Result};

/// Key of the shared season-pass document
pub const SEASON_PASS: &str = "season-pass";

/// Key of the fragment shop rotation document
pub const SHOP_ROTATION: &str = "shop/rotation";

/// Longest accepted user id, in bytes
///
/// Keeps every derived key short enough for a base64 file name.
pub const MAX_USER_ID_LEN: usize = 128;

/// Key of a user's stats document
pub fn stats(user: &str) -> String {
    format!("stats/{}", user)
}

/// Key of a user's card collection document
pub fn cards(user: &str) -> String {
    format!("cards/{}", user)
}

/// Reject user ids that would produce ambiguous keys.
pub fn validate_user(user: &str) -> Result<()> {
    if user.is_empty() {
        return Err(Error::Validation("user id must not be empty".into()));
    }
    if user.len() > MAX_USER_ID_LEN {
        return Err(Error::Validation(format!(
            "user id is {} bytes, at most {} allowed",
            user.len(),
            MAX_USER_ID_LEN
        )));
    }
    if user.contains('/') {
        return Err(Error::Validation(format!(
            "user id '{}' must not contain '/'",
            user
        )));
    }
    Ok(())
}
