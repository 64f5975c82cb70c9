use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{MAX_NICKNAME_CHARS, MAX_PROFILE_PICTURE_URL_LEN};
use crate::error::{SocialError, SocialResult};
use crate::models::ProfileUpdate;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,32}$").expect("username pattern is valid"));

static PICTURE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern is valid"));

pub fn validate_username(username: &str) -> SocialResult<()> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(SocialError::Validation(format!(
            "username must be 3-32 characters of letters, digits, '_', '.' or '-': {username:?}"
        )))
    }
}

pub fn validate_profile_update(update: &ProfileUpdate) -> SocialResult<()> {
    if update.is_empty() {
        return Err(SocialError::Validation("no profile fields to update".to_string()));
    }

    if let Some(username) = &update.username {
        validate_username(username)?;
    }

    if let Some(nickname) = &update.nickname {
        if nickname.trim().is_empty() {
            return Err(SocialError::Validation("nickname must not be blank".to_string()));
        }
        if nickname.chars().count() > MAX_NICKNAME_CHARS {
            return Err(SocialError::Validation(format!(
                "nickname must be at most {MAX_NICKNAME_CHARS} characters"
            )));
        }
    }

    if let Some(picture) = &update.profile_picture {
        if picture.len() > MAX_PROFILE_PICTURE_URL_LEN || !PICTURE_URL_RE.is_match(picture) {
            return Err(SocialError::Validation(
                "profile picture must be an http(s) url".to_string(),
            ));
        }
    }

    Ok(())
}
