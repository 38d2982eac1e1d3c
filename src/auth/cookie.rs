//! Defines functions for handling user authentication with a private token cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, auth::UserID, auth::token::Token};

/// The name of the cookie holding the serialized auth token.
pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// Sets the initial expiry of the cookie to `duration` from the current time.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns an [Error::JsonSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc().to_offset(local_offset) + duration;
    let token = Token {
        user_id,
        expires_at,
    };

    build_token_cookie(jar, &token)
}

/// Set the auth cookie to an invalid value and set its max age to zero, which
/// should delete the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the auth token from the cookie jar, checking that it has not expired.
///
/// # Errors
///
/// Returns a:
/// - [Error::CookieMissing] if the token cookie is not in the cookie jar.
/// - [Error::InvalidCredentials] if the token cannot be parsed or has expired.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let token_cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;

    let token: Token = serde_json::from_str(token_cookie.value_trimmed())
        .map_err(|_| Error::InvalidCredentials)?;

    if token.expires_at < OffsetDateTime::now_utc() {
        return Err(Error::InvalidCredentials);
    }

    Ok(token)
}

/// Set the expiry of the auth cookie in `jar` to the latest of now plus
/// `duration` and the token's current expiry.
///
/// This keeps active sessions alive without ever shortening an existing
/// "remember me" expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns a:
/// - [Error::CookieMissing] if the token cookie is not in the cookie jar.
/// - [Error::InvalidCredentials] if the token cannot be parsed or has expired.
/// - [Error::JsonSerializationError] if the updated token cannot be serialized.
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let minimum_expiry = OffsetDateTime::now_utc().to_offset(local_offset) + duration;
    let expires_at = max(token.expires_at, minimum_expiry);

    build_token_cookie(
        jar,
        &Token {
            user_id: token.user_id,
            expires_at,
        },
    )
}

fn build_token_cookie(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(token)
        .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error,
        auth::{
            UserID,
            cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, get_token_from_cookies},
        },
    };

    use super::{extend_auth_cookie_duration_if_needed, invalidate_auth_cookie, set_auth_cookie};

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(1),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn can_set_cookie() {
        let jar = get_jar();
        let user_id = UserID::new(1);

        let jar =
            set_auth_cookie(jar, user_id, DEFAULT_COOKIE_DURATION, UtcOffset::UTC).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, user_id);
        assert_date_time_close!(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(5)
        );
    }

    #[test]
    fn get_token_fails_with_no_cookie() {
        let jar = get_jar();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::CookieMissing));
    }

    #[test]
    fn get_token_fails_with_garbage_cookie() {
        let jar = get_jar().add(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build());

        assert_eq!(
            get_token_from_cookies(&jar),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn get_token_fails_with_expired_token() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            Duration::minutes(-5),
            UtcOffset::UTC,
        )
        .unwrap();

        assert_eq!(
            get_token_from_cookies(&jar),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn can_extend_cookie_duration() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10), UtcOffset::UTC)
                .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close!(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(10)
        );
    }

    #[test]
    fn extend_does_not_shorten_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7), UtcOffset::UTC)
            .unwrap();
        let original_expiry = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
            .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_eq!(token.expires_at, original_expiry);
    }

    #[test]
    fn invalidate_auth_cookie_succeeds() {
        let user_id = UserID::new(1);
        let jar = set_auth_cookie(
            get_jar(),
            user_id,
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));

        assert_eq!(
            get_token_from_cookies(&jar),
            Err(Error::InvalidCredentials),
        );
    }
}
