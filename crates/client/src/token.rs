//! Bearer-token payload codec.
//!
//! Tokens are three dot-separated segments; the middle segment is a
//! base64url JSON object carrying the claims. Only the payload is read -
//! the signature is never verified, because trust is established by the
//! remote store at request time. Claims feed UI gating exclusively and
//! must never be treated as authorization.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};

use farmstall_core::Claims;

use crate::error::DecodeError;

/// Decode the claims payload of a bearer token.
///
/// A token whose `exp` is at or before `now` decodes as
/// [`DecodeError::Expired`]; callers treat every decode failure as an
/// absent session.
///
/// # Errors
///
/// Returns `DecodeError` when the token lacks three segments, the payload
/// is not valid base64url or JSON, the subject is missing or empty, or
/// the token is expired.
pub fn decode(token: &str, now: DateTime<Utc>) -> Result<Claims, DecodeError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::Segments);
    };

    // Some issuers pad the payload; strip it rather than failing.
    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    let claims: Claims = serde_json::from_slice(&bytes)?;

    if claims.sub.is_empty() {
        return Err(DecodeError::EmptySubject);
    }

    if let Some(exp) = claims.exp
        && exp <= now.timestamp()
    {
        tracing::debug!(exp, "rejecting expired token");
        return Err(DecodeError::Expired);
    }

    Ok(claims)
}
