//! Session guards
//!
//! Checked before any remote mutation so auth failures never leave
//! partial state behind.

use crate::{ClientError, ClientResult};
use shared::session::Session;

/// Fail fast when the credential has expired
pub fn ensure_active(session: &Session) -> ClientResult<()> {
    if session.is_expired() {
        return Err(ClientError::AuthExpired);
    }
    Ok(())
}

/// Admin-only operations verify the role claim locally first
pub fn ensure_admin(session: &Session) -> ClientResult<()> {
    ensure_active(session)?;
    if !session.is_admin() {
        return Err(ClientError::Forbidden(
            "administrator role required".to_string(),
        ));
    }
    Ok(())
}
