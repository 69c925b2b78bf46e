//! Session reconstruction by replaying the activity-event log.
//!
//! There is no server-side session table. The set of "currently open"
//! sessions is a projection computed on demand from the user's recent
//! `login`/`logout` events: a fold over the history, newest first, into a
//! map keyed by `ip | device_type`. The first event seen for a key claims
//! it: a login opens the session with that event's context, a logout
//! closes the key so that older logins for the same device cannot
//! resurface. Everything here is a pure function of the event list plus the
//! caller's IP, which is what makes it testable without a database.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::Timestamp;

/// The two activity kinds that drive session reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    Login,
    Logout,
}

/// A login/logout event as read from the activity log, newest first.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub ip: Option<String>,
    pub location: Option<String>,
    pub device_type: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// A session derived from the event log. Never persisted; lives for the
/// duration of one reconstruction call.
#[derive(Debug, Clone, Serialize)]
pub struct ReconstructedSession {
    /// Identity of the session within one reconstruction: `ip | device_type`.
    pub session_key: String,
    pub ip: Option<String>,
    pub location: Option<String>,
    pub device_type: Option<String>,
    pub user_agent: Option<String>,
    /// Timestamp of the login event that opened this session.
    pub last_activity: Timestamp,
    /// Whether this session's IP matches the caller's current request IP.
    ///
    /// A heuristic, not an identity proof: two devices behind the same NAT
    /// both match, and a caller whose egress IP changed since login matches
    /// nothing.
    pub is_current: bool,
}

/// Key identifying one device's session stream within a user's history.
///
/// Returns `None` when the event carries neither an IP nor a device type,
/// in which case it cannot belong to any reconstructable session.
pub fn session_key(ip: Option<&str>, device_type: Option<&str>) -> Option<String> {
    if ip.is_none() && device_type.is_none() {
        return None;
    }
    Some(format!(
        "{}|{}",
        ip.unwrap_or_default(),
        device_type.unwrap_or_default()
    ))
}

/// Fold slot: a key is either held by an open session or closed by a logout
/// tombstone. The tombstone matters: it stops an older login from re-opening
/// a device that logged out after it.
enum Slot {
    Open(ReconstructedSession),
    Closed,
}

/// Replay `events` into the set of currently open sessions.
///
/// Events are canonicalized to newest-first order before the fold, so the
/// result is a deterministic function of the event *set*: replaying the same
/// events twice, or with independent keys interleaved differently, yields
/// the same sessions. The surviving sessions are flagged against
/// `caller_ip` and returned most-recent first.
pub fn reconstruct(
    events: &[AuthEvent],
    caller_ip: Option<&str>,
) -> Vec<ReconstructedSession> {
    let mut ordered: Vec<&AuthEvent> = events.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut slots: HashMap<String, Slot> = HashMap::new();
    for event in ordered {
        let Some(key) = session_key(event.ip.as_deref(), event.device_type.as_deref()) else {
            continue;
        };
        if slots.contains_key(&key) {
            // A newer event already decided this device's fate.
            continue;
        }
        let slot = match event.kind {
            AuthEventKind::Login => Slot::Open(ReconstructedSession {
                session_key: key.clone(),
                ip: event.ip.clone(),
                location: event.location.clone(),
                device_type: event.device_type.clone(),
                user_agent: event.user_agent.clone(),
                last_activity: event.created_at,
                is_current: false,
            }),
            AuthEventKind::Logout => Slot::Closed,
        };
        slots.insert(key, slot);
    }

    let mut sessions: Vec<ReconstructedSession> = slots
        .into_values()
        .filter_map(|slot| match slot {
            Slot::Open(session) => Some(session),
            Slot::Closed => None,
        })
        .collect();

    for session in &mut sessions {
        session.is_current = match (caller_ip, session.ip.as_deref()) {
            (Some(caller), Some(ip)) => caller == ip,
            _ => false,
        };
    }

    sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    sessions
}
