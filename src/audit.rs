// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit events for security-relevant actions.
//!
//! Events are emitted as structured `tracing` records under the `audit`
//! target so they can be routed separately (`RUST_LOG=audit=info`).
//! They never carry passwords, tokens or the signing secret.

/// Types of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventType {
    // Auth events
    AuthFailure,
    LoginSuccess,
    LoginFailure,

    // Account events
    UserRegistered,
    AccountDeleted,

    // Access events
    PermissionDenied,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::AuthFailure => "auth_failure",
            AuditEventType::LoginSuccess => "login_success",
            AuditEventType::LoginFailure => "login_failure",
            AuditEventType::UserRegistered => "user_registered",
            AuditEventType::AccountDeleted => "account_deleted",
            AuditEventType::PermissionDenied => "permission_denied",
        }
    }
}

/// Emit an audit event.
///
/// ```rust,ignore
/// audit_event!(AuditEventType::AuthFailure, reason = "expired");
/// audit_event!(AuditEventType::AccountDeleted, user = &identity.user_id);
/// audit_event!(AuditEventType::PermissionDenied, user = &id, resource = "post", &post_id);
/// ```
#[macro_export]
macro_rules! audit_event {
    ($event_type:expr, reason = $reason:expr) => {{
        ::tracing::info!(
            target: "audit",
            event = $event_type.as_str(),
            reason = %$reason,
            "audit event"
        );
    }};
    ($event_type:expr, user = $user:expr) => {{
        ::tracing::info!(
            target: "audit",
            event = $event_type.as_str(),
            user_id = %$user,
            "audit event"
        );
    }};
    ($event_type:expr, user = $user:expr, resource = $resource_type:expr, $resource_id:expr) => {{
        ::tracing::info!(
            target: "audit",
            event = $event_type.as_str(),
            user_id = %$user,
            resource_type = %$resource_type,
            resource_id = %$resource_id,
            "audit event"
        );
    }};
}
