//! Request context carrying the caller's identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hackhub_core::types::AccountId;

/// Context for the current request.
///
/// Built once at the request boundary and passed into every service method
/// so that each operation knows *who* is acting. `account_id` is `None` for
/// anonymous requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The signed-in account, if any.
    pub account_id: Option<AccountId>,
    /// IP address of the request origin.
    pub ip_address: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a signed-in account.
    pub fn authenticated(account_id: AccountId, ip_address: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id),
            ip_address: ip_address.into(),
            request_time: Utc::now(),
        }
    }

    /// Context for an anonymous request.
    pub fn anonymous(ip_address: impl Into<String>) -> Self {
        Self {
            account_id: None,
            ip_address: ip_address.into(),
            request_time: Utc::now(),
        }
    }
}
