//! The authenticated caller
//!
//! Identity is built in three stages, each replacing the previous one in the
//! same logical slot: the raw lookup record matched by API key, then the
//! logon result, then the full user-detail record. A pipeline that skips a
//! stage never reaches the next one.

use portico_core::ServiceResponse;
use serde::{Deserialize, Serialize};

/// The authenticated caller record, evolved across auth stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Identity {
    /// Raw lookup record: status plus matched rows
    Lookup(ServiceResponse),

    /// Logon result for the matched username
    Session(ServiceResponse),

    /// Full user-detail record
    Profile(ServiceResponse),
}

impl Identity {
    /// Name of the current stage, for logging
    pub fn stage(&self) -> &'static str {
        match self {
            Identity::Lookup(_) => "lookup",
            Identity::Session(_) => "session",
            Identity::Profile(_) => "profile",
        }
    }
}
