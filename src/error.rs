//! Error taxonomy for the selection/dispatch core
//!
//! Everything here is local and recoverable; the worst case is a control
//! that does nothing until reconfigured.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    /// User picked an id that is not in the current source list.
    #[error("source {0} is not in the current source list")]
    UnknownSource(String),

    /// Source has no resource, so compilation produced no command set.
    #[error("source {0} is not configured for control (no resource)")]
    NotControllable(String),

    /// One or more selection entries named a command absent from the
    /// compiled set. The remaining entries were still executed.
    #[error("source {source_id}: selection entries matched no compiled command: {entries}")]
    UnresolvedCommands { source_id: String, entries: String },

    /// The transport collaborator failed to carry a command.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
