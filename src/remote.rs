//! Quick controller for a single externally-chosen source
//!
//! Thinner than the selection controller: it tracks one source reference
//! (not a list) and recompiles its command set only when the reference's
//! identity changes, so unrelated field churn on the record costs nothing.
//! Standby is a two-press gesture: the first press puts the current unit in
//! standby and arms a confirm flag, a second press while armed broadcasts
//! all-standby.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::bus::{BusEvent, SharedBus};
use crate::commands::{CommandArg, CommandName, CommandSet};
use crate::error::ControlError;
use crate::sources::ConfiguredSource;
use crate::transport::CommandTransport;

/// Which standby was issued by a `standby()` press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandbyAction {
    /// First press: the current unit only, confirm armed
    SingleUnit,
    /// Second press while armed: broadcast
    AllUnits,
}

#[derive(Default)]
struct State {
    source: Option<ConfiguredSource>,
    commands: Option<CommandSet>,
    standby_armed: bool,
}

pub struct QuickController {
    transport: Arc<dyn CommandTransport>,
    bus: SharedBus,
    state: RwLock<State>,
}

impl QuickController {
    pub fn new(transport: Arc<dyn CommandTransport>, bus: SharedBus) -> Arc<Self> {
        Arc::new(Self {
            transport,
            bus,
            state: RwLock::new(State::default()),
        })
    }

    /// Update the external source reference. Recompilation happens only on
    /// identity change (compared by id, not value equality); a changed id
    /// also disarms the standby confirm.
    pub async fn set_source(&self, source: ConfiguredSource) {
        let mut state = self.state.write().await;
        let same_id = state
            .source
            .as_ref()
            .is_some_and(|current| current.id == source.id);
        if same_id {
            state.source = Some(source);
            return;
        }
        debug!("quick controller now targets {}", source.id);
        state.commands = CommandSet::compile(&source);
        state.source = Some(source);
        state.standby_armed = false;
    }

    /// Clear the source reference and all derived state.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = State::default();
    }

    /// Reset transient UI state (navigation away from the control).
    pub async fn reset(&self) {
        self.state.write().await.standby_armed = false;
    }

    /// Send a legacy Beo4 token to the current unit. A unit with no
    /// resolvable command path is a configuration error, not a no-op.
    /// Any other press breaks the standby confirm gesture.
    pub async fn exec(&self, token: &str) -> Result<(), ControlError> {
        let (set, _) = self.controllable().await?;
        let arg = CommandArg::Token(token.to_string());
        set.invoke(self.transport.as_ref(), CommandName::Beo4Command, Some(&arg))
            .await?;
        self.state.write().await.standby_armed = false;
        Ok(())
    }

    /// Two-phase standby. First press: single-unit standby, confirm armed.
    /// Second press while armed: all-standby broadcast, disarmed.
    pub async fn standby(&self) -> Result<StandbyAction, ControlError> {
        let (set, armed) = self.controllable().await?;
        if armed {
            set.invoke(self.transport.as_ref(), CommandName::AllStandby, None)
                .await?;
            self.state.write().await.standby_armed = false;
            info!("all-standby issued via {}", set.resource());
            self.bus.publish(BusEvent::StandbyIssued {
                resource: set.resource().to_string(),
                all: true,
            });
            Ok(StandbyAction::AllUnits)
        } else {
            let arg = CommandArg::Token("STANDBY".to_string());
            set.invoke(self.transport.as_ref(), CommandName::Beo4Command, Some(&arg))
                .await?;
            self.state.write().await.standby_armed = true;
            self.bus.publish(BusEvent::StandbyIssued {
                resource: set.resource().to_string(),
                all: false,
            });
            Ok(StandbyAction::SingleUnit)
        }
    }

    async fn controllable(&self) -> Result<(CommandSet, bool), ControlError> {
        let state = self.state.read().await;
        match (&state.commands, &state.source) {
            (Some(set), _) => Ok((set.clone(), state.standby_armed)),
            (None, Some(source)) => Err(ControlError::NotControllable(source.id.clone())),
            (None, None) => Err(ControlError::NotControllable("<no source>".to_string())),
        }
    }
}
