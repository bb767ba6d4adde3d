//! Per-renderer source selection
//!
//! One `SelectionController` owns the "current selection" for a
//! controllable unit. It re-resolves the selection against the live source
//! list on every refresh (stale ids are dropped, never left pointing at
//! removed data), remembers the last good selection in a session-scoped
//! cell shared between controllers, and on user selection compiles the
//! source's command set and dispatches its configured selection commands in
//! order.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bus::{BusEvent, SharedBus, SOURCE_LIST_BACKEND};
use crate::commands::{parse_selection_command, CommandArg, CommandSet};
use crate::error::ControlError;
use crate::sources::{filter_sources, Capability, ConfiguredSource};
use crate::transport::CommandTransport;

/// Session-scoped remembered-last-selection cell. One per logical remote
/// session; every controller in the session reads and writes the same slot.
pub type SharedLastSelected = Arc<Mutex<Option<String>>>;

/// Create a fresh remembered-selection cell.
pub fn new_last_selected() -> SharedLastSelected {
    Arc::new(Mutex::new(None))
}

#[derive(Default)]
struct State {
    sources: Vec<ConfiguredSource>,
    /// (id, resolved display name) in list order
    names: Vec<(String, String)>,
    video: Vec<ConfiguredSource>,
    audio: Vec<ConfiguredSource>,
    selected: Option<String>,
    /// Compiled set for the active selection, if it is controllable
    commands: Option<CommandSet>,
}

pub struct SelectionController {
    transport: Arc<dyn CommandTransport>,
    bus: SharedBus,
    last_selected: SharedLastSelected,
    state: RwLock<State>,
    subscription: Mutex<Option<CancellationToken>>,
}

impl SelectionController {
    pub fn new(
        transport: Arc<dyn CommandTransport>,
        bus: SharedBus,
        last_selected: SharedLastSelected,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport,
            bus,
            last_selected,
            state: RwLock::new(State::default()),
            subscription: Mutex::new(None),
        })
    }

    /// Replace the configured source list and re-run the refresh transition.
    pub async fn set_sources(&self, sources: Vec<ConfiguredSource>) {
        {
            let mut state = self.state.write().await;
            state.sources = sources;
        }
        self.resolve().await;
    }

    /// React to an external "model updated" notification. Untargeted
    /// updates and updates tagged with the source-list backend trigger a
    /// re-resolve; anything else is ignored so unrelated state changes
    /// cannot force a selection flicker.
    pub async fn handle_update(&self, backend: Option<&str>) {
        match backend {
            None => self.resolve().await,
            Some(SOURCE_LIST_BACKEND) => self.resolve().await,
            Some(other) => debug!("ignoring update from backend {}", other),
        }
    }

    /// Refresh transition: re-derive display names, recompute the filtered
    /// views, then resolve the selection with the fallback chain
    /// current id -> remembered id -> first entry -> empty.
    async fn resolve(&self) {
        let mut state = self.state.write().await;

        state.names = state
            .sources
            .iter()
            .map(|s| (s.id.clone(), s.display_name()))
            .collect();
        state.video = filter_sources(&state.sources, Capability::Video);
        state.audio = filter_sources(&state.sources, Capability::Audio);

        let resolved = {
            let sources = &state.sources;
            let contains = |id: &String| sources.iter().any(|s| &s.id == id);
            state
                .selected
                .clone()
                .filter(&contains)
                .or_else(|| self.remembered().filter(&contains))
                .or_else(|| sources.first().map(|s| s.id.clone()))
        };

        if resolved != state.selected {
            debug!("selection resolved {:?} -> {:?}", state.selected, resolved);
        }
        let commands = resolved
            .as_ref()
            .and_then(|id| state.sources.iter().find(|s| &s.id == id))
            .and_then(CommandSet::compile);
        state.selected = resolved.clone();
        state.commands = commands;

        if let Some(id) = resolved {
            self.remember(&id);
        }
    }

    /// User selection of source `id`: transition, compile, and dispatch the
    /// source's selection commands in configured order. Entries naming a
    /// command absent from the compiled set are reported and skipped; the
    /// remaining entries still execute and the violation surfaces in the
    /// returned error.
    pub async fn select(&self, id: &str) -> Result<(), ControlError> {
        let source = {
            let state = self.state.read().await;
            state
                .sources
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or_else(|| ControlError::UnknownSource(id.to_string()))?
        };

        let commands = CommandSet::compile(&source);
        {
            let mut state = self.state.write().await;
            state.selected = Some(source.id.clone());
            state.commands = commands.clone();
        }
        self.remember(&source.id);
        info!("selected source {} ({})", source.id, source.display_name());

        if !source.selection_commands.is_empty() && commands.is_none() {
            return Err(ControlError::NotControllable(source.id));
        }

        let mut unresolved: Vec<String> = Vec::new();
        if let Some(set) = &commands {
            for entry in &source.selection_commands {
                let parsed = parse_selection_command(entry);
                let Some(name) = parsed.command() else {
                    warn!(
                        "source {}: selection entry {:?} matches no compiled command",
                        source.id, entry
                    );
                    unresolved.push(entry.clone());
                    continue;
                };
                let arg = CommandArg::Payload(parsed.params);
                if let Err(e) = set.invoke(self.transport.as_ref(), name, Some(&arg)).await {
                    warn!("source {}: {} failed: {}", source.id, name, e);
                }
            }
            self.bus.publish(BusEvent::SourceSelected {
                resource: set.resource().to_string(),
                source_id: source.id.clone(),
            });
        }

        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(ControlError::UnresolvedCommands {
                source_id: source.id,
                entries: unresolved.join(", "),
            })
        }
    }

    /// Current selection, if any.
    pub async fn selected(&self) -> Option<String> {
        self.state.read().await.selected.clone()
    }

    /// (id, display name) pairs in list order, as of the last refresh.
    pub async fn source_names(&self) -> Vec<(String, String)> {
        self.state.read().await.names.clone()
    }

    pub async fn video_sources(&self) -> Vec<ConfiguredSource> {
        self.state.read().await.video.clone()
    }

    pub async fn audio_sources(&self) -> Vec<ConfiguredSource> {
        self.state.read().await.audio.clone()
    }

    /// Subscribe to source-list updates on the bus. Replaces any previous
    /// subscription. The task holds the controller alive until `detach`.
    pub fn attach(self: &Arc<Self>) {
        let token = CancellationToken::new();
        if let Some(prev) = self.swap_subscription(Some(token.clone())) {
            prev.cancel();
        }
        let mut rx = self.bus.subscribe();
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    event = rx.recv() => match event {
                        Ok(BusEvent::SourcesUpdated { backend }) => {
                            controller.handle_update(backend.as_deref()).await;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("bus receiver lagged, skipped {} events", skipped);
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });
    }

    /// Teardown: detach the update subscription so no resolution runs
    /// against a discarded controller.
    pub fn detach(&self) {
        if let Some(token) = self.swap_subscription(None) {
            token.cancel();
        }
    }

    fn swap_subscription(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut guard = self
            .subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    fn remembered(&self) -> Option<String> {
        self.last_selected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn remember(&self, id: &str) {
        let mut cell = self
            .last_selected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if cell.as_deref() != Some(id) {
            *cell = Some(id.to_string());
        }
    }
}

impl Drop for SelectionController {
    fn drop(&mut self) {
        if let Some(token) = self.swap_subscription(None) {
            token.cancel();
        }
    }
}
