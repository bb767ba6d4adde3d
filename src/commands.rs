//! Command compilation for the two BeoLink remote dialects
//!
//! Installed renderers speak one of two command generations: the legacy
//! Beo4 numeric-codeset dialect and the newer structured BeoRemote One
//! dialect. No protocol negotiation happens here — compilation always
//! produces both families, framed for the given source, and the invocation
//! site picks whichever entries the source's `selectionCommands` configure.
//!
//! Command names form a closed set (`CommandName`) rather than a
//! string-keyed registry; invocation keys from selection entries are
//! normalized before lookup (see `parse_selection_command`).

use anyhow::Result;
use serde_json::{Map, Value};

use crate::sources::ConfiguredSource;
use crate::transport::CommandTransport;

/// The five protocol commands every controllable source exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Beo4Command,
    Beo4AdvancedCommand,
    AllStandby,
    BeoRemoteOneCommand,
    BeoRemoteOneSourceSelection,
}

impl CommandName {
    pub const ALL: [CommandName; 5] = [
        CommandName::Beo4Command,
        CommandName::Beo4AdvancedCommand,
        CommandName::AllStandby,
        CommandName::BeoRemoteOneCommand,
        CommandName::BeoRemoteOneSourceSelection,
    ];

    /// Wire name as the gateway advertises it (literal spaces).
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Beo4Command => "Beo4 command",
            CommandName::Beo4AdvancedCommand => "Beo4 advanced command",
            CommandName::AllStandby => "All standby",
            CommandName::BeoRemoteOneCommand => "BeoRemote One command",
            CommandName::BeoRemoteOneSourceSelection => "BeoRemote One Source Selection",
        }
    }

    /// Resolve a normalized invocation key (underscored form) to a command.
    ///
    /// Selection entries derive their key by replacing non-alphanumeric
    /// characters with `_`, so `"Beo4 command?..."` resolves via
    /// `"Beo4_command"`. The advertised wire names keep literal spaces;
    /// whether the two were ever meant to coincide is tracked as an open
    /// question in DESIGN.md.
    pub fn from_invocation_key(key: &str) -> Option<CommandName> {
        match key {
            "Beo4_command" => Some(CommandName::Beo4Command),
            "Beo4_advanced_command" => Some(CommandName::Beo4AdvancedCommand),
            "All_standby" => Some(CommandName::AllStandby),
            "BeoRemote_One_command" => Some(CommandName::BeoRemoteOneCommand),
            "BeoRemote_One_Source_Selection" => Some(CommandName::BeoRemoteOneSourceSelection),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument to a compiled command: either a raw command token to be framed,
/// or an already-structured payload passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArg {
    Token(String),
    Payload(Map<String, Value>),
}

/// Protocol field selecting which signal path of the unit a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationSelector {
    VideoSource,
    TapeMemory,
    AudioSource,
}

impl DestinationSelector {
    /// Total over all destination classes: 1 is the video path, 254 the
    /// tape/memory path, everything else the audio path.
    pub fn from_class(class: i64) -> DestinationSelector {
        match class {
            1 => DestinationSelector::VideoSource,
            254 => DestinationSelector::TapeMemory,
            _ => DestinationSelector::AudioSource,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationSelector::VideoSource => "Video_source",
            DestinationSelector::TapeMemory => "V.TAPE/V.MEM",
            DestinationSelector::AudioSource => "Audio_source",
        }
    }
}

/// Protocol field distinguishing the locally-attached default signal from a
/// signal relayed out of the main room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    LocalDefault,
    MainRoom,
}

impl LinkTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkTarget::LocalDefault => "Local_Default_source",
            LinkTarget::MainRoom => "Remote_source_(main_room)",
        }
    }
}

/// Command set compiled for one configured source.
///
/// Holds the protocol framing (destination selector, link target, auto
/// unit) closed over at compile time; `build` is pure and `invoke` hands
/// the shaped payload to the transport collaborator. Built fresh per
/// activation, never shared across sources.
#[derive(Debug, Clone)]
pub struct CommandSet {
    resource: String,
    destination: DestinationSelector,
    link: LinkTarget,
    auto_unit: Option<String>,
}

impl CommandSet {
    /// Compile the command set for a source. Best-effort: a source with no
    /// resource yields `None` and any attempted invocation must be surfaced
    /// by the caller as a configuration error.
    pub fn compile(source: &ConfiguredSource) -> Option<CommandSet> {
        if source.resource.is_empty() {
            return None;
        }
        Some(CommandSet {
            resource: source.resource.clone(),
            destination: DestinationSelector::from_class(source.destination_class),
            link: if source.is_link_default {
                LinkTarget::LocalDefault
            } else {
                LinkTarget::MainRoom
            },
            auto_unit: source.auto_unit.clone(),
        })
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Legacy dialect: frame a token with the destination selector.
    pub fn beo4(&self, arg: &CommandArg) -> Value {
        match arg {
            CommandArg::Payload(payload) => Value::Object(payload.clone()),
            CommandArg::Token(token) => serde_json::json!({
                "Command": token,
                "Destination selector": self.destination.as_str(),
            }),
        }
    }

    /// Legacy dialect, advanced form: destination selector plus link target
    /// and the fixed secondary-source field.
    pub fn beo4_advanced(&self, arg: &CommandArg) -> Value {
        match arg {
            CommandArg::Payload(payload) => Value::Object(payload.clone()),
            CommandArg::Token(token) => serde_json::json!({
                "Command": token,
                "Destination selector": self.destination.as_str(),
                "Link": self.link.as_str(),
                "Secondary source": "DEFAULT",
            }),
        }
    }

    /// Broadcast standby. Argument-less; bypasses destination framing.
    pub fn all_standby(&self) -> Value {
        serde_json::json!({})
    }

    /// BeoRemote One dialect: this generation addresses units explicitly.
    pub fn beoremote_one(&self, arg: &CommandArg) -> Value {
        match arg {
            CommandArg::Payload(payload) => Value::Object(payload.clone()),
            CommandArg::Token(token) => serde_json::json!({
                "Command": token,
                "Unit": self.auto_unit,
            }),
        }
    }

    /// Distinct protocol verb with the same framing as `beoremote_one`.
    pub fn beoremote_one_source_selection(&self, arg: &CommandArg) -> Value {
        self.beoremote_one(arg)
    }

    /// Build the payload for any command by name. `AllStandby` ignores the
    /// argument; the other four treat a missing argument as an empty
    /// structured payload.
    pub fn build(&self, name: CommandName, arg: Option<&CommandArg>) -> Value {
        let empty = CommandArg::Payload(Map::new());
        let arg = arg.unwrap_or(&empty);
        match name {
            CommandName::Beo4Command => self.beo4(arg),
            CommandName::Beo4AdvancedCommand => self.beo4_advanced(arg),
            CommandName::AllStandby => self.all_standby(),
            CommandName::BeoRemoteOneCommand => self.beoremote_one(arg),
            CommandName::BeoRemoteOneSourceSelection => self.beoremote_one_source_selection(arg),
        }
    }

    /// Shape the payload and hand it to the transport collaborator.
    pub async fn invoke(
        &self,
        transport: &dyn CommandTransport,
        name: CommandName,
        arg: Option<&CommandArg>,
    ) -> Result<()> {
        let payload = self.build(name, arg);
        transport.invoke(&self.resource, name, payload).await
    }
}

/// A parsed `selectionCommands` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCommand {
    /// Normalized invocation key (non-alphanumeric characters become `_`)
    pub key: String,
    /// Query-string parameters, decoded, unique-last-wins
    pub params: Map<String, Value>,
}

impl SelectionCommand {
    /// Resolve the key against the closed command set.
    pub fn command(&self) -> Option<CommandName> {
        CommandName::from_invocation_key(&self.key)
    }
}

/// Normalize a command name into an invocation key: every non-alphanumeric
/// character becomes `_`.
fn normalize_invocation_key(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Parse one `"<CommandName>?key=value&key2=value2"` selection entry.
///
/// The name is the substring before the first `?` (percent-decoded first:
/// gateway lines encode spaces as `%20`); the tail parses under standard
/// query-string rules. Entries without a `?` carry no parameters.
pub fn parse_selection_command(entry: &str) -> SelectionCommand {
    let (name, tail) = match entry.split_once('?') {
        Some((name, tail)) => (name, Some(tail)),
        None => (entry, None),
    };
    let decoded = urlencoding::decode(name).map(|s| s.into_owned());
    let key = normalize_invocation_key(decoded.as_deref().unwrap_or(name));

    let mut params = Map::new();
    if let Some(tail) = tail {
        for (k, v) in url::form_urlencoded::parse(tail.as_bytes()) {
            params.insert(k.into_owned(), Value::String(v.into_owned()));
        }
    }
    SelectionCommand { key, params }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ConfiguredSource;

    fn source(id: &str, class: i64) -> ConfiguredSource {
        ConfiguredSource {
            id: id.to_string(),
            resource: "x".to_string(),
            destination_class: class,
            ..Default::default()
        }
    }

    #[test]
    fn destination_selector_mapping_is_total() {
        assert_eq!(DestinationSelector::from_class(1).as_str(), "Video_source");
        assert_eq!(DestinationSelector::from_class(254).as_str(), "V.TAPE/V.MEM");
        assert_eq!(DestinationSelector::from_class(0).as_str(), "Audio_source");
        assert_eq!(DestinationSelector::from_class(7).as_str(), "Audio_source");
        assert_eq!(DestinationSelector::from_class(-3).as_str(), "Audio_source");
    }

    #[test]
    fn beo4_wraps_token_with_video_destination() {
        let set = CommandSet::compile(&source("F0:128", 1)).unwrap();
        let payload = set.beo4(&CommandArg::Token("LIST".to_string()));
        assert_eq!(
            payload,
            serde_json::json!({"Command": "LIST", "Destination selector": "Video_source"})
        );
    }

    #[test]
    fn beo4_advanced_adds_link_and_secondary_source() {
        let set = CommandSet::compile(&source("F0:146", 0)).unwrap();
        let payload = set.beo4_advanced(&CommandArg::Token("PLAY".to_string()));
        assert_eq!(
            payload,
            serde_json::json!({
                "Command": "PLAY",
                "Destination selector": "Audio_source",
                "Link": "Remote_source_(main_room)",
                "Secondary source": "DEFAULT",
            })
        );
    }

    #[test]
    fn link_default_sources_frame_local_link() {
        let mut src = source("F0:146", 0);
        src.is_link_default = true;
        let set = CommandSet::compile(&src).unwrap();
        let payload = set.beo4_advanced(&CommandArg::Token("PLAY".to_string()));
        assert_eq!(payload["Link"], "Local_Default_source");
    }

    #[test]
    fn structured_payload_passes_through_unchanged() {
        let set = CommandSet::compile(&source("F0:128", 1)).unwrap();
        let mut map = Map::new();
        map.insert("Command".to_string(), Value::String("TV".to_string()));
        let payload = set.beo4(&CommandArg::Payload(map.clone()));
        // Pass-through: no destination selector gets added
        assert_eq!(payload, Value::Object(map.clone()));
        assert_eq!(set.beo4_advanced(&CommandArg::Payload(map.clone())), Value::Object(map));
    }

    #[test]
    fn beoremote_one_wraps_token_with_unit() {
        let mut src = source("F0:128", 1);
        src.auto_unit = Some("Tv1".to_string());
        let set = CommandSet::compile(&src).unwrap();
        let payload = set.beoremote_one(&CommandArg::Token("TV".to_string()));
        assert_eq!(payload, serde_json::json!({"Command": "TV", "Unit": "Tv1"}));
        // Same framing on the source-selection verb
        let select = set.beoremote_one_source_selection(&CommandArg::Token("TV".to_string()));
        assert_eq!(select, payload);
    }

    #[test]
    fn all_standby_takes_no_argument() {
        let set = CommandSet::compile(&source("F0:128", 1)).unwrap();
        assert_eq!(set.all_standby(), serde_json::json!({}));
        // The dispatcher ignores any argument handed to it
        let arg = CommandArg::Token("STANDBY".to_string());
        assert_eq!(set.build(CommandName::AllStandby, Some(&arg)), serde_json::json!({}));
    }

    #[test]
    fn missing_resource_yields_no_command_set() {
        let mut src = source("F0:128", 1);
        src.resource.clear();
        assert!(CommandSet::compile(&src).is_none());
    }

    #[test]
    fn compilation_is_idempotent() {
        let src = source("F0:128", 1);
        let a = CommandSet::compile(&src).unwrap();
        let b = CommandSet::compile(&src).unwrap();
        let arg = CommandArg::Token("LIST".to_string());
        for name in CommandName::ALL {
            assert_eq!(a.build(name, Some(&arg)), b.build(name, Some(&arg)));
        }
    }

    #[test]
    fn parses_selection_entry_with_params() {
        let cmd = parse_selection_command("Beo4 command?Command=LIST");
        assert_eq!(cmd.key, "Beo4_command");
        assert_eq!(cmd.params["Command"], "LIST");
        assert_eq!(cmd.command(), Some(CommandName::Beo4Command));
    }

    #[test]
    fn parses_percent_encoded_name_and_duplicate_keys() {
        let cmd = parse_selection_command("Beo4%20advanced%20command?Command=PLAY&Command=STOP");
        assert_eq!(cmd.key, "Beo4_advanced_command");
        // unique-last-wins
        assert_eq!(cmd.params["Command"], "STOP");
        assert_eq!(cmd.command(), Some(CommandName::Beo4AdvancedCommand));
    }

    #[test]
    fn entry_without_query_has_no_params() {
        let cmd = parse_selection_command("All standby");
        assert_eq!(cmd.key, "All_standby");
        assert!(cmd.params.is_empty());
        assert_eq!(cmd.command(), Some(CommandName::AllStandby));
    }

    #[test]
    fn unknown_key_resolves_to_none() {
        let cmd = parse_selection_command("Select source by id?F0:128");
        assert_eq!(cmd.key, "Select_source_by_id");
        assert_eq!(cmd.command(), None);
    }

    #[test]
    fn decoded_params_handle_escapes() {
        let cmd = parse_selection_command("BeoRemote One command?Command=NET%20RADIO&Unit=Audio%2B1");
        assert_eq!(cmd.params["Command"], "NET RADIO");
        assert_eq!(cmd.params["Unit"], "Audio+1");
    }
}
