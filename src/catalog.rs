//! Curated catalog of BeoLink source addresses
//!
//! Maps protocol source ids to friendly labels and capability flags. The
//! table is fixed and ordered; ids encode a protocol address as
//! `family:code`, `family:subunit:code` for secondary units, or with a
//! trailing `+component` segment for inputs reached through a distribution
//! matrix. Lookup is exact-match only. Many valid addresses are not in the
//! catalog; absence is a normal outcome, not an error.

use std::collections::HashMap;
use std::sync::OnceLock;

/// A catalog entry for one addressable source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDefinition {
    /// Protocol address, e.g. `F0:128` or `F0:138+4`
    pub id: &'static str,
    /// Friendly label shown when the configured source carries no name
    pub label: &'static str,
    /// Source feeds the video path
    pub video: bool,
    /// Source feeds the audio path
    pub audio: bool,
}

const fn video(id: &'static str, label: &'static str) -> SourceDefinition {
    SourceDefinition {
        id,
        label,
        video: true,
        audio: false,
    }
}

const fn audio(id: &'static str, label: &'static str) -> SourceDefinition {
    SourceDefinition {
        id,
        label,
        video: false,
        audio: true,
    }
}

const fn av(id: &'static str, label: &'static str) -> SourceDefinition {
    SourceDefinition {
        id,
        label,
        video: true,
        audio: true,
    }
}

/// The fixed source table.
///
/// Families: `F0` is the main-room product, `F1`..`F3` are link-room
/// products carrying the same codeset, `F0:1:` addresses a secondary
/// sub-unit (second screen / integrated renderer), and `+n` suffixes are
/// matrix ports behind the base source.
pub const CATALOG: &[SourceDefinition] = &[
    // Main room, video codeset
    video("F0:128", "TV"),
    video("F0:129", "V.MEM"),
    video("F0:130", "DTV2"),
    video("F0:131", "V.AUX2"),
    video("F0:132", "V.TAPE2"),
    video("F0:133", "DVD"),
    video("F0:134", "CAMERA"),
    video("F0:135", "SAT"),
    video("F0:136", "GAME"),
    video("F0:138", "DTV"),
    av("F0:139", "PC"),
    video("F0:140", "DOORCAM"),
    av("F0:141", "WEBMEDIA"),
    av("F0:142", "HOMEMEDIA"),
    av("F0:143", "AV.IN"),
    // Main room, audio codeset
    audio("F0:144", "MUSIC"),
    audio("F0:145", "RADIO"),
    audio("F0:146", "A.AUX"),
    audio("F0:147", "A.MEM"),
    audio("F0:148", "CD"),
    audio("F0:149", "PHONO"),
    audio("F0:150", "A.TAPE2"),
    audio("F0:151", "N.MUSIC"),
    audio("F0:152", "N.RADIO"),
    audio("F0:153", "DLNA"),
    audio("F0:154", "SPOTIFY"),
    audio("F0:155", "DEEZER"),
    audio("F0:156", "TUNEIN"),
    audio("F0:157", "LINE-IN"),
    audio("F0:158", "BLUETOOTH"),
    audio("F0:159", "USB"),
    audio("F0:160", "QPLAY"),
    audio("F0:161", "QOBUZ"),
    audio("F0:162", "TIDAL"),
    audio("F0:163", "AIRPLAY"),
    audio("F0:164", "CHROMECAST"),
    audio("F0:165", "JOINING"),
    audio("F0:166", "ROON"),
    audio("F0:167", "DAB"),
    audio("F0:168", "FM"),
    audio("F0:169", "AM"),
    audio("F0:170", "ALARM"),
    audio("F0:171", "PODCAST"),
    // Link room 1
    video("F1:128", "TV (link 1)"),
    video("F1:129", "V.MEM (link 1)"),
    video("F1:130", "DTV2 (link 1)"),
    video("F1:133", "DVD (link 1)"),
    video("F1:138", "DTV (link 1)"),
    av("F1:141", "WEBMEDIA (link 1)"),
    audio("F1:145", "RADIO (link 1)"),
    audio("F1:146", "A.AUX (link 1)"),
    audio("F1:147", "A.MEM (link 1)"),
    audio("F1:148", "CD (link 1)"),
    audio("F1:151", "N.MUSIC (link 1)"),
    audio("F1:152", "N.RADIO (link 1)"),
    // Link room 2
    video("F2:128", "TV (link 2)"),
    video("F2:129", "V.MEM (link 2)"),
    video("F2:130", "DTV2 (link 2)"),
    video("F2:133", "DVD (link 2)"),
    video("F2:138", "DTV (link 2)"),
    av("F2:141", "WEBMEDIA (link 2)"),
    audio("F2:145", "RADIO (link 2)"),
    audio("F2:146", "A.AUX (link 2)"),
    audio("F2:147", "A.MEM (link 2)"),
    audio("F2:148", "CD (link 2)"),
    audio("F2:151", "N.MUSIC (link 2)"),
    audio("F2:152", "N.RADIO (link 2)"),
    // Link room 3
    video("F3:128", "TV (link 3)"),
    video("F3:129", "V.MEM (link 3)"),
    video("F3:130", "DTV2 (link 3)"),
    video("F3:133", "DVD (link 3)"),
    video("F3:138", "DTV (link 3)"),
    av("F3:141", "WEBMEDIA (link 3)"),
    audio("F3:145", "RADIO (link 3)"),
    audio("F3:146", "A.AUX (link 3)"),
    audio("F3:147", "A.MEM (link 3)"),
    audio("F3:148", "CD (link 3)"),
    audio("F3:151", "N.MUSIC (link 3)"),
    audio("F3:152", "N.RADIO (link 3)"),
    // Secondary sub-units (second screen / integrated renderer)
    video("F0:1:128", "TV (screen 2)"),
    video("F0:1:129", "V.MEM (screen 2)"),
    video("F0:1:133", "DVD (screen 2)"),
    video("F0:1:138", "DTV (screen 2)"),
    audio("F0:1:148", "CD (renderer 2)"),
    audio("F0:1:151", "N.MUSIC (renderer 2)"),
    video("F1:1:128", "TV (link 1, screen 2)"),
    video("F1:1:138", "DTV (link 1, screen 2)"),
    // Video matrix ports behind the main-room DTV input
    video("F0:138+1", "DTV matrix 1"),
    video("F0:138+2", "DTV matrix 2"),
    video("F0:138+3", "DTV matrix 3"),
    video("F0:138+4", "DTV matrix 4"),
    video("F0:138+5", "DTV matrix 5"),
    video("F0:138+6", "DTV matrix 6"),
    video("F0:138+7", "DTV matrix 7"),
    video("F0:138+8", "DTV matrix 8"),
    video("F0:138+9", "DTV matrix 9"),
    video("F0:138+10", "DTV matrix 10"),
    video("F0:138+11", "DTV matrix 11"),
    video("F0:138+12", "DTV matrix 12"),
    video("F0:138+13", "DTV matrix 13"),
    video("F0:138+14", "DTV matrix 14"),
    video("F0:138+15", "DTV matrix 15"),
    video("F0:138+16", "DTV matrix 16"),
    // Video matrix ports behind the main-room V.AUX2 input
    video("F0:131+1", "V.AUX2 matrix 1"),
    video("F0:131+2", "V.AUX2 matrix 2"),
    video("F0:131+3", "V.AUX2 matrix 3"),
    video("F0:131+4", "V.AUX2 matrix 4"),
    video("F0:131+5", "V.AUX2 matrix 5"),
    video("F0:131+6", "V.AUX2 matrix 6"),
    video("F0:131+7", "V.AUX2 matrix 7"),
    video("F0:131+8", "V.AUX2 matrix 8"),
    // Audio matrix ports behind the main-room A.AUX input
    audio("F0:146+1", "A.AUX matrix 1"),
    audio("F0:146+2", "A.AUX matrix 2"),
    audio("F0:146+3", "A.AUX matrix 3"),
    audio("F0:146+4", "A.AUX matrix 4"),
    audio("F0:146+5", "A.AUX matrix 5"),
    audio("F0:146+6", "A.AUX matrix 6"),
    audio("F0:146+7", "A.AUX matrix 7"),
    audio("F0:146+8", "A.AUX matrix 8"),
    // Link room 1 matrix ports
    video("F1:138+1", "DTV matrix 1 (link 1)"),
    video("F1:138+2", "DTV matrix 2 (link 1)"),
    video("F1:138+3", "DTV matrix 3 (link 1)"),
    video("F1:138+4", "DTV matrix 4 (link 1)"),
    video("F1:138+5", "DTV matrix 5 (link 1)"),
    video("F1:138+6", "DTV matrix 6 (link 1)"),
    video("F1:138+7", "DTV matrix 7 (link 1)"),
    video("F1:138+8", "DTV matrix 8 (link 1)"),
    // Link room 2 matrix ports
    video("F2:138+1", "DTV matrix 1 (link 2)"),
    video("F2:138+2", "DTV matrix 2 (link 2)"),
    video("F2:138+3", "DTV matrix 3 (link 2)"),
    video("F2:138+4", "DTV matrix 4 (link 2)"),
    video("F2:138+5", "DTV matrix 5 (link 2)"),
    video("F2:138+6", "DTV matrix 6 (link 2)"),
    video("F2:138+7", "DTV matrix 7 (link 2)"),
    video("F2:138+8", "DTV matrix 8 (link 2)"),
];

fn index() -> &'static HashMap<&'static str, &'static SourceDefinition> {
    static INDEX: OnceLock<HashMap<&'static str, &'static SourceDefinition>> = OnceLock::new();
    INDEX.get_or_init(|| CATALOG.iter().map(|def| (def.id, def)).collect())
}

/// Look up a source definition by exact id.
pub fn lookup(id: &str) -> Option<&'static SourceDefinition> {
    index().get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_video_source() {
        let def = lookup("F0:128").unwrap();
        assert_eq!(def.label, "TV");
        assert!(def.video);
        assert!(!def.audio);
    }

    #[test]
    fn known_audio_source() {
        let def = lookup("F0:146").unwrap();
        assert_eq!(def.label, "A.AUX");
        assert!(def.audio);
        assert!(!def.video);
    }

    #[test]
    fn matrix_port_and_subunit_addresses_resolve() {
        assert_eq!(lookup("F0:138+4").unwrap().label, "DTV matrix 4");
        assert_eq!(lookup("F0:1:128").unwrap().label, "TV (screen 2)");
    }

    #[test]
    fn unknown_id_is_absent_not_an_error() {
        assert!(lookup("F9:240").is_none());
        // No prefix matching: a bare family or truncated code must miss
        assert!(lookup("F0").is_none());
        assert!(lookup("F0:12").is_none());
    }

    #[test]
    fn ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for def in CATALOG {
            assert!(seen.insert(def.id), "duplicate catalog id: {}", def.id);
        }
    }
}
