//! Player records and the population snapshot they form.
//!
//! # Data Structure
//!
//! ```text
//! RecordCollection (on disk)
//! ├─ generated_at (optional RFC 3339 timestamp)
//! └─ records: Vec<Record>
//!     ├─ player_id, display_name
//!     ├─ light_level, triumph_score, play_time_hours, character_count
//!     ├─ class_tag (main class)
//!     └─ classes_played (distinct classes across the player's characters)
//! ```
//!
//! # Serialization
//!
//! ```json
//! {
//!   "generated_at": "2026-10-01T12:00:00Z",
//!   "records": [
//!     {
//!       "player_id": "4611686018467284386",
//!       "display_name": "Osiris",
//!       "light_level": 1810,
//!       "triumph_score": 112340,
//!       "play_time_hours": 1520.5,
//!       "character_count": 3,
//!       "class_tag": "warlock",
//!       "classes_played": ["warlock", "hunter"]
//!     }
//!   ]
//! }
//! ```

use std::{collections::HashSet, fmt};

use arrayvec::ArrayVec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest light level reachable with current game content.
pub const MAX_LIGHT_LEVEL: u32 = 2010;

/// Character archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Titan,
    Hunter,
    Warlock,
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

impl CharacterClass {
    pub const ALL: [Self; 3] = [Self::Titan, Self::Hunter, Self::Warlock];

    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            CharacterClass::Titan => "titan",
            CharacterClass::Hunter => "hunter",
            CharacterClass::Warlock => "warlock",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Classes a player has characters in. Holds at most one entry per class.
pub type ClassSet = ArrayVec<CharacterClass, 3>;

/// One measured player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier (platform membership id)
    pub player_id: String,
    pub display_name: String,
    /// Highest light level across the player's characters
    pub light_level: u32,
    pub triumph_score: u64,
    /// Total play time across all characters, in hours
    pub play_time_hours: f64,
    pub character_count: u8,
    /// Main class (the character with the highest light level)
    pub class_tag: CharacterClass,
    pub classes_played: ClassSet,
}

/// Why a record was rejected on load.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    #[display("record {player_id}: light level {light_level} exceeds {MAX_LIGHT_LEVEL}")]
    LightLevelOutOfRange { player_id: String, light_level: u32 },
    #[display("record {player_id}: play time must be a non-negative finite number of hours")]
    InvalidPlayTime { player_id: String },
    #[display("record {player_id}: character count must be at least 1")]
    NoCharacters { player_id: String },
    #[display("record {player_id}: class {class_tag} is missing from classes played")]
    ClassNotPlayed {
        player_id: String,
        class_tag: CharacterClass,
    },
    #[display("record {player_id}: player id appears more than once")]
    DuplicatePlayerId { player_id: String },
}

impl Record {
    /// Number of distinct classes played.
    #[must_use]
    pub fn versatility(&self) -> u32 {
        let mask = self
            .classes_played
            .iter()
            .fold(0u8, |mask, class| mask | class.bit());
        mask.count_ones()
    }

    /// Whether the light level comes from a completed sync.
    ///
    /// Players whose characters were never synced carry a light level of 0,
    /// which is a placeholder rather than a measurement.
    #[must_use]
    pub fn has_synced_light(&self) -> bool {
        self.light_level > 0
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        let player_id = || self.player_id.clone();
        if self.light_level > MAX_LIGHT_LEVEL {
            return Err(RecordError::LightLevelOutOfRange {
                player_id: player_id(),
                light_level: self.light_level,
            });
        }
        if !self.play_time_hours.is_finite() || self.play_time_hours < 0.0 {
            return Err(RecordError::InvalidPlayTime {
                player_id: player_id(),
            });
        }
        if self.character_count == 0 {
            return Err(RecordError::NoCharacters {
                player_id: player_id(),
            });
        }
        if !self.classes_played.contains(&self.class_tag) {
            return Err(RecordError::ClassNotPlayed {
                player_id: player_id(),
                class_tag: self.class_tag,
            });
        }
        Ok(())
    }
}

/// On-disk form of a population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordCollection {
    /// When the snapshot was produced by the ingestion process
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    pub records: Vec<Record>,
}

/// An immutable, validated snapshot of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    generated_at: Option<DateTime<Utc>>,
    records: Vec<Record>,
}

impl Population {
    /// Validates every record and builds a population.
    ///
    /// Player ids must be unique.
    pub fn new(
        generated_at: Option<DateTime<Utc>>,
        records: Vec<Record>,
    ) -> Result<Self, RecordError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            record.validate()?;
            if !seen.insert(record.player_id.as_str()) {
                return Err(RecordError::DuplicatePlayerId {
                    player_id: record.player_id.clone(),
                });
            }
        }
        Ok(Self {
            generated_at,
            records,
        })
    }

    /// Builds a population from records that were already validated.
    pub(crate) fn from_valid(generated_at: Option<DateTime<Utc>>, records: Vec<Record>) -> Self {
        Self {
            generated_at,
            records,
        }
    }

    pub fn from_collection(collection: RecordCollection) -> Result<Self, RecordError> {
        Self::new(collection.generated_at, collection.records)
    }

    #[must_use]
    pub fn into_collection(self) -> RecordCollection {
        RecordCollection {
            generated_at: self.generated_at,
            records: self.records,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn find(&self, player_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.player_id == player_id)
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Builds a valid record; `classes_played` contains only the main class.
    pub(crate) fn record(
        player_id: &str,
        class_tag: CharacterClass,
        light_level: u32,
        triumph_score: u64,
        play_time_hours: f64,
    ) -> Record {
        let mut classes_played = ClassSet::new();
        classes_played.push(class_tag);
        Record {
            player_id: player_id.to_owned(),
            display_name: format!("Guardian {player_id}"),
            light_level,
            triumph_score,
            play_time_hours,
            character_count: 1,
            class_tag,
            classes_played,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{test_util::record, *};

    #[test]
    fn test_versatility_counts_distinct_classes() {
        let mut r = record("1", CharacterClass::Titan, 1800, 0, 10.0);
        assert_eq!(r.versatility(), 1);
        r.classes_played.push(CharacterClass::Warlock);
        assert_eq!(r.versatility(), 2);
        r.classes_played.push(CharacterClass::Titan);
        assert_eq!(r.versatility(), 2);
    }

    #[test]
    fn test_validate_rejects_light_above_cap() {
        let r = record("1", CharacterClass::Hunter, MAX_LIGHT_LEVEL + 1, 0, 0.0);
        assert!(matches!(
            r.validate(),
            Err(RecordError::LightLevelOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_play_time() {
        let r = record("1", CharacterClass::Hunter, 1800, 0, f64::NAN);
        assert!(matches!(r.validate(), Err(RecordError::InvalidPlayTime { .. })));
        let r = record("1", CharacterClass::Hunter, 1800, 0, -1.0);
        assert!(matches!(r.validate(), Err(RecordError::InvalidPlayTime { .. })));
    }

    #[test]
    fn test_validate_requires_main_class_in_classes_played() {
        let mut r = record("1", CharacterClass::Hunter, 1800, 0, 1.0);
        r.classes_played.clear();
        r.classes_played.push(CharacterClass::Titan);
        assert!(matches!(r.validate(), Err(RecordError::ClassNotPlayed { .. })));
    }

    #[test]
    fn test_population_rejects_invalid_record() {
        let mut bad = record("2", CharacterClass::Titan, 1800, 0, 1.0);
        bad.character_count = 0;
        let result = Population::new(None, vec![record("1", CharacterClass::Titan, 1800, 0, 1.0), bad]);
        assert_eq!(
            result,
            Err(RecordError::NoCharacters {
                player_id: "2".to_owned()
            })
        );
    }

    #[test]
    fn test_population_rejects_duplicate_player_id() {
        let result = Population::new(
            None,
            vec![
                record("1", CharacterClass::Titan, 1800, 0, 1.0),
                record("2", CharacterClass::Hunter, 1810, 0, 1.0),
                record("1", CharacterClass::Warlock, 1820, 0, 1.0),
            ],
        );
        assert_eq!(
            result,
            Err(RecordError::DuplicatePlayerId {
                player_id: "1".to_owned()
            })
        );
    }

    #[test]
    fn test_unsynced_light_level() {
        assert!(!record("1", CharacterClass::Titan, 0, 0, 0.0).has_synced_light());
        assert!(record("1", CharacterClass::Titan, 1, 0, 0.0).has_synced_light());
    }

    #[test]
    fn test_collection_round_trip_through_json() {
        let json = r#"{
            "generated_at": "2026-10-01T12:00:00Z",
            "records": [{
                "player_id": "42",
                "display_name": "Osiris",
                "light_level": 1810,
                "triumph_score": 112340,
                "play_time_hours": 1520.5,
                "character_count": 3,
                "class_tag": "warlock",
                "classes_played": ["warlock", "hunter"]
            }]
        }"#;
        let collection = serde_json::from_str::<RecordCollection>(json).unwrap();
        let population = Population::from_collection(collection).unwrap();
        assert_eq!(population.len(), 1);
        assert!(population.generated_at().is_some());
        let record = population.find("42").unwrap();
        assert_eq!(record.class_tag, CharacterClass::Warlock);
        assert_eq!(record.versatility(), 2);
        assert!(population.find("43").is_none());
    }
}
