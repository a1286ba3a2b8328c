//! Deterministic synthetic player records.
//!
//! Used as the fallback data source when no record file is available, and by
//! the `generate-records` command. The same seed always produces the same
//! records, so statistics computed over a sample are reproducible.
//!
//! The population is loosely shaped like real endgame data: light levels
//! cluster just below the cap, play time is log-normal, and triumph score
//! grows with both light level and play time.

use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_distr::StandardNormal;
use rand_pcg::Pcg32;

use crate::record::{CharacterClass, ClassSet, MAX_LIGHT_LEVEL, Record};

const BASE_PLAYER_ID: u64 = 4_611_686_018_400_000_000;
const LIGHT_MEAN: f64 = 1795.0;
const LIGHT_SIGMA: f64 = 15.0;
const LIGHT_FLOOR: f64 = 1600.0;
const PLAY_TIME_LOG_MEAN: f64 = 6.2;
const PLAY_TIME_LOG_SIGMA: f64 = 0.8;

/// Parameters of a synthetic population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig {
    pub num_records: usize,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            num_records: 500,
            seed: 42,
        }
    }
}

/// Generates `config.num_records` valid records.
///
/// # Examples
///
/// ```
/// use vanguard_analysis::sample::{SampleConfig, generate};
///
/// let config = SampleConfig { num_records: 20, seed: 7 };
/// let records = generate(config);
/// assert_eq!(records.len(), 20);
/// assert_eq!(records, generate(config));
/// assert!(records.iter().all(|r| r.validate().is_ok()));
/// ```
#[must_use]
pub fn generate(config: SampleConfig) -> Vec<Record> {
    let mut rng = Pcg32::seed_from_u64(config.seed);
    (0..config.num_records)
        .map(|i| generate_record(&mut rng, i))
        .collect()
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn generate_record(rng: &mut Pcg32, index: usize) -> Record {
    let class_tag = CharacterClass::ALL[rng.random_range(0..CharacterClass::ALL.len())];
    let character_count = rng.random_range(1..=3_u8);

    let mut others = CharacterClass::ALL
        .into_iter()
        .filter(|c| *c != class_tag)
        .collect::<Vec<_>>();
    others.shuffle(rng);
    let mut classes_played = ClassSet::new();
    classes_played.push(class_tag);
    classes_played.extend(others.into_iter().take(usize::from(character_count) - 1));

    let z_light: f64 = rng.sample(StandardNormal);
    let light_level = (LIGHT_MEAN + LIGHT_SIGMA * z_light)
        .round()
        .clamp(LIGHT_FLOOR, f64::from(MAX_LIGHT_LEVEL)) as u32;

    let z_time: f64 = rng.sample(StandardNormal);
    let play_time_hours = ((PLAY_TIME_LOG_MEAN + PLAY_TIME_LOG_SIGMA * z_time).exp() * 10.0).round() / 10.0;

    let z_triumph: f64 = rng.sample(StandardNormal);
    let triumph = 20_000.0
        + 600.0 * (f64::from(light_level) - LIGHT_FLOOR)
        + 40.0 * play_time_hours
        + 12_000.0 * z_triumph;
    let triumph_score = triumph.max(0.0).round() as u64;

    let player_id = (BASE_PLAYER_ID + index as u64).to_string();
    Record {
        display_name: format!("Guardian#{:04}", index % 10_000),
        player_id,
        light_level,
        triumph_score,
        play_time_hours,
        character_count,
        class_tag,
        classes_played,
    }
}
