//! Turning raw player input into seeded [`Player`]s.
//!
//! [`seed_players`] never rejects its input. Malformed manual seeds degrade into a fallback seed
//! instead. Use [`validate_players`] and [`validate_seeding`] beforehand to reject bad input with
//! a message that can be shown to the user.
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::Entrants;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A seeded player. A lower seed means a higher rank.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    pub name: String,
    pub seed: u32,
}

impl Player {
    #[inline]
    pub fn new<T>(name: T, seed: u32) -> Self
    where
        T: Into<String>,
    {
        Self {
            name: name.into(),
            seed,
        }
    }
}

/// How seeds are assigned to the input names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SeedingMode {
    /// The seed is the 1-based input position.
    #[default]
    Order,
    /// Every name carries a trailing `#<seed>` marker, e.g. `Alice #3`.
    Manual,
}

impl SeedingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Manual => "manual",
        }
    }
}

impl Display for SeedingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedingMode {
    type Err = ParseSeedingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(Self::Order),
            "manual" => Ok(Self::Manual),
            _ => Err(ParseSeedingModeError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid seeding mode '{0}': expected 'order' or 'manual'")]
pub struct ParseSeedingModeError(String);

/// Creates the seeded players from `names`.
///
/// In [`SeedingMode::Order`] the seed is the input position. In [`SeedingMode::Manual`] the seed
/// is read from the trailing `#<digits>` marker and the output is sorted by seed. A name without
/// a marker, or with a seed that does not fit into a `u32`, gets the number of names as its seed.
pub fn seed_players<I, S>(names: I, mode: SeedingMode) -> Entrants<Player>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<S> = names.into_iter().collect();

    match mode {
        SeedingMode::Order => names
            .iter()
            .enumerate()
            .map(|(index, name)| Player::new(name.as_ref().trim(), index as u32 + 1))
            .collect(),
        SeedingMode::Manual => {
            let fallback = names.len() as u32;

            let mut players: Vec<Player> = names
                .iter()
                .map(|raw| {
                    let raw = raw.as_ref();

                    match split_seed(raw) {
                        Some((name, digits)) => {
                            let seed = digits.parse().unwrap_or_else(|_| {
                                log::debug!("Seed of '{}' is out of range, using {}", raw, fallback);
                                fallback
                            });

                            Player::new(name.trim(), seed)
                        }
                        None => {
                            log::debug!("'{}' has no seed marker, using {}", raw, fallback);
                            Player::new(raw.trim(), fallback)
                        }
                    }
                })
                .collect();

            // Stable, players with equal seeds keep their input order.
            players.sort_by_key(|player| player.seed);
            players.into()
        }
    }
}

/// Splits `raw` into the name and the digits of a trailing `#<digits>` marker.
fn split_seed(raw: &str) -> Option<(&str, &str)> {
    let hash = raw.rfind('#')?;
    let digits = &raw[hash + 1..];

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some((&raw[..hash], digits))
    } else {
        None
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No players entered")]
    NoPlayers,
    #[error("Need at least 2 players")]
    NotEnoughPlayers,
    #[error("Some player names are empty")]
    EmptyName,
    #[error("Duplicate player names found")]
    DuplicateName,
    #[error("Missing seed numbers for: {}", .0.join(", "))]
    MissingSeed(Vec<String>),
    #[error("Duplicate seed numbers found")]
    DuplicateSeed,
    #[error("Seed numbers must run from 1 to {0}")]
    NonContiguousSeeds(usize),
}

/// Checks that `names` contains at least 2 unique, non-empty names.
pub fn validate_players<S>(names: &[S]) -> Result<(), ValidationError>
where
    S: AsRef<str>,
{
    if names.is_empty() {
        return Err(ValidationError::NoPlayers);
    }

    if names.len() < 2 {
        return Err(ValidationError::NotEnoughPlayers);
    }

    if names.iter().any(|name| name.as_ref().trim().is_empty()) {
        return Err(ValidationError::EmptyName);
    }

    let unique: HashSet<&str> = names.iter().map(|name| name.as_ref().trim()).collect();
    if unique.len() != names.len() {
        return Err(ValidationError::DuplicateName);
    }

    Ok(())
}

/// Checks that every name carries a unique seed marker when using [`SeedingMode::Manual`] and that
/// the seeds run from 1 to the number of names. Always succeeds for [`SeedingMode::Order`].
pub fn validate_seeding<S>(names: &[S], mode: SeedingMode) -> Result<(), ValidationError>
where
    S: AsRef<str>,
{
    if mode == SeedingMode::Order {
        return Ok(());
    }

    let missing: Vec<String> = names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| split_seed(name).is_none())
        .map(str::to_owned)
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingSeed(missing));
    }

    let mut seeds = HashSet::with_capacity(names.len());
    for name in names {
        // Markers are known to exist at this point.
        let seed = split_seed(name.as_ref()).and_then(|(_, digits)| digits.parse::<usize>().ok());

        match seed {
            Some(seed) if (1..=names.len()).contains(&seed) => {
                if !seeds.insert(seed) {
                    return Err(ValidationError::DuplicateSeed);
                }
            }
            _ => return Err(ValidationError::NonContiguousSeeds(names.len())),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_players_order() {
        let players = seed_players([" Alice ", "Bob", "Carol"], SeedingMode::Order);

        assert_eq!(
            players,
            vec![
                Player::new("Alice", 1),
                Player::new("Bob", 2),
                Player::new("Carol", 3),
            ]
        );
    }

    #[test]
    fn test_seed_players_manual() {
        let players = seed_players(["Alice #3", "Bob#1", " Carol  #2"], SeedingMode::Manual);

        assert_eq!(
            players,
            vec![
                Player::new("Bob", 1),
                Player::new("Carol", 2),
                Player::new("Alice", 3),
            ]
        );
    }

    #[test]
    fn test_seed_players_manual_fallback() {
        // Names without a marker fall back to the number of names and are kept, not dropped.
        let players = seed_players(["Alice", "Bob #1", "Carol #x", "Dave #2"], SeedingMode::Manual);

        assert_eq!(
            players,
            vec![
                Player::new("Bob", 1),
                Player::new("Dave", 2),
                Player::new("Alice", 4),
                Player::new("Carol #x", 4),
            ]
        );

        let players = seed_players(["Alice #99999999999", "Bob #1"], SeedingMode::Manual);
        assert_eq!(
            players,
            vec![Player::new("Bob", 1), Player::new("Alice", 2)]
        );
    }

    #[test]
    fn test_seeding_mode_from_str() {
        assert_eq!("order".parse::<SeedingMode>().unwrap(), SeedingMode::Order);
        assert_eq!("manual".parse::<SeedingMode>().unwrap(), SeedingMode::Manual);
        assert!("random".parse::<SeedingMode>().is_err());
    }

    #[test]
    fn test_validate_players() {
        let empty: [&str; 0] = [];
        assert_eq!(validate_players(&empty), Err(ValidationError::NoPlayers));
        assert_eq!(
            validate_players(&["Alice"]),
            Err(ValidationError::NotEnoughPlayers)
        );
        assert_eq!(
            validate_players(&["Alice", "  "]),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_players(&["Alice", "Alice "]),
            Err(ValidationError::DuplicateName)
        );
        assert_eq!(validate_players(&["Alice", "Bob"]), Ok(()));
    }

    #[test]
    fn test_validate_seeding() {
        assert_eq!(validate_seeding(&["Alice", "Bob"], SeedingMode::Order), Ok(()));
        assert_eq!(
            validate_seeding(&["Alice #1", "Bob"], SeedingMode::Manual),
            Err(ValidationError::MissingSeed(vec![String::from("Bob")]))
        );
        assert_eq!(
            validate_seeding(&["Alice #1", "Bob #1"], SeedingMode::Manual),
            Err(ValidationError::DuplicateSeed)
        );
        assert_eq!(
            validate_seeding(&["Alice #1", "Bob #3"], SeedingMode::Manual),
            Err(ValidationError::NonContiguousSeeds(2))
        );
        assert_eq!(
            validate_seeding(&["Alice #2", "Bob #1"], SeedingMode::Manual),
            Ok(())
        );

        assert_eq!(
            ValidationError::MissingSeed(vec![String::from("Bob"), String::from("Carol")])
                .to_string(),
            "Missing seed numbers for: Bob, Carol"
        );
    }
}
