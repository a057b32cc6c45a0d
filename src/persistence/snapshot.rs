//! Binary snapshot codec
//!
//! Layout (all little-endian):
//!
//! ```text
//! [u8; 4] magic "DSNP"
//! u32     version
//! i32     current score
//! i32     primary shots
//! i32     replay shots
//! i32     enemy count, then that many body records
//! i32     player count, then that many body records
//! ```
//!
//! A body record is six `f32` (pos.x, pos.y, vel.x, vel.y, angular velocity,
//! rotation) followed by four flag bytes (stopped, special, triggered,
//! launched). Files without the magic are read as the legacy headerless
//! layout, which is the same payload without the first eight bytes.

use glam::Vec2;

use super::PersistenceError;
use crate::consts::*;
use crate::sim::{Body, GameState, Roster, ShotCounters, SpecialEffect};

/// File identification bytes
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"DSNP";

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Encoded size of one body record
pub const BODY_RECORD_SIZE: usize = 6 * 4 + 4;

/// Everything needed to restore a round
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub score: u32,
    pub shots: ShotCounters,
    pub roster: Roster,
}

impl Snapshot {
    /// Copy the persistent parts of a world
    pub fn capture(state: &GameState) -> Self {
        Self {
            score: state.score.current,
            shots: state.shots,
            roster: state.roster.clone(),
        }
    }

    /// Replace the world's roster, score and counters with this snapshot
    pub fn restore(&self, state: &mut GameState) {
        state.roster = self.roster.clone();
        state.shots = self.shots;
        state.score.observe(self.score);
        state.events.clear();
    }

    /// Encode in the current versioned format
    pub fn to_bytes(&self) -> Vec<u8> {
        let bodies = self.roster.enemies.len() + self.roster.players.len();
        let mut out = Vec::with_capacity(8 + 5 * 4 + bodies * BODY_RECORD_SIZE);

        out.extend_from_slice(&SNAPSHOT_MAGIC);
        out.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        write_count(&mut out, self.score as usize);
        write_count(&mut out, self.shots.primary as usize);
        write_count(&mut out, self.shots.replay as usize);

        write_count(&mut out, self.roster.enemies.len());
        for enemy in &self.roster.enemies {
            write_body(&mut out, enemy);
        }
        write_count(&mut out, self.roster.players.len());
        for player in &self.roster.players {
            write_body(&mut out, player);
        }
        out
    }

    /// Decode either the versioned or the legacy headerless layout
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        let mut reader = Reader::new(bytes);

        if bytes.starts_with(&SNAPSHOT_MAGIC) {
            reader.take(SNAPSHOT_MAGIC.len())?;
            let version = reader.u32()?;
            if version != SNAPSHOT_VERSION {
                return Err(PersistenceError::UnsupportedVersion(version));
            }
        } else {
            log::info!("Snapshot has no header; reading legacy layout");
        }

        let score = reader.non_negative("score")?;
        let primary = reader.non_negative("primary shot count")?;
        let replay = reader.non_negative("replay shot count")?;

        let enemy_count = reader.non_negative("enemy count")? as usize;
        reader.expect_records(enemy_count)?;
        let enemies = (0..enemy_count)
            .map(|_| reader.body(ENEMY_RADIUS))
            .collect::<Result<Vec<_>, _>>()?;

        let player_count = reader.non_negative("player count")? as usize;
        reader.expect_records(player_count)?;
        let players = (0..player_count)
            .map(|_| reader.body(PLAYER_RADIUS))
            .collect::<Result<Vec<_>, _>>()?;

        if reader.remaining() > 0 {
            return Err(PersistenceError::TrailingBytes(reader.remaining()));
        }

        Ok(Self {
            score,
            shots: ShotCounters { primary, replay },
            roster: Roster { enemies, players },
        })
    }
}

/// Counts and scores are stored as `i32`
fn write_count(out: &mut Vec<u8>, value: usize) {
    let value = i32::try_from(value).unwrap_or(i32::MAX);
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_body(out: &mut Vec<u8>, body: &Body) {
    for value in [
        body.pos.x,
        body.pos.y,
        body.vel.x,
        body.vel.y,
        body.angular_vel,
        body.rotation,
    ] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&[
        body.stopped as u8,
        body.is_special() as u8,
        body.triggered_special as u8,
        body.launched as u8,
    ]);
}

/// Bounds-checked little-endian cursor
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], PersistenceError> {
        if self.remaining() < len {
            return Err(PersistenceError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn word(&mut self) -> Result<[u8; 4], PersistenceError> {
        let mut word = [0u8; 4];
        word.copy_from_slice(self.take(4)?);
        Ok(word)
    }

    fn u32(&mut self) -> Result<u32, PersistenceError> {
        Ok(u32::from_le_bytes(self.word()?))
    }

    fn f32(&mut self) -> Result<f32, PersistenceError> {
        Ok(f32::from_le_bytes(self.word()?))
    }

    fn non_negative(&mut self, field: &'static str) -> Result<u32, PersistenceError> {
        let value = i32::from_le_bytes(self.word()?);
        u32::try_from(value).map_err(|_| PersistenceError::Negative { field, value })
    }

    /// Fail early when a count promises more records than the data holds
    fn expect_records(&self, count: usize) -> Result<(), PersistenceError> {
        let needed = count.saturating_mul(BODY_RECORD_SIZE);
        if needed > self.remaining() {
            return Err(PersistenceError::Truncated {
                offset: self.offset,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn flag(&mut self) -> Result<bool, PersistenceError> {
        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(PersistenceError::InvalidFlag {
                offset: self.offset - 1,
                value: other,
            }),
        }
    }

    fn body(&mut self, radius: f32) -> Result<Body, PersistenceError> {
        let pos = Vec2::new(self.f32()?, self.f32()?);
        let vel = Vec2::new(self.f32()?, self.f32()?);
        let angular_vel = self.f32()?;
        let rotation = self.f32()?;
        let stopped = self.flag()?;
        let special = self.flag()?;
        let triggered_special = self.flag()?;
        let launched = self.flag()?;

        let mut body = Body::new(pos, radius);
        body.vel = vel;
        body.angular_vel = angular_vel;
        body.rotation = rotation;
        body.stopped = stopped;
        body.effect = special.then_some(SpecialEffect::Burst);
        body.triggered_special = triggered_special;
        body.launched = launched;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Snapshot {
        let mut state = GameState::new(5);
        let player = &mut state.roster.players[3];
        player.vel = Vec2::new(-12.5, 7.25);
        player.angular_vel = -7.1;
        player.rotation = 123.456;
        player.stopped = false;
        player.launched = true;
        state.roster.players[2].launched = true;
        state.roster.players[2].triggered_special = true;
        state.roster.enemies[0].pos = Vec2::new(f32::MIN_POSITIVE, -0.0);

        Snapshot {
            score: 3,
            shots: ShotCounters { primary: 4, replay: 2 },
            roster: state.roster,
        }
    }

    #[test]
    fn test_layout_size_and_header() {
        let snapshot = sample();
        let bytes = snapshot.to_bytes();

        assert_eq!(&bytes[..4], b"DSNP");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), SNAPSHOT_VERSION);
        assert_eq!(i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]), 3);
        assert_eq!(bytes.len(), 8 + 5 * 4 + 10 * BODY_RECORD_SIZE);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let snapshot = sample();
        let restored = Snapshot::from_bytes(&snapshot.to_bytes()).unwrap();
        assert_eq!(restored, snapshot);

        // Bit-level check covers -0.0 which compares equal to 0.0
        let before = snapshot.roster.enemies[0].pos.y.to_bits();
        assert_eq!(restored.roster.enemies[0].pos.y.to_bits(), before);
    }

    #[test]
    fn test_reads_legacy_layout() {
        let snapshot = sample();
        let bytes = snapshot.to_bytes();
        let restored = Snapshot::from_bytes(&bytes[8..]).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut bytes = sample().to_bytes();
        bytes[4..8].copy_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            Snapshot::from_bytes(&bytes),
            Err(PersistenceError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_count_larger_than_data_is_an_error() {
        let mut bytes = sample().to_bytes();
        // Claim seven enemies while six are stored
        bytes[20..24].copy_from_slice(&7i32.to_le_bytes());
        assert!(Snapshot::from_bytes(&bytes).is_err());

        let full = sample().to_bytes();
        let truncated = &full[..full.len() - 1];
        assert!(matches!(
            Snapshot::from_bytes(truncated),
            Err(PersistenceError::Truncated { .. })
        ));
    }

    #[test]
    fn test_count_smaller_than_data_is_an_error() {
        let mut bytes = sample().to_bytes();
        // Claim five enemies while six are stored
        bytes[20..24].copy_from_slice(&5i32.to_le_bytes());
        assert!(Snapshot::from_bytes(&bytes).is_err());

        let mut padded = sample().to_bytes();
        padded.push(0);
        assert!(matches!(
            Snapshot::from_bytes(&padded),
            Err(PersistenceError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_rejects_negative_count_and_bad_flag() {
        let mut bytes = sample().to_bytes();
        bytes[20..24].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            Snapshot::from_bytes(&bytes),
            Err(PersistenceError::Negative { field: "enemy count", value: -1 })
        ));

        let mut bytes = sample().to_bytes();
        // First flag byte of the first enemy record
        bytes[24 + 24] = 2;
        assert!(matches!(
            Snapshot::from_bytes(&bytes),
            Err(PersistenceError::InvalidFlag { value: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input_is_truncated() {
        assert!(matches!(
            Snapshot::from_bytes(&[]),
            Err(PersistenceError::Truncated { offset: 0, .. })
        ));
    }

    fn arb_body(radius: f32) -> impl Strategy<Value = Body> {
        (
            any::<[f32; 6]>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(move |(v, stopped, special, triggered, launched)| {
                let mut body = Body::new(Vec2::new(v[0], v[1]), radius);
                body.vel = Vec2::new(v[2], v[3]);
                body.angular_vel = v[4];
                body.rotation = v[5];
                body.stopped = stopped;
                body.effect = special.then_some(SpecialEffect::Burst);
                body.triggered_special = triggered;
                body.launched = launched;
                body
            })
    }

    fn bits(body: &Body) -> ([u32; 6], [bool; 4]) {
        (
            [
                body.pos.x.to_bits(),
                body.pos.y.to_bits(),
                body.vel.x.to_bits(),
                body.vel.y.to_bits(),
                body.angular_vel.to_bits(),
                body.rotation.to_bits(),
            ],
            [body.stopped, body.is_special(), body.triggered_special, body.launched],
        )
    }

    proptest! {
        #[test]
        fn prop_round_trip_bit_identical(
            enemies in proptest::collection::vec(arb_body(ENEMY_RADIUS), 0..12),
            players in proptest::collection::vec(arb_body(PLAYER_RADIUS), 0..8),
            score in 0u32..1000,
            primary in 0u32..100,
            replay in 0u32..100,
        ) {
            let snapshot = Snapshot {
                score,
                shots: ShotCounters { primary, replay },
                roster: Roster { enemies, players },
            };
            let restored = Snapshot::from_bytes(&snapshot.to_bytes()).unwrap();

            prop_assert_eq!(restored.score, score);
            prop_assert_eq!(restored.shots, snapshot.shots);
            prop_assert_eq!(restored.roster.enemies.len(), snapshot.roster.enemies.len());
            prop_assert_eq!(restored.roster.players.len(), snapshot.roster.players.len());
            for (a, b) in restored.roster.enemies.iter().zip(&snapshot.roster.enemies) {
                prop_assert_eq!(bits(a), bits(b));
            }
            for (a, b) in restored.roster.players.iter().zip(&snapshot.roster.players) {
                prop_assert_eq!(bits(a), bits(b));
            }
        }
    }
}
