//! Volume commands.  The core does no mixing: it validates the request and
//! hands it to whatever [`AudioSink`] the front-end provides.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeChannel {
    Master,
    Music,
    Effects,
    Shoot,
    Explosion,
    Powerup,
    Respawn,
}

impl VolumeChannel {
    pub const ALL: [VolumeChannel; 7] = [
        VolumeChannel::Master,
        VolumeChannel::Music,
        VolumeChannel::Effects,
        VolumeChannel::Shoot,
        VolumeChannel::Explosion,
        VolumeChannel::Powerup,
        VolumeChannel::Respawn,
    ];
}

pub trait AudioSink {
    /// Current level in `0.0..=1.0`.
    fn volume(&self, channel: VolumeChannel) -> f32;
    fn set_volume(&mut self, channel: VolumeChannel, level: f32);
}

/// Nudges a channel by `delta`, clamped to `0.0..=1.0`.  Returns the new
/// level.
pub fn adjust_volume(sink: &mut impl AudioSink, channel: VolumeChannel, delta: f32) -> f32 {
    let level = (sink.volume(channel) + delta).clamp(0.0, 1.0);
    sink.set_volume(channel, level);
    level
}

/// Sink that only remembers levels.  The terminal build has no sound output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeTable {
    levels: [f32; 7],
}

impl Default for VolumeTable {
    fn default() -> Self {
        Self { levels: [0.7; 7] }
    }
}

impl AudioSink for VolumeTable {
    fn volume(&self, channel: VolumeChannel) -> f32 {
        self.levels[channel as usize]
    }

    fn set_volume(&mut self, channel: VolumeChannel, level: f32) {
        self.levels[channel as usize] = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_to_unit_range() {
        let mut table = VolumeTable::default();
        assert_eq!(adjust_volume(&mut table, VolumeChannel::Music, 0.5), 1.0);
        assert_eq!(adjust_volume(&mut table, VolumeChannel::Music, -2.0), 0.0);
        assert_eq!(table.volume(VolumeChannel::Shoot), 0.7);
    }
}
