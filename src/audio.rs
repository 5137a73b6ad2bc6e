//! Sound cues
//!
//! The game only decides *when* a cue plays; an [`AudioSink`] supplied by the
//! host does the actual playback. Cues are fire-and-forget.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Safe touchdown on a fresh platform
    Land,
    /// Explosion, wrong answer or hard bounce
    Crash,
    /// Correct answer, refuelled
    Success,
    /// Menu selection
    Click,
    /// Engine lit
    ThrustOn,
    /// Engine cut
    ThrustOff,
    /// Background music started
    MusicOn,
    /// Background music stopped
    MusicOff,
}

impl SoundEffect {
    /// Cues that bypass the sfx volume (music control)
    pub fn is_music(self) -> bool {
        matches!(self, SoundEffect::MusicOn | SoundEffect::MusicOff)
    }
}

/// Playback backend
pub trait AudioSink {
    /// Play a cue at the given volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs; used by the headless binary
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} @ {:.2}", effect, volume);
    }
}

/// Sink that records every cue; clones share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    played: Rc<RefCell<Vec<SoundEffect>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<SoundEffect> {
        self.played.borrow().clone()
    }

    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.borrow().iter().filter(|e| **e == effect).count()
    }

    pub fn clear(&self) {
        self.played.borrow_mut().clear();
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        self.played.borrow_mut().push(effect);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_enabled: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_enabled: false,
        }
    }

    /// Swap the playback backend, keeping volumes
    /// Swap the backend; a running track is restarted on the new one
    pub fn set_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.sink = sink;
        if self.music_enabled {
            let cue = SoundEffect::MusicOn;
            self.sink.play(cue, self.volume_for(cue));
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    /// Flip background music, emitting the matching cue; returns the new state
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        let cue = if self.music_enabled {
            SoundEffect::MusicOn
        } else {
            SoundEffect::MusicOff
        };
        // Control cue goes out even when muted so the host can stop the track
        self.sink.play(cue, self.volume_for(cue));
        self.music_enabled
    }

    fn volume_for(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else if effect.is_music() {
            self.master_volume * self.music_volume
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.volume_for(effect);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("music_volume", &self.music_volume)
            .field("muted", &self.muted)
            .field("music_enabled", &self.music_enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_reaches_sink() {
        let sink = RecordingSink::new();
        let mut audio = AudioManager::new(Box::new(sink.clone()));
        audio.play(SoundEffect::Land);
        audio.play(SoundEffect::Crash);
        assert_eq!(sink.played(), vec![SoundEffect::Land, SoundEffect::Crash]);
    }

    #[test]
    fn test_muted_is_silent() {
        let sink = RecordingSink::new();
        let mut audio = AudioManager::new(Box::new(sink.clone()));
        audio.set_muted(true);
        audio.play(SoundEffect::Success);
        audio.set_muted(false);
        audio.set_sfx_volume(0.0);
        audio.play(SoundEffect::Success);
        assert!(sink.played().is_empty());
    }

    #[test]
    fn test_music_toggle_cues() {
        let sink = RecordingSink::new();
        let mut audio = AudioManager::new(Box::new(sink.clone()));
        assert!(audio.toggle_music());
        assert!(!audio.toggle_music());
        assert_eq!(sink.played(), vec![SoundEffect::MusicOn, SoundEffect::MusicOff]);
    }

    #[test]
    fn test_new_sink_picks_up_running_music() {
        let mut audio = AudioManager::default();
        audio.toggle_music();

        let sink = RecordingSink::new();
        audio.set_sink(Box::new(sink.clone()));
        assert_eq!(sink.played(), vec![SoundEffect::MusicOn]);

        let quiet = RecordingSink::new();
        audio.toggle_music();
        audio.set_sink(Box::new(quiet.clone()));
        assert!(quiet.played().is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::default();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.volume_for(SoundEffect::Land), 0.0);
        assert_eq!(audio.volume_for(SoundEffect::MusicOn), 0.7);
    }
}
