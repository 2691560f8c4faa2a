//! Collision audio
//!
//! Turns collision events into short two-voice cues. The cue math (pitch,
//! volume, trigger spacing) lives here; actually making noise is up to an
//! `AudioBackend`. One `CollisionAudio` instance per session, created by the
//! composition root and handed to the scheduler as its collision listener.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::scheduler::CollisionListener;
use crate::settings::AudioSettings;
use crate::sim::{CollisionEvent, CollisionKind};

/// Length of each voice (a sixteenth note at 120 bpm)
pub const NOTE_SECS: f64 = 0.125;
/// Second voice plays this much later than the first
pub const VOICE_OFFSET_SECS: f64 = 0.001;
/// Second voice pitch relative to the first
pub const SUB_VOICE_RATIO: f32 = 0.25;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits the boundary
    WallHit,
    /// Ball hits another ball
    BallHit,
    /// Ball breaks a block
    BlockBreak,
}

impl SoundEffect {
    /// Base frequency range in Hz
    pub fn pitch_range(&self) -> (f32, f32) {
        match self {
            SoundEffect::WallHit => (10.0, 30.0),
            SoundEffect::BallHit => (30.0, 50.0),
            SoundEffect::BlockBreak => (50.0, 90.0),
        }
    }
}

impl From<CollisionKind> for SoundEffect {
    fn from(kind: CollisionKind) -> Self {
        match kind {
            CollisionKind::Boundary { .. } => SoundEffect::WallHit,
            CollisionKind::Ball { .. } => SoundEffect::BallHit,
            CollisionKind::Block { .. } => SoundEffect::BlockBreak,
        }
    }
}

/// One oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub frequency: f32,
    /// Seconds on the audio clock
    pub start: f64,
    pub duration: f64,
    pub gain: f32,
}

/// A scheduled sound: a base voice plus a lower sub voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioCue {
    pub effect: SoundEffect,
    pub voices: [Voice; 2],
}

/// Where cues end up
pub trait AudioBackend {
    /// Called from `CollisionAudio::init`
    fn start(&mut self) {}
    /// Called from `CollisionAudio::teardown`
    fn stop(&mut self) {}
    /// Fire and forget
    fn play(&mut self, cue: &AudioCue);
}

/// Backend that only logs cues
#[derive(Debug, Default)]
pub struct LogBackend {
    pub played: u64,
}

impl AudioBackend for LogBackend {
    fn play(&mut self, cue: &AudioCue) {
        self.played += 1;
        log::debug!(
            "{:?}: {:.1} Hz @ {:.3}s",
            cue.effect,
            cue.voices[0].frequency,
            cue.voices[0].start
        );
    }
}

/// Audio manager for collision sounds
pub struct CollisionAudio<B: AudioBackend> {
    backend: B,
    rng: Pcg32,
    /// Audio clock origin; `None` until `init`
    clock: Option<Instant>,
    last_trigger: f64,
    min_gap: f64,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> CollisionAudio<B> {
    pub fn new(backend: B, settings: &AudioSettings, seed: u64) -> Self {
        Self {
            backend,
            rng: Pcg32::seed_from_u64(seed),
            clock: None,
            last_trigger: 0.0,
            min_gap: settings.min_gap_secs.max(0.0),
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Start the audio clock (on first user interaction)
    pub fn init(&mut self) {
        if self.clock.is_some() {
            return;
        }
        self.clock = Some(Instant::now());
        self.last_trigger = 0.0;
        self.backend.start();
        log::info!("Audio initialized");
    }

    /// Stop the clock and release the backend
    pub fn teardown(&mut self) {
        if self.clock.take().is_some() {
            self.backend.stop();
            log::info!("Audio torn down");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.clock.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Build the cue for `effect` at audio time `now`.
    ///
    /// Consecutive cues are spaced at least `min_gap` apart so rapid
    /// collisions in one tick don't land on the same instant.
    pub fn cue(&mut self, effect: SoundEffect, now: f64) -> Option<AudioCue> {
        if self.clock.is_none() {
            return None;
        }
        let gain = self.effective_volume();
        if gain <= 0.0 {
            return None;
        }

        let (lo, hi) = effect.pitch_range();
        let frequency = self.rng.random_range(lo..hi);
        let start = now.max(self.last_trigger + self.min_gap);
        self.last_trigger = start;

        Some(AudioCue {
            effect,
            voices: [
                Voice {
                    frequency,
                    start,
                    duration: NOTE_SECS,
                    gain,
                },
                Voice {
                    frequency: frequency * SUB_VOICE_RATIO,
                    start: start + VOICE_OFFSET_SECS,
                    duration: NOTE_SECS,
                    gain,
                },
            ],
        })
    }

    /// Play a sound effect now
    pub fn play(&mut self, effect: SoundEffect) {
        let Some(clock) = self.clock else { return };
        let now = clock.elapsed().as_secs_f64();
        if let Some(cue) = self.cue(effect, now) {
            self.backend.play(&cue);
        }
    }
}

impl<B: AudioBackend> CollisionListener for CollisionAudio<B> {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self.play(SoundEffect::from(event.kind));
    }
}
