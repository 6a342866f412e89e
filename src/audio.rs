//! Sound effects
//!
//! Fire-and-forget: the controller asks for a sound and logs any failure.
//! On the web, effects are generated procedurally with the Web Audio API so
//! there are no files to fetch; "preloading" only means waking the audio
//! context, which runs in the background and never blocks a game start.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run started
    Start,
    /// Food eaten
    Eat,
    /// Speed level gained
    LevelUp,
    /// Pause toggled
    Pause,
    /// Run ended
    GameOver,
    /// Run ended with a new high score
    HighScore,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output is not available")]
    Unavailable,
    #[error("failed to play sound: {0}")]
    Playback(String),
}

/// Anything that can play a sound effect
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError>;
}

/// Sink that plays nothing (native runs, muted sessions)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Shared sink: the host keeps a handle for preload and mute control
impl<T: AudioSink> AudioSink for Rc<RefCell<T>> {
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        self.borrow_mut().play(effect)
    }
}

/// Outcome of the background preload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadStatus {
    Pending,
    Ready,
    Failed(String),
}

/// Shared record of a preload task. Clones observe the same status.
#[derive(Debug, Clone)]
pub struct PreloadTracker {
    status: Rc<RefCell<PreloadStatus>>,
}

impl Default for PreloadTracker {
    fn default() -> Self {
        Self {
            status: Rc::new(RefCell::new(PreloadStatus::Pending)),
        }
    }
}

impl PreloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PreloadStatus {
        self.status.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        *self.status.borrow() == PreloadStatus::Ready
    }

    /// Record the outcome; only the first result sticks
    pub fn finish(&self, result: Result<(), String>) {
        let mut status = self.status.borrow_mut();
        if *status != PreloadStatus::Pending {
            return;
        }
        *status = match result {
            Ok(()) => {
                log::info!("Audio ready");
                PreloadStatus::Ready
            }
            Err(e) => {
                log::warn!("Audio preload failed, continuing without sound: {}", e);
                PreloadStatus::Failed(e)
            }
        };
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, AudioSink, PreloadTracker, SoundEffect};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
        preload: PreloadTracker,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            let preload = PreloadTracker::new();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
                preload.finish(Err("AudioContext unavailable".into()));
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
                preload,
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Resume the audio context in the background.
        ///
        /// Browsers only allow this after a user gesture; until it succeeds
        /// sounds are skipped silently.
        pub fn preload(&self) {
            let Some(ctx) = self.ctx.clone() else { return };
            let tracker = self.preload.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match ctx.resume() {
                    Ok(promise) => JsFuture::from(promise)
                        .await
                        .map(|_| ())
                        .map_err(|e| format!("{:?}", e)),
                    Err(e) => Err(format!("{:?}", e)),
                };
                tracker.finish(result);
            });
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let err = |e: wasm_bindgen::JsValue| AudioError::Playback(format!("{:?}", e));
            let osc = ctx.create_oscillator().map_err(err)?;
            let gain = ctx.create_gain().map_err(err)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(err)?;
            gain.connect_with_audio_node(&ctx.destination()).map_err(err)?;

            Ok((osc, gain))
        }

        /// One enveloped tone, optionally sliding to `end_freq`
        #[allow(clippy::too_many_arguments)]
        fn tone(
            &self,
            ctx: &AudioContext,
            start: f64,
            freq: f32,
            end_freq: Option<f32>,
            osc_type: OscillatorType,
            gain_level: f32,
            duration: f64,
        ) -> Result<(), AudioError> {
            let (osc, gain) = self.create_osc(ctx, freq, osc_type)?;
            gain.gain().set_value_at_time(gain_level, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + duration)
                .ok();
            if let Some(end) = end_freq {
                osc.frequency().set_value_at_time(freq, start).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, start + duration)
                    .ok();
            }
            osc.start_with_when(start)
                .map_err(|e| AudioError::Playback(format!("{:?}", e)))?;
            osc.stop_with_when(start + duration + 0.02).ok();
            Ok(())
        }

        /// Food eaten - bright blip
        fn play_eat(&self, ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let t = ctx.current_time();
            self.tone(ctx, t, 520.0, Some(880.0), OscillatorType::Square, vol * 0.25, 0.08)
        }

        /// Level up - rising two-note chime
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let t = ctx.current_time();
            self.tone(ctx, t, 660.0, None, OscillatorType::Triangle, vol * 0.3, 0.12)?;
            self.tone(ctx, t + 0.1, 990.0, None, OscillatorType::Triangle, vol * 0.3, 0.18)
        }

        /// Pause toggle - soft click
        fn play_pause(&self, ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let t = ctx.current_time();
            self.tone(ctx, t, 300.0, None, OscillatorType::Sine, vol * 0.2, 0.05)
        }

        /// Start - short upward sweep
        fn play_start(&self, ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let t = ctx.current_time();
            self.tone(ctx, t, 220.0, Some(440.0), OscillatorType::Sine, vol * 0.3, 0.15)
        }

        /// Game over - descending sawtooth
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let t = ctx.current_time();
            self.tone(ctx, t, 400.0, Some(60.0), OscillatorType::Sawtooth, vol * 0.35, 0.6)
        }

        /// High score - arpeggio
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let t = ctx.current_time();
            for (i, freq) in [523.0, 659.0, 784.0, 1047.0].into_iter().enumerate() {
                let start = t + i as f64 * 0.09;
                self.tone(ctx, start, freq, None, OscillatorType::Triangle, vol * 0.3, 0.2)?;
            }
            Ok(())
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
            if self.muted || self.volume <= 0.0 || !self.preload.is_ready() {
                return Ok(());
            }
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;
            let vol = self.volume;

            match effect {
                SoundEffect::Start => self.play_start(ctx, vol),
                SoundEffect::Eat => self.play_eat(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::Pause => self.play_pause(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::HighScore => self.play_high_score(ctx, vol),
            }
        }
    }
}
