//! Procedural audio
//!
//! The decisions (which cue for which engine event, hum pitch, music tempo)
//! are pure and live here. Synthesis is a backend behind [`AudioOutput`];
//! the WebAudio one lives in `web` and only builds for wasm32.

pub mod music;

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::settings::Settings;
use crate::sim::GameEvent;

pub use music::Sequencer;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Short rising blip when food is eaten
    Eat,
    /// Per-move tick, pitch rises with score
    Tick { score: u32 },
    /// Low thud into a wall
    WallHit,
    /// Crunchy buzz into own body
    SelfHit,
    /// Best score beaten (once per run) or board filled
    HighScore,
}

/// Continuous engine hum settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumParams {
    pub frequency: f32,
    pub gain: f32,
}

impl HumParams {
    pub fn for_score(score: u32) -> Self {
        let s = score as f32;
        Self {
            frequency: (60.0 + s * 8.0).min(400.0),
            gain: 0.04 + (s * 0.005).min(0.1),
        }
    }
}

/// Music tempo for a score (beats per minute)
pub fn music_bpm(score: u32) -> f32 {
    (140.0 + score as f32 * 2.0).min(200.0)
}

/// Pitch of the per-move tick (Hz)
pub fn tick_pitch_hz(score: u32) -> f32 {
    (220.0 + score as f32 * 12.0).min(880.0)
}

/// High score cue: C5 E5 G5 run into a held C6 (Hz, seconds)
pub const HIGH_SCORE_RUN: [(f32, f64); 4] =
    [(523.25, 0.09), (659.25, 0.09), (783.99, 0.09), (1046.5, 0.35)];

/// Instruction for an audio backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play(SoundEffect),
    StartHum(HumParams),
    UpdateHum(HumParams),
    StopHum,
    StartMusic { bpm: f32 },
    SetTempo { bpm: f32 },
    StopMusic,
    /// Effective channel volumes (0.0 - 1.0), already zero when muted
    SetVolume { sfx: f32, music: f32 },
}

impl AudioCommand {
    pub fn volume_for(settings: &Settings) -> Self {
        AudioCommand::SetVolume {
            sfx: settings.effective_sfx_volume(),
            music: settings.effective_music_volume(),
        }
    }
}

/// Something that can make noise
pub trait AudioOutput {
    fn apply(&mut self, command: &AudioCommand);

    /// Called once per frame (music scheduling)
    fn update(&mut self) {}

    /// Silence everything before the session goes away
    fn shutdown(&mut self) {
        self.apply(&AudioCommand::StopHum);
        self.apply(&AudioCommand::StopMusic);
    }
}

/// Backend that only logs (native builds, tests)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioOutput for NullAudio {
    fn apply(&mut self, command: &AudioCommand) {
        log::trace!("audio: {:?}", command);
    }
}

/// Turns engine events into audio commands.
///
/// Tracks whether loops (hum + music) should be playing so mute and pause
/// can stop and restart them.
#[derive(Debug, Clone)]
pub struct AudioDirector {
    muted: bool,
    music_enabled: bool,
    /// Run in progress and not paused
    active: bool,
    score: u32,
    /// High score cue already played this run
    celebrated: bool,
}

impl AudioDirector {
    pub fn new(settings: &Settings) -> Self {
        Self {
            muted: settings.muted,
            music_enabled: settings.music_enabled,
            active: false,
            score: 0,
            celebrated: false,
        }
    }

    pub fn on_event(&mut self, event: &GameEvent) -> Vec<AudioCommand> {
        match *event {
            GameEvent::SessionStarted => {
                self.active = true;
                self.score = 0;
                self.celebrated = false;
                self.start_loops()
            }
            GameEvent::Step { score } => self.play(SoundEffect::Tick { score }),
            GameEvent::FoodEaten { score, .. } => {
                self.score = score;
                if self.muted {
                    return Vec::new();
                }
                let mut commands = vec![
                    AudioCommand::Play(SoundEffect::Eat),
                    AudioCommand::UpdateHum(HumParams::for_score(score)),
                ];
                if self.music_enabled {
                    commands.push(AudioCommand::SetTempo {
                        bpm: music_bpm(score),
                    });
                }
                commands
            }
            GameEvent::WallCollision => self.play(SoundEffect::WallHit),
            GameEvent::SelfCollision => self.play(SoundEffect::SelfHit),
            GameEvent::NewHighScore { .. } => {
                if self.celebrated {
                    return Vec::new();
                }
                self.celebrated = true;
                self.play(SoundEffect::HighScore)
            }
            GameEvent::BoardFilled => self.play(SoundEffect::HighScore),
            GameEvent::GameOver { .. } | GameEvent::Paused => {
                self.active = false;
                stop_loops()
            }
            GameEvent::Resumed => {
                self.active = true;
                self.start_loops()
            }
        }
    }

    pub fn set_muted(&mut self, muted: bool) -> Vec<AudioCommand> {
        if self.muted == muted {
            return Vec::new();
        }
        self.muted = muted;
        if muted { stop_loops() } else { self.start_loops() }
    }

    pub fn set_music_enabled(&mut self, enabled: bool) -> Vec<AudioCommand> {
        if self.music_enabled == enabled {
            return Vec::new();
        }
        self.music_enabled = enabled;
        if !enabled {
            vec![AudioCommand::StopMusic]
        } else if self.active && !self.muted {
            vec![AudioCommand::StartMusic {
                bpm: music_bpm(self.score),
            }]
        } else {
            Vec::new()
        }
    }

    fn play(&self, effect: SoundEffect) -> Vec<AudioCommand> {
        if self.muted {
            Vec::new()
        } else {
            vec![AudioCommand::Play(effect)]
        }
    }

    fn start_loops(&self) -> Vec<AudioCommand> {
        if self.muted || !self.active {
            return Vec::new();
        }
        let mut commands = vec![AudioCommand::StartHum(HumParams::for_score(self.score))];
        if self.music_enabled {
            commands.push(AudioCommand::StartMusic {
                bpm: music_bpm(self.score),
            });
        }
        commands
    }
}

fn stop_loops() -> Vec<AudioCommand> {
    vec![AudioCommand::StopHum, AudioCommand::StopMusic]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Cell, GameOverCause};

    fn director() -> AudioDirector {
        AudioDirector::new(&Settings::default())
    }

    #[test]
    fn test_formulas() {
        assert_eq!(HumParams::for_score(0).frequency, 60.0);
        assert!((HumParams::for_score(0).gain - 0.04).abs() < 1e-6);
        assert_eq!(HumParams::for_score(10).frequency, 140.0);
        assert_eq!(HumParams::for_score(100).frequency, 400.0);
        assert!((HumParams::for_score(100).gain - 0.14).abs() < 1e-6);

        assert_eq!(music_bpm(0), 140.0);
        assert_eq!(music_bpm(10), 160.0);
        assert_eq!(music_bpm(50), 200.0);

        assert_eq!(tick_pitch_hz(0), 220.0);
        assert_eq!(tick_pitch_hz(1000), 880.0);
    }

    #[test]
    fn test_high_score_run_climbs_an_octave() {
        assert!(HIGH_SCORE_RUN.windows(2).all(|w| w[1].0 > w[0].0));
        let (first, _) = HIGH_SCORE_RUN[0];
        let (last, held) = HIGH_SCORE_RUN[HIGH_SCORE_RUN.len() - 1];
        assert!((last / first - 2.0).abs() < 1e-3);
        assert!(HIGH_SCORE_RUN.iter().all(|&(_, len)| len <= held));
    }

    #[test]
    fn test_volume_command_follows_settings() {
        let mut settings = Settings::default();
        settings.set_sfx_volume(0.5);
        assert_eq!(
            AudioCommand::volume_for(&settings),
            AudioCommand::SetVolume {
                sfx: 0.8 * 0.5,
                music: 0.8 * 0.5,
            }
        );
        settings.muted = true;
        assert_eq!(
            AudioCommand::volume_for(&settings),
            AudioCommand::SetVolume { sfx: 0.0, music: 0.0 }
        );
    }

    #[test]
    fn test_session_start_starts_loops() {
        let mut d = director();
        assert_eq!(
            d.on_event(&GameEvent::SessionStarted),
            vec![
                AudioCommand::StartHum(HumParams::for_score(0)),
                AudioCommand::StartMusic { bpm: 140.0 },
            ]
        );
    }

    #[test]
    fn test_event_mapping() {
        let mut d = director();
        d.on_event(&GameEvent::SessionStarted);

        assert_eq!(
            d.on_event(&GameEvent::Step { score: 2 }),
            vec![AudioCommand::Play(SoundEffect::Tick { score: 2 })]
        );
        assert_eq!(
            d.on_event(&GameEvent::FoodEaten {
                cell: Cell::new(1, 1),
                score: 5
            }),
            vec![
                AudioCommand::Play(SoundEffect::Eat),
                AudioCommand::UpdateHum(HumParams::for_score(5)),
                AudioCommand::SetTempo { bpm: 150.0 },
            ]
        );
        assert_eq!(
            d.on_event(&GameEvent::WallCollision),
            vec![AudioCommand::Play(SoundEffect::WallHit)]
        );
        assert_eq!(
            d.on_event(&GameEvent::SelfCollision),
            vec![AudioCommand::Play(SoundEffect::SelfHit)]
        );
        assert_eq!(
            d.on_event(&GameEvent::GameOver {
                score: 5,
                cause: GameOverCause::Wall
            }),
            vec![AudioCommand::StopHum, AudioCommand::StopMusic]
        );
    }

    #[test]
    fn test_high_score_cue_once_per_run() {
        let mut d = director();
        d.on_event(&GameEvent::SessionStarted);
        assert_eq!(
            d.on_event(&GameEvent::NewHighScore { score: 3 }),
            vec![AudioCommand::Play(SoundEffect::HighScore)]
        );
        assert!(d.on_event(&GameEvent::NewHighScore { score: 4 }).is_empty());

        d.on_event(&GameEvent::SessionStarted);
        assert_eq!(d.on_event(&GameEvent::NewHighScore { score: 5 }).len(), 1);
    }

    #[test]
    fn test_pause_and_resume_toggle_loops() {
        let mut d = director();
        d.on_event(&GameEvent::SessionStarted);
        d.on_event(&GameEvent::FoodEaten {
            cell: Cell::new(0, 0),
            score: 3,
        });
        assert_eq!(
            d.on_event(&GameEvent::Paused),
            vec![AudioCommand::StopHum, AudioCommand::StopMusic]
        );
        assert_eq!(
            d.on_event(&GameEvent::Resumed),
            vec![
                AudioCommand::StartHum(HumParams::for_score(3)),
                AudioCommand::StartMusic { bpm: 146.0 },
            ]
        );
    }

    #[test]
    fn test_muted_director_is_silent() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let mut d = AudioDirector::new(&settings);
        assert!(d.on_event(&GameEvent::SessionStarted).is_empty());
        assert!(d.on_event(&GameEvent::Step { score: 0 }).is_empty());
        assert!(
            d.on_event(&GameEvent::FoodEaten {
                cell: Cell::new(0, 0),
                score: 1
            })
            .is_empty()
        );

        // Unmuting mid-run brings the loops back at the current score
        assert_eq!(
            d.set_muted(false),
            vec![
                AudioCommand::StartHum(HumParams::for_score(1)),
                AudioCommand::StartMusic { bpm: 142.0 },
            ]
        );
        assert_eq!(
            d.set_muted(true),
            vec![AudioCommand::StopHum, AudioCommand::StopMusic]
        );
        assert!(d.set_muted(true).is_empty());
    }

    #[test]
    fn test_unmute_before_start_stays_quiet() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let mut d = AudioDirector::new(&settings);
        assert!(d.set_muted(false).is_empty());
    }

    #[test]
    fn test_music_toggle() {
        let mut d = director();
        d.on_event(&GameEvent::SessionStarted);
        assert_eq!(d.set_music_enabled(false), vec![AudioCommand::StopMusic]);
        assert_eq!(
            d.on_event(&GameEvent::Resumed),
            vec![AudioCommand::StartHum(HumParams::for_score(0))]
        );
        assert_eq!(
            d.set_music_enabled(true),
            vec![AudioCommand::StartMusic { bpm: 140.0 }]
        );
    }
}
