//! Procedural chiptune sequencer
//!
//! Bass + melody + kick + hi-hat over 8-step pentatonic patterns that get
//! re-rolled every few bars. Pure: yields timed voices, the backend plays
//! them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// C3 pentatonic
pub const BASS_SCALE: [f32; 5] = [130.81, 146.83, 164.81, 196.0, 220.0];
/// C4-C5 pentatonic plus
pub const MELODY_SCALE: [f32; 8] = [261.63, 293.66, 329.63, 392.0, 440.0, 523.25, 587.33, 659.25];

pub const STEPS_PER_BAR: u32 = 8;
pub const BASE_BPM: f32 = 140.0;
pub const MAX_BPM: f32 = 200.0;
/// Steps emitted per `schedule` call at most
const MAX_STEPS_PER_SCHEDULE: usize = 16;

const BASS_PATTERNS: [[usize; 8]; 4] = [
    [0, 0, 2, 3, 0, 0, 4, 3],
    [0, 2, 3, 4, 3, 2, 0, 0],
    [3, 3, 0, 0, 2, 4, 3, 2],
    [0, 4, 3, 2, 0, 2, 3, 4],
];

const MELODY_PATTERNS: [[usize; 8]; 5] = [
    [0, 2, 4, 5, 7, 5, 4, 2],
    [7, 5, 4, 2, 0, 2, 4, 5],
    [0, 4, 2, 5, 7, 4, 5, 0],
    [4, 5, 7, 5, 4, 2, 0, 2],
    [2, 4, 5, 7, 5, 4, 2, 0],
];

const KICK_PATTERNS: [[bool; 8]; 3] = [
    [true, false, false, true, false, false, true, false],
    [true, false, true, false, false, true, false, false],
    [true, false, false, false, true, false, false, true],
];

const HAT_PATTERNS: [[bool; 8]; 3] = [
    [true, true, true, true, true, true, true, true],
    [true, false, true, true, true, false, true, true],
    [false, true, true, false, true, true, false, true],
];

/// A pitched square-wave note with a decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub volume: f32,
    /// Seconds
    pub duration: f64,
    pub detune_cents: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Voice {
    Tone(Tone),
    Kick,
    HiHat,
}

/// Voices that start together
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Audio clock time (seconds)
    pub at: f64,
    pub voices: Vec<Voice>,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    rng: Pcg32,
    bpm: f32,
    step_index: u32,
    bar_count: u32,
    bass: usize,
    melody: usize,
    kick: usize,
    hat: usize,
    next_step_at: Option<f64>,
}

impl Sequencer {
    pub fn new(seed: u64) -> Self {
        let mut seq = Self {
            rng: Pcg32::seed_from_u64(seed),
            bpm: BASE_BPM,
            step_index: 0,
            bar_count: 0,
            bass: 0,
            melody: 0,
            kick: 0,
            hat: 0,
            next_step_at: None,
        };
        seq.reroll_patterns();
        seq
    }

    /// Back to bar one at base tempo with fresh patterns
    pub fn restart(&mut self) {
        self.step_index = 0;
        self.bar_count = 0;
        self.bpm = BASE_BPM;
        self.next_step_at = None;
        self.reroll_patterns();
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        if bpm.is_finite() {
            self.bpm = bpm.clamp(BASE_BPM / 2.0, MAX_BPM);
        }
    }

    pub fn step_index(&self) -> u32 {
        self.step_index
    }

    /// Eighth-note length in seconds
    pub fn step_duration(&self) -> f64 {
        60.0 / f64::from(self.bpm) / 2.0
    }

    /// Produce the voices of the next step and advance
    pub fn next_step(&mut self) -> Vec<Voice> {
        let slot = (self.step_index % STEPS_PER_BAR) as usize;
        let step_dur = self.step_duration();
        let mut voices = Vec::with_capacity(4);

        voices.push(Voice::Tone(Tone {
            frequency: BASS_SCALE[BASS_PATTERNS[self.bass][slot]],
            volume: 0.06,
            duration: step_dur * 0.8,
            detune_cents: 0.0,
        }));

        if self.step_index % 2 == 0 || self.rng.random::<f32>() > 0.4 {
            voices.push(Voice::Tone(Tone {
                frequency: MELODY_SCALE[MELODY_PATTERNS[self.melody][slot]],
                    volume: 0.035,
                duration: step_dur * 0.5,
                detune_cents: self.rng.random_range(-5.0..5.0),
            }));
        }

        if KICK_PATTERNS[self.kick][slot] {
            voices.push(Voice::Kick);
        }
        if HAT_PATTERNS[self.hat][slot] {
            voices.push(Voice::HiHat);
        }

        self.step_index += 1;
        if self.step_index % STEPS_PER_BAR == 0 {
            self.bar_count += 1;
            let every = 2 + self.rng.random_range(0..3);
            if self.bar_count % every == 0 {
                self.reroll_patterns();
            }
        }

        voices
    }

    /// Steps starting before `now + lookahead` (audio clock seconds)
    pub fn schedule(&mut self, now: f64, lookahead: f64) -> Vec<Step> {
        let mut at = match self.next_step_at {
            // Fell far behind (tab hidden); pick up from now instead of bursting
            Some(at) if at + self.step_duration() >= now => at,
            _ => now,
        };

        let mut steps = Vec::new();
        while at < now + lookahead && steps.len() < MAX_STEPS_PER_SCHEDULE {
            let voices = self.next_step();
            steps.push(Step { at, voices });
            at += self.step_duration();
        }
        self.next_step_at = Some(at);
        steps
    }

    fn reroll_patterns(&mut self) {
        self.bass = self.rng.random_range(0..BASS_PATTERNS.len());
        self.melody = self.rng.random_range(0..MELODY_PATTERNS.len());
        self.kick = self.rng.random_range(0..KICK_PATTERNS.len());
        self.hat = self.rng.random_range(0..HAT_PATTERNS.len());
    }
}
