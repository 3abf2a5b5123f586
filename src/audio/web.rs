//! Audio backend using the Web Audio API
//!
//! Procedurally generated sound - no external files needed!

use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

use super::music::{Sequencer, Step, Tone, Voice};
use super::{AudioCommand, AudioOutput, HIGH_SCORE_RUN, HumParams, SoundEffect, tick_pitch_hz};
use crate::settings::Settings;

/// How far ahead music steps are scheduled on the audio clock (seconds)
const MUSIC_LOOKAHEAD: f64 = 0.12;

/// WebAudio synthesizer for one session
pub struct WebAudio {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    hum: Option<(OscillatorNode, GainNode)>,
    /// Last hum settings, reapplied when the volume changes
    hum_params: HumParams,
    music_bus: Option<GainNode>,
    sequencer: Sequencer,
}

impl WebAudio {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            hum: None,
            hum_params: HumParams::for_score(0),
            music_bus: None,
            sequencer: Sequencer::new(seed),
        }
    }

    /// Resume audio context (required after user gesture)
    fn ensure_running(ctx: &AudioContext) {
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
    }

    /// Create an oscillator with gain envelope routed into `dest`
    fn create_osc(
        ctx: &AudioContext,
        dest: &AudioNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(dest).ok()?;

        Some((osc, gain))
    }

    fn play(&self, ctx: &AudioContext, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        Self::ensure_running(ctx);

        match effect {
            SoundEffect::Eat => Self::play_eat(ctx, vol),
            SoundEffect::Tick { score } => Self::play_tick(ctx, vol, tick_pitch_hz(score)),
            SoundEffect::WallHit => Self::play_wall_hit(ctx, vol),
            SoundEffect::SelfHit => Self::play_self_hit(ctx, vol),
            SoundEffect::HighScore => Self::play_high_score(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Eat - short rising blip
    fn play_eat(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, &ctx.destination(), 600.0, OscillatorType::Square)
        else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.08)
            .ok();
        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Move tick - tiny click, pitch follows score
    fn play_tick(ctx: &AudioContext, vol: f32, pitch: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, &ctx.destination(), pitch, OscillatorType::Square)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.03, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.04)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Wall hit - low thud
    fn play_wall_hit(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) =
            Self::create_osc(ctx, &ctx.destination(), 150.0, OscillatorType::Sawtooth)
        else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.3)
            .ok();
        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.35)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Self hit - two detuned oscillators into one envelope
    fn play_self_hit(ctx: &AudioContext, vol: f32) {
        let Ok(gain) = ctx.create_gain() else { return };
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.4)
            .ok();

        for (freq, osc_type) in [(80.0, OscillatorType::Square), (90.0, OscillatorType::Sawtooth)] {
            let Ok(osc) = ctx.create_oscillator() else { continue };
            osc.set_type(osc_type);
            osc.frequency().set_value_at_time(freq, t).ok();
            if osc.connect_with_audio_node(&gain).is_ok() {
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// High score - pentatonic run up to a held octave C
    fn play_high_score(ctx: &AudioContext, vol: f32) {
        let mut t = ctx.current_time();
        for (freq, len) in HIGH_SCORE_RUN {
            if let Some((osc, gain)) =
                Self::create_osc(ctx, &ctx.destination(), freq, OscillatorType::Square)
            {
                gain.gain().set_value_at_time(vol * 0.12, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + len)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + len).ok();
            }
            t += len * 0.8;
        }
    }

    // === Engine hum ===

    fn start_hum(&mut self, ctx: &AudioContext, params: HumParams) {
        self.stop_hum();
        self.hum_params = params;
        if self.sfx_volume <= 0.0 {
            return;
        }
        Self::ensure_running(ctx);
        let Some((osc, gain)) = Self::create_osc(
            ctx,
            &ctx.destination(),
            params.frequency,
            OscillatorType::Triangle,
        ) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(params.gain * self.sfx_volume, t).ok();
        osc.start().ok();
        self.hum = Some((osc, gain));
    }

    fn update_hum(&mut self, ctx: &AudioContext, params: HumParams) {
        self.hum_params = params;
        let Some((osc, gain)) = &self.hum else { return };
        let t = ctx.current_time();
        osc.frequency()
            .set_target_at_time(params.frequency, t, 0.1)
            .ok();
        gain.gain()
            .set_target_at_time(params.gain * self.sfx_volume, t, 0.1)
            .ok();
    }

    fn set_volume(&mut self, ctx: &AudioContext, sfx: f32, music: f32) {
        self.sfx_volume = sfx;
        self.music_volume = music;
        let t = ctx.current_time();
        if let Some((_, gain)) = &self.hum {
            gain.gain()
                .set_target_at_time(self.hum_params.gain * sfx, t, 0.05)
                .ok();
        }
        if let Some(bus) = &self.music_bus {
            bus.gain().set_target_at_time(music, t, 0.05).ok();
        }
    }

    fn stop_hum(&mut self) {
        if let Some((osc, gain)) = self.hum.take() {
            osc.stop().ok();
            gain.disconnect().ok();
        }
    }

    // === Music ===

    fn start_music(&mut self, ctx: &AudioContext, bpm: f32) {
        self.stop_music();
        if self.music_volume <= 0.0 {
            return;
        }
        Self::ensure_running(ctx);
        let Ok(bus) = ctx.create_gain() else { return };
        if bus.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        bus.gain().set_value(self.music_volume);
        self.sequencer.restart();
        self.sequencer.set_bpm(bpm);
        self.music_bus = Some(bus);
    }

    fn stop_music(&mut self) {
        if let Some(bus) = self.music_bus.take() {
            bus.disconnect().ok();
        }
    }

    fn play_step(ctx: &AudioContext, bus: &GainNode, step: &Step) {
        for voice in &step.voices {
            match voice {
                Voice::Tone(tone) => Self::play_tone(ctx, bus, step.at, tone),
                Voice::Kick => Self::play_kick(ctx, bus, step.at),
                Voice::HiHat => Self::play_hat(ctx, bus, step.at),
            }
        }
    }

    fn play_tone(ctx: &AudioContext, bus: &GainNode, t: f64, tone: &Tone) {
        let Some((osc, gain)) = Self::create_osc(ctx, bus, tone.frequency, OscillatorType::Square)
        else {
            return;
        };
        if tone.detune_cents != 0.0 {
            osc.detune().set_value_at_time(tone.detune_cents, t).ok();
        }
        gain.gain().set_value_at_time(tone.volume, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + tone.duration)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration).ok();
    }

    fn play_kick(ctx: &AudioContext, bus: &GainNode, t: f64) {
        let Some((osc, gain)) = Self::create_osc(ctx, bus, 150.0, OscillatorType::Sine) else {
            return;
        };
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.12)
            .ok();
        gain.gain().set_value_at_time(0.18, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.15)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Hi-hat - very high square burst standing in for filtered noise
    fn play_hat(ctx: &AudioContext, bus: &GainNode, t: f64) {
        let Some((osc, gain)) = Self::create_osc(ctx, bus, 9000.0, OscillatorType::Square) else {
            return;
        };
        gain.gain().set_value_at_time(0.03, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.04)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.04).ok();
    }
}

impl AudioOutput for WebAudio {
    fn apply(&mut self, command: &AudioCommand) {
        let Some(ctx) = self.ctx.clone() else { return };
        match *command {
            AudioCommand::Play(effect) => self.play(&ctx, effect),
            AudioCommand::StartHum(params) => self.start_hum(&ctx, params),
            AudioCommand::UpdateHum(params) => self.update_hum(&ctx, params),
            AudioCommand::StopHum => self.stop_hum(),
            AudioCommand::StartMusic { bpm } => self.start_music(&ctx, bpm),
            AudioCommand::SetTempo { bpm } => self.sequencer.set_bpm(bpm),
            AudioCommand::StopMusic => self.stop_music(),
            AudioCommand::SetVolume { sfx, music } => self.set_volume(&ctx, sfx, music),
        }
    }

    fn update(&mut self) {
        let (Some(ctx), Some(bus)) = (&self.ctx, &self.music_bus) else {
            return;
        };
        for step in self.sequencer.schedule(ctx.current_time(), MUSIC_LOOKAHEAD) {
            Self::play_step(ctx, bus, &step);
        }
    }
}
