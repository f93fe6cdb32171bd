//! Short synthesized beeps marking boot, wake and deploy moments.

use std::fmt;

/// Which beep to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Boot,
    Wake,
    Deploy,
    Error,
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCue::Boot => write!(f, "boot"),
            AudioCue::Wake => write!(f, "wake"),
            AudioCue::Deploy => write!(f, "deploy"),
            AudioCue::Error => write!(f, "error"),
        }
    }
}

/// Oscillator envelope for one cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneProfile {
    pub start_hz: f32,
    /// Exponential ramp target reached after `ramp_secs`. Equal to `start_hz` for flat tones.
    pub end_hz: f32,
    pub ramp_secs: f32,
    pub gain: f32,
    /// Gain decays exponentially to this level over `decay_secs`.
    pub floor_gain: f32,
    pub decay_secs: f32,
    pub stop_secs: f32,
}

impl AudioCue {
    pub fn profile(self) -> ToneProfile {
        let (start_hz, end_hz, gain) = match self {
            AudioCue::Boot => (440.0, 880.0, 0.1),
            AudioCue::Deploy => (880.0, 1320.0, 0.1),
            AudioCue::Wake | AudioCue::Error => (660.0, 660.0, 0.05),
        };
        ToneProfile {
            start_hz,
            end_hz,
            ramp_secs: 0.1,
            gain,
            floor_gain: 0.001,
            decay_secs: 0.3,
            stop_secs: 0.4,
        }
    }
}

/// Plays cues. Fire-and-forget: implementations swallow their own failures.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: AudioCue);
}

/// Cue player for platforms without audio output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&self, cue: AudioCue) {
        tracing::trace!(cue = %cue, "Audio cue skipped (no output device)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_and_deploy_sweep_up() {
        let boot = AudioCue::Boot.profile();
        assert_eq!((boot.start_hz, boot.end_hz), (440.0, 880.0));
        let deploy = AudioCue::Deploy.profile();
        assert_eq!((deploy.start_hz, deploy.end_hz), (880.0, 1320.0));
        assert!((deploy.gain - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wake_and_error_are_flat_and_quiet() {
        for cue in [AudioCue::Wake, AudioCue::Error] {
            let p = cue.profile();
            assert_eq!(p.start_hz, 660.0);
            assert_eq!(p.end_hz, 660.0);
            assert!((p.gain - 0.05).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_envelope_stops_after_decay() {
        let p = AudioCue::Wake.profile();
        assert!(p.stop_secs > p.decay_secs);
    }

    #[test]
    fn test_cue_display() {
        assert_eq!(AudioCue::Deploy.to_string(), "deploy");
    }
}
