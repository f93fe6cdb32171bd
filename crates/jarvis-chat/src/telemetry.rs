//! Offline system gauges shown beside the conversation.
//!
//! Nothing here samples the host: the values drift by a bounded random walk.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const VOICE_GAUGE_ACTIVE: f64 = 95.0;
pub const VOICE_GAUGE_IDLE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub cpu: f64,
    pub memory: f64,
    pub network: f64,
    pub ai_load: f64,
}

impl Default for SystemStats {
    fn default() -> Self {
        Self {
            cpu: 5.0,
            memory: 28.0,
            network: 0.0,
            ai_load: 1.0,
        }
    }
}

impl SystemStats {
    /// Advance every gauge by one random step.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cpu = (self.cpu + jitter(rng, 4.0)).clamp(5.0, 100.0);
        self.memory = (self.memory + jitter(rng, 1.0)).clamp(20.0, 100.0);
        self.network = (self.network + jitter(rng, 0.1)).max(0.0);
        self.ai_load = (self.ai_load + jitter(rng, 2.0)).clamp(1.0, 100.0);
    }

    /// Voice-intent gauge reading.
    pub fn voice_gauge(listening: bool, speaking: bool) -> f64 {
        if listening || speaking {
            VOICE_GAUGE_ACTIVE
        } else {
            VOICE_GAUGE_IDLE
        }
    }
}

// Uniform in [-span/2, span/2).
fn jitter<R: Rng + ?Sized>(rng: &mut R, span: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * span
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initial_readings() {
        let stats = SystemStats::default();
        assert_eq!(stats.cpu, 5.0);
        assert_eq!(stats.memory, 28.0);
        assert_eq!(stats.network, 0.0);
        assert_eq!(stats.ai_load, 1.0);
    }

    #[test]
    fn test_random_walk_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut stats = SystemStats::default();
        for _ in 0..5_000 {
            let before = stats;
            stats.tick(&mut rng);
            assert!((5.0..=100.0).contains(&stats.cpu));
            assert!((20.0..=100.0).contains(&stats.memory));
            assert!(stats.network >= 0.0);
            assert!((1.0..=100.0).contains(&stats.ai_load));

            assert!((stats.cpu - before.cpu).abs() <= 2.0 + 1e-9);
            assert!((stats.memory - before.memory).abs() <= 0.5 + 1e-9);
            assert!((stats.ai_load - before.ai_load).abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_voice_gauge() {
        assert_eq!(SystemStats::voice_gauge(false, false), VOICE_GAUGE_IDLE);
        assert_eq!(SystemStats::voice_gauge(true, false), VOICE_GAUGE_ACTIVE);
        assert_eq!(SystemStats::voice_gauge(false, true), VOICE_GAUGE_ACTIVE);
    }
}
