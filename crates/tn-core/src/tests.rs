//! Unit tests for tn-core.

// ── Position ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod position {
    use crate::Position;

    #[test]
    fn distances() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
        assert_eq!(a.tile_distance(b), 5);
        assert_eq!(a.chebyshev(b), 4);
    }

    #[test]
    fn tile_distance_truncates() {
        // sqrt(2) = 1.41… → 1
        assert_eq!(Position::new(0, 0).tile_distance(Position::new(1, 1)), 1);
    }

    #[test]
    fn adjacency_excludes_self() {
        let p = Position::new(5, 5);
        assert!(!p.is_adjacent(p));
        assert!(p.is_adjacent(Position::new(6, 6)));
        assert!(!p.is_adjacent(Position::new(7, 5)));
    }

    #[test]
    fn arithmetic() {
        let p = Position::new(2, 3) + Position::new(10, 20);
        assert_eq!(p, Position::new(12, 23));
        assert_eq!(p - Position::new(2, 3), Position::new(10, 20));
        assert_eq!(p.offset(-1, 1), Position::new(11, 24));
    }

    #[test]
    fn beyond_extends_ray() {
        let p = Position::beyond(Position::new(0, 0), Position::new(10, 0), 5);
        assert_eq!(p, Position::new(15, 0));
        // Coincident points fall back to +x.
        let q = Position::beyond(Position::new(3, 3), Position::new(3, 3), 2);
        assert_eq!(q, Position::new(5, 3));
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clock {
    use std::time::Duration;

    use crate::{Clock, ManualClock};

    #[test]
    fn manual_clock_sleep_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.sleep(Duration::from_millis(250));
        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(300));
    }

    #[test]
    fn since_saturates() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.since(Duration::from_secs(5)), Duration::ZERO);
        assert_eq!(clock.since(Duration::from_millis(400)), Duration::from_millis(600));
    }

    #[test]
    fn clock_by_reference() {
        fn elapsed<C: Clock>(c: C) -> Duration {
            c.sleep(Duration::from_millis(10));
            c.now()
        }
        let clock = ManualClock::new();
        assert_eq!(elapsed(&clock), Duration::from_millis(10));
    }
}

// ── NavRng ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod nav_rng {
    use std::time::Duration;

    use crate::{AgentId, NavRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = NavRng::new(42, AgentId(3));
        let mut b = NavRng::new(42, AgentId(3));
        for _ in 0..20 {
            assert_eq!(a.gen_range(0..1_000u32), b.gen_range(0..1_000u32));
        }
    }

    #[test]
    fn agents_get_distinct_streams() {
        let mut a = NavRng::new(42, AgentId(0));
        let mut b = NavRng::new(42, AgentId(1));
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn gamma_duration_mean_is_close() {
        let mut rng = NavRng::from_seed(7);
        let n = 4_000;
        let total: Duration = (0..n).map(|_| rng.gamma_duration(325.0, 3.0)).sum();
        let mean = total.as_secs_f64() * 1_000.0 / n as f64;
        assert!((mean - 325.0).abs() < 20.0, "mean was {mean}");
    }

    #[test]
    fn gamma_duration_degenerate_falls_back_to_mean() {
        let mut rng = NavRng::from_seed(7);
        assert_eq!(rng.gamma_duration(200.0, 0.0), Duration::from_millis(200));
    }

    #[test]
    fn nudge_is_never_zero() {
        let mut rng = NavRng::from_seed(1);
        for _ in 0..200 {
            let (dx, dy) = rng.nudge(1);
            assert!(dx != 0 || dy != 0);
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
        }
        assert_eq!(rng.nudge(0), (0, 0));
    }
}

// ── NavConfig ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::{CoreError, Latency, NavConfig};

    #[test]
    fn defaults_are_valid() {
        NavConfig::default().validate().unwrap();
    }

    #[test]
    fn block_threshold_must_be_below_stuck() {
        let cfg = NavConfig {
            block_threshold: Duration::from_secs(3),
            ..NavConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn zero_door_attempts_rejected() {
        let cfg = NavConfig { door_attempts: 0, ..NavConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn latency_sanitized() {
        assert_eq!(Latency(3).sanitized(), Latency::FALLBACK);
        assert_eq!(Latency(80).sanitized(), Latency(80));
    }

    #[test]
    fn scaled_delay_is_capped() {
        let d = Latency(100).scaled_delay(Duration::from_millis(100), 1.0);
        assert_eq!(d, Duration::from_millis(200));
        let capped = Latency(4_000).scaled_delay(Duration::from_millis(2_000), 4.0);
        assert_eq!(capped, Duration::from_millis(5_000));
    }

    #[test]
    fn cadence_mean_includes_half_latency() {
        let cfg = NavConfig::default();
        assert!((cfg.cadence_mean_ms(Latency(100), false) - 375.0).abs() < 1e-9);
        assert!((cfg.cadence_mean_ms(Latency(100), true) - 450.0).abs() < 1e-9);
    }

    #[test]
    fn step_budget_from_window() {
        let cfg = NavConfig::default();
        assert_eq!(cfg.step_budget(Duration::from_millis(400)), 10);
        assert_eq!(cfg.step_budget(Duration::ZERO), 0);
    }
}
