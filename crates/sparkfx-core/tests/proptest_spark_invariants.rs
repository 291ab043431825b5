//! Property-based invariant tests for the spark engine.
//!
//! 1. A press appends exactly `max(1, count)` sparks sharing one timestamp
//!    and origin.
//! 2. Every spark angle stays within half a ring slot of its slot.
//! 3. Easing curves hit 0 and 1 at the ends, stay in [0, 1] and never
//!    decrease.
//! 4. After a frame at `now`, no stored spark is at or past its lifetime.
//! 5. The store only shrinks across frames, never across presses.
//! 6. Re-measuring with the same rounded buffer size never reallocates, even
//!    when the device pixel ratio changed.
//! 7. Live segments never start before the origin or run past
//!    `radius * extra_scale + size` from it.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use proptest::prelude::*;
use sparkfx_core::surface::{buffer_extent, device_ratio};
use sparkfx_core::{
    ClickSpark, DrawCommand, Easing, Point, SparkConfig, Surface, SurfaceBounds, XorshiftJitter,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn easing_strategy() -> impl Strategy<Value = Easing> {
    prop_oneof![
        Just(Easing::Linear),
        Just(Easing::EaseIn),
        Just(Easing::EaseOut),
        Just(Easing::EaseInOut),
    ]
}

fn config_strategy() -> impl Strategy<Value = SparkConfig> {
    (
        -4i32..=24,
        1u64..=2_000,
        easing_strategy(),
        0.0f64..=60.0,
        0.0f64..=40.0,
        0.0f64..=3.0,
        any::<u64>(),
    )
        .prop_map(|(count, ms, easing, radius, size, extra, seed)| {
            SparkConfig::default()
                .with_count(count)
                .with_duration(Duration::from_millis(ms))
                .with_easing(easing)
                .with_radius(radius)
                .with_size(size)
                .with_extra_scale(extra)
                .with_seed(seed)
        })
}

#[derive(Debug, Clone)]
enum Step {
    Press { x: f64, y: f64, dt: u64 },
    Frame { dt: u64 },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-50.0f64..500.0, -50.0f64..500.0, 0u64..50)
            .prop_map(|(x, y, dt)| Step::Press { x, y, dt }),
        (0u64..120).prop_map(|dt| Step::Frame { dt }),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Spawn count, shared timestamp, bounded jitter
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn press_appends_exactly_count(
        config in config_strategy(),
        x in -100.0f64..1000.0,
        y in -100.0f64..1000.0,
        t in 0u64..100_000,
    ) {
        let expected = config.effective_count();
        let mut spark = ClickSpark::new(config).unwrap();
        let now = Duration::from_millis(t);
        let added = spark.pointer_down(x, y, SurfaceBounds::default(), now);

        prop_assert_eq!(added, expected);
        prop_assert_eq!(spark.sparks().len(), expected);
        for s in spark.sparks() {
            prop_assert_eq!(s.spawned_at(), now);
            prop_assert_eq!(s.origin(), Point::new(x, y));
        }
    }

    #[test]
    fn angles_within_half_slot(count in 1i32..=64, seed in any::<u64>()) {
        let config = SparkConfig::default().with_count(count);
        let mut spark = ClickSpark::with_jitter(config, XorshiftJitter::new(seed)).unwrap();
        spark.spawn_at(Point::ORIGIN, Duration::ZERO);

        let n = f64::from(count);
        let bound = PI / (2.0 * n) + 1e-12;
        for (i, s) in spark.sparks().iter().enumerate() {
            let slot = TAU * i as f64 / n;
            prop_assert!(
                (s.angle() - slot).abs() <= bound,
                "spark {} angle {} slot {} bound {}", i, s.angle(), slot, bound
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Easing shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn easing_in_unit_range_and_monotone(
        easing in easing_strategy(),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (f_lo, f_hi) = (easing.apply(lo), easing.apply(hi));
        prop_assert!((0.0..=1.0).contains(&f_lo));
        prop_assert!((0.0..=1.0).contains(&f_hi));
        prop_assert!(f_lo <= f_hi + 1e-12, "{} not monotone: f({})={} f({})={}", easing, lo, f_lo, hi, f_hi);
    }

    #[test]
    fn easing_endpoints(easing in easing_strategy()) {
        prop_assert_eq!(easing.apply(0.0), 0.0);
        prop_assert_eq!(easing.apply(1.0), 1.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4–5. Eviction and store monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn store_shrinks_only_at_frames(
        config in config_strategy(),
        steps in proptest::collection::vec(step_strategy(), 1..60),
    ) {
        let lifetime = config.effective_duration();
        let mut spark = ClickSpark::new(config).unwrap();
        let mut now = Duration::ZERO;
        let mut out = Vec::new();

        for step in steps {
            let before = spark.sparks().len();
            match step {
                Step::Press { x, y, dt } => {
                    now += Duration::from_millis(dt);
                    spark.pointer_down(x, y, SurfaceBounds::default(), now);
                    prop_assert!(spark.sparks().len() > before);
                }
                Step::Frame { dt } => {
                    now += Duration::from_millis(dt);
                    out.clear();
                    let outcome = spark.frame(now, &mut out);
                    prop_assert!(spark.sparks().len() <= before);
                    prop_assert_eq!(outcome.stats.drawn + outcome.stats.evicted, before);
                    prop_assert_eq!(outcome.stats.drawn, spark.sparks().len());
                    for s in spark.sparks() {
                        prop_assert!(now.saturating_sub(s.spawned_at()) < lifetime);
                    }
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Resize idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_buffer_size_never_reallocates(
        w in 0.0f64..4000.0,
        h in 0.0f64..4000.0,
        dpr in 0.5f64..4.0,
        dw in -0.49f64..0.49,
        dh in -0.49f64..0.49,
    ) {
        let mut surface = Surface::new();
        surface.resize(w, h, dpr);
        let generation = surface.generation();
        let size = surface.buffer_size();

        let ratio = device_ratio(dpr);
        let (w2, h2) = (w + dw / f64::from(ratio), h + dh / f64::from(ratio));
        let same = buffer_extent(w2, ratio) == size.0 && buffer_extent(h2, ratio) == size.1;
        let update = surface.resize(w2, h2, dpr);

        if same {
            prop_assert!(update.buffer.is_none());
            prop_assert_eq!(surface.generation(), generation);
            prop_assert_eq!(surface.buffer_size(), size);
        } else {
            prop_assert!(update.buffer.is_some());
            prop_assert_eq!(surface.generation(), generation + 1);
        }
    }

    #[test]
    fn ratio_change_onto_same_buffer_only_rescales(
        k in 1u32..500,
        r1 in 1u32..=4,
        r2 in 1u32..=4,
    ) {
        let mut surface = Surface::new();
        surface.resize(f64::from(k * r2), f64::from(k * r2), f64::from(r1));
        let generation = surface.generation();
        let size = surface.buffer_size();

        let update = surface.resize(f64::from(k * r1), f64::from(k * r1), f64::from(r2));

        prop_assert!(update.buffer.is_none());
        prop_assert_eq!(surface.buffer_size(), size);
        prop_assert_eq!(surface.generation(), generation);
        prop_assert_eq!(update.rescale, (r1 != r2).then_some(r2));
        prop_assert_eq!(surface.ratio(), r2);
    }

    #[test]
    fn buffer_is_never_empty(w in -10.0f64..10.0, h in -10.0f64..10.0, dpr in -1.0f64..5.0) {
        let mut surface = Surface::new();
        surface.resize(w, h, dpr);
        let (bw, bh) = surface.buffer_size();
        prop_assert!(bw >= 1 && bh >= 1);
        prop_assert!(surface.ratio() >= 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Segment extent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn segments_stay_within_reach(
        config in config_strategy(),
        age in 0u64..2_000,
    ) {
        let reach = config.radius * config.extra_scale + config.size;
        let mut spark = ClickSpark::new(config).unwrap();
        let origin = Point::new(100.0, 100.0);
        spark.spawn_at(origin, Duration::ZERO);

        let mut out = Vec::new();
        spark.frame(Duration::from_millis(age), &mut out);
        for cmd in &out[1..] {
            let DrawCommand::Line { from, to, .. } = cmd else {
                prop_assert!(false, "unexpected command {:?}", cmd);
                continue;
            };
            let d_from = (from.x - origin.x).hypot(from.y - origin.y);
            let d_to = (to.x - origin.x).hypot(to.y - origin.y);
            prop_assert!(d_from <= d_to + 1e-9);
            prop_assert!(d_to <= reach + 1e-9);
        }
    }
}
