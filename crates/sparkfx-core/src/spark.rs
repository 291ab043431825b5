#![forbid(unsafe_code)]

//! Sparks and the store that holds them.
//!
//! # Invariants
//!
//! 1. A [`Spark`] never changes after creation; its age is computed from the
//!    host time passed in, never stored.
//! 2. [`SparkStore::spawn_ring`] only appends and [`SparkStore::retain_live`]
//!    only removes. Between two frames the store can only grow.
//! 3. Every spark in one burst shares a single spawn timestamp.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use crate::geometry::Point;
use crate::jitter::JitterSource;

/// One directional mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    origin: Point,
    angle: f64,
    spawned_at: Duration,
}

impl Spark {
    #[inline]
    pub const fn new(origin: Point, angle: f64, spawned_at: Duration) -> Self {
        Self {
            origin,
            angle,
            spawned_at,
        }
    }

    #[inline]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Direction of travel in radians.
    #[inline]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub const fn spawned_at(&self) -> Duration {
        self.spawned_at
    }

    /// Age at `now`. A `now` before the spawn time counts as zero.
    #[inline]
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawned_at)
    }

    #[inline]
    pub fn is_expired(&self, now: Duration, lifetime: Duration) -> bool {
        self.elapsed(now) >= lifetime
    }
}

/// Growable, insertion-ordered collection of live sparks.
#[derive(Debug, Default, Clone)]
pub struct SparkStore {
    sparks: Vec<Spark>,
}

impl SparkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spark> + '_ {
        self.sparks.iter()
    }

    /// Append a ring of sparks around `origin`.
    ///
    /// Spark `i` points at `2π·i/count` plus a uniform offset in
    /// `[-π/(2·count), π/(2·count))`. Returns the number appended; a zero
    /// `count` appends nothing (see [`SparkConfig::effective_count`]).
    ///
    /// [`SparkConfig::effective_count`]: crate::config::SparkConfig::effective_count
    pub fn spawn_ring(
        &mut self,
        origin: Point,
        count: usize,
        now: Duration,
        jitter: &mut impl JitterSource,
    ) -> usize {
        if count == 0 {
            return 0;
        }
        let n = count as f64;
        let spread = PI / n;
        self.sparks.reserve(count);
        for i in 0..count {
            let offset = (jitter.next_unit() - 0.5) * spread;
            let angle = TAU * i as f64 / n + offset;
            self.sparks.push(Spark::new(origin, angle, now));
        }
        tracing::trace!(count, x = origin.x, y = origin.y, "spawned sparks");
        count
    }

    /// Drop every spark whose age at `now` has reached `lifetime`, keeping
    /// the survivors in order. Returns the number removed.
    pub fn retain_live(&mut self, now: Duration, lifetime: Duration) -> usize {
        let before = self.sparks.len();
        self.sparks.retain(|s| !s.is_expired(now, lifetime));
        let evicted = before - self.sparks.len();
        if evicted > 0 {
            tracing::trace!(evicted, remaining = self.sparks.len(), "evicted sparks");
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.sparks.clear();
    }
}

impl<'a> IntoIterator for &'a SparkStore {
    type Item = &'a Spark;
    type IntoIter = std::slice::Iter<'a, Spark>;

    fn into_iter(self) -> Self::IntoIter {
        self.sparks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::{NoJitter, XorshiftJitter};

    const MS_400: Duration = Duration::from_millis(400);

    #[test]
    fn ring_without_jitter_is_evenly_spaced() {
        let mut store = SparkStore::new();
        let added = store.spawn_ring(Point::new(1.0, 2.0), 4, Duration::ZERO, &mut NoJitter);
        assert_eq!(added, 4);
        let angles: Vec<f64> = store.iter().map(Spark::angle).collect();
        assert_eq!(angles, vec![0.0, TAU / 4.0, TAU / 2.0, TAU * 3.0 / 4.0]);
    }

    #[test]
    fn zero_count_appends_nothing() {
        let mut store = SparkStore::new();
        assert_eq!(store.spawn_ring(Point::ORIGIN, 0, Duration::ZERO, &mut NoJitter), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn jitter_is_bounded_by_half_a_slot() {
        let mut store = SparkStore::new();
        let mut rng = XorshiftJitter::new(3);
        store.spawn_ring(Point::ORIGIN, 6, Duration::ZERO, &mut rng);
        let half_slot = PI / 12.0;
        for (i, spark) in store.iter().enumerate() {
            let slot = TAU * i as f64 / 6.0;
            assert!((spark.angle() - slot).abs() <= half_slot + 1e-12);
        }
    }

    #[test]
    fn batch_shares_timestamp() {
        let mut store = SparkStore::new();
        let now = Duration::from_millis(123);
        store.spawn_ring(Point::ORIGIN, 5, now, &mut XorshiftJitter::default());
        assert!(store.iter().all(|s| s.spawned_at() == now));
    }

    #[test]
    fn spawn_appends_after_existing() {
        let mut store = SparkStore::new();
        store.spawn_ring(Point::new(1.0, 1.0), 2, Duration::ZERO, &mut NoJitter);
        store.spawn_ring(Point::new(9.0, 9.0), 2, Duration::ZERO, &mut NoJitter);
        let origins: Vec<Point> = store.iter().map(Spark::origin).collect();
        assert_eq!(origins[..2], [Point::new(1.0, 1.0); 2]);
        assert_eq!(origins[2..], [Point::new(9.0, 9.0); 2]);
    }

    #[test]
    fn expiry_is_inclusive_of_lifetime() {
        let spark = Spark::new(Point::ORIGIN, 0.0, Duration::from_millis(100));
        assert!(!spark.is_expired(Duration::from_millis(499), MS_400));
        assert!(spark.is_expired(Duration::from_millis(500), MS_400));
    }

    #[test]
    fn time_before_spawn_counts_as_zero_age() {
        let spark = Spark::new(Point::ORIGIN, 0.0, Duration::from_millis(100));
        assert_eq!(spark.elapsed(Duration::from_millis(50)), Duration::ZERO);
    }

    #[test]
    fn retain_live_keeps_order() {
        let mut store = SparkStore::new();
        store.spawn_ring(Point::new(0.0, 0.0), 2, Duration::ZERO, &mut NoJitter);
        store.spawn_ring(Point::new(5.0, 5.0), 2, Duration::from_millis(100), &mut NoJitter);
        store.spawn_ring(Point::new(7.0, 7.0), 1, Duration::from_millis(200), &mut NoJitter);

        let evicted = store.retain_live(Duration::from_millis(450), MS_400);
        assert_eq!(evicted, 2);
        let origins: Vec<Point> = store.iter().map(Spark::origin).collect();
        assert_eq!(
            origins,
            vec![Point::new(5.0, 5.0), Point::new(5.0, 5.0), Point::new(7.0, 7.0)]
        );
    }
}
