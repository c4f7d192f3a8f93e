//! Deterministic synthetic sessions for unit tests.
//!
//! Bots sweep long straight lines at a fast fixed cadence; humans wander
//! slowly with jitter, irregular timing and occasional pauses. The two
//! populations do not overlap on any feature.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::logic::session::{Label, MovementSample, Session};

pub fn bot_session(seed: u64) -> Session {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_mul(2).wrapping_add(1));
    let num_points: usize = rng.gen_range(30..60);
    let interval = rng.gen_range(0.01..0.015f64);
    let (x0, y0) = (rng.gen_range(100.0..200.0f64), rng.gen_range(100.0..200.0f64));
    let (x1, y1) = (x0 + rng.gen_range(400.0..600.0f64), y0 + rng.gen_range(0.0..200.0f64));

    let points = (0..num_points)
        .map(|i| {
            let progress = i as f64 / (num_points - 1) as f64;
            MovementSample::new(
                x0 + (x1 - x0) * progress,
                y0 + (y1 - y0) * progress,
                i as f64 * interval,
            )
        })
        .collect();

    Session::labeled(points, Label::Bot).with_id(format!("bot_{:03}", seed))
}

pub fn human_session(seed: u64) -> Session {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_mul(2));
    let num_points: usize = rng.gen_range(90..160);
    let (mut x, mut y) = (rng.gen_range(50.0..300.0f64), rng.gen_range(50.0..300.0f64));
    let (mut vx, mut vy) = (rng.gen_range(-2.0..2.0f64), rng.gen_range(-2.0..2.0f64));
    let mut t = 0.0f64;

    let points = (0..num_points)
        .map(|i| {
            if i > 0 {
                if rng.gen_bool(0.15) {
                    vx += rng.gen_range(-0.5..0.5f64);
                    vy += rng.gen_range(-0.5..0.5f64);
                }
                x = (x + vx + rng.gen_range(-0.5..0.5f64)).clamp(0.0, 800.0);
                y = (y + vy + rng.gen_range(-0.5..0.5f64)).clamp(0.0, 600.0);
                t += if rng.gen_bool(0.1) {
                    rng.gen_range(0.2..0.8f64)
                } else {
                    rng.gen_range(0.03..0.08f64)
                };
            }
            MovementSample::new(x, y, t)
        })
        .collect();

    Session::labeled(points, Label::Human).with_id(format!("human_{:03}", seed))
}

/// `per_class` humans followed by `per_class` bots
pub fn mixed_dataset(per_class: usize) -> Vec<Session> {
    let humans = (0..per_class as u64).map(human_session);
    let bots = (0..per_class as u64).map(bot_session);
    humans.chain(bots).collect()
}

/// Same as `mixed_dataset` with seeds offset, for held-out evaluation
pub fn holdout_dataset(per_class: usize) -> Vec<Session> {
    let humans = (1000..1000 + per_class as u64).map(human_session);
    let bots = (1000..1000 + per_class as u64).map(bot_session);
    humans.chain(bots).collect()
}
