use crate::foundation::core::{Canvas, Point, Vec2};

/// Anything that can report the current scroll position.
pub trait ScrollSource {
    /// Most recent scroll fraction; nominally in `[0, 1]`.
    fn scroll_fraction(&self) -> f64;
}

/// A scroll source pinned to one value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedScroll(pub f64);

impl ScrollSource for FixedScroll {
    fn scroll_fraction(&self) -> f64 {
        self.0
    }
}

impl<F: Fn() -> f64> ScrollSource for F {
    fn scroll_fraction(&self) -> f64 {
        self()
    }
}

/// `steps + 1` evenly spaced fractions from 0 to 1 inclusive.
pub fn sweep(steps: u32) -> impl Iterator<Item = f64> {
    let steps = steps.max(1);
    (0..=steps).map(move |i| f64::from(i) / f64::from(steps))
}

pub const CURSOR_FOLLOW: f64 = 0.15;
/// Camera shift in scene units at the viewport edge.
pub const CAMERA_PARALLAX: f64 = 0.5;

/// Trailing cursor: each frame moves a fixed fraction of the way to the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerFollower {
    target: Point,
    current: Point,
    follow: f64,
}

impl Default for PointerFollower {
    fn default() -> Self {
        Self::new(CURSOR_FOLLOW)
    }
}

impl PointerFollower {
    pub fn new(follow: f64) -> Self {
        Self {
            target: Point::ORIGIN,
            current: Point::ORIGIN,
            follow: follow.clamp(0.0, 1.0),
        }
    }

    /// Record the latest pointer position in pixels.
    pub fn set_target(&mut self, p: Point) {
        self.target = p;
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn current(&self) -> Point {
        self.current
    }

    /// Advance one frame and return the trailing position.
    pub fn step(&mut self) -> Point {
        self.current = self.current.lerp(self.target, self.follow);
        self.current
    }

    /// Pointer mapped to `[-1, 1]` on both axes, y up.
    pub fn normalized(&self, canvas: Canvas) -> Vec2 {
        let c = canvas.center();
        let x = (self.target.x - c.x) / c.x;
        let y = (c.y - self.target.y) / c.y;
        Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
    }

    /// Camera offset that leans toward the pointer.
    pub fn camera_offset(&self, canvas: Canvas) -> Vec2 {
        self.normalized(canvas) * CAMERA_PARALLAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_and_closure_sources() {
        assert_eq!(FixedScroll(0.3).scroll_fraction(), 0.3);
        let f = || 0.75;
        assert_eq!(f.scroll_fraction(), 0.75);
    }

    #[test]
    fn sweep_covers_both_ends() {
        let v: Vec<f64> = sweep(4).collect();
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(sweep(0).count(), 2);
    }

    #[test]
    fn follower_trails_and_converges() {
        let mut p = PointerFollower::default();
        p.set_target(Point::new(100.0, 40.0));
        let first = p.step();
        assert!((first.x - 15.0).abs() < 1e-9);
        assert!((first.y - 6.0).abs() < 1e-9);
        for _ in 0..200 {
            p.step();
        }
        assert!((p.current() - p.target()).hypot() < 1e-6);
    }

    #[test]
    fn camera_offset_follows_pointer_quadrant() {
        let canvas = Canvas::new(200, 100).unwrap();
        let mut p = PointerFollower::default();
        p.set_target(Point::new(200.0, 0.0));
        assert_eq!(p.normalized(canvas), Vec2::new(1.0, 1.0));
        assert_eq!(p.camera_offset(canvas), Vec2::new(0.5, 0.5));

        p.set_target(Point::new(100.0, 50.0));
        assert_eq!(p.camera_offset(canvas), Vec2::ZERO);

        p.set_target(Point::new(-500.0, 900.0));
        assert_eq!(p.normalized(canvas), Vec2::new(-1.0, -1.0));
    }
}
