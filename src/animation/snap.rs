use super::spring::{DampedSpring, SpringConfig};

/// Result of advancing a [`SnapAnimation`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapStatus {
    /// No animation in flight.
    Idle,
    /// Still moving toward the target.
    Running,
    /// Came to rest on this frame. Reported exactly once per settle.
    Settled,
}

/// Spring plus a running flag, the pager's animation clock.
///
/// The clock is started when a gesture is released or a page is requested
/// programmatically, stopped when a new drag grabs the pager, and stops by
/// itself when the spring settles.
#[derive(Debug, Clone)]
pub struct SnapAnimation {
    spring: DampedSpring,
    running: bool,
}

impl SnapAnimation {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            spring: DampedSpring::new(config),
            running: false,
        }
    }

    /// Start (or restart) from `from` with zero velocity toward `to`.
    pub fn start(&mut self, from: f32, to: f32) {
        self.spring.position = from;
        self.spring.velocity = 0.0;
        self.spring.target = to;
        self.running = true;
    }

    /// Point a running animation at a new target, keeping its velocity.
    /// A stopped clock is started from `from`.
    pub fn retarget(&mut self, from: f32, to: f32) {
        if self.running {
            self.spring.position = from;
            self.spring.target = to;
        } else {
            self.start(from, to);
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.spring.velocity = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn position(&self) -> f32 {
        self.spring.position
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.spring.config = config;
    }

    pub fn step(&mut self, dt: f32) -> SnapStatus {
        if !self.running {
            return SnapStatus::Idle;
        }
        if self.spring.tick(dt) {
            self.running = false;
            SnapStatus::Settled
        } else {
            SnapStatus::Running
        }
    }
}
