use serde::{Deserialize, Serialize};

/// Largest step the integrator will take. Longer frames (app resumed from
/// background, debugger pause) are integrated as if only this much time passed.
pub const MAX_STEP_SECONDS: f32 = 0.064;

/// Tuning for [`DampedSpring`]. Every field can be overridden on its own from
/// the `[spring]` config table; missing fields fall back to the snapping preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Stop as soon as the trajectory crosses the target instead of oscillating.
    pub overshoot_clamping: bool,
    /// Below this speed (units per second) the spring may come to rest.
    pub rest_speed_threshold: f32,
    /// Below this distance from the target the spring may come to rest.
    pub rest_displacement_threshold: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 1000.0,
            damping: 500.0,
            mass: 3.0,
            overshoot_clamping: false,
            rest_speed_threshold: 0.01,
            rest_displacement_threshold: 0.01,
        }
    }
}

impl SpringConfig {
    /// Damping ratio. Below 1 the spring oscillates around its target.
    pub fn damping_ratio(&self) -> f32 {
        let denom = 2.0 * (self.stiffness * self.mass).sqrt();
        if denom <= f32::EPSILON {
            return 1.0;
        }
        self.damping / denom
    }

    /// Undamped angular frequency.
    pub fn natural_frequency(&self) -> f32 {
        if self.mass <= f32::EPSILON {
            return 0.0;
        }
        (self.stiffness / self.mass).sqrt()
    }
}

/// Damped harmonic oscillator integrated with its analytic solution.
/// O(1) per tick and stable for any `dt`.
#[derive(Debug, Clone)]
pub struct DampedSpring {
    pub position: f32,
    pub velocity: f32,
    pub target: f32,
    pub config: SpringConfig,
}

impl DampedSpring {
    pub fn new(config: SpringConfig) -> Self {
        Self { position: 0.0, velocity: 0.0, target: 0.0, config }
    }

    pub fn with_position(config: SpringConfig, position: f32) -> Self {
        Self { position, velocity: 0.0, target: position, config }
    }

    /// Advance by `dt` seconds. Returns true once the spring has come to rest,
    /// in which case position is pinned to the target and velocity zeroed.
    pub fn tick(&mut self, dt: f32) -> bool {
        let t = dt.clamp(0.0, MAX_STEP_SECONDS);
        let start = self.position;

        let x0 = self.target - self.position;
        let v0 = -self.velocity;
        let zeta = self.config.damping_ratio();
        let omega0 = self.config.natural_frequency();

        if zeta < 1.0 {
            let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega0 * t).exp();
            let (sin, cos) = (omega1 * t).sin_cos();
            let frag = envelope * (sin * ((v0 + zeta * omega0 * x0) / omega1) + x0 * cos);

            self.position = self.target - frag;
            self.velocity = zeta * omega0 * frag
                - envelope * (cos * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin);
        } else {
            // Critically damped form; also used for over-damped configs.
            // x(t) = e^(-wt) * (x0 + (v0 + w*x0)*t)
            let x = self.position - self.target;
            let v = self.velocity;
            let w = omega0;
            let exp = (-w * t).exp();
            let c2 = v + w * x;

            self.position = self.target + exp * (x + c2 * t);
            self.velocity = exp * (v - w * c2 * t);
        }

        let stiff = self.config.stiffness != 0.0;
        let overshooting = self.config.overshoot_clamping
            && stiff
            && if start < self.target {
                self.position > self.target
            } else {
                self.position < self.target
            };
        let slow = self.velocity.abs() < self.config.rest_speed_threshold;
        let near = !stiff
            || (self.target - self.position).abs() < self.config.rest_displacement_threshold;

        if overshooting || (slow && near) {
            if stiff {
                self.snap_to_target();
            }
            return true;
        }
        false
    }

    pub fn snap_to_target(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
    }
}
