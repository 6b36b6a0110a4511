//! Damped spring driving smooth scroll offsets
//!
//! One `Spring` tracks one axis. Retargeting keeps the current velocity, so a
//! new smooth-scroll request mid-flight bends the motion instead of restarting.

/// Distance from the target below which a spring may come to rest, in pixels
const REST_DISTANCE: f32 = 0.5;
/// Speed below which a spring may come to rest, in pixels per second
const REST_SPEED: f32 = 5.0;

/// Physical parameters of a spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Critically damped, settles a page-width jump in about half a second
    pub fn scroll() -> Self {
        let mut config = Self::new(200.0, 0.0, 1.0);
        config.damping = config.critical_damping();
        config
    }

    /// Fast with a slight overshoot
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Whether the spring overshoots and oscillates around its target
    pub fn is_underdamped(&self) -> bool {
        self.critical_damping() - self.damping > 0.01
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::scroll()
    }
}

/// Position and velocity at one instant
#[derive(Clone, Copy, Debug)]
struct Phase {
    position: f32,
    velocity: f32,
}

impl Phase {
    /// `self + rate * dt`
    fn nudged(self, rate: Phase, dt: f32) -> Phase {
        Phase {
            position: self.position + rate.position * dt,
            velocity: self.velocity + rate.velocity * dt,
        }
    }
}

/// Scalar spring animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    phase: Phase,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            phase: Phase {
                position: initial,
                velocity: 0.0,
            },
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.phase.position
    }

    pub fn velocity(&self) -> f32 {
        self.phase.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.phase.position - self.target).abs() < REST_DISTANCE
            && self.phase.velocity.abs() < REST_SPEED
    }

    /// Advance by `dt` seconds with a fourth-order Runge-Kutta step
    ///
    /// Lands exactly on the target with zero velocity once at rest.
    pub fn step(&mut self, dt: f32) {
        if !self.is_settled() {
            let start = self.phase;
            let a = self.rate(start);
            let b = self.rate(start.nudged(a, dt / 2.0));
            let c = self.rate(start.nudged(b, dt / 2.0));
            let d = self.rate(start.nudged(c, dt));

            let blend = |a: f32, b: f32, c: f32, d: f32| (a + 2.0 * (b + c) + d) / 6.0;
            let slope = Phase {
                position: blend(a.position, b.position, c.position, d.position),
                velocity: blend(a.velocity, b.velocity, c.velocity, d.velocity),
            };
            self.phase = start.nudged(slope, dt);
        }

        if self.is_settled() {
            self.phase = Phase {
                position: self.target,
                velocity: 0.0,
            };
        }
    }

    /// Time derivative of a phase under this spring's force
    fn rate(&self, phase: Phase) -> Phase {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        let force = stiffness * (self.target - phase.position) - damping * phase.velocity;
        Phase {
            position: phase.velocity,
            velocity: force / mass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_preset_is_critically_damped() {
        let config = SpringConfig::scroll();
        assert!(!config.is_underdamped());
        assert!(SpringConfig::stiff().is_underdamped());
    }

    #[test]
    fn test_spring_settles_on_target() {
        let mut spring = Spring::new(SpringConfig::scroll(), 0.0);
        spring.set_target(600.0);

        let mut steps = 0;
        while !spring.is_settled() && steps < 1000 {
            spring.step(1.0 / 60.0);
            steps += 1;
        }

        assert!(steps < 120, "took {steps} frames");
        assert_eq!(spring.value(), 600.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::scroll(), 0.0);
        spring.set_target(300.0);
        for _ in 0..5 {
            spring.step(1.0 / 60.0);
        }
        let velocity = spring.velocity();

        spring.set_target(900.0);
        assert_eq!(spring.velocity(), velocity);
        assert!(spring.value() > 0.0 && spring.value() < 300.0);
    }

    #[test]
    fn test_settled_spring_stays_put() {
        let mut spring = Spring::new(SpringConfig::stiff(), 42.0);
        spring.step(1.0 / 60.0);
        assert_eq!(spring.value(), 42.0);
        assert_eq!(spring.velocity(), 0.0);
    }
}
