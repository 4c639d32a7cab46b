//! The bird: arc physics, tilt and wing animation.

use crate::core::{
    ANIMATION_TIME, APEX_WINDOW, BIRD_START_X, BIRD_START_Y, GRAVITY_TERM, JUMP_VELOCITY,
    MAX_ROTATION, MIN_ROTATION, NOSE_DIVE_TILT, ROTATION_VELOCITY, TERMINAL_DISPLACEMENT,
    UPWARD_BOOST,
};

/// Vertical displacement after `ticks` ticks since the last jump.
///
/// `v·t + 1.5·t²`, capped at the terminal displacement, with an extra
/// upward push while the result is negative.
pub fn displacement(velocity: f64, ticks: u32) -> f64 {
    let t = ticks as f64;
    let mut d = velocity * t + GRAVITY_TERM * t * t;
    if d >= TERMINAL_DISPLACEMENT {
        d = TERMINAL_DISPLACEMENT;
    }
    if d < 0.0 {
        d -= UPWARD_BOOST;
    }
    d
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: i32,
    pub y: f64,
    /// Degrees, positive is nose up. Always within [-90, 25].
    pub tilt: f64,
    pub tick_count: u32,
    pub velocity: f64,
    /// Height the last jump started from.
    pub height: f64,
    pub image_count: u32,
    pub frame: usize,
}

impl Bird {
    pub fn new(x: i32, y: f64) -> Self {
        Self {
            x,
            y,
            tilt: 0.0,
            tick_count: 0,
            velocity: 0.0,
            height: y,
            image_count: 0,
            frame: 0,
        }
    }

    pub fn spawn() -> Self {
        Self::new(BIRD_START_X, BIRD_START_Y)
    }

    pub fn jump(&mut self) {
        self.velocity = JUMP_VELOCITY;
        self.tick_count = 0;
        self.height = self.y;
    }

    /// One physics tick: move along the jump arc and update the tilt.
    pub fn advance(&mut self) {
        self.tick_count += 1;

        let d = displacement(self.velocity, self.tick_count);
        self.y += d;

        if d < 0.0 || self.y < self.height + APEX_WINDOW {
            if self.tilt < MAX_ROTATION {
                self.tilt = MAX_ROTATION;
            }
        } else {
            self.tilt = (self.tilt - ROTATION_VELOCITY).max(MIN_ROTATION);
        }
    }

    /// One animation step, called once per rendered frame.
    ///
    /// Wings cycle up, level, down, level. A diving bird holds its wings
    /// level.
    pub fn animate(&mut self) {
        self.image_count += 1;

        let n = self.image_count;
        if n < ANIMATION_TIME {
            self.frame = 0;
        } else if n < ANIMATION_TIME * 2 {
            self.frame = 1;
        } else if n < ANIMATION_TIME * 3 {
            self.frame = 2;
        } else if n < ANIMATION_TIME * 4 {
            self.frame = 1;
        } else if n == ANIMATION_TIME * 4 + 1 {
            self.frame = 0;
            self.image_count = 0;
        }

        if self.tilt <= NOSE_DIVE_TILT {
            self.frame = 1;
            self.image_count = ANIMATION_TIME * 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displacement_formula() {
        assert_eq!(displacement(0.0, 0), 0.0);
        assert_eq!(displacement(0.0, 1), 1.5);
        assert_eq!(displacement(0.0, 2), 6.0);
        // Capped at terminal displacement
        assert_eq!(displacement(0.0, 4), 16.0);
        assert_eq!(displacement(5.0, 10), 16.0);
        // Negative displacement gets the extra -2
        assert_eq!(displacement(-10.5, 1), -11.0);
        assert_eq!(displacement(-10.5, 2), -17.0);
    }

    #[test]
    fn test_jump_then_move() {
        let mut bird = Bird::new(230, 350.0);
        bird.jump();
        assert_eq!(bird.velocity, -10.5);
        assert_eq!(bird.tick_count, 0);

        bird.advance();
        assert_eq!(bird.tick_count, 1);
        assert_eq!(bird.y, 339.0);
        assert_eq!(bird.tilt, MAX_ROTATION);
    }

    #[test]
    fn test_falling_bird_noses_down() {
        let mut bird = Bird::new(230, 350.0);
        bird.tilt = 25.0;
        bird.height = 0.0; // well above apex window
        bird.y = 100.0;
        bird.advance();
        assert_eq!(bird.tilt, 5.0);
        bird.advance();
        assert_eq!(bird.tilt, -15.0);
    }

    #[test]
    fn test_tilt_clamped_after_long_fall() {
        let mut bird = Bird::new(230, 350.0);
        for _ in 0..200 {
            bird.advance();
            assert!(bird.tilt >= -90.0 && bird.tilt <= 25.0);
        }
        assert_eq!(bird.tilt, -90.0);
    }

    #[test]
    fn test_tilt_stays_at_max_while_near_apex() {
        let mut bird = Bird::new(230, 350.0);
        bird.jump();
        for _ in 0..10 {
            bird.advance();
            if bird.y < bird.height + APEX_WINDOW {
                assert_eq!(bird.tilt, MAX_ROTATION);
            }
        }
    }

    #[test]
    fn test_animation_cycle() {
        let mut bird = Bird::spawn();
        let mut frames = Vec::new();
        for _ in 0..21 {
            bird.animate();
            frames.push(bird.frame);
        }
        assert_eq!(&frames[0..4], &[0, 0, 0, 0]);
        assert_eq!(&frames[4..9], &[1, 1, 1, 1, 1]);
        assert_eq!(&frames[9..14], &[2, 2, 2, 2, 2]);
        assert_eq!(&frames[14..19], &[1, 1, 1, 1, 1]);
        // Counter wraps back to frame 0
        assert_eq!(frames[20], 0);
        assert_eq!(bird.image_count, 0);
    }

    #[test]
    fn test_nose_dive_holds_level_wings() {
        let mut bird = Bird::spawn();
        bird.tilt = -80.0;
        bird.animate();
        assert_eq!(bird.frame, 1);
        assert_eq!(bird.image_count, ANIMATION_TIME * 2);
    }
}
