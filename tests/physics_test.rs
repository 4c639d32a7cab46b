//! Integration test: bird physics, ground scrolling and pipe clearance
//!
//! Drives the game objects tick by tick the way both game loops do.

use flappy_neat::core::{GROUND_Y, PIPE_SPAWN_X};
use flappy_neat::game::{out_of_bounds, pipe_collision, Base, Bird, Pipe, SpriteSet};

#[test]
fn test_jump_arc_rises_then_falls() {
    let mut bird = Bird::spawn();
    bird.jump();

    let mut ys = Vec::new();
    for _ in 0..8 {
        bird.advance();
        ys.push(bird.y);
    }
    assert_eq!(ys, vec![339.0, 322.0, 302.0, 282.0, 265.0, 254.0, 254.0, 266.0]);
    // Still above the jump origin, so the nose stays up
    assert_eq!(bird.tilt, 25.0);
}

#[test]
fn test_tilt_drops_once_well_below_jump_origin() {
    let mut bird = Bird::spawn();
    bird.jump();

    let mut last_tilt = bird.tilt;
    for _ in 0..60 {
        bird.advance();
        assert!(bird.tilt <= last_tilt || bird.tilt == 25.0);
        assert!((-90.0..=25.0).contains(&bird.tilt));
        if bird.y >= 350.0 + 50.0 {
            assert!(bird.tilt < 25.0);
        }
        last_tilt = bird.tilt;
    }
    assert_eq!(bird.tilt, -90.0);
}

#[test]
fn test_free_fall_reaches_terminal_displacement() {
    let mut bird = Bird::spawn();
    let mut ys = Vec::new();
    for _ in 0..6 {
        bird.advance();
        ys.push(bird.y);
    }
    assert_eq!(ys, vec![351.5, 357.5, 371.0, 387.0, 403.0, 419.0]);
}

#[test]
fn test_falling_bird_leaves_through_the_ground() {
    let sprites = SpriteSet::builtin();
    let mut bird = Bird::spawn();
    let mut ticks = 0;
    while !out_of_bounds(&bird, &sprites) {
        bird.advance();
        ticks += 1;
    }
    assert_eq!(ticks, 23);
    assert!(bird.y + sprites.bird_height() as f64 >= GROUND_Y as f64);
}

#[test]
fn test_wing_cycle() {
    let mut bird = Bird::spawn();
    let frames: Vec<usize> = (0..21)
        .map(|_| {
            bird.animate();
            bird.frame
        })
        .collect();
    assert_eq!(
        frames,
        vec![0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 0]
    );
    assert_eq!(bird.image_count, 0);
}

#[test]
fn test_diving_bird_holds_wings_level() {
    let mut bird = Bird::spawn();
    bird.tilt = -85.0;
    for _ in 0..30 {
        bird.animate();
        assert_eq!(bird.frame, 1);
    }
}

#[test]
fn test_base_segments_wrap() {
    let sprites = SpriteSet::builtin();
    let mut base = Base::new(GROUND_Y, sprites.base_width());
    assert_eq!((base.x1, base.x2), (0, 672));

    for _ in 0..134 {
        base.advance();
    }
    assert_eq!((base.x1, base.x2), (-670, 2));

    base.advance();
    assert_eq!((base.x1, base.x2), (669, -3));
}

#[test]
fn test_level_bird_clears_a_scrolling_pipe() {
    let sprites = SpriteSet::builtin();
    let mut bird = Bird::new(230, 380.0);
    bird.tilt = 0.0;
    let mut pipe = Pipe::with_height(PIPE_SPAWN_X, 300, sprites.pipe_height());

    while !pipe.is_off_screen(sprites.pipe_width()) {
        assert!(!pipe_collision(&bird, &pipe, &sprites), "x={}", pipe.x);
        pipe.advance();
    }
}

#[test]
fn test_low_bird_hits_a_scrolling_pipe() {
    let sprites = SpriteSet::builtin();
    let bird = Bird::new(230, 380.0);
    // Gap 100..300, bird at 380 is below it
    let mut pipe = Pipe::with_height(PIPE_SPAWN_X, 100, sprites.pipe_height());

    let mut hit_at = None;
    while !pipe.is_off_screen(sprites.pipe_width()) {
        if pipe_collision(&bird, &pipe, &sprites) {
            hit_at = Some(pipe.x);
            break;
        }
        pipe.advance();
    }
    let x = hit_at.expect("bird should hit the bottom pipe");
    assert!(x > 230 && x < 310, "x={x}");
}
