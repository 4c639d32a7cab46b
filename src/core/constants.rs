// Window (world coordinates, y grows downward)
pub const WIN_WIDTH: i32 = 550;
pub const WIN_HEIGHT: i32 = 800;
pub const GROUND_Y: i32 = 730;

// Tick and timing
pub const TICKS_PER_SECOND: u64 = 30;

// Bird physics
pub const BIRD_START_X: i32 = 230;
pub const BIRD_START_Y: f64 = 350.0;
pub const JUMP_VELOCITY: f64 = -10.5;
pub const GRAVITY_TERM: f64 = 1.5;
pub const TERMINAL_DISPLACEMENT: f64 = 16.0;
pub const UPWARD_BOOST: f64 = 2.0;
pub const APEX_WINDOW: f64 = 50.0;

// Bird tilt and animation
pub const MAX_ROTATION: f64 = 25.0;
pub const MIN_ROTATION: f64 = -90.0;
pub const ROTATION_VELOCITY: f64 = 20.0;
pub const NOSE_DIVE_TILT: f64 = -80.0;
pub const ANIMATION_TIME: u32 = 5;
pub const BIRD_FRAMES: usize = 3;

// Pipes and ground
pub const PIPE_GAP: i32 = 200;
pub const PIPE_MIN_HEIGHT: i32 = 50;
pub const PIPE_MAX_HEIGHT: i32 = 450; // exclusive
pub const PIPE_SPAWN_X: i32 = 600;
pub const SCROLL_VELOCITY: i32 = 5;

// Fitness bookkeeping
pub const GENERATIONS: u32 = 50;
pub const JUMP_THRESHOLD: f64 = 0.5;
pub const SURVIVAL_REWARD: f64 = 0.1;
pub const COLLISION_PENALTY: f64 = 1.0;
pub const PIPE_REWARD: f64 = 5.0;

// Built-in sprite sizes (PNG art, scaled 2x)
pub const BIRD_SPRITE_SIZE: (u32, u32) = (68, 48);
pub const PIPE_SPRITE_SIZE: (u32, u32) = (104, 640);
pub const BASE_SPRITE_SIZE: (u32, u32) = (672, 224);

// Alpha above this counts as solid when building masks
pub const MASK_ALPHA_THRESHOLD: u8 = 127;

// Files
pub const DEFAULT_NEAT_CONFIG: &str = "neat-config.toml";
pub const DATA_DIR_NAME: &str = ".flappy-neat";
pub const LOG_FILE_NAME: &str = "flappy-neat.log";
