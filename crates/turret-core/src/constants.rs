//! Simulation constants and tuning parameters.

use std::f64::consts::PI;

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Turret defaults ---

/// Radius within which a candidate can be acquired (meters).
pub const DEFAULT_VISION_RADIUS: f64 = 10.0;

/// Angular speed shared by the head and gun mounts (rad/s).
pub const DEFAULT_ROTATION_SPEED: f64 = PI;

/// Seconds between shots.
pub const DEFAULT_FIRE_RATE: f64 = 1.0;

/// Muzzle speed handed to the projectile subsystem (m/s).
pub const DEFAULT_PROJECTILE_SPEED: f64 = 10.0;

/// Tag carried by entities a turret treats as hostile.
pub const DEFAULT_ENEMY_TAG: &str = "Enemy";

/// Seconds between acquisition scans.
pub const DEFAULT_SEARCH_INTERVAL: f64 = 1.0;

/// Idle look-around yaw rate (rad/s). Zero keeps the head still while idle.
pub const DEFAULT_IDLE_SCAN_RATE: f64 = 0.0;

/// Head pivot offset from the turret base (meters, world frame).
pub const DEFAULT_HEAD_OFFSET: [f64; 3] = [0.0, 0.0, 1.0];

/// Gun pivot offset from the head pivot (meters, head frame).
pub const DEFAULT_GUN_OFFSET: [f64; 3] = [0.0, 0.0, 0.5];

// --- Prediction ---

/// Fixed-point iterations used by lead prediction.
pub const LEAD_ITERATIONS: usize = 10;

// --- Numeric tolerances ---

/// Slack applied when comparing the sim clock against a scheduled time.
/// Absorbs the drift of summing `dt` every tick.
pub const TIME_EPSILON: f64 = 1e-9;

/// Angular separation (radians) treated as already aligned.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// Vector length treated as zero when building orientations.
pub const DIRECTION_EPSILON: f64 = 1e-9;

// --- Projectiles ---

/// Seconds a spawned projectile stays alive in the simulation.
pub const PROJECTILE_LIFETIME_SECS: f64 = 5.0;

/// Projectiles beyond this range from the origin are removed (meters).
pub const WORLD_RADIUS: f64 = 1_000.0;
