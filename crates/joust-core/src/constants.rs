//! Simulation constants and tuning parameters.
//!
//! Distances are in world units (1 unit = 1 meter), times in seconds.

/// Simulation frame rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per frame.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Match lifecycle ---

/// Number of rounds in a match.
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Countdown starting value, ticked down to 0 inclusive.
pub const COUNTDOWN_START: u32 = 3;

/// Seconds between countdown ticks.
pub const COUNTDOWN_INTERVAL_SECS: f64 = 1.0;

/// Delay between a completed round and the next countdown.
pub const ROUND_TRANSITION_DELAY_SECS: f64 = 2.0;

/// Distance a knight walks past the far end before the round can close.
pub const WALK_OUT_DISTANCE: f32 = 3.0;

// --- Movement ---

/// Charge speed along the match axis (units/s).
pub const CHARGE_SPEED: f32 = 8.0;

/// Walk-out speed after reaching the far end (units/s).
pub const WALK_SPEED: f32 = 1.5;

/// Absolute X of each end of the list.
pub const START_X: f32 = 10.0;

/// Lane Z for the two knights, indexed by starting end (right, left).
pub const LANE_Z: [f32; 2] = [0.0, 2.0];

/// Tolerance for "reached the far end".
pub const FAR_END_TOLERANCE: f32 = 0.5;

/// Height of the knight's root above the ground.
pub const KNIGHT_HEIGHT: f32 = 2.0;

// --- Slow-motion pass ---

/// Knight separation below which the pass slows down.
pub const SLOWDOWN_DISTANCE: f32 = 6.0;

/// Time scale target during the pass.
pub const SLOWDOWN_FACTOR: f32 = 0.35;

/// Rate at which the time scale eases toward its target (1/s).
pub const TIME_SCALE_EASE_RATE: f32 = 5.0;

// --- Lance ---

/// Maximum scoring ray length.
pub const LANCE_HIT_RANGE: f32 = 2.5;

/// Local offset of the lance origin from the hand joint.
pub const LANCE_HAND_OFFSET: [f32; 3] = [0.25, 0.05, 0.05];

/// m/s to mph.
pub const SPEED_UNIT_FACTOR: f32 = 2.237;

/// Region name recorded for a round without a scoring hit.
pub const MISS_REGION: &str = "miss";

// --- Hit regions ---

/// Collision radius of head-tier regions.
pub const HEAD_REGION_RADIUS: f32 = 0.4;

/// Collision radius of all other regions.
pub const BODY_REGION_RADIUS: f32 = 0.3;

// --- AI targeting ---

/// Seconds between AI target re-draws.
pub const AI_RETARGET_SECS: f32 = 0.5;

/// Per-frame lerp factor from current toward target aim point.
pub const AI_AIM_SMOOTHING: f32 = 0.05;

/// Forward dot product below which a passed AI's aim is clamped.
pub const REAR_CLAMP_THRESHOLD: f32 = -0.2;

/// Fraction of the vertical aim component kept by the rear clamp.
pub const REAR_CLAMP_VERTICAL_KEEP: f32 = 0.5;

/// Height above the opponent root used when no region can be targeted.
pub const FALLBACK_AIM_HEIGHT: f32 = 0.5;

// --- Player aim ---

/// Reference "forward" axis the lance model is rotated from.
pub const LANCE_FORWARD: [f32; 3] = [0.0, 0.0, 1.0];
