// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;

// Ticks per second (reciprocal of TICK_INTERVAL_MS / 1000)
pub const TICKS_PER_SECOND: u32 = 10;

// Per-move countdown; 0 disables the timer
pub const DEFAULT_MOVE_TIME_LIMIT_SECS: u32 = 30;

// Campaign
pub const MAX_LEVEL: u32 = 2000;

// Mud zones
pub const MUD_ZONE_COUNT: usize = 5;
pub const MUD_STUCK_TURNS: u32 = 1;

// Piece capacity (multiples of 13)
pub const CAPACITY_CAP: usize = 35;

// Disappearing pieces
pub const DISAPPEARING_EVERY: u32 = 4;
pub const DISAPPEARING_REMOVES: usize = 2;

// Human-move block rules
pub const REMOVE_BLOCKS_COUNT: usize = 2;
pub const REMOVE_BLOCKS_EVERY: u32 = 3;
pub const STRATEGIC_BLOCK_EVERY: u32 = 4;

// Board rearrangement
pub const REARRANGE_EVERY: u32 = 23;

// Session snapshots
pub const SNAPSHOT_VERSION_MAGIC: u64 = 0x4346_4956_4553_4E50; // "CFIVESNP" in hex

// Persistence
pub const APP_DIR_NAME: &str = ".connect-five";
pub const PROGRESS_FILE: &str = "progress.json";
pub const CONFIG_FILE: &str = "config.json";
pub const SNAPSHOT_FILE: &str = "session.dat";
pub const MATCH_LOG_DIR: &str = "logs";
