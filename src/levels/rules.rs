//! Adventure level rule table.
//!
//! Every function here is a pure function of the level number (and, where
//! noted, the match index within a series). [`LevelRules::for_level`] gathers
//! them into the single record the engine consumes.

use serde::{Deserialize, Serialize};

use super::series::MatchFormat;
use crate::board::Player;
use crate::core::constants::{
    CAPACITY_CAP, DISAPPEARING_EVERY, DISAPPEARING_REMOVES, MAX_LEVEL, MUD_ZONE_COUNT,
    REARRANGE_EVERY, REMOVE_BLOCKS_COUNT, REMOVE_BLOCKS_EVERY, STRATEGIC_BLOCK_EVERY,
};

/// Progressive block insertion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressiveBlocks {
    pub blocks_per_trigger: usize,
    pub human_moves_per_trigger: u32,
}

/// Block rule triggered by Player One's move counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HumanMoveRule {
    /// Remove `count` blocked cells every `every` human moves
    RemoveBlocks { count: usize, every: u32 },
    /// Insert blocks on random empty cells
    Progressive(ProgressiveBlocks),
    /// Insert one block where it best cuts the human's longest line
    StrategicBlock { every: u32 },
}

impl HumanMoveRule {
    pub fn interval(&self) -> u32 {
        match self {
            HumanMoveRule::RemoveBlocks { every, .. } => *every,
            HumanMoveRule::Progressive(p) => p.human_moves_per_trigger,
            HumanMoveRule::StrategicBlock { every } => *every,
        }
    }
}

/// Opponent-piece removal cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisappearingPieces {
    /// Trigger on every n-th move of the mover
    pub every: u32,
    /// Oldest opponent pieces removed per trigger
    pub count: usize,
}

/// Everything the engine needs to know about one level / sub-match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRules {
    /// 0 for classic (non-adventure) games
    pub level: u32,
    pub match_index: u32,
    pub initial_blocks: usize,
    pub human_move_rule: Option<HumanMoveRule>,
    pub disappearing: Option<DisappearingPieces>,
    pub mud_zone_count: usize,
    pub piece_capacity: Option<usize>,
    pub rearrange_every: Option<u32>,
    pub shifting_blocks: bool,
    pub blind: bool,
    pub starting_player: Player,
    pub format: MatchFormat,
}

impl LevelRules {
    /// Rules for an adventure level. Levels outside 1..=2000 are clamped.
    pub fn for_level(level: u32, match_index: u32) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        Self {
            level,
            match_index,
            initial_blocks: initial_block_count(level, match_index),
            human_move_rule: human_move_rule(level),
            disappearing: disappearing_pieces(level),
            mud_zone_count: mud_zone_count(level),
            piece_capacity: piece_capacity(level),
            rearrange_every: rearrangement_interval(level, match_index),
            shifting_blocks: has_shifting_blocks(level),
            blind: is_blind(level, match_index),
            starting_player: starting_player(level),
            format: MatchFormat::for_level(level),
        }
    }

    /// Plain Connect Five: no modifiers, single game, Player One starts.
    pub fn classic() -> Self {
        Self {
            level: 0,
            match_index: 0,
            initial_blocks: 0,
            human_move_rule: None,
            disappearing: None,
            mud_zone_count: 0,
            piece_capacity: None,
            rearrange_every: None,
            shifting_blocks: false,
            blind: false,
            starting_player: Player::One,
            format: MatchFormat::Single,
        }
    }

    /// Level 0 selects classic rules; anything else goes through the table.
    pub fn resolve(level: u32, match_index: u32) -> Self {
        if level == 0 {
            Self::classic()
        } else {
            Self::for_level(level, match_index)
        }
    }

    pub fn is_classic(&self) -> bool {
        self.level == 0
    }

    /// Human-readable list of active modifiers.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.initial_blocks > 0 {
            lines.push(format!("{} blocked cells at start", self.initial_blocks));
        }
        match self.human_move_rule {
            Some(HumanMoveRule::RemoveBlocks { count, every }) => {
                lines.push(format!("{count} blocks removed every {every} human moves"))
            }
            Some(HumanMoveRule::Progressive(p)) => lines.push(format!(
                "{} block(s) added every {} human moves",
                p.blocks_per_trigger, p.human_moves_per_trigger
            )),
            Some(HumanMoveRule::StrategicBlock { every }) => {
                lines.push(format!("strategic block added every {every} human moves"))
            }
            None => {}
        }
        if let Some(d) = self.disappearing {
            lines.push(format!(
                "{} oldest opponent pieces vanish every {} moves",
                d.count, d.every
            ));
        }
        if self.mud_zone_count > 0 {
            lines.push(format!("{} mud zones", self.mud_zone_count));
        }
        if let Some(cap) = self.piece_capacity {
            lines.push(format!("at most {cap} pieces on the board"));
        }
        if let Some(every) = self.rearrange_every {
            lines.push(format!("board rearranged every {every} moves"));
        }
        if self.shifting_blocks {
            lines.push("blocks shift after every move".to_string());
        }
        if self.blind {
            lines.push("blind play".to_string());
        }
        if let MatchFormat::BestOf(n) = self.format {
            lines.push(format!("best of {n}"));
        }
        lines
    }
}

fn last_digit(level: u32) -> u32 {
    level % 10
}

/// Whether a suffix-keyed mechanic has reached its starting level.
fn suffix_mechanic_active(level: u32) -> bool {
    match last_digit(level) {
        3 => level > 50,
        4 => level >= 400,
        5 => level >= 105,
        7 => level >= 27,
        8 => level >= 180,
        9 => level >= 99,
        _ => false,
    }
}

/// Number of blocked cells placed when a (sub-)game starts.
/// The first matching category wins.
pub fn initial_block_count(level: u32, match_index: u32) -> usize {
    let digit = last_digit(level);
    if level % 10 == 0 && level >= 60 && match_index == 0 {
        10
    } else if digit == 9 && level >= 99 {
        16
    } else if digit == 8 && level >= 180 {
        7
    } else if digit == 7 && level >= 27 {
        6
    } else if digit == 5 && level >= 105 {
        5
    } else if digit == 4 && level >= 400 {
        8
    } else if level % 5 == 0 {
        4
    } else {
        // Suffix-3 levels start clear and grow blocks progressively
        0
    }
}

/// Progressive block schedule for suffix-3 levels above 50.
pub fn progressive_schedule(level: u32) -> Option<ProgressiveBlocks> {
    if last_digit(level) != 3 || level <= 50 {
        return None;
    }
    let (blocks_per_trigger, human_moves_per_trigger) = match level {
        0..=200 => (1, 5),
        201..=399 => (1, 4),
        400..=599 => (2, 4),
        600..=799 => (2, 3),
        _ => (3, 3),
    };
    Some(ProgressiveBlocks {
        blocks_per_trigger,
        human_moves_per_trigger,
    })
}

/// The block rule driven by human moves, if any.
pub fn human_move_rule(level: u32) -> Option<HumanMoveRule> {
    let digit = last_digit(level);
    if digit == 4 && level >= 400 {
        return Some(HumanMoveRule::RemoveBlocks {
            count: REMOVE_BLOCKS_COUNT,
            every: REMOVE_BLOCKS_EVERY,
        });
    }
    if let Some(schedule) = progressive_schedule(level) {
        return Some(HumanMoveRule::Progressive(schedule));
    }
    if digit == 9 && level >= 500 {
        return Some(HumanMoveRule::StrategicBlock {
            every: STRATEGIC_BLOCK_EVERY,
        });
    }
    None
}

/// Multiples of 7 in [500, 1000] and multiples of 4 from 1000.
pub fn disappearing_pieces(level: u32) -> Option<DisappearingPieces> {
    let sevens = level % 7 == 0 && (500..=1000).contains(&level);
    let fours = level % 4 == 0 && level >= 1000;
    (sevens || fours).then_some(DisappearingPieces {
        every: DISAPPEARING_EVERY,
        count: DISAPPEARING_REMOVES,
    })
}

/// Only exact multiples of 200 get mud zones.
pub fn mud_zone_count(level: u32) -> usize {
    if level > 0 && level % 200 == 0 {
        MUD_ZONE_COUNT
    } else {
        0
    }
}

/// Multiples of 13 cap the number of live pieces.
pub fn piece_capacity(level: u32) -> Option<usize> {
    (level > 0 && level % 13 == 0).then_some(CAPACITY_CAP)
}

/// Multiples of 10 in [799, 1999] that are not multiples of 50, first
/// sub-match only.
pub fn rearrangement_interval(level: u32, match_index: u32) -> Option<u32> {
    let in_band = (799..=1999).contains(&level) && level % 10 == 0 && level % 50 != 0;
    (in_band && match_index == 0).then_some(REARRANGE_EVERY)
}

/// Suffix-7 levels after 250 and suffix-8 levels after 600.
pub fn has_shifting_blocks(level: u32) -> bool {
    match last_digit(level) {
        7 => level > 250,
        8 => level > 600,
        _ => false,
    }
}

/// 42, 92, 142, ... and the second sub-match of multiples of 50.
pub fn is_blind(level: u32, match_index: u32) -> bool {
    let sequence = level >= 42 && (level - 42) % 50 == 0;
    let second_of_fifty = level > 0 && level % 50 == 0 && match_index == 1;
    sequence || second_of_fifty
}

/// Player Two starts on levels ending in 1 and on levels whose suffix
/// mechanic is active; Player One everywhere else.
pub fn starting_player(level: u32) -> Player {
    if last_digit(level) == 1 || suffix_mechanic_active(level) {
        Player::Two
    } else {
        Player::One
    }
}
