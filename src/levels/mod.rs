//! Adventure level modifiers: the rule table, seeded layouts and match series.

#![allow(unused_imports)]

pub mod mud;
pub mod rules;
pub mod series;

pub use mud::{initial_blocks, mud_zones};
pub use rules::{DisappearingPieces, HumanMoveRule, LevelRules, ProgressiveBlocks};
pub use series::{MatchFormat, MatchSeries, SeriesStatus};
