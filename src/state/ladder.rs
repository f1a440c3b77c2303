// src/state/ladder.rs
// Bounded three-rung preference ladders

use serde::{Deserialize, Serialize};

/// A small ordered enum with one "up" and one "down" direction.
///
/// Shifts are ordinal arithmetic clamped to `0..=TOP`; moving past either end
/// leaves the rung unchanged.
pub trait Ladder: Sized + Copy {
    const TOP: u8;

    fn rung(self) -> u8;
    fn from_rung(rung: u8) -> Self;

    /// One rung up, no-op at the top
    fn shift_up(self) -> Self {
        Self::from_rung(self.rung().saturating_add(1).min(Self::TOP))
    }

    /// One rung down, no-op at the bottom
    fn shift_down(self) -> Self {
        Self::from_rung(self.rung().saturating_sub(1))
    }
}

/// How abstract explanations should be
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbstractionLevel {
    MoreConcrete,
    #[default]
    Balanced,
    MoreAbstract,
}

impl AbstractionLevel {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn toward_concrete(self) -> Self {
        self.shift_down()
    }

    pub fn toward_abstract(self) -> Self {
        self.shift_up()
    }
}

impl Ladder for AbstractionLevel {
    const TOP: u8 = 2;

    fn rung(self) -> u8 {
        self as u8
    }

    fn from_rung(rung: u8) -> Self {
        match rung {
            0 => Self::MoreConcrete,
            1 => Self::Balanced,
            _ => Self::MoreAbstract,
        }
    }
}

/// How much scaffolding explanations carry
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HintDepth {
    LightHints,
    #[default]
    Moderate,
    StepByStep,
}

impl HintDepth {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn more_support(self) -> Self {
        self.shift_up()
    }

    pub fn less_support(self) -> Self {
        self.shift_down()
    }
}

impl Ladder for HintDepth {
    const TOP: u8 = 2;

    fn rung(self) -> u8 {
        self as u8
    }

    fn from_rung(rung: u8) -> Self {
        match rung {
            0 => Self::LightHints,
            1 => Self::Moderate,
            _ => Self::StepByStep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_abstraction_shifts() {
        assert_eq!(AbstractionLevel::Balanced.toward_concrete(), AbstractionLevel::MoreConcrete);
        assert_eq!(AbstractionLevel::Balanced.toward_abstract(), AbstractionLevel::MoreAbstract);
        assert_eq!(AbstractionLevel::MoreConcrete.toward_abstract(), AbstractionLevel::Balanced);
    }

    #[test]
    fn test_boundaries_are_sticky() {
        let mut level = AbstractionLevel::Balanced;
        for _ in 0..10 {
            level = level.toward_concrete();
        }
        assert_eq!(level, AbstractionLevel::MoreConcrete);

        let mut depth = HintDepth::Moderate;
        for _ in 0..10 {
            depth = depth.more_support();
        }
        assert_eq!(depth, HintDepth::StepByStep);
        for _ in 0..10 {
            depth = depth.less_support();
        }
        assert_eq!(depth, HintDepth::LightHints);
    }

    #[test]
    fn test_rungs_roundtrip() {
        for rung in 0..=HintDepth::TOP {
            assert_eq!(HintDepth::from_rung(rung).rung(), rung);
            assert_eq!(AbstractionLevel::from_rung(rung).rung(), rung);
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AbstractionLevel::default(), AbstractionLevel::Balanced);
        assert_eq!(HintDepth::default(), HintDepth::Moderate);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(HintDepth::LightHints.as_str(), "light_hints");
        assert_eq!(AbstractionLevel::MoreConcrete.as_str(), "more_concrete");
        assert_eq!(
            serde_json::to_string(&HintDepth::StepByStep).unwrap(),
            "\"step_by_step\""
        );
        assert_eq!(HintDepth::from_str("STEP_BY_STEP").unwrap(), HintDepth::StepByStep);
        assert!(AbstractionLevel::from_str("sideways").is_err());
    }
}
