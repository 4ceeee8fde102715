//! Game settings, read from an optional `<game>` XML file and validated
//! before a session starts.

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable parameters for a game session.
///
/// One record drives both the timed game and the free-play variant; the
/// defaults reproduce the classic timed mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Timed rounds with scoring. When false the game runs in free play.
    pub enable_timer: bool,
    /// Seconds available per round.
    pub time_budget: f64,
    /// Upper bound for generated target sizes (must be a multiple of 0.5).
    pub target_max_size: f32,
    /// Half-extent of the region target positions are drawn from.
    pub target_position_bound: f32,
    /// Per-frame translation step.
    pub position_step: f32,
    /// Per-frame scale step.
    pub scale_step: f32,
    /// Pixels of mouse travel per radian of rotation.
    pub rotate_sensitivity: f32,
    /// Maximum corner distance that still counts as covered.
    pub match_threshold: f32,
    /// Restart the round clock every time the target is matched.
    pub refill_clock_on_match: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            enable_timer: true,
            time_budget: 100.0,
            target_max_size: 2.0,
            target_position_bound: 1.5,
            position_step: 0.02,
            scale_step: 0.02,
            rotate_sensitivity: 350.0,
            match_threshold: 0.1,
            refill_clock_on_match: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid config XML: {0}")]
    Xml(String),
    #[error("<{tag}> has an invalid value `{value}`")]
    Parse { tag: &'static str, value: String },
    #[error("{field} must be {requirement} (got {value})")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

impl GameConfig {
    /// Parses a `<game>` document. Missing tags keep their default value.
    pub fn from_xml(xml: &str) -> Result<Self, ConfigError> {
        let document = Document::parse(xml).map_err(|err| ConfigError::Xml(err.to_string()))?;
        let root = document.root_element();
        if !root.has_tag_name("game") {
            return Err(ConfigError::Xml(format!(
                "expected <game> root, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut config = Self::default();
        config.enable_timer = parse_value(&root, "enable-timer", config.enable_timer)?;
        config.time_budget = parse_value(&root, "time-budget", config.time_budget)?;
        config.target_max_size = parse_value(&root, "target-max-size", config.target_max_size)?;
        config.target_position_bound =
            parse_value(&root, "target-position-bound", config.target_position_bound)?;
        config.position_step = parse_value(&root, "position-step", config.position_step)?;
        config.scale_step = parse_value(&root, "scale-step", config.scale_step)?;
        config.rotate_sensitivity =
            parse_value(&root, "rotate-sensitivity", config.rotate_sensitivity)?;
        config.match_threshold = parse_value(&root, "match-threshold", config.match_threshold)?;
        config.refill_clock_on_match =
            parse_value(&root, "refill-clock-on-match", config.refill_clock_on_match)?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the game loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("time_budget", self.time_budget)?;
        positive("position_step", self.position_step as f64)?;
        positive("scale_step", self.scale_step as f64)?;
        positive("rotate_sensitivity", self.rotate_sensitivity as f64)?;
        positive("match_threshold", self.match_threshold as f64)?;
        positive("target_position_bound", self.target_position_bound as f64)?;

        let max_size = self.target_max_size;
        if !(max_size > 0.5) || (max_size * 2.0).fract() != 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "target_max_size",
                requirement: "a multiple of 0.5 greater than 0.5",
                value: max_size as f64,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            requirement: "positive",
            value,
        })
    }
}

fn parse_value<T: std::str::FromStr>(
    node: &Node<'_, '_>,
    tag: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match optional_text(node, tag) {
        Some(text) => text
            .parse::<T>()
            .map_err(|_| ConfigError::Parse { tag, value: text }),
        None => Ok(default),
    }
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}
