//! Bridge configuration
//!
//! Producer and consumer must agree on the ring layout, so both sides build
//! it from the same JSON blob the app ships with. Every field is optional.

use serde::Deserialize;
use thiserror::Error;

use crate::core::shared::ring_buffer::{
    RingError, RingLayout, DEFAULT_HEAD_OFFSET, DEFAULT_INPUT_CAPACITY, EVENT_RECORD_WIDTH,
};
use crate::systems::history::{HistoryLimits, DEFAULT_HISTORY_MAX_BYTES, DEFAULT_HISTORY_MAX_ENTRIES};

pub const DEFAULT_FILL_LIMIT: u32 = 250_000;
pub const DEFAULT_MAX_STEPS_PER_TICK: u32 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Ring(#[from] RingError),
    #[error("maxStepsPerTick must be at least 1")]
    MaxStepsPerTick,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub input_capacity: usize,
    pub record_width: usize,
    pub head_offset: usize,
    pub history_max_entries: usize,
    pub history_max_bytes: usize,
    /// Upper bound on cells a single flood fill may touch
    pub fill_limit: u32,
    /// Simulation steps a single tick may run when speed > 1
    pub max_steps_per_tick: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            input_capacity: DEFAULT_INPUT_CAPACITY,
            record_width: EVENT_RECORD_WIDTH,
            head_offset: DEFAULT_HEAD_OFFSET,
            history_max_entries: DEFAULT_HISTORY_MAX_ENTRIES,
            history_max_bytes: DEFAULT_HISTORY_MAX_BYTES,
            fill_limit: DEFAULT_FILL_LIMIT,
            max_steps_per_tick: DEFAULT_MAX_STEPS_PER_TICK,
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ring_layout().validate()?;
        if self.max_steps_per_tick == 0 {
            return Err(ConfigError::MaxStepsPerTick);
        }
        Ok(())
    }

    pub fn ring_layout(&self) -> RingLayout {
        RingLayout {
            capacity: self.input_capacity,
            record_width: self.record_width,
            head_offset: self.head_offset,
        }
    }

    pub fn history_limits(&self) -> HistoryLimits {
        HistoryLimits {
            max_entries: self.history_max_entries,
            max_bytes: self.history_max_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(BridgeConfig::from_json("{}").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn overrides_are_camel_case() {
        let config = BridgeConfig::from_json(r#"{"inputCapacity":64,"historyMaxEntries":5}"#).unwrap();
        assert_eq!(config.ring_layout().capacity, 64);
        assert_eq!(config.history_limits().max_entries, 5);
        assert_eq!(config.history_limits().max_bytes, DEFAULT_HISTORY_MAX_BYTES);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            BridgeConfig::from_json(r#"{"recordWidth":2}"#),
            Err(ConfigError::Ring(RingError::RecordWidth(2)))
        ));
        assert!(matches!(
            BridgeConfig::from_json(r#"{"maxStepsPerTick":0}"#),
            Err(ConfigError::MaxStepsPerTick)
        ));
        assert!(matches!(
            BridgeConfig::from_json(r#"{"inputCapacty":64}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
