//! Host-supplied recipe descriptions

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::{MAX_ACTION_LEN, MAX_ATTACKS};

/// Errors in a recipe description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecipeError {
    /// Neither a soak nor any attack was given
    NoSteps,
    /// More attacks than a recipe can hold
    TooManyAttacks,
    /// Action text exceeds [`MAX_ACTION_LEN`]
    ActionTooLong,
    /// A step with zero duration
    ZeroDuration,
}

/// One step as described by the host
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepDescription {
    /// Pour duration (ms)
    pub duration_ms: u32,
    /// Rest before the next step (ms), 0 for the last step
    #[serde(default)]
    pub interval_ms: u32,
    /// Opaque command handed to the executor
    pub action: String<MAX_ACTION_LEN>,
}

impl StepDescription {
    /// Build a step description from plain text
    pub fn new(duration_ms: u32, interval_ms: u32, action: &str) -> Result<Self, RecipeError> {
        let mut text = String::new();
        text.push_str(action)
            .map_err(|_| RecipeError::ActionTooLong)?;
        Ok(Self {
            duration_ms,
            interval_ms,
            action: text,
        })
    }
}

/// A complete recipe as described by the host
///
/// The optional soak always runs first; attacks follow in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecipeDescription {
    /// Host identifier, echoed back in status events
    pub id: u32,
    /// Grace period after the last pour before the coffee is ready (ms)
    #[serde(default)]
    pub finalization_ms: u32,
    /// Optional soak (pre-infusion) step
    #[serde(default)]
    pub soak: Option<StepDescription>,
    /// Attack (pour) steps
    pub attacks: Vec<StepDescription, MAX_ATTACKS>,
}

impl RecipeDescription {
    /// Total number of steps, soak included
    pub fn step_count(&self) -> usize {
        self.attacks.len() + usize::from(self.soak.is_some())
    }

    /// Check the description can be turned into a runnable recipe
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.step_count() == 0 {
            return Err(RecipeError::NoSteps);
        }

        let zero_duration = self
            .soak
            .iter()
            .chain(self.attacks.iter())
            .any(|step| step.duration_ms == 0);
        if zero_duration {
            return Err(RecipeError::ZeroDuration);
        }

        Ok(())
    }

    /// Append an attack, failing when the recipe is full
    pub fn push_attack(&mut self, attack: StepDescription) -> Result<(), RecipeError> {
        self.attacks
            .push(attack)
            .map_err(|_| RecipeError::TooManyAttacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack(duration_ms: u32, interval_ms: u32) -> StepDescription {
        StepDescription::new(duration_ms, interval_ms, "POUR").unwrap()
    }

    #[test]
    fn test_empty_recipe_rejected() {
        let recipe = RecipeDescription::default();
        assert_eq!(recipe.validate(), Err(RecipeError::NoSteps));
    }

    #[test]
    fn test_soak_only_recipe_is_valid() {
        let recipe = RecipeDescription {
            id: 1,
            soak: Some(attack(6000, 0)),
            ..Default::default()
        };
        assert_eq!(recipe.step_count(), 1);
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut recipe = RecipeDescription::default();
        recipe.push_attack(attack(0, 1000)).unwrap();
        assert_eq!(recipe.validate(), Err(RecipeError::ZeroDuration));
    }

    #[test]
    fn test_attack_capacity() {
        let mut recipe = RecipeDescription::default();
        for _ in 0..MAX_ATTACKS {
            recipe.push_attack(attack(1000, 1000)).unwrap();
        }
        assert_eq!(
            recipe.push_attack(attack(1000, 0)),
            Err(RecipeError::TooManyAttacks)
        );
    }

    #[test]
    fn test_action_too_long() {
        let bytes = [b'X'; MAX_ACTION_LEN + 1];
        let long = core::str::from_utf8(&bytes).unwrap();
        assert_eq!(
            StepDescription::new(1000, 0, long),
            Err(RecipeError::ActionTooLong)
        );
    }
}
