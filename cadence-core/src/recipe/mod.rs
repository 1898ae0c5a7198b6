//! Recipe data model
//!
//! A recipe is an optional soak (pre-infusion) step followed by attack
//! (pour) steps. The current step index only moves forward; steps before
//! it have been poured and keep their historical start ticks.

mod step;
mod template;

pub use step::{Action, Span, Step};
pub use template::STANDARD_RECIPE_ID;

use core::ops::Range;

use heapless::Vec;

use cadence_protocol::{RecipeDescription, RecipeError};

use crate::time::{Millis, Timer};
use crate::traits::{CommandExecutor, Inbox};
use crate::MAX_ATTACKS;

/// Soak plus attacks
pub const MAX_STEPS: usize = MAX_ATTACKS + 1;

/// An ordered program of timed steps for one station
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Recipe {
    id: u32,
    finalization_duration: Millis,
    finalization_timer: Timer,
    has_soak: bool,
    steps: Vec<Step, MAX_STEPS>,
    current: usize,
}

impl Recipe {
    /// Build a runnable recipe from a host description
    pub fn from_description(description: &RecipeDescription) -> Result<Self, RecipeError> {
        description.validate()?;

        let mut steps = Vec::new();
        for step in description.soak.iter().chain(description.attacks.iter()) {
            steps
                .push(Step::from_description(step))
                .map_err(|_| RecipeError::TooManyAttacks)?;
        }

        Ok(Self {
            id: description.id,
            finalization_duration: description.finalization_ms,
            finalization_timer: Timer::new(),
            has_soak: description.soak.is_some(),
            steps,
            current: 0,
        })
    }

    pub(crate) fn from_parts(
        id: u32,
        finalization_duration: Millis,
        has_soak: bool,
        steps: Vec<Step, MAX_STEPS>,
    ) -> Self {
        Self {
            id,
            finalization_duration,
            finalization_timer: Timer::new(),
            has_soak,
            steps,
            current: 0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn finalization_duration(&self) -> Millis {
        self.finalization_duration
    }

    pub fn finalization_timer(&self) -> &Timer {
        &self.finalization_timer
    }

    pub fn start_finalization(&mut self, now: Millis) {
        self.finalization_timer.start(now);
    }

    pub fn has_soak(&self) -> bool {
        self.has_soak
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step_index(&self) -> usize {
        self.current
    }

    /// Next step to pour, `None` once finished
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.steps.len()
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    fn first_attack_index(&self) -> usize {
        usize::from(self.has_soak)
    }

    pub fn first_attack(&self) -> Option<&Step> {
        self.steps.get(self.first_attack_index())
    }

    /// The soak step has been poured
    pub fn is_soaked(&self) -> bool {
        self.has_soak && self.current > 0
    }

    pub fn has_executed_first_attack(&self) -> bool {
        self.current > self.first_attack_index()
    }

    /// Steps consumed before the current phase began
    ///
    /// One once the soak is done, zero otherwise.
    pub fn phase_start_index(&self) -> usize {
        usize::from(self.is_soaked())
    }

    /// A step of the current phase has been poured
    pub fn has_started_phase(&self) -> bool {
        self.current > self.phase_start_index()
    }

    /// Steps still to pour in the current phase
    ///
    /// While the soak is pending it is the only remaining step; attacks
    /// are not considered until it has been poured.
    fn remaining_range(&self) -> Range<usize> {
        if self.has_soak && self.current == 0 {
            0..self.steps.len().min(1)
        } else {
            self.current.min(self.steps.len())..self.steps.len()
        }
    }

    pub fn remaining_steps(&self) -> &[Step] {
        &self.steps[self.remaining_range()]
    }

    pub fn remaining_steps_mut(&mut self) -> &mut [Step] {
        let range = self.remaining_range();
        &mut self.steps[range]
    }

    /// Spans the remaining steps would occupy if mapped from `start`
    pub fn remaining_spans_from(&self, start: Millis) -> impl Iterator<Item = Span> + '_ {
        self.remaining_steps().iter().scan(start, |tick, step| {
            let span = Span::new(*tick, step.duration);
            *tick = tick.saturating_add(step.duration).saturating_add(step.interval);
            Some(span)
        })
    }

    /// Spans of the remaining steps as currently mapped
    pub fn remaining_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.remaining_steps().iter().map(Step::span)
    }

    /// Assign start ticks to the remaining steps, back to back from `start`
    pub fn map_remaining_steps(&mut self, start: Millis) {
        let mut tick = start;
        for step in self.remaining_steps_mut() {
            step.start_tick = tick;
            tick = tick.saturating_add(step.duration).saturating_add(step.interval);
        }
    }

    /// Clear the start ticks of the remaining steps
    ///
    /// Poured steps keep their historical ticks.
    pub fn unmap_remaining_steps(&mut self) {
        for step in self.remaining_steps_mut() {
            step.start_tick = crate::time::UNSET;
        }
    }

    /// The earliest remaining step has a start tick
    pub fn remaining_steps_are_mapped(&self) -> bool {
        self.remaining_steps()
            .first()
            .map(Step::is_mapped)
            .unwrap_or(false)
    }

    /// Move every remaining step `delta` later
    pub fn shift_remaining_steps(&mut self, delta: Millis) {
        for step in self.remaining_steps_mut() {
            if step.is_mapped() {
                step.start_tick = step.start_tick.saturating_add(delta);
            }
        }
    }

    /// Hand the current step to the executor, then advance
    ///
    /// The index moves only after `execute` returns so a cancellation
    /// posted during the pour still sees the step as current. Returns the
    /// index of the poured step.
    pub fn execute_current_step<E>(&mut self, executor: &mut E, inbox: &mut Inbox) -> Option<usize>
    where
        E: CommandExecutor + ?Sized,
    {
        let index = self.current;
        let step = self.steps.get(index)?;
        executor.execute(&step.action, inbox);
        self.current += 1;
        Some(index)
    }
}
