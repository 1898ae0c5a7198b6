//! Timeline mapping
//!
//! The search is brute force: every remaining step of every other mapped
//! recipe is an anchor, and candidate starts are sampled one travel margin
//! apart inside the anchor's rest interval. The earliest candidate over
//! all anchors wins.

use heapless::Vec;

use super::RecipeQueue;
use crate::recipe::{Recipe, Step, MAX_STEPS};
use crate::time::Millis;
use crate::traits::Board;
use crate::MAX_STATIONS;

/// Upper bound on anchors, hence on candidates
const MAX_CANDIDATES: usize = (MAX_STATIONS - 1) * MAX_STEPS;

impl RecipeQueue {
    /// Give the remaining steps of slot `index` their start ticks
    ///
    /// With nothing else on the timeline the recipe starts right away: the
    /// spout travels to the station first and the slot claims execution.
    pub(super) fn map_recipe<B>(&mut self, board: &mut B, index: usize)
    where
        B: Board + ?Sized,
    {
        self.hose.abort(board);

        let candidates = self.collect_candidates(index);
        let start = match candidates.iter().min() {
            Some(&start) => start,
            None => {
                board.travel_to_station(index, 0.0);
                if self.in_execution.is_none() {
                    self.in_execution = Some(index);
                }
                board
                    .now_ms()
                    .saturating_add(self.config.scheduler.computation_margin_ms)
            }
        };

        self.slots[index].recipe.map_remaining_steps(start);
        debug!(
            "recipe mapped on station {}: {} candidates, start {}",
            index,
            candidates.len(),
            start
        );
    }

    /// Earliest collision-free start the slot could be mapped from
    ///
    /// `None` when no other recipe is on the timeline.
    pub fn find_start(&self, index: usize) -> Option<Millis> {
        self.collect_candidates(index).iter().min().copied()
    }

    /// First fitting start per anchor
    fn collect_candidates(&self, index: usize) -> Vec<Millis, MAX_CANDIDATES> {
        let mut candidates = Vec::new();
        let margin = self.travel_margin();

        // past this tick nothing else is mapped, so any start fits
        let Some(horizon) = self
            .mapped_others(index)
            .flat_map(|(_, recipe)| recipe.remaining_steps().iter().map(Step::end_tick))
            .max()
            .map(|end| end.saturating_add(margin))
        else {
            return candidates;
        };

        for (_, other) in self.mapped_others(index) {
            for anchor in other.remaining_steps() {
                if anchor.interval != 0 && anchor.interval < margin {
                    continue;
                }
                if let Some(start) = self.first_fit_after(index, anchor, horizon) {
                    let _ = candidates.push(start);
                }
            }
        }

        // every anchor was too short to sample
        if candidates.is_empty() {
            let _ = candidates.push(horizon);
        }
        candidates
    }

    /// Sample starts after `anchor`, one travel margin apart
    ///
    /// A last step (zero interval) bounds nothing, so sampling continues up
    /// to `horizon`.
    fn first_fit_after(&self, index: usize, anchor: &Step, horizon: Millis) -> Option<Millis> {
        let margin = self.travel_margin();
        let end = anchor.end_tick();

        let mut offset = margin;
        loop {
            if anchor.interval != 0 && offset > anchor.interval - margin {
                return None;
            }

            let start = end.saturating_add(offset);
            if !self.collides_with_others(index, start) {
                return Some(start);
            }
            if anchor.interval == 0 && start >= horizon {
                return None;
            }
            offset = offset.saturating_add(margin);
        }
    }

    /// Slot `index`, mapped from `start`, would collide with another recipe
    pub fn collides_with_others(&self, index: usize, start: Millis) -> bool {
        let margin = self.travel_margin();
        let recipe = &self.slots[index].recipe;

        self.mapped_others(index).any(|(_, other)| {
            recipe.remaining_spans_from(start).any(|new| {
                other
                    .remaining_spans()
                    .take_while(|mapped| mapped.start <= new.end.saturating_add(margin))
                    .any(|mapped| new.collides_with(&mapped, margin))
            })
        })
    }

    fn mapped_others(&self, index: usize) -> impl Iterator<Item = (usize, &Recipe)> {
        self.mapped_recipes().filter(move |(other, _)| *other != index)
    }

    /// Pull forward recipes that have not poured yet in their phase
    ///
    /// Run after a cancellation so the freed part of the timeline is used.
    pub(super) fn remap_after_change<B>(&mut self, board: &mut B)
    where
        B: Board + ?Sized,
    {
        let mut to_remap: Vec<usize, MAX_STATIONS> = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.active || !slot.recipe.remaining_steps_are_mapped() {
                continue;
            }
            if slot.recipe.has_started_phase() || self.in_execution == Some(index) {
                continue;
            }
            slot.recipe.unmap_remaining_steps();
            let _ = to_remap.push(index);
        }

        for index in to_remap {
            self.map_recipe(board, index);
        }
    }
}
