//! Per-tick arbitration and step dispatch

use cadence_protocol::StationStatus;

use super::RecipeQueue;
use crate::station::{StationEvent, Stations};
use crate::time::UNSET;
use crate::traits::{Board, Inbox};
use crate::MAX_STATIONS;

impl RecipeQueue {
    /// Advance the queue by one tick
    ///
    /// Holding the spout, the claimed slot is dispatched when its step is
    /// due and compensated when the step was missed. Otherwise the first
    /// mapped recipe (in station order) whose step is late is compensated,
    /// or the first whose step is within one travel margin claims the
    /// spout. One action per tick.
    pub fn tick<B>(&mut self, stations: &mut Stations, board: &mut B)
    where
        B: Board + ?Sized,
    {
        if self.dispatching.is_some() {
            return;
        }

        let idle = self.is_empty() && self.in_execution.is_none();
        self.hose.tick(board, idle, &self.config.maintenance);

        let now = board.now_ms();

        if let Some(index) = self.in_execution {
            if !self.slots[index].active {
                error!("station {} in execution has no recipe", index);
                self.in_execution = None;
                return;
            }

            let start = self.slots[index]
                .recipe
                .current_step()
                .map(|step| step.start_tick)
                .unwrap_or(UNSET);
            if start == UNSET {
                error!("station {} in execution has nothing mapped", index);
                self.in_execution = None;
            } else if start == now {
                self.dispatch(stations, board, index);
            } else if start < now {
                self.compensate(stations, board, index);
            }
            return;
        }

        let margin = self.travel_margin();
        for index in 0..MAX_STATIONS {
            let slot = &self.slots[index];
            if !slot.active || !slot.recipe.remaining_steps_are_mapped() {
                continue;
            }
            let Some(start) = slot.recipe.current_step().map(|step| step.start_tick) else {
                continue;
            };

            // order matters, `start - now` must not underflow
            if start < now {
                self.compensate(stations, board, index);
                return;
            } else if start - now <= margin {
                debug!("step about to start on station {}", index);
                self.in_execution = Some(index);
                board.travel_to_station(index, 0.0);
                return;
            }
        }
    }

    /// Pour the current step of slot `index`
    ///
    /// Requests posted to the inbox during the pour are applied once it
    /// returns. A cancellation of this very slot wins over the step's
    /// completion: the slot stays removed and only the remap runs.
    pub(super) fn dispatch<B>(&mut self, stations: &mut Stations, board: &mut B, index: usize)
    where
        B: Board + ?Sized,
    {
        let recipe = &self.slots[index].recipe;
        let Some(step) = recipe.current_step() else {
            error!("station {} has no step to dispatch", index);
            self.in_execution = None;
            return;
        };
        let step_index = recipe.current_step_index();
        let ideal = step.duration;
        let started = step.start_tick;

        debug!(
            "dispatching step {} of station {} at {}",
            step_index,
            index,
            board.now_ms()
        );
        self.report_step(board, index, step_index, false);

        self.in_execution = Some(index);
        self.dispatching = Some(index);

        let mut inbox = Inbox::new();
        self.slots[index]
            .recipe
            .execute_current_step(board, &mut inbox);

        for &station in inbox.cancels() {
            if let Err(e) = self.cancel(stations, board, station) {
                warn!("cancel during dispatch dropped: {}", e);
            }
        }
        self.dispatching = None;

        if self.in_execution != Some(index) {
            debug!("station {} cancelled while pouring", index);
            self.finish_pending_remap(board, true);
            self.apply_confirms(stations, board, &inbox);
            return;
        }

        self.in_execution = None;
        self.report_step(board, index, step_index, true);

        let now = board.now_ms();
        let actual = now.saturating_sub(started);
        debug!(
            "step finished: {} ms, error {} ms",
            actual,
            ideal.abs_diff(actual)
        );
        self.hose.note_activity(now);

        self.advance_station(stations, board, index);
        self.finish_pending_remap(board, false);
        self.apply_confirms(stations, board, &inbox);
    }

    fn finish_pending_remap<B>(&mut self, board: &mut B, force: bool)
    where
        B: Board + ?Sized,
    {
        if force || self.remap_pending {
            self.remap_pending = false;
            self.remap_after_change(board);
        }
    }

    fn apply_confirms<B>(&mut self, stations: &mut Stations, board: &mut B, inbox: &Inbox)
    where
        B: Board + ?Sized,
    {
        for &station in inbox.confirms() {
            if let Err(e) = self.confirm(stations, board, station) {
                warn!("confirm during dispatch dropped: {}", e);
            }
        }
    }

    /// Move the station on after a poured step
    fn advance_station<B>(&mut self, stations: &mut Stations, board: &mut B, index: usize)
    where
        B: Board + ?Sized,
    {
        let now = board.now_ms();
        let Ok(station) = stations.get_mut(index) else {
            return;
        };

        let recipe = &mut self.slots[index].recipe;
        let id = Some(recipe.id());
        if recipe.is_finished() {
            let finalize = recipe.finalization_duration() != 0;
            if finalize {
                recipe.start_finalization(now);
            }
            station.apply(StationEvent::AttacksFinished { finalize }, id, board);
            if !finalize {
                self.deactivate(index);
            }
            debug!("recipe finished on station {}", index);
        } else if station.status() == StationStatus::Soaking {
            station.apply(StationEvent::SoakFinished, id, board);
        }
    }

    /// Recover from a step whose start tick passed before it was poured
    ///
    /// The late recipe is remapped from now and poured at once; every
    /// other mapped recipe moves later by the same delta, so the set stays
    /// collision-free.
    pub(super) fn compensate<B>(&mut self, stations: &mut Stations, board: &mut B, index: usize)
    where
        B: Board + ?Sized,
    {
        board.travel_to_station(index, 0.0);
        board.finish_pending_motion();

        let now = board.now_ms();
        let Some(start) = self.slots[index]
            .recipe
            .current_step()
            .map(|step| step.start_tick)
        else {
            return;
        };
        let delta = now.saturating_sub(start);
        warn!(
            "missed step on station {}: start {}, delta {} ms",
            index,
            start,
            delta
        );

        self.slots[index].recipe.map_remaining_steps(now);
        for (other, slot) in self.slots.iter_mut().enumerate() {
            if other != index && slot.active && slot.recipe.remaining_steps_are_mapped() {
                slot.recipe.shift_remaining_steps(delta);
            }
        }

        self.dispatch(stations, board, index);
    }
}
