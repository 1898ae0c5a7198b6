//! Progress reporting

use heapless::Vec;

use cadence_protocol::{QueueInfo, StationInfo, StationStatus, StatusEvent, StepProgress};

use super::RecipeQueue;
use crate::station::Stations;
use crate::time::{tick_has_happened, Millis};
use crate::traits::Board;

impl RecipeQueue {
    pub(super) fn report_step<B>(&self, board: &mut B, index: usize, step: usize, done: bool)
    where
        B: Board + ?Sized,
    {
        let now = board.now_ms();
        let elapsed_attacks_ms = self.slots[index]
            .recipe
            .first_attack()
            .map(|attack| attack.start_tick)
            .filter(|&start| tick_has_happened(start, now))
            .map(|start| now - start);

        board.report(&StatusEvent::Step(StepProgress {
            station: index as u8,
            step: step as u8,
            done,
            elapsed_attacks_ms,
        }));
    }

    /// Snapshot of the listed stations
    ///
    /// Unknown indices are logged and skipped, blocked stations left out.
    pub fn queue_info(&self, stations: &Stations, indices: &[u8], now: Millis) -> QueueInfo {
        let mut info = QueueInfo {
            active_station: self.in_execution.map(|index| index as u8),
            stations: Vec::new(),
        };

        for &index in indices {
            let Ok(station) = stations.get(index as usize) else {
                error!("queue info for invalid station {}", index);
                continue;
            };
            if station.is_blocked() {
                continue;
            }
            let _ = info.stations.push(self.station_info(stations, index as usize, now));
        }
        info
    }

    /// Progress of one station
    ///
    /// Timing fields are filled in only while the station holds a recipe.
    /// Between two pours the previous step and the time spent in its rest
    /// interval are given instead of the current step.
    pub fn station_info(&self, stations: &Stations, index: usize, now: Millis) -> StationInfo {
        let Ok(station) = stations.get(index) else {
            return StationInfo::default();
        };
        let mut info = StationInfo {
            index: index as u8,
            status: station.status(),
            ..Default::default()
        };

        let Some(recipe) = self.recipe(index) else {
            return info;
        };
        info.recipe_id = Some(recipe.id());

        let since = |tick: Millis| tick_has_happened(tick, now).then(|| now - tick);
        info.elapsed_total_ms = recipe.first_step().and_then(|step| since(step.start_tick));
        info.elapsed_attacks_ms = recipe.first_attack().and_then(|step| since(step.start_tick));

        if station.status() == StationStatus::Finalizing
            && recipe.finalization_timer().is_active()
        {
            info.elapsed_finalization_ms = Some(recipe.finalization_timer().elapsed(now));
        }

        if !station.status().is_pouring_phase() {
            return info;
        }
        let Some(current) = recipe.current_step() else {
            return info;
        };

        if tick_has_happened(current.start_tick, now) {
            info.step = Some(recipe.current_step_index() as u8);
            info.elapsed_step_ms = Some(now - current.start_tick);
        } else if recipe.has_executed_first_attack() {
            // resting after the previous attack
            let last_index = recipe.current_step_index() - 1;
            if let Some(last) = recipe.step(last_index) {
                info.step = Some(last_index as u8);
                info.elapsed_interval_ms = Some(now.saturating_sub(last.end_tick()));
            }
        }
        info
    }
}
