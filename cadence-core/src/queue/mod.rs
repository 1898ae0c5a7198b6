//! Recipe queue
//!
//! The queue owns one slot per station and keeps every active recipe on a
//! single collision-free timeline for the shared spout:
//!
//! - [`mapping`]: finding the earliest start tick for a recipe and pulling
//!   recipes forward after a cancellation
//! - [`execution`]: per-tick arbitration, step dispatch and missed-step
//!   compensation
//! - [`maintenance`]: the idle hose-warming pour
//! - [`report`]: progress snapshots for the host
//!
//! At most one slot is ever in execution. A slot is active exactly when its
//! station holds a recipe that is queued, pouring or finalizing.

mod execution;
pub mod maintenance;
mod mapping;
mod report;

use cadence_protocol::StationStatus;

use crate::config::MachineConfig;
use crate::error::RequestError;
use crate::recipe::Recipe;
use crate::station::{StationEvent, Stations};
use crate::time::Millis;
use crate::traits::Board;
use crate::MAX_STATIONS;

use maintenance::HoseWarmer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Slot {
    recipe: Recipe,
    active: bool,
}

/// Scheduler for the shared spout
#[derive(Debug, Clone)]
pub struct RecipeQueue {
    slots: [Slot; MAX_STATIONS],
    fixed_recipes: [Option<Recipe>; MAX_STATIONS],
    len: usize,
    /// Slot holding the spout
    in_execution: Option<usize>,
    /// Slot whose step is being poured right now
    dispatching: Option<usize>,
    /// A cancellation during a dispatch asked for a remap
    remap_pending: bool,
    hose: HoseWarmer,
    config: MachineConfig,
}

impl RecipeQueue {
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            slots: Default::default(),
            fixed_recipes: Default::default(),
            len: 0,
            in_execution: None,
            dispatching: None,
            remap_pending: false,
            hose: HoseWarmer::new(),
            config: *config,
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn travel_margin(&self) -> Millis {
        self.config.scheduler.travel_margin_ms
    }

    /// Number of active recipes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot holding the spout, if any
    pub fn in_execution(&self) -> Option<usize> {
        self.in_execution
    }

    /// A step is being poured
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.is_some()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.slots.get(index).map(|slot| slot.active).unwrap_or(false)
    }

    /// The active recipe of a station
    pub fn recipe(&self, index: usize) -> Option<&Recipe> {
        self.slots
            .get(index)
            .filter(|slot| slot.active)
            .map(|slot| &slot.recipe)
    }

    /// Active recipes with their remaining steps on the timeline
    pub fn mapped_recipes(&self) -> impl Iterator<Item = (usize, &Recipe)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active && slot.recipe.remaining_steps_are_mapped())
            .map(|(index, slot)| (index, &slot.recipe))
    }

    /// The idle maintenance pour is running
    pub fn is_heating_hose(&self) -> bool {
        self.hose.is_pouring()
    }

    /// Queue a recipe; it waits for the user to confirm it
    pub fn schedule<B>(
        &mut self,
        stations: &mut Stations,
        board: &mut B,
        index: usize,
        recipe: Recipe,
    ) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        let station = stations.get(index)?;
        if self.slots[index].active {
            return Err(RequestError::AlreadyQueued(index));
        }
        if station.is_blocked() {
            return Err(RequestError::StationBlocked(index));
        }
        if !station.is_free() {
            return Err(RequestError::StationBusy(index));
        }
        if self.len >= stations.count() {
            return Err(RequestError::QueueFull);
        }

        let soak = recipe.has_soak();
        let id = recipe.id();
        self.slots[index].recipe = recipe;
        self.activate(index);
        stations
            .get_mut(index)?
            .apply(StationEvent::Queued { soak }, Some(id), board);

        debug!("recipe {} queued on station {}", id, index);
        Ok(())
    }

    /// The user confirmed the pending phase of a station
    ///
    /// A Free station with a fixed recipe starts that recipe directly.
    pub fn confirm<B>(
        &mut self,
        stations: &mut Stations,
        board: &mut B,
        index: usize,
    ) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        let station = stations.get(index)?;
        if station.is_blocked() {
            return Err(RequestError::StationBlocked(index));
        }

        if !self.slots[index].active {
            return self.start_fixed_recipe(stations, board, index);
        }

        if !station.awaits_confirmation() {
            return Err(RequestError::NotAwaitingConfirmation(index));
        }
        if self.slots[index].recipe.remaining_steps_are_mapped() {
            return Err(RequestError::AlreadyMapped(index));
        }

        let id = self.slots[index].recipe.id();
        stations
            .get_mut(index)?
            .apply(StationEvent::Confirmed, Some(id), board);
        self.map_recipe(board, index);
        Ok(())
    }

    fn start_fixed_recipe<B>(
        &mut self,
        stations: &mut Stations,
        board: &mut B,
        index: usize,
    ) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        let Some(fixed) = self.fixed_recipes[index].as_ref() else {
            return Err(RequestError::NotQueued(index));
        };
        if !stations.get(index)?.is_free() {
            return Err(RequestError::NotAwaitingConfirmation(index));
        }
        if self.len >= stations.count() {
            return Err(RequestError::QueueFull);
        }

        let recipe = fixed.clone();
        let soak = recipe.has_soak();
        let id = recipe.id();
        self.slots[index].recipe = recipe;
        self.activate(index);
        self.map_recipe(board, index);
        stations
            .get_mut(index)?
            .apply(StationEvent::StartedDirectly { soak }, Some(id), board);

        debug!("fixed recipe {} started on station {}", id, index);
        Ok(())
    }

    /// Remove a station's recipe
    ///
    /// If the recipe holds the spout while its step is being poured, only
    /// the execution claim is dropped here; the dispatch notices and does
    /// the bookkeeping when the pour returns.
    pub fn cancel<B>(
        &mut self,
        stations: &mut Stations,
        board: &mut B,
        index: usize,
    ) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        stations.get(index)?;
        if !self.slots[index].active {
            return Err(RequestError::NotQueued(index));
        }

        self.deactivate(index);
        stations
            .get_mut(index)?
            .apply(StationEvent::Cancelled, None, board);
        info!("recipe cancelled on station {}", index);

        if self.in_execution == Some(index) {
            board.invalidate_location();
            self.in_execution = None;
            if self.dispatching == Some(index) {
                return Ok(());
            }
        }

        if self.dispatching.is_some() {
            self.remap_pending = true;
        } else {
            self.remap_after_change(board);
        }
        Ok(())
    }

    /// Cancel every active recipe
    ///
    /// Nothing is remapped in between, so the spout stays where it is.
    pub fn cancel_all<B>(&mut self, stations: &mut Stations, board: &mut B)
    where
        B: Board + ?Sized,
    {
        for index in 0..MAX_STATIONS {
            if !self.slots[index].active {
                continue;
            }
            self.deactivate(index);
            match stations.get_mut(index) {
                Ok(station) => {
                    station.apply(StationEvent::Cancelled, None, board);
                }
                Err(e) => error!("cancel of station {} failed: {}", index, e),
            }
        }

        if self.in_execution.take().is_some() {
            board.invalidate_location();
        }
        self.remap_pending = false;
        info!("every recipe cancelled");
    }

    /// Free the slots of recipes whose finalization time is over
    pub fn remove_finalized_recipes<B>(&mut self, stations: &mut Stations, board: &mut B)
    where
        B: Board + ?Sized,
    {
        if self.is_empty() {
            return;
        }

        let now = board.now_ms();
        for index in 0..stations.count() {
            let slot = &self.slots[index];
            let Ok(station) = stations.get_mut(index) else {
                continue;
            };
            if !slot.active || station.status() != StationStatus::Finalizing {
                continue;
            }
            let recipe = &slot.recipe;
            if recipe
                .finalization_timer()
                .has_elapsed(recipe.finalization_duration(), now)
            {
                debug!("finalization over on station {}", index);
                station.apply(StationEvent::FinalizationElapsed, Some(recipe.id()), board);
                self.deactivate(index);
            }
        }
    }

    /// Set or clear the recipe a station runs when confirmed while Free
    pub fn set_fixed_recipe(&mut self, index: usize, recipe: Option<Recipe>) -> Result<(), RequestError> {
        let fixed = self
            .fixed_recipes
            .get_mut(index)
            .ok_or(RequestError::InvalidStation(index))?;
        if recipe.is_some() {
            debug!("fixed recipe set on station {}", index);
        } else {
            debug!("fixed recipe cleared on station {}", index);
        }
        *fixed = recipe;
        Ok(())
    }

    pub fn fixed_recipe(&self, index: usize) -> Option<&Recipe> {
        self.fixed_recipes.get(index).and_then(Option::as_ref)
    }

    fn activate(&mut self, index: usize) {
        if !self.slots[index].active {
            self.slots[index].active = true;
            self.len += 1;
        }
    }

    fn deactivate(&mut self, index: usize) {
        if self.slots[index].active {
            self.slots[index].active = false;
            self.len -= 1;
        } else {
            error!("removing inactive slot {}", index);
        }
    }
}
