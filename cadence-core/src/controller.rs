//! Controller
//!
//! Owns the stations, the queue and the safety monitor, accepts host
//! commands and runs the per-tick update. Dropped requests are logged and
//! reported to the host as [`StatusEvent::Rejected`].

use cadence_protocol::{
    HostCommand, QueueInfo, RecipeDescription, RequestRejected, SafetyUpdate, StationStatus,
    StatusEvent,
};

use crate::config::{ConfigError, MachineConfig};
use crate::error::RequestError;
use crate::queue::RecipeQueue;
use crate::recipe::Recipe;
use crate::safety::{AlarmFlags, SafetyMonitor};
use crate::station::{ButtonAction, StationEvent, Stations};
use crate::traits::Board;

/// Scheduling core of the machine
#[derive(Debug, Clone)]
pub struct Controller {
    config: MachineConfig,
    stations: Stations,
    queue: RecipeQueue,
    safety: SafetyMonitor,
}

impl Controller {
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut stations = Stations::new();
        stations
            .initialize(config.station_count as usize)
            .map_err(|_| ConfigError::InvalidStationCount)?;

        Ok(Self {
            config,
            stations,
            queue: RecipeQueue::new(&config),
            safety: SafetyMonitor::new(),
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn stations(&self) -> &Stations {
        &self.stations
    }

    pub fn queue(&self) -> &RecipeQueue {
        &self.queue
    }

    pub fn safety(&self) -> &SafetyMonitor {
        &self.safety
    }

    pub fn safety_mut(&mut self) -> &mut SafetyMonitor {
        &mut self.safety
    }

    /// Apply a host command, reporting it to the host if it is dropped
    pub fn handle<B>(&mut self, board: &mut B, command: &HostCommand) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        let result = match command {
            HostCommand::Initialize { station_count } => self.initialize(*station_count as usize),
            HostCommand::SetAvailability { available_mask } => {
                self.set_station_availability(*available_mask);
                Ok(())
            }
            HostCommand::Schedule { station, recipe } => {
                self.schedule(board, *station as usize, recipe)
            }
            HostCommand::ScheduleStandard { stations } => self.schedule_standard(board, stations),
            HostCommand::Confirm { station } => self.confirm(board, *station as usize),
            HostCommand::Cancel { stations } => self.cancel(board, stations),
            HostCommand::CancelAll => {
                self.cancel_all(board);
                Ok(())
            }
            HostCommand::QueryStatus { stations } => {
                self.query_status(board, stations);
                Ok(())
            }
            HostCommand::SetFixedRecipe { station, recipe } => {
                self.set_fixed_recipe(*station as usize, recipe.as_ref())
            }
        };

        if let Err(e) = result {
            reject(board, e);
        }
        result
    }

    /// Set the number of stations
    pub fn initialize(&mut self, station_count: usize) -> Result<(), RequestError> {
        self.stations.initialize(station_count)?;
        self.config.station_count = station_count as u8;
        Ok(())
    }

    /// Block every station whose bit is clear
    pub fn set_station_availability(&mut self, available_mask: u8) {
        self.stations.set_availability(available_mask);
    }

    /// Queue a host recipe for a station
    pub fn schedule<B>(
        &mut self,
        board: &mut B,
        station: usize,
        description: &RecipeDescription,
    ) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        self.ensure_safe()?;
        let recipe = Recipe::from_description(description)?;
        self.queue.schedule(&mut self.stations, board, station, recipe)
    }

    /// Queue the standard recipe on every listed station
    ///
    /// Every station is attempted; the first failure is returned.
    pub fn schedule_standard<B>(&mut self, board: &mut B, stations: &[u8]) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        self.ensure_safe()?;
        let mut result = Ok(());
        for &station in stations {
            let scheduled =
                self.queue
                    .schedule(&mut self.stations, board, station as usize, Recipe::standard());
            if let Err(e) = scheduled {
                warn!("standard recipe not scheduled on station {}: {}", station, e);
                result = result.and(Err(e));
            }
        }
        result
    }

    /// The user confirmed the pending step of a station
    ///
    /// On a Ready station this means the cup was collected.
    pub fn confirm<B>(&mut self, board: &mut B, station: usize) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        if self.stations.get(station)?.status() == StationStatus::Ready {
            return self.collect(board, station);
        }
        self.ensure_safe()?;
        self.queue.confirm(&mut self.stations, board, station)
    }

    fn collect<B>(&mut self, board: &mut B, station: usize) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        if self.queue.is_active(station) {
            return Err(RequestError::StationBusy(station));
        }
        self.stations
            .get_mut(station)?
            .apply(StationEvent::Collected, None, board);
        Ok(())
    }

    /// Cancel the recipes of every listed station
    ///
    /// Every station is attempted; the first failure is returned.
    pub fn cancel<B>(&mut self, board: &mut B, stations: &[u8]) -> Result<(), RequestError>
    where
        B: Board + ?Sized,
    {
        let mut result = Ok(());
        for &station in stations {
            if let Err(e) = self.queue.cancel(&mut self.stations, board, station as usize) {
                warn!("cancel of station {} dropped: {}", station, e);
                result = result.and(Err(e));
            }
        }
        result
    }

    pub fn cancel_all<B>(&mut self, board: &mut B)
    where
        B: Board + ?Sized,
    {
        self.queue.cancel_all(&mut self.stations, board);
    }

    /// Report a snapshot of the listed stations
    pub fn query_status<B>(&mut self, board: &mut B, stations: &[u8]) -> QueueInfo
    where
        B: Board + ?Sized,
    {
        let info = self.queue.queue_info(&self.stations, stations, board.now_ms());
        board.report(&StatusEvent::Queue(info.clone()));
        info
    }

    pub fn set_fixed_recipe(
        &mut self,
        station: usize,
        description: Option<&RecipeDescription>,
    ) -> Result<(), RequestError> {
        let recipe = description.map(Recipe::from_description).transpose()?;
        self.queue.set_fixed_recipe(station, recipe)
    }

    /// Per-tick update
    ///
    /// Safety first: a newly raised alarm ends any pour and cancels every
    /// recipe, and while one is active nothing else runs.
    pub fn tick<B>(&mut self, board: &mut B, alarms: &AlarmFlags)
    where
        B: Board + ?Sized,
    {
        for transition in self.safety.poll(alarms) {
            board.report(&StatusEvent::Safety(transition));
            if transition.active {
                self.trip(board, transition);
            }
        }
        if self.safety.is_faulted() {
            return;
        }

        self.queue.tick(&mut self.stations, board);
        self.queue.remove_finalized_recipes(&mut self.stations, board);
        self.poll_buttons(board);
    }

    fn trip<B>(&mut self, board: &mut B, transition: SafetyUpdate)
    where
        B: Board + ?Sized,
    {
        error!("stopping everything: {}", transition.reason);
        if board.is_pouring() {
            board.end_pour();
        }
        if !self.queue.is_empty() {
            self.queue.cancel_all(&mut self.stations, board);
        }
    }

    fn poll_buttons<B>(&mut self, board: &mut B)
    where
        B: Board + ?Sized,
    {
        let now = board.now_ms();
        for index in 0..self.stations.count() {
            let held = board.is_button_held(index);
            let Ok(station) = self.stations.get_mut(index) else {
                continue;
            };
            let Some(action) = station.update_button(held, now, &self.config.input) else {
                continue;
            };

            let result = match (action, station.status()) {
                (ButtonAction::Click, StationStatus::Ready) => self.collect(board, index),
                (
                    ButtonAction::Click,
                    StationStatus::Free | StationStatus::ConfirmingSoak | StationStatus::ConfirmingAttacks,
                ) => self.queue.confirm(&mut self.stations, board, index),
                (ButtonAction::LongHold, _) if self.queue.is_active(index) => {
                    self.queue.cancel(&mut self.stations, board, index)
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                warn!("button on station {} ignored: {}", index, e);
            }
        }
    }

    fn ensure_safe(&self) -> Result<(), RequestError> {
        if self.safety.is_faulted() {
            Err(RequestError::Faulted)
        } else {
            Ok(())
        }
    }
}

fn reject<B>(board: &mut B, error: RequestError)
where
    B: Board + ?Sized,
{
    error!("request dropped: {}", error);
    board.report(&StatusEvent::Rejected(RequestRejected {
        station: error.station().map(|index| index as u8),
        reason: error.reason(),
    }));
}
