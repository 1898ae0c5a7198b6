//! Simulated brewer shared by the integration tests
#![allow(dead_code)]

use cadence_core::config::MachineConfig;
use cadence_core::protocol::{RecipeDescription, StatusEvent, StepDescription};
use cadence_core::queue::RecipeQueue;
use cadence_core::traits::{
    Clock, CommandExecutor, FlowController, Inbox, Motion, Reporter, Signal, Spout, StationInputs,
};
use cadence_core::{Millis, Recipe, Stations, MAX_STATIONS};

/// A pour as the spout actually ran it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pour {
    pub station: Option<usize>,
    pub start: Millis,
    pub end: Millis,
}

/// Machine whose clock only moves when told to, or when something blocks
///
/// Travel between stations takes `travel_ms`. An action runs for the
/// number of milliseconds its last word names (`"POUR 6000"`).
pub struct SimBoard {
    pub now: Millis,
    pub travel_ms: Millis,
    pub location: Option<usize>,
    pub pours: Vec<Pour>,
    pub events: Vec<StatusEvent>,
    pub cancel_during_next: Option<usize>,
    pub confirm_during_next: Option<usize>,
    pub pouring: bool,
    pub buttons: [bool; MAX_STATIONS],
}

impl SimBoard {
    pub fn new(now: Millis) -> Self {
        Self {
            now,
            travel_ms: 0,
            location: None,
            pours: Vec::new(),
            events: Vec::new(),
            cancel_during_next: None,
            confirm_during_next: None,
            pouring: false,
            buttons: [false; MAX_STATIONS],
        }
    }

    pub fn with_travel(mut self, travel_ms: Millis) -> Self {
        self.travel_ms = travel_ms;
        self
    }

    /// Status changes reported for one station, in order
    pub fn statuses(&self, station: u8) -> Vec<cadence_core::StationStatus> {
        self.events
            .iter()
            .filter_map(|event| match event {
                StatusEvent::Station(update) if update.station == station => Some(update.status),
                _ => None,
            })
            .collect()
    }
}

impl Clock for SimBoard {
    fn now_ms(&self) -> Millis {
        self.now
    }
}

impl Motion for SimBoard {
    fn travel_to_station(&mut self, index: usize, _offset: f32) {
        if self.location != Some(index) {
            self.now += self.travel_ms;
            self.location = Some(index);
        }
    }

    fn travel_to_waste(&mut self) {
        self.now += self.travel_ms;
        self.location = None;
    }

    fn home(&mut self) {}

    fn finish_pending_motion(&mut self) {}

    fn invalidate_location(&mut self) {
        self.location = None;
    }
}

impl CommandExecutor for SimBoard {
    fn execute(&mut self, action: &str, inbox: &mut Inbox) {
        let duration: Millis = action
            .rsplit(' ')
            .next()
            .and_then(|word| word.parse().ok())
            .unwrap_or(0);
        let start = self.now;
        self.now += duration;
        self.pours.push(Pour {
            station: self.location,
            start,
            end: self.now,
        });

        if let Some(station) = self.cancel_during_next.take() {
            inbox.request_cancel(station);
        }
        if let Some(station) = self.confirm_during_next.take() {
            inbox.request_confirm(station);
        }
    }
}

impl Spout for SimBoard {
    fn pour(&mut self, _duration_ms: u32, _signal: Signal) {
        self.pouring = true;
    }

    fn end_pour(&mut self) {
        self.pouring = false;
    }

    fn is_pouring(&self) -> bool {
        self.pouring
    }
}

impl FlowController for SimBoard {
    fn best_signal_for_rate(&self, rate_ml_per_s: f32) -> Signal {
        (rate_ml_per_s * 100.0) as Signal
    }
}

impl Reporter for SimBoard {
    fn report(&mut self, event: &StatusEvent) {
        self.events.push(event.clone());
    }
}

impl StationInputs for SimBoard {
    fn is_button_held(&self, index: usize) -> bool {
        self.buttons[index]
    }
}

pub fn config(station_count: u8) -> MachineConfig {
    let mut config = MachineConfig {
        station_count,
        ..Default::default()
    };
    config.maintenance.enabled = false;
    config
}

pub fn machine(station_count: u8) -> (RecipeQueue, Stations) {
    let mut stations = Stations::new();
    stations.initialize(station_count as usize).unwrap();
    (RecipeQueue::new(&config(station_count)), stations)
}

pub fn step(duration: Millis, interval: Millis) -> StepDescription {
    StepDescription::new(duration, interval, &format!("POUR {duration}")).unwrap()
}

/// Attack-only recipe from `(duration, interval)` pairs
pub fn recipe(id: u32, steps: &[(Millis, Millis)]) -> Recipe {
    let mut description = RecipeDescription {
        id,
        ..Default::default()
    };
    for &(duration, interval) in steps {
        description.push_attack(step(duration, interval)).unwrap();
    }
    Recipe::from_description(&description).unwrap()
}

/// Queue and confirm a recipe so it goes on the timeline
pub fn start(
    queue: &mut RecipeQueue,
    stations: &mut Stations,
    board: &mut SimBoard,
    index: usize,
    recipe: Recipe,
) {
    queue.schedule(stations, board, index, recipe).unwrap();
    queue.confirm(stations, board, index).unwrap();
}

/// Start tick of a station's next step
pub fn start_tick(queue: &RecipeQueue, index: usize) -> Millis {
    queue
        .recipe(index)
        .and_then(|recipe| recipe.current_step())
        .map(|step| step.start_tick)
        .unwrap()
}

/// Tick once per millisecond until `until` or the queue drains
pub fn run(queue: &mut RecipeQueue, stations: &mut Stations, board: &mut SimBoard, until: Millis) {
    while board.now < until && !queue.is_empty() {
        queue.tick(stations, board);
        queue.remove_finalized_recipes(stations, board);
        assert!(!queue.is_dispatching());
        board.now += 1;
    }
}
