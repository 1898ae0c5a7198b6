//! Host commands arriving as framed messages

mod common;

use cadence_core::protocol::{
    decode_command, decode_event, encode_command, encode_event, AlarmReason, HostCommand,
    RecipeDescription, RejectReason, RequestRejected, StationList, StatusEvent,
};
use cadence_core::safety::AlarmFlags;
use cadence_core::{Controller, RequestError, StationStatus};
use common::{config, step, SimBoard};

/// Round-trip a command through the wire format, as the host link would
fn receive(command: &HostCommand) -> HostCommand {
    let mut buffer = [0u8; 512];
    let frame = encode_command(command, &mut buffer).unwrap();
    decode_command(frame).unwrap()
}

fn stations(list: &[u8]) -> StationList {
    StationList::from_slice(list).unwrap()
}

fn single_pour(id: u32) -> RecipeDescription {
    let mut recipe = RecipeDescription {
        id,
        ..Default::default()
    };
    recipe.push_attack(step(3000, 0)).unwrap();
    recipe
}

#[test]
fn framed_recipe_is_brewed_and_collected() {
    let mut controller = Controller::new(config(3)).unwrap();
    let mut board = SimBoard::new(1000);
    let alarms = AlarmFlags::new();

    let schedule = receive(&HostCommand::Schedule {
        station: 1,
        recipe: single_pour(42),
    });
    controller.handle(&mut board, &schedule).unwrap();
    assert_eq!(
        controller.stations().get(1).unwrap().status(),
        StationStatus::ConfirmingAttacks
    );

    let confirm = receive(&HostCommand::Confirm { station: 1 });
    controller.handle(&mut board, &confirm).unwrap();

    while controller.stations().get(1).unwrap().status() != StationStatus::Ready {
        assert!(board.now < 10_000, "recipe never finished");
        controller.tick(&mut board, &alarms);
        board.now += 1;
    }
    assert_eq!(board.pours.len(), 1);
    assert_eq!(board.pours[0].station, Some(1));

    // the next confirmation is the user taking the cup
    controller.handle(&mut board, &confirm).unwrap();
    assert_eq!(board.statuses(1).last(), Some(&StationStatus::Free));
}

#[test]
fn dropped_commands_are_reported_back() {
    let mut controller = Controller::new(config(3)).unwrap();
    let mut board = SimBoard::new(1000);

    let result = controller.handle(&mut board, &receive(&HostCommand::Confirm { station: 4 }));
    assert_eq!(result, Err(RequestError::InvalidStation(4)));
    assert_eq!(
        board.events.last(),
        Some(&StatusEvent::Rejected(RequestRejected {
            station: Some(4),
            reason: RejectReason::InvalidStation,
        }))
    );

    let cancel = receive(&HostCommand::Cancel {
        stations: stations(&[2]),
    });
    assert_eq!(
        controller.handle(&mut board, &cancel),
        Err(RequestError::NotQueued(2))
    );
}

#[test]
fn standard_recipe_waits_for_the_soak_confirmation() {
    let mut controller = Controller::new(config(3)).unwrap();
    let mut board = SimBoard::new(1000);

    let command = receive(&HostCommand::ScheduleStandard {
        stations: stations(&[0, 2]),
    });
    controller.handle(&mut board, &command).unwrap();

    for index in [0, 2] {
        assert_eq!(
            controller.stations().get(index).unwrap().status(),
            StationStatus::ConfirmingSoak
        );
    }
    assert!(controller.stations().get(1).unwrap().is_free());
    assert_eq!(controller.queue().len(), 2);
}

#[test]
fn alarm_stops_framed_work() {
    let mut controller = Controller::new(config(2)).unwrap();
    let mut board = SimBoard::new(1000);
    let alarms = AlarmFlags::new();

    controller
        .handle(
            &mut board,
            &receive(&HostCommand::Schedule {
                station: 0,
                recipe: single_pour(1),
            }),
        )
        .unwrap();

    alarms.raise(AlarmReason::WaterLevelLow);
    controller.tick(&mut board, &alarms);
    assert!(controller.queue().is_empty());

    let result = controller.handle(
        &mut board,
        &receive(&HostCommand::Schedule {
            station: 0,
            recipe: single_pour(2),
        }),
    );
    assert_eq!(result, Err(RequestError::Faulted));
}

#[test]
fn reported_events_survive_framing() {
    let mut controller = Controller::new(config(2)).unwrap();
    let mut board = SimBoard::new(1000);

    controller
        .handle(
            &mut board,
            &HostCommand::Schedule {
                station: 0,
                recipe: single_pour(9),
            },
        )
        .unwrap();
    controller
        .handle(&mut board, &HostCommand::QueryStatus { stations: stations(&[0, 1]) })
        .unwrap();
    assert!(matches!(board.events.last(), Some(StatusEvent::Queue(_))));

    let mut buffer = [0u8; 256];
    for event in &board.events {
        let frame = encode_event(event, &mut buffer).unwrap();
        assert_eq!(&decode_event(frame).unwrap(), event);
    }
}
