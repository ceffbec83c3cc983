use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use elevator_bank::config::{FIXED_DELTA_TIME, FLOOR_HEIGHT, MAX_DELTA};
use elevator_bank::{Frame, Renderer, Request, RequestError, Simulation, Status, Tower};

#[test]
fn request_is_carried_end_to_end() {
    let tower = Tower::with_start_floors(&[0]);
    let sender = tower.sender();
    let expected = tower.elevators()[0].estimate_completion(&Request::new(3, 0).unwrap(), 0.0);
    let mut simulation = Simulation::new(tower);
    sender.submit(3, 0).unwrap();

    let mut highest_floor = 0;
    let mut carried = false;
    let mut finished_at = None;
    for _ in 0..3000 {
        simulation.tick();
        let snapshot = &simulation.describe()[0];
        highest_floor = highest_floor.max(snapshot.current_floor);
        carried |= snapshot.passengers_aboard == 1;
        if carried
            && finished_at.is_none()
            && snapshot.status == Status::Idle
            && snapshot.current_floor == 0
            && snapshot.queued_stops.is_empty()
            && snapshot.passengers_aboard == 0
        {
            finished_at = Some(simulation.time());
        }
    }

    assert_eq!(highest_floor, 3);
    let finished_at = finished_at.expect("the trip never finished");
    assert!((finished_at - expected).abs() < 1.0, "finished at {finished_at}, estimated {expected}");

    let snapshot = &simulation.describe()[0];
    assert_eq!(snapshot.status, Status::Idle);
    assert!(snapshot.elevation_meters.abs() < MAX_DELTA, "parked at {}", snapshot.elevation_meters);
    assert_eq!(snapshot.velocity, 0.0);
}

fn floor_error(elevation: f64) -> f64 {
    (elevation - (elevation / FLOOR_HEIGHT).round() * FLOOR_HEIGHT).abs()
}

#[test]
fn every_dwell_starts_level_with_a_floor() {
    let tower = Tower::with_start_floors(&[0]);
    for (origin, destination) in [(0, 50), (50, 0), (0, 37), (1, 0), (55, 0), (0, 2)] {
        tower.submit(origin, destination).unwrap();
    }
    let mut simulation = Simulation::new(tower);

    let mut dwells = 0;
    let mut previous = Status::Idle;
    for _ in 0..40_000 {
        simulation.tick();
        let snapshot = &simulation.describe()[0];
        if snapshot.status == Status::Waiting && previous != Status::Waiting {
            dwells += 1;
            let error = floor_error(snapshot.elevation_meters);
            assert!(
                error < MAX_DELTA,
                "dwell at floor {} began {error} m off ({} m)",
                snapshot.current_floor,
                snapshot.elevation_meters
            );
        }
        previous = snapshot.status;
        if snapshot.status == Status::Idle
            && snapshot.queued_stops.is_empty()
            && snapshot.next_destination_floor == snapshot.current_floor
            && dwells > 0
        {
            break;
        }
    }

    let snapshot = &simulation.describe()[0];
    assert!(snapshot.queued_stops.is_empty(), "still queued: {:?}", snapshot.queued_stops);
    assert!(dwells >= 6);
    assert!(floor_error(snapshot.elevation_meters) < MAX_DELTA);
}

#[test]
fn busy_elevator_hands_next_request_to_a_free_one() {
    let tower = Tower::with_start_floors(&[0, 0]);
    let sender = tower.sender();
    let mut simulation = Simulation::new(tower);

    sender.submit(40, 0).unwrap();
    for _ in 0..10 {
        simulation.tick();
    }
    sender.submit(0, 8).unwrap();
    simulation.tick();

    let snapshots = simulation.describe();
    assert_eq!(snapshots[0].next_destination_floor, 40);
    assert_eq!(snapshots[1].queued_stops, vec!["0-8 (1)"]);
    assert_eq!(snapshots[1].status, Status::Waiting);
}

#[test]
fn render_reads_interpolated_elevation() {
    let tower = Tower::with_start_floors(&[0]);
    tower.submit(10, 0).unwrap();
    let mut simulation = Simulation::new(tower);
    for _ in 0..20 {
        simulation.tick();
    }
    let snapshot = &simulation.describe()[0];
    assert!(snapshot.velocity > 0.0);
    let halfway = snapshot.display_elevation(0.5);
    assert!((halfway - (snapshot.elevation_meters + snapshot.velocity * 0.5 * FIXED_DELTA_TIME)).abs() < 1e-12);
}

struct Closing {
    frames: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl Renderer for Closing {
    fn render(&mut self, _frame: &Frame) -> io::Result<()> {
        self.frames.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn loop_runs_on_its_own_thread_until_stopped() {
    let tower = Tower::with_start_floors(&[0]);
    let sender = tower.sender();
    let frames = Arc::new(AtomicBool::new(false));
    let closed = Arc::new(AtomicBool::new(false));
    let renderer = Closing { frames: Arc::clone(&frames), closed: Arc::clone(&closed) };

    let handle = Simulation::new(tower).start(renderer).unwrap();
    sender.submit(0, 5).unwrap();
    thread::sleep(Duration::from_millis(400));
    assert!(handle.is_running());

    let simulation = handle.stop().unwrap();
    assert!(closed.load(Ordering::SeqCst));
    assert!(frames.load(Ordering::SeqCst));
    assert!(simulation.ticks() > 0);

    let snapshot = &simulation.describe()[0];
    assert_eq!(snapshot.status, Status::Waiting);
    assert_eq!(snapshot.queued_stops, vec!["0-5 (1)"]);

    drop(simulation);
    assert_eq!(sender.submit(0, 5), Err(RequestError::InboxClosed));
}
