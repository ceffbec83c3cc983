/// ----- SIMULATION MODULE -----
/// Fixed-rate update loop. Physics advances in constant `FIXED_DELTA_TIME`
/// steps no matter how often frames are drawn; when the loop falls behind
/// it catches up at most `MAX_FRAME_SKIP` steps per iteration so a slow
/// renderer cannot stall it forever.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use crate::clock::{Clock, MonotonicClock};
use crate::config::{FIXED_DELTA_TIME, FIXED_UPDATES_PER_SECOND, FRAMES_PER_SECOND, MAX_FRAME_SKIP};
use crate::elevator::{Elevator, ElevatorSnapshot};
use crate::error::SimulationError;
use crate::tower::Tower;

/// Anything the loop advances each tick and can show on screen.
pub trait SimObject: Send {
    fn advance(&mut self, now: f64, delta_time: f64);
    fn describe(&self) -> Vec<ElevatorSnapshot>;
}

impl SimObject for Tower {
    fn advance(&mut self, now: f64, delta_time: f64) {
        Tower::advance(self, now, delta_time);
    }

    fn describe(&self) -> Vec<ElevatorSnapshot> {
        self.elevators().iter().map(Elevator::snapshot).collect()
    }
}

impl SimObject for Elevator {
    fn advance(&mut self, now: f64, delta_time: f64) {
        Elevator::advance(self, now, delta_time);
    }

    fn describe(&self) -> Vec<ElevatorSnapshot> {
        vec![self.snapshot()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Simulated seconds at the last completed tick.
    pub time: f64,
    /// How far (0..=1) wall time has moved towards the next tick.
    pub interpolation: f64,
    pub elevators: Vec<ElevatorSnapshot>,
}

pub trait Renderer: Send {
    /// A renderer that is still setting up has its frames skipped.
    fn is_ready(&self) -> bool {
        true
    }

    fn render(&mut self, frame: &Frame) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        (**self).render(frame)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Decides how many ticks and whether a frame are due at a given time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    update_interval: f64,
    frame_interval: f64,
    next_update: f64,
    next_frame: f64,
}

impl FixedTimestep {
    pub fn new(start: f64) -> Self {
        let update_interval = 1.0 / f64::from(FIXED_UPDATES_PER_SECOND);
        let frame_interval = 1.0 / f64::from(FRAMES_PER_SECOND);
        FixedTimestep {
            update_interval: update_interval,
            frame_interval: frame_interval,
            next_update: start + update_interval,
            next_frame: start + frame_interval,
        }
    }

    pub fn due_updates(&mut self, now: f64) -> u32 {
        let mut loops = 0;
        while now > self.next_update && loops < MAX_FRAME_SKIP {
            self.next_update += self.update_interval;
            loops += 1;
        }
        loops
    }

    /// Returns the interpolation factor if a frame is due.
    pub fn frame_due(&mut self, now: f64) -> Option<f64> {
        if now < self.next_frame {
            return None;
        }
        self.next_frame = now + self.frame_interval;
        let interpolation = (now + self.update_interval - self.next_update) / self.update_interval;
        Some(interpolation.clamp(0.0, 1.0))
    }

    pub fn next_deadline(&self) -> f64 {
        self.next_update.min(self.next_frame)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    pub updates: u32,
    pub rendered: bool,
}

pub struct Simulation {
    objects: Vec<Box<dyn SimObject>>,
    clock: Box<dyn Clock>,
    timestep: FixedTimestep,
    ticks: u64,
    running: Arc<AtomicBool>,
}

impl Simulation {
    pub fn new(tower: Tower) -> Self {
        Simulation::with_objects(vec![Box::new(tower)], Box::new(MonotonicClock::new()))
    }

    pub fn with_objects(objects: Vec<Box<dyn SimObject>>, clock: Box<dyn Clock>) -> Self {
        let timestep = FixedTimestep::new(clock.now());
        Simulation {
            objects: objects,
            clock: clock,
            timestep: timestep,
            ticks: 0,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulated seconds elapsed.
    pub fn time(&self) -> f64 {
        self.ticks as f64 * FIXED_DELTA_TIME
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances every object by one fixed step.
    pub fn tick(&mut self) {
        let now = self.time();
        for object in self.objects.iter_mut() {
            object.advance(now, FIXED_DELTA_TIME);
        }
        self.ticks += 1;
    }

    pub fn describe(&self) -> Vec<ElevatorSnapshot> {
        self.objects.iter().flat_map(|object| object.describe()).collect()
    }

    /// One loop iteration: run the ticks that are due, then draw if a frame is due.
    pub fn pump(&mut self, renderer: &mut dyn Renderer) -> Iteration {
        let now = self.clock.now();
        let updates = self.timestep.due_updates(now);
        for _ in 0..updates {
            self.tick();
        }

        let rendered = match self.timestep.frame_due(now) {
            Some(interpolation) if renderer.is_ready() => {
                let frame = Frame {
                    time: self.time(),
                    interpolation: interpolation,
                    elevators: self.describe(),
                };
                if let Err(e) = renderer.render(&frame) {
                    warn!("failed to render frame at {:.2}s: {}", frame.time, e);
                }
                true
            }
            Some(_) | None => false,
        };

        Iteration { updates: updates, rendered: rendered }
    }

    /// Loops until the running flag is cleared, then closes the renderer.
    pub fn run(&mut self, renderer: &mut dyn Renderer) {
        info!("simulation started");
        self.timestep = FixedTimestep::new(self.clock.now());

        while self.running.load(Ordering::Acquire) {
            self.pump(renderer);
            let wait = self.timestep.next_deadline() - self.clock.now();
            if wait > 0.0 {
                thread::sleep(Duration::from_secs_f64(wait));
            }
        }

        if let Err(e) = renderer.close() {
            warn!("failed to close renderer: {}", e);
        }
        info!("simulation stopped after {} ticks ({:.2}s)", self.ticks, self.time());
    }

    /// Runs the loop on its own thread.
    pub fn start<R: Renderer + 'static>(mut self, mut renderer: R) -> Result<SimulationHandle, SimulationError> {
        let running = Arc::clone(&self.running);
        let thread = thread::Builder::new()
            .name("simulation".to_string())
            .spawn(move || {
                self.run(&mut renderer);
                self
            })?;
        Ok(SimulationHandle { running: running, thread: thread })
    }
}

pub struct SimulationHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<Simulation>,
}

impl SimulationHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.thread.is_finished()
    }

    /// Asks the loop to finish its current iteration and waits for it.
    pub fn stop(self) -> Result<Simulation, SimulationError> {
        self.running.store(false, Ordering::Release);
        self.thread.join().map_err(|_| SimulationError::Panicked)
    }
}
