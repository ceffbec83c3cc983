use std::env;
use std::fs::File;
use std::io::{self, stdout};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{select, unbounded};
use crossterm::tty::IsTty;
use log::{error, info};

use elevator_bank::{Renderer, RequestSender, Simulation, Tower};

use crate::utilities::command::{random_request, Command, HELP};
use crate::utilities::config::SimulatorConfig;
use crate::utilities::console::{Console, MessageLog};
use crate::utilities::status_panel::{format_status, FrameLog, FrameTap, StatusPanel};

mod input;

const WATCHDOG_INTERVAL: Duration = Duration::from_millis(500);
const LOG_FILE_PATH: &str = "simulator.log";

/// Level from `RUST_LOG`, `warn` by default. While the panel owns the
/// terminal the log goes to a file instead of stderr.
fn init_logging(to_file: bool) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if to_file {
        let file = File::create(LOG_FILE_PATH)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn submit(requests: &RequestSender, console: &Console, origin: u8, destination: u8) -> bool {
    match requests.submit(origin, destination) {
        Ok(()) => true,
        Err(e) => {
            console.reply(e);
            false
        }
    }
}

pub fn run() -> io::Result<()> {
    // READ CONFIGURATION
    let args: Vec<String> = env::args().skip(1).collect();
    let config = SimulatorConfig::get(&args);
    let panel = config.display.status_panel && stdout().is_tty();
    init_logging(panel)?;

    // INITIALIZE CHANNELS
    let (command_tx, command_rx) = unbounded();

    // INITIALIZE SIMULATION THREAD
    let tower = Tower::new();
    let requests = tower.sender();
    let (renderer, console): (Box<dyn Renderer>, Console) = if panel {
        let messages = MessageLog::default();
        (Box::new(StatusPanel::new(messages.clone())), Console::Panel(messages))
    } else {
        (Box::new(FrameLog), Console::Plain)
    };
    let renderer = FrameTap::new(renderer);
    let latest_frame = renderer.latest();
    let simulation = Simulation::new(tower)
        .start(renderer)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    // INITIALIZE THREAD FOR USER INPUT
    {
        let random_limit = config.input.random_request_limit;
        let console = console.clone();
        thread::Builder::new()
            .name("input".to_string())
            .spawn(move || input::main(random_limit, console, command_tx))?;
    }

    console.reply(HELP);
    let mut rng = rand::thread_rng();

    loop {
        select! {
            recv(command_rx) -> msg => match msg {
                Ok(Ok(Command::AddRequest { origin, destination })) => {
                    submit(&requests, &console, origin, destination);
                }
                Ok(Ok(Command::AddRandomRequests(count))) => {
                    for _ in 0..count {
                        let (origin, destination) = random_request(&mut rng);
                        if !submit(&requests, &console, origin, destination) {
                            break;
                        }
                    }
                }
                Ok(Ok(Command::Status)) => match latest_frame.lock().as_ref() {
                    Some(frame) => console.reply(format_status(frame).join("\n")),
                    None => console.reply("no frame drawn yet"),
                },
                Ok(Ok(Command::Help)) => console.reply(HELP),
                Ok(Err(e)) => console.reply(e),
                Ok(Ok(Command::Quit)) | Err(_) => break,
            },
            default(WATCHDOG_INTERVAL) => {
                if !simulation.is_running() {
                    error!("simulation thread exited on its own");
                    break;
                }
            }
        }
    }

    let simulation = simulation
        .stop()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("SIMULATION STOPPED");
    info!(
        "ran {} ticks, {:.2}s of simulated time",
        simulation.ticks(),
        simulation.time()
    );
    Ok(())
}
