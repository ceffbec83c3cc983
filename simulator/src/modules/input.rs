use std::io::{self, BufRead};

use crossbeam_channel::Sender;
use log::{error, info};

use crate::utilities::command::{self, Command, CommandError};
use crate::utilities::console::Console;

/// Forwards parsed stdin lines until the user quits or stdin closes.
pub fn main(random_limit: u8, console: Console, command_tx: Sender<Result<Command, CommandError>>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("failed to read from stdin: {}", e);
                break;
            }
        };
        console.line_entered();
        let parsed = command::parse(&line, random_limit);
        let quit = parsed == Ok(Command::Quit);
        if command_tx.send(parsed).is_err() || quit {
            return;
        }
    }
    info!("stdin closed");
    // receiver may already be gone
    let _ = command_tx.send(Ok(Command::Quit));
}
