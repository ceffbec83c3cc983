use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Lines kept in the message area under the status table.
pub const MESSAGE_LINES: usize = 10;

/// Replies waiting to be drawn by the status panel, plus a count of lines
/// the user has entered below it since the last frame.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    lines: Arc<Mutex<VecDeque<String>>>,
    entered: Arc<AtomicU16>,
}

impl MessageLog {
    pub fn push(&self, text: &str) {
        let mut lines = self.lines.lock();
        for line in text.lines() {
            lines.push_back(line.to_string());
        }
        while lines.len() > MESSAGE_LINES {
            lines.pop_front();
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn line_entered(&self) {
        self.entered.fetch_add(1, Ordering::AcqRel);
    }

    pub fn take_entered(&self) -> u16 {
        self.entered.swap(0, Ordering::AcqRel)
    }
}

/// Where the command loop sends its replies: into the panel's message area
/// while the panel owns the terminal, straight to stdout otherwise.
#[derive(Debug, Clone)]
pub enum Console {
    Panel(MessageLog),
    Plain,
}

impl Console {
    pub fn reply<T: Display>(&self, text: T) {
        match self {
            Console::Panel(messages) => messages.push(&text.to_string()),
            Console::Plain => println!("{}", text),
        }
    }

    pub fn line_entered(&self) {
        if let Console::Panel(messages) = self {
            messages.line_entered();
        }
    }
}
