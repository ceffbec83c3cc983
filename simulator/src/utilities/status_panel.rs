use std::io::{self, stdout, Stdout, Write};
use std::sync::Arc;

use crossterm::{cursor, terminal, tty::IsTty, QueueableCommand};
use log::debug;
use parking_lot::Mutex;

use elevator_bank::{ElevatorSnapshot, Frame, Renderer};

use super::console::{MessageLog, MESSAGE_LINES};

const SEPARATOR: &str = "+-----+-------+-----------+--------------+------+------+-----+----------------------";

/// Redraws a table of every cabin and the latest command replies in place.
/// The line the cursor sits on belongs to the user: ordinary frames save the
/// cursor, repaint the panel above it and restore it, so half-typed input is
/// never wiped. Only after the user has entered lines below the panel is
/// everything under its top cleared and drawn again.
pub struct StatusPanel<W: Write = Stdout> {
    out: W,
    tty: bool,
    messages: MessageLog,
    height: u16,
}

impl StatusPanel<Stdout> {
    pub fn new(messages: MessageLog) -> Self {
        let out = stdout();
        let tty = out.is_tty();
        StatusPanel::with_writer(out, tty, messages)
    }
}

impl<W: Write> StatusPanel<W> {
    pub fn with_writer(out: W, tty: bool, messages: MessageLog) -> Self {
        StatusPanel {
            out: out,
            tty: tty,
            messages: messages,
            height: 0,
        }
    }

    fn redraw_everything(&mut self, lines: &[String], entered: u16) -> io::Result<()> {
        let above = self.height + entered;
        if above > 0 {
            self.out.queue(cursor::MoveUp(above))?;
        }
        self.out.queue(cursor::MoveToColumn(0))?;
        self.out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        for line in lines.iter() {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn repaint_above_cursor(&mut self, lines: &[String]) -> io::Result<()> {
        self.out.queue(cursor::SavePosition)?;
        self.out.queue(cursor::MoveUp(self.height))?;
        self.out.queue(cursor::MoveToColumn(0))?;
        for line in lines.iter() {
            write!(self.out, "{}", line)?;
            self.out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
            self.out.queue(cursor::MoveToNextLine(1))?;
        }
        self.out.queue(cursor::RestorePosition)?;
        Ok(())
    }
}

impl<W: Write + Send> Renderer for StatusPanel<W> {
    fn is_ready(&self) -> bool {
        self.tty
    }

    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        let lines = compose(frame, &self.messages.lines());
        let entered = self.messages.take_entered();

        if self.height == 0 || entered > 0 || usize::from(self.height) != lines.len() {
            self.redraw_everything(&lines, entered)?;
        } else {
            self.repaint_above_cursor(&lines)?;
        }
        self.height = lines.len() as u16;
        self.out.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Used when the panel is switched off: frames go to the log instead.
pub struct FrameLog;

impl Renderer for FrameLog {
    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        for snapshot in frame.elevators.iter() {
            debug!("t={:.2}s elevator {}: {}", frame.time, snapshot.index, snapshot);
        }
        Ok(())
    }
}

/// Keeps a copy of the newest frame for the `status` command, then hands
/// the frame on to the wrapped renderer when that one is ready.
pub struct FrameTap<R> {
    inner: R,
    latest: Arc<Mutex<Option<Frame>>>,
}

impl<R: Renderer> FrameTap<R> {
    pub fn new(inner: R) -> Self {
        FrameTap {
            inner: inner,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    pub fn latest(&self) -> Arc<Mutex<Option<Frame>>> {
        Arc::clone(&self.latest)
    }
}

impl<R: Renderer> Renderer for FrameTap<R> {
    fn render(&mut self, frame: &Frame) -> io::Result<()> {
        *self.latest.lock() = Some(frame.clone());
        if self.inner.is_ready() {
            self.inner.render(frame)
        } else {
            Ok(())
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

pub fn format_table(frame: &Frame) -> Vec<String> {
    let mut lines = Vec::with_capacity(frame.elevators.len() * 2 + 4);
    lines.push(format!("SIMULATED TIME {:.2}s", frame.time));
    lines.push(String::from(SEPARATOR));
    lines.push(format!(
        "| {0:<3} | {1:<5} | {2:<9} | {3:<12} | {4:<4} | {5:<4} | {6:<3} | {7}",
        "#", "FLOOR", "HEIGHT", "STATUS", "DIR", "NEXT", "PAX", "STOPS"
    ));
    for snapshot in frame.elevators.iter() {
        lines.push(String::from(SEPARATOR));
        lines.push(format_row(snapshot, frame.interpolation));
    }
    lines.push(String::from(SEPARATOR));
    lines
}

/// The table followed by a message area of fixed height.
pub fn compose(frame: &Frame, messages: &[String]) -> Vec<String> {
    let mut lines = format_table(frame);
    lines.push(String::new());
    let shown = &messages[messages.len().saturating_sub(MESSAGE_LINES)..];
    lines.extend(shown.iter().cloned());
    lines.extend((shown.len()..MESSAGE_LINES).map(|_| String::new()));
    lines
}

/// One line per cabin, for the `status` command.
pub fn format_status(frame: &Frame) -> Vec<String> {
    let mut lines = Vec::with_capacity(frame.elevators.len() + 1);
    lines.push(format!("SIMULATED TIME {:.2}s", frame.time));
    for snapshot in frame.elevators.iter() {
        lines.push(format!("{}: {}", snapshot.index, snapshot));
    }
    lines
}

pub fn format_row(snapshot: &ElevatorSnapshot, interpolation: f64) -> String {
    format!(
        "| {0:<3} | {1:<5} | {2:>8.2}m | {3:<12} | {4:<4} | {5:<4} | {6:<3} | {7}",
        snapshot.index,
        snapshot.current_floor,
        snapshot.display_elevation(interpolation),
        snapshot.status.as_string(),
        snapshot.direction.as_string().unwrap_or_else(|| String::from("-")),
        snapshot.next_destination_floor,
        snapshot.passengers_aboard,
        snapshot.queued_stops.join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use elevator_bank::{Request, Tower};

    fn busy_frame() -> Frame {
        let mut tower = Tower::with_start_floors(&[0, 0]);
        tower.assign(Request::new(12, 0).unwrap(), 0.0);
        tower.advance(0.0, 0.04);
        tower.advance(0.04, 0.04);
        Frame {
            time: 0.08,
            interpolation: 0.5,
            elevators: tower.elevators().iter().map(|e| e.snapshot()).collect(),
        }
    }

    #[test]
    fn idle_row_shows_no_direction() {
        let frame = busy_frame();
        let row = format_row(&frame.elevators[1], 0.0);
        assert_eq!(row, "| 1   | 0     |     0.00m | idle         | -    | 0    | 0   | ");
    }

    #[test]
    fn elevation_keeps_its_sign() {
        let snapshot = ElevatorSnapshot {
            index: 3,
            current_floor: 0,
            elevation_meters: -0.25,
            velocity: 0.0,
            status: elevator_bank::Status::Idle,
            direction: elevator_bank::Direction::Stop,
            next_destination_floor: 0,
            passengers_aboard: 0,
            queued_stops: Vec::new(),
        };
        assert!(format_row(&snapshot, 0.0).contains("|    -0.25m |"));
        assert_eq!(snapshot.to_string(), "0 - -0.25m idle");
    }

    #[test]
    fn moving_row_lists_its_stops() {
        let frame = busy_frame();
        let row = format_row(&frame.elevators[0], frame.interpolation);
        assert!(row.contains("accelerating"));
        assert!(row.contains("| up   |"));
        assert!(row.contains("| 12   |"));
        assert!(row.ends_with("12-0 (1)"));
    }

    #[test]
    fn table_has_a_row_per_elevator() {
        let frame = busy_frame();
        let lines = format_table(&frame);
        assert_eq!(lines.len(), 2 * frame.elevators.len() + 4);
        assert_eq!(lines[0], "SIMULATED TIME 0.08s");
        assert_eq!(lines.last().map(String::as_str), Some(SEPARATOR));
    }

    fn ansi<C: crossterm::Command>(command: C) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.queue(command).unwrap();
        bytes
    }

    fn contains(output: &[u8], needle: &[u8]) -> bool {
        output.windows(needle.len()).any(|window| window == needle)
    }

    fn render_and_take(panel: &mut StatusPanel<Vec<u8>>, frame: &Frame) -> Vec<u8> {
        panel.render(frame).unwrap();
        std::mem::take(&mut panel.out)
    }

    #[test]
    fn reply_stays_visible_in_later_frames() {
        let messages = MessageLog::default();
        let mut panel = StatusPanel::with_writer(Vec::new(), true, messages.clone());
        let frame = busy_frame();
        render_and_take(&mut panel, &frame);

        let reply = "99 is not a valid floor number (0..=55)";
        messages.push(reply);
        let first = render_and_take(&mut panel, &frame);
        let second = render_and_take(&mut panel, &frame);
        assert!(contains(&first, reply.as_bytes()));
        assert!(contains(&second, reply.as_bytes()));
    }

    #[test]
    fn ordinary_frames_leave_the_input_line_alone() {
        let mut panel = StatusPanel::with_writer(Vec::new(), true, MessageLog::default());
        let frame = busy_frame();
        let first = render_and_take(&mut panel, &frame);
        assert!(contains(&first, &ansi(terminal::Clear(terminal::ClearType::FromCursorDown))));

        let second = render_and_take(&mut panel, &frame);
        assert!(second.starts_with(&ansi(cursor::SavePosition)));
        assert!(second.ends_with(&ansi(cursor::RestorePosition)));
        assert!(!contains(&second, &ansi(terminal::Clear(terminal::ClearType::FromCursorDown))));
    }

    #[test]
    fn entered_lines_are_cleared_on_the_next_frame() {
        let messages = MessageLog::default();
        let mut panel = StatusPanel::with_writer(Vec::new(), true, messages.clone());
        let frame = busy_frame();
        render_and_take(&mut panel, &frame);

        messages.line_entered();
        let height = compose(&frame, &[]).len() as u16;
        let output = render_and_take(&mut panel, &frame);
        assert!(output.starts_with(&ansi(cursor::MoveUp(height + 1))));
        assert!(contains(&output, &ansi(terminal::Clear(terminal::ClearType::FromCursorDown))));
    }

    #[test]
    fn message_area_has_a_fixed_height() {
        let frame = busy_frame();
        let empty = compose(&frame, &[]);
        let overfull = compose(&frame, &vec![String::from("reply"); MESSAGE_LINES + 4]);
        assert_eq!(empty.len(), format_table(&frame).len() + 1 + MESSAGE_LINES);
        assert_eq!(overfull.len(), empty.len());
    }

    #[test]
    fn status_lists_every_cabin() {
        let lines = format_status(&busy_frame());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "SIMULATED TIME 0.08s");
        assert!(lines[1].starts_with("0: 0 - "));
        assert!(lines[1].ends_with("accelerating up"));
        assert_eq!(lines[2], "1: 0 - 0.00m idle");
    }

    struct Offline;

    impl Renderer for Offline {
        fn is_ready(&self) -> bool {
            false
        }

        fn render(&mut self, _frame: &Frame) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "drawn while offline"))
        }
    }

    #[test]
    fn tap_keeps_frames_the_inner_renderer_skips() {
        let mut tap = FrameTap::new(Offline);
        let latest = tap.latest();
        assert!(latest.lock().is_none());

        assert!(tap.is_ready());
        assert!(tap.render(&busy_frame()).is_ok());
        let frame = latest.lock().clone();
        assert_eq!(frame.map(|f| f.elevators.len()), Some(2));
    }

    #[test]
    fn frame_log_never_fails() {
        let mut renderer = FrameLog;
        assert!(renderer.render(&busy_frame()).is_ok());
    }
}
