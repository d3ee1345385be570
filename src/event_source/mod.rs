/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::ElevatorController;
use crate::logging::Logger;
use crate::shared::{Button, Direction, ParseDirectionError};
use crate::{log_error, log_info, log_warn};


/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Error)]
pub enum EventSourceError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected 3 fields but got {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: invalid floor '{value}'")]
    InvalidFloor { line: usize, value: String },
    #[error("line {line}: {source}")]
    InvalidDirection {
        line: usize,
        #[source]
        source: ParseDirectionError,
    },
    #[error("line {line}: invalid delay '{value}'")]
    InvalidDelay { line: usize, value: String },
    #[error("line {line}: record is not valid UTF-8")]
    InvalidEncoding { line: usize },
}

/// One scripted press: wait `delay` after the previous event, then press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPressEvent {
    pub floor: i32,
    pub direction: Direction,
    pub delay: Duration,
}

impl ButtonPressEvent {
    pub fn button(&self) -> Button {
        Button::new(self.floor, self.direction)
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/// Parses a `floor, direction, delayMs` record. `line` is 1-based and only used in errors.
pub fn parse_line(record: &str, line: usize) -> Result<ButtonPressEvent, EventSourceError> {
    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(EventSourceError::FieldCount {
            line,
            found: fields.len(),
        });
    }

    let floor = fields[0]
        .parse::<i32>()
        .map_err(|_| EventSourceError::InvalidFloor {
            line,
            value: fields[0].to_string(),
        })?;
    let direction = fields[1]
        .parse::<Direction>()
        .map_err(|source| EventSourceError::InvalidDirection { line, source })?;
    let delay_ms = fields[2]
        .parse::<u64>()
        .map_err(|_| EventSourceError::InvalidDelay {
            line,
            value: fields[2].to_string(),
        })?;

    Ok(ButtonPressEvent {
        floor,
        direction,
        delay: Duration::from_millis(delay_ms),
    })
}

/// Reads every record from `reader`. Malformed records are logged and skipped; only I/O
/// failures abort the load.
pub fn parse_events<R: BufRead>(
    reader: R,
    path: &Path,
    logger: &dyn Logger,
) -> Result<Vec<ButtonPressEvent>, EventSourceError> {
    let mut events = Vec::new();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|source| EventSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = decode_line(bytes, index + 1).and_then(|line| {
            if line.trim().is_empty() {
                Ok(None)
            } else {
                parse_line(&line, index + 1).map(Some)
            }
        });

        match parsed {
            Ok(Some(event)) => events.push(event),
            Ok(None) => continue,
            Err(e) => log_warn!(logger, "Skipping record in '{}': {}", path.display(), e),
        }
    }

    Ok(events)
}

fn decode_line(mut bytes: Vec<u8>, line: usize) -> Result<String, EventSourceError> {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8(bytes).map_err(|_| EventSourceError::InvalidEncoding { line })
}

pub fn load_events(path: &Path, logger: &dyn Logger) -> Result<Vec<ButtonPressEvent>, EventSourceError> {
    let file = File::open(path).map_err(|source| EventSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_events(BufReader::new(file), path, logger)
}

/**
 * Replays a scripted list of button presses against one elevator.
 *
 * The whole script is read before the first press. Delays are relative to the previous
 * press, not to the start of the replay.
 */
pub struct EventSource {
    events: Vec<ButtonPressEvent>,
    logger: Arc<dyn Logger>,
}

impl EventSource {
    pub fn new(events: Vec<ButtonPressEvent>, logger: Arc<dyn Logger>) -> EventSource {
        EventSource { events, logger }
    }

    /// Loads the script at `path`. An unreadable file is logged and yields an empty script.
    pub fn from_path(path: &Path, logger: Arc<dyn Logger>) -> EventSource {
        log_info!(logger, "Reading in file '{}'...", path.display());
        let events = match load_events(path, logger.as_ref()) {
            Ok(events) => events,
            Err(e) => {
                log_error!(logger, "No button presses will be simulated: {}", e);
                Vec::new()
            }
        };
        log_info!(logger, "Done reading file, {} events loaded.", events.len());
        EventSource::new(events, logger)
    }

    pub fn events(&self) -> &[ButtonPressEvent] {
        &self.events
    }

    /// Fires every event in order. A message on `stop_rx` ends the replay early.
    /// Returns the number of presses fired.
    pub fn run(&self, elevator: &ElevatorController, stop_rx: &cbc::Receiver<()>) -> usize {
        let mut fired = 0;

        for event in &self.events {
            if !self.wait(event.delay, stop_rx) {
                log_info!(self.logger, "Button presser interrupted after {} presses", fired);
                return fired;
            }
            match event.direction {
                Direction::None => elevator.press_internal_button(event.floor),
                direction => elevator.press_external_button(event.floor, direction),
            }
            fired += 1;
        }

        fired
    }

    // false when a stop was requested
    fn wait(&self, delay: Duration, stop_rx: &cbc::Receiver<()>) -> bool {
        match stop_rx.recv_timeout(delay) {
            Ok(()) => false,
            Err(cbc::RecvTimeoutError::Timeout) => true,
            Err(cbc::RecvTimeoutError::Disconnected) => {
                sleep(delay);
                true
            }
        }
    }
}
