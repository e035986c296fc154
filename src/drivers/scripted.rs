use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;

use super::InputDriver;

/// Replays a fixed queue of events. Once the queue is empty `poll` reports
/// nothing and `read` fails with `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct ScriptedInputDriver {
    events: VecDeque<Event>,
    polls: usize,
}

impl ScriptedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            polls: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// How many times `poll` was called.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl InputDriver for ScriptedInputDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        self.polls += 1;
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}
