use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// What the loop hands its handler.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopEvent {
    Input(Event),
    /// Sent once per iteration, before any input of that iteration. The
    /// docker's `tick` and the redraw hang off this.
    Tick(Instant),
}

/// The single polling loop of the host.
///
/// Every iteration sends one [`LoopEvent::Tick`], then waits up to
/// `poll_interval` for input and drains everything that is queued, so a
/// burst of mouse-drag events is handled before the next redraw instead of
/// one event per frame.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, LoopEvent) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, LoopEvent::Tick(Instant::now()))? {
                return Ok(());
            }

            if self.driver.poll(self.poll_interval)? {
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, LoopEvent::Input(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}
