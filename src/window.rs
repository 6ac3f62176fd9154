//! Window chrome boundary.
//!
//! The presentation layer talks to whatever owns its window through the
//! narrow [`WindowHost`] capability: four commands, a state query, a push
//! subscription for state changes and a zoom factor. It carries no task data,
//! so a front end can run without one.
//!
//! [`HeadlessWindow`] tracks the same state in memory. The terminal UI uses it
//! as its host, feeding terminal focus changes in through
//! [`WindowHost::handle_event`].

use std::sync::mpsc::{self, Receiver, Sender};

use serde::Serialize;
use tracing::debug;

/// Snapshot pushed to subscribers after every window event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub is_maximized: bool,
    pub is_full_screen: bool,
    pub is_focused: bool,
}

/// Platform-side window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Maximize,
    Unmaximize,
    EnterFullScreen,
    LeaveFullScreen,
    Focus,
    Blur,
}

/// Content zoom factor, clamped to `[MIN, MAX]` and kept at two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f64);

impl Zoom {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 3.0;
    pub const STEP: f64 = 0.1;

    pub fn new(factor: f64) -> Self {
        let rounded = (factor * 100.0).round() / 100.0;
        Zoom(rounded.clamp(Self::MIN, Self::MAX))
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    pub fn by(self, delta: f64) -> Self {
        Zoom::new(self.0 + delta)
    }

    pub fn zoomed_in(self) -> Self {
        self.by(Self::STEP)
    }

    pub fn zoomed_out(self) -> Self {
        self.by(-Self::STEP)
    }

    /// Whole-number percentage for display.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom(1.0)
    }
}

/// Capability interface to the window owning the UI.
pub trait WindowHost {
    /// Minimize, leaving full screen first.
    fn minimize(&mut self);

    /// Maximize or restore, leaving full screen first. Returns the new maximized flag.
    fn toggle_maximize(&mut self) -> bool;

    /// Enter or leave full screen. Returns the new full-screen flag.
    fn toggle_full_screen(&mut self) -> bool;

    fn close(&mut self);

    fn state(&self) -> WindowState;

    /// Receive a state snapshot after every subsequent window event.
    fn subscribe(&mut self) -> Receiver<WindowState>;

    /// Deliver an event originating from the platform.
    fn handle_event(&mut self, event: WindowEvent);

    fn zoom(&self) -> Zoom;

    fn set_zoom(&mut self, zoom: Zoom);

    fn is_closed(&self) -> bool;

    /// Set by `minimize`, cleared when the window regains focus.
    fn is_minimized(&self) -> bool;
}

/// In-memory window host.
#[derive(Debug)]
pub struct HeadlessWindow {
    state: WindowState,
    minimized: bool,
    closed: bool,
    zoom: Zoom,
    subscribers: Vec<Sender<WindowState>>,
}

impl HeadlessWindow {
    /// A focused, restored window at 100% zoom.
    pub fn new() -> Self {
        Self {
            state: WindowState {
                is_focused: true,
                ..WindowState::default()
            },
            minimized: false,
            closed: false,
            zoom: Zoom::default(),
            subscribers: Vec::new(),
        }
    }

    fn broadcast(&mut self) {
        let state = self.state;
        self.subscribers.retain(|tx| tx.send(state).is_ok());
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowHost for HeadlessWindow {
    fn minimize(&mut self) {
        if self.state.is_full_screen {
            self.handle_event(WindowEvent::LeaveFullScreen);
        }
        self.minimized = true;
        self.handle_event(WindowEvent::Blur);
    }

    fn toggle_maximize(&mut self) -> bool {
        if self.state.is_full_screen {
            self.handle_event(WindowEvent::LeaveFullScreen);
        }
        if self.state.is_maximized {
            self.handle_event(WindowEvent::Unmaximize);
        } else {
            self.handle_event(WindowEvent::Maximize);
        }
        self.state.is_maximized
    }

    fn toggle_full_screen(&mut self) -> bool {
        if self.state.is_full_screen {
            self.handle_event(WindowEvent::LeaveFullScreen);
        } else {
            self.handle_event(WindowEvent::EnterFullScreen);
        }
        self.state.is_full_screen
    }

    fn close(&mut self) {
        debug!("window closed");
        self.closed = true;
    }

    fn state(&self) -> WindowState {
        self.state
    }

    fn subscribe(&mut self) -> Receiver<WindowState> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Maximize => self.state.is_maximized = true,
            WindowEvent::Unmaximize => self.state.is_maximized = false,
            WindowEvent::EnterFullScreen => self.state.is_full_screen = true,
            WindowEvent::LeaveFullScreen => self.state.is_full_screen = false,
            WindowEvent::Focus => {
                self.minimized = false;
                self.state.is_focused = true;
            }
            WindowEvent::Blur => self.state.is_focused = false,
        }
        debug!(?event, state = ?self.state, "window event");
        self.broadcast();
    }

    fn zoom(&self) -> Zoom {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: Zoom) {
        self.zoom = zoom;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn is_minimized(&self) -> bool {
        self.minimized
    }
}
