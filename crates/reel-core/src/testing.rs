//! Headless harnesses for driving models and components in tests.
//!
//! Neither harness needs a terminal. Immediate messages are fed straight
//! back into `update` in the order they were produced, exactly like the
//! runtime's channel would deliver them. Deferred work (ticks, transition
//! timers) is parked and only runs when a test asks for it, which keeps
//! timing under the test's control when combined with
//! `#[tokio::test(start_paused = true)]`.

use crate::command::{Action, Command, CommandInner};
use crate::component::Component;
use crate::model::Model;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};
use std::collections::VecDeque;

/// Upper bound on flush rounds in [`TestComponent::settle`]. A component that
/// keeps scheduling work forever (an endless frame loop) stops here.
const MAX_SETTLE_ROUNDS: usize = 64;

/// Drives a [`Model`] through init/update/view.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Gallery>::new(flags);
/// prog.send(Msg::Next);
/// prog.drain_messages();
/// assert!(prog.render_string(60, 8).contains("Item 2"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    queue: VecDeque<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] and queue whatever immediate messages it returns.
    pub fn new(flags: M::Flags) -> Self {
        let (model, cmd) = M::init(flags);
        let mut program = Self {
            model,
            queue: VecDeque::new(),
            quit: false,
        };
        program.absorb(cmd);
        program
    }

    /// One update. Follow-up messages are queued, not processed.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.absorb(cmd);
    }

    /// Process queued messages until none are left.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            let cmd = self.model.update(msg);
            self.absorb(cmd);
        }
    }

    /// Whether any update asked the program to quit.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Draw into an off-screen buffer.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        draw(width, height, |frame| self.model.view(frame))
    }

    /// Draw and flatten the buffer into newline-separated rows.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn absorb(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::Action(Action::Message(msg)) => self.queue.push_back(msg),
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.absorb(cmd);
                }
            }
            // Deferred work never runs here; use TestComponent for timing.
            CommandInner::None | CommandInner::Future(_) => {}
        }
    }
}

/// Drives a single [`Component`] and records every message it processes.
///
/// Messages a component emits for its parent (via [`Command::message`]) come
/// back through `update` like any other, so they show up in
/// [`history`](TestComponent::history) in the order they were produced.
///
/// ```rust,ignore
/// let mut harness = TestComponent::new(carousel);
/// harness.send(Message::Next);
/// harness.settle().await; // the transition timer fires
/// assert!(harness.history().iter().any(|m| matches!(m, Message::Updated(_))));
/// ```
pub struct TestComponent<C: Component>
where
    C::Message: Clone,
{
    component: C,
    queue: VecDeque<C::Message>,
    deferred: Vec<BoxFuture<'static, C::Message>>,
    history: Vec<C::Message>,
}

impl<C: Component> TestComponent<C>
where
    C::Message: Clone,
{
    pub fn new(component: C) -> Self {
        Self {
            component,
            queue: VecDeque::new(),
            deferred: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Queue whatever a command produced outside of `update` (e.g. the
    /// command a constructor hands back) and process it.
    pub fn absorb(&mut self, cmd: Command<C::Message>) {
        self.collect(cmd);
        self.pump();
    }

    /// Process `msg` and every immediate message that follows from it.
    pub fn send(&mut self, msg: C::Message) {
        self.queue.push_back(msg);
        self.pump();
    }

    /// Run every parked future once, delivering results in completion order.
    /// Work scheduled while flushing waits for the next call. Returns how
    /// many futures resolved.
    pub async fn flush(&mut self) -> usize {
        let mut running: FuturesUnordered<_> = self.deferred.drain(..).collect();
        let mut resolved = 0;
        while let Some(msg) = running.next().await {
            resolved += 1;
            self.send(msg);
        }
        resolved
    }

    /// Flush until nothing is parked.
    pub async fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_ROUNDS {
            if self.flush().await == 0 {
                return;
            }
        }
        tracing::warn!("component still scheduling work after {MAX_SETTLE_ROUNDS} rounds");
    }

    /// Drop parked futures without running them.
    pub fn discard_pending(&mut self) {
        self.deferred.clear();
    }

    /// Number of parked futures.
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Every message processed so far, oldest first.
    pub fn history(&self) -> &[C::Message] {
        &self.history
    }

    /// Take the history, leaving it empty.
    pub fn take_history(&mut self) -> Vec<C::Message> {
        std::mem::take(&mut self.history)
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    pub fn into_inner(self) -> C {
        self.component
    }

    pub fn render(&self, width: u16, height: u16) -> Buffer {
        draw(width, height, |frame| {
            let area = frame.area();
            self.component.view(frame, area);
        })
    }

    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn pump(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            self.history.push(msg.clone());
            let cmd = self.component.update(msg);
            self.collect(cmd);
        }
    }

    fn collect(&mut self, cmd: Command<C::Message>) {
        match cmd.inner {
            CommandInner::None | CommandInner::Action(Action::Quit) => {}
            CommandInner::Action(Action::Message(msg)) => self.queue.push_back(msg),
            CommandInner::Future(fut) => self.deferred.push(fut),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

fn draw(width: u16, height: u16, paint: impl FnOnce(&mut Frame)) -> Buffer {
    let mut terminal =
        Terminal::new(TestBackend::new(width, height)).expect("test backend never fails");
    terminal.draw(paint).expect("test backend never fails");
    terminal.backend().buffer().clone()
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
