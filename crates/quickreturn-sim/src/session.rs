//! Replay a scroll trace against the engine on a simulated host

use std::time::Duration;

use quickreturn_core::{
    AnimationState, ContentInsets, ContinuousScrollSource, DeltaScrollSource, Edge, Error,
    ListScrollSource, QuickReturnConfig, QuickReturnContainer, RawScrollInput, Result,
    ScrollChange, ScrollSource, ViewHost, ViewId,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::host::{HostCallback, SimulatedHost};
use crate::trace::{ScrollTrace, TraceSource, TraceStep};

/// Upper bound for letting everything in flight finish
const SETTLE_LIMIT: Duration = Duration::from_secs(60);

/// Engine and host state after a step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub step: usize,
    pub time_ms: u64,
    pub state: AnimationState,
    /// Header translations, outermost first
    pub headers: Vec<f32>,
    /// Footer translations, outermost first
    pub footers: Vec<f32>,
    pub insets: ContentInsets,
}

pub struct ReplaySession {
    container: QuickReturnContainer,
    host: SimulatedHost,
    source: TraceSource,
    last_y: i32,
    next_view: u64,
}

impl ReplaySession {
    /// Attach the trace's bars and wire up its scroll source
    pub fn new(trace: &ScrollTrace, config: QuickReturnConfig) -> Result<Self> {
        config.validate()?;

        let mut session = Self {
            container: QuickReturnContainer::new(config.clone()),
            host: SimulatedHost::new(),
            source: trace.source,
            last_y: 0,
            next_view: 0,
        };

        for (edge, bars) in [(Edge::Header, &trace.headers), (Edge::Footer, &trace.footers)] {
            for bar in bars {
                session.next_view += 1;
                let view = ViewId(session.next_view);
                session.host.put_view(view, bar.height);
                session
                    .container
                    .attach(edge, view, bar.flags(), &mut session.host);
            }
        }

        let source: Option<Box<dyn ScrollSource>> = match trace.source {
            TraceSource::Direct => None,
            TraceSource::List => Some(Box::new(ListScrollSource::new())),
            TraceSource::Continuous => Some(Box::new(ContinuousScrollSource::new(&config))),
            TraceSource::Delta => Some(Box::new(DeltaScrollSource::new())),
        };
        if let Some(source) = source {
            session.container.observe(source, &mut session.host);
        }

        debug!(
            source = ?trace.source,
            headers = trace.headers.len(),
            footers = trace.footers.len(),
            "Replay session ready"
        );
        Ok(session)
    }

    /// Replay every step and snapshot after each one
    pub fn run(trace: &ScrollTrace, config: QuickReturnConfig) -> Result<Vec<Snapshot>> {
        let mut session = Self::new(trace, config)?;
        let mut snapshots = Vec::with_capacity(trace.steps.len());

        for (index, step) in trace.steps.iter().enumerate() {
            session.apply(step)?;
            snapshots.push(session.snapshot(index));
        }

        info!(steps = trace.steps.len(), end_ms = session.host.now().as_millis() as u64, "Replay finished");
        Ok(snapshots)
    }

    pub fn container(&self) -> &QuickReturnContainer {
        &self.container
    }

    pub fn host(&self) -> &SimulatedHost {
        &self.host
    }

    /// Translation of a bar by stacking position
    pub fn translation(&self, edge: Edge, index: usize) -> Option<f32> {
        let entry = self.container.registry().get(edge, index)?;
        Some(self.host.translation_y(entry.view))
    }

    pub fn apply(&mut self, step: &TraceStep) -> Result<()> {
        match step {
            TraceStep::Scroll { y } => {
                if self.source == TraceSource::Direct {
                    let change = ScrollChange::vertical(*y, self.last_y);
                    self.container.on_scroll_changed(change, &mut self.host);
                } else {
                    self.input(RawScrollInput::Offset {
                        x: 0,
                        y: *y,
                        old_x: 0,
                        old_y: self.last_y,
                    });
                }
                self.last_y = *y;
            }
            TraceStep::ScrollBy { dy } => self.input(RawScrollInput::Delta { dx: 0, dy: *dy }),
            TraceStep::List {
                first_visible,
                first_top,
                heights,
            } => self.input(RawScrollInput::ListLayout {
                first_visible: *first_visible,
                first_top: *first_top,
                visible_heights: heights.clone(),
                scroll_x: 0,
            }),
            TraceStep::State { state } => {
                if self.source == TraceSource::Direct {
                    self.container.on_scroll_state_changed(*state, &mut self.host);
                } else {
                    self.input(RawScrollInput::State(*state));
                }
            }
            TraceStep::Touch { phase } => self.input(RawScrollInput::Touch(*phase)),
            TraceStep::ContentChanged => self.input(RawScrollInput::ContentChanged),
            TraceStep::Wait { ms } => self.wait(Duration::from_millis(*ms)),
            TraceStep::ShowAll { animated } => {
                self.container.show_all(*animated, &mut self.host);
            }
            TraceStep::HideAll { animated } => {
                self.container.hide_all(*animated, &mut self.host);
            }
            TraceStep::Hide { edge, index, animated } => {
                self.container
                    .permanently_hide(*edge, *index, *animated, &mut self.host);
            }
            TraceStep::Unhide { edge, index, animated } => {
                self.container.unhide(*edge, *index, *animated, &mut self.host);
            }
            TraceStep::Resize { edge, index, height } => {
                let entry = self.container.registry().get(*edge, *index).ok_or_else(|| {
                    Error::InvalidTrace(format!("no {:?} at position {}", edge, index))
                })?;
                self.host.put_view(entry.view, *height);
                self.container.on_layout(&mut self.host);
            }
            TraceStep::Participate { edge, index, value } => {
                self.container
                    .set_participates(*edge, *index, *value, &mut self.host);
            }
        }
        Ok(())
    }

    fn input(&mut self, input: RawScrollInput) {
        self.container.handle_input(input, &mut self.host);
    }

    /// Run the virtual clock for `dt`, delivering every callback on the way
    pub fn wait(&mut self, dt: Duration) {
        let until = self.host.now() + dt;
        while let Some(callback) = self.host.poll(until) {
            self.deliver(callback);
        }
    }

    /// Run until no tween or timer is left, bounded by a minute of virtual time
    pub fn settle(&mut self) {
        let limit = self.host.now() + SETTLE_LIMIT;
        while !self.host.is_idle() && self.host.now() < limit {
            match self.host.poll(limit) {
                Some(callback) => self.deliver(callback),
                None => break,
            }
        }
    }

    fn deliver(&mut self, callback: HostCallback) {
        match callback {
            HostCallback::InterpolationFinished(token) => {
                self.container.on_interpolation_finished(token)
            }
            HostCallback::TimerFired(handle) => self.container.on_timer_fired(handle, &mut self.host),
        }
    }

    pub fn snapshot(&self, step: usize) -> Snapshot {
        let side = |edge: Edge| -> Vec<f32> {
            self.container
                .registry()
                .side(edge)
                .iter()
                .map(|e| self.host.translation_y(e.view))
                .collect()
        };

        Snapshot {
            step,
            time_ms: self.host.now().as_millis() as u64,
            state: self.container.state(),
            headers: side(Edge::Header),
            footers: side(Edge::Footer),
            insets: self.host.insets(),
        }
    }
}
