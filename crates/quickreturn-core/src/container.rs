//! Quick-return container
//!
//! Owns the header/footer registry and turns the normalized scroll stream
//! into translations and animations on the host. All entry points are plain
//! method calls made from the host's event thread; nothing here blocks.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::animation::{AnimationState, AnimationTracker, TransitionKind};
use crate::config::{EasingType, QuickReturnConfig, RevealMode, SnapPolicy};
use crate::host::{ContentInsets, Host, InterpolationToken, TimerHandle, TransitionId, ViewHost, ViewId};
use crate::registry::{Edge, EntryFlags, HideRecord, QuickReturnEntry, Registry};
use crate::snap;
use crate::source::{RawScrollInput, ScrollChange, ScrollEvent, ScrollObserver, ScrollSource, ScrollState};
use crate::tally::{ScrollDirection, ScrollTally};
use crate::translation::{scroll_step, travel_ranges};

/// Translations closer than this are treated as equal
const POSITION_EPSILON: f32 = 0.01;

/// One bar move: view, current collapse, target collapse
type Move = (ViewId, f32, f32);

/// How a batch of moves is carried out
#[derive(Debug, Clone, Copy)]
struct Motion {
    duration: Duration,
    easing: EasingType,
    transition: Option<TransitionId>,
}

pub struct QuickReturnContainer {
    config: QuickReturnConfig,
    registry: Registry,
    tracker: AnimationTracker,
    tally: ScrollTally,
    last_direction: Option<ScrollDirection>,
    source: Option<Box<dyn ScrollSource>>,
    observer: Option<Box<dyn ScrollObserver>>,
    reveal_timer: Option<TimerHandle>,
}

impl Default for QuickReturnContainer {
    fn default() -> Self {
        Self::new(QuickReturnConfig::default())
    }
}

impl QuickReturnContainer {
    /// Create a container; an invalid configuration falls back to defaults
    pub fn new(config: QuickReturnConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "Invalid quick-return configuration, using defaults");
                QuickReturnConfig::default()
            }
        };

        Self {
            config,
            registry: Registry::new(),
            tracker: AnimationTracker::new(),
            tally: ScrollTally::new(),
            last_direction: None,
            source: None,
            observer: None,
            reveal_timer: None,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &QuickReturnConfig {
        &self.config
    }

    /// Replace the whole configuration
    pub fn set_config(&mut self, config: QuickReturnConfig) -> crate::Result<()> {
        config.validate()?;
        if let Some(source) = self.source.as_mut() {
            source.configure(&config);
        }
        self.config = config;
        Ok(())
    }

    pub fn set_reveal_mode(&mut self, mode: RevealMode) {
        self.config.reveal_mode = mode;
    }

    pub fn set_snap_policy(&mut self, policy: SnapPolicy) {
        self.config.snap = policy;
    }

    pub fn set_parallax_factor(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            warn!(factor, "Ignoring parallax factor, must be a positive number");
            return;
        }
        self.config.parallax_factor = factor;
    }

    pub fn set_min_delta_before_show(&mut self, delta: i32) {
        self.config.min_delta_before_show = delta.max(0);
    }

    pub fn set_min_delta_before_hide(&mut self, delta: i32) {
        self.config.min_delta_before_hide = delta.max(0);
    }

    pub fn set_show_duration(&mut self, duration: Duration) {
        self.config.show_duration_ms = duration.as_millis() as u64;
    }

    pub fn set_hide_duration(&mut self, duration: Duration) {
        self.config.hide_duration_ms = duration.as_millis() as u64;
    }

    pub fn set_show_easing(&mut self, easing: EasingType) {
        self.config.show_easing = easing;
    }

    pub fn set_hide_easing(&mut self, easing: EasingType) {
        self.config.hide_easing = easing;
    }

    /// A pending reveal is dropped when it fires after this was turned off
    pub fn set_reveal_on_idle(&mut self, enabled: bool) {
        self.config.reveal_on_idle = enabled;
    }

    pub fn set_reveal_on_idle_after(&mut self, delay: Duration) {
        self.config.reveal_on_idle_after_ms = delay.as_millis() as u64;
    }

    pub fn state(&self) -> AnimationState {
        self.tracker.state()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn last_direction(&self) -> Option<ScrollDirection> {
        self.last_direction
    }

    pub fn pending_reveal(&self) -> Option<TimerHandle> {
        self.reveal_timer
    }

    /// Observe a scrollable area, replacing any previous one
    pub fn observe<H: Host>(&mut self, mut source: Box<dyn ScrollSource>, host: &mut H) {
        if let Some(mut old) = self.source.take() {
            old.detach(host);
        }
        source.configure(&self.config);
        debug!(kind = ?source.kind(), "Observing scroll source");
        self.source = Some(source);
        self.tally.reset();
    }

    /// Stop observing; returns the previous source
    pub fn unobserve<H: Host>(&mut self, host: &mut H) -> Option<Box<dyn ScrollSource>> {
        let mut source = self.source.take()?;
        source.detach(host);
        self.tally.reset();
        Some(source)
    }

    /// Passthrough for the application to watch the normalized stream too
    pub fn set_scroll_observer(&mut self, observer: Option<Box<dyn ScrollObserver>>) {
        self.observer = observer;
    }

    /// Feed raw host input through the observed source
    pub fn handle_input<H: Host>(&mut self, input: RawScrollInput, host: &mut H) {
        let Some(source) = self.source.as_mut() else {
            trace!(?input, "No scroll source observed, input dropped");
            return;
        };
        let events = source.handle(&input, host);
        for event in events {
            self.dispatch(event, host);
        }
    }

    fn dispatch<H: Host>(&mut self, event: ScrollEvent, host: &mut H) {
        match event {
            ScrollEvent::Scrolled(change) => self.on_scroll_changed(change, host),
            ScrollEvent::StateChanged(state) => self.on_scroll_state_changed(state, host),
        }
    }

    /// Append a bar at the innermost stacking position
    pub fn attach<H: Host>(&mut self, edge: Edge, view: ViewId, flags: EntryFlags, host: &mut H) -> usize {
        let index = self.registry.len(edge);
        self.attach_at(edge, index, view, flags, host);
        index
    }

    /// Insert a bar at a stacking position; positions past the end are ignored
    pub fn attach_at<H: Host>(
        &mut self,
        edge: Edge,
        index: usize,
        view: ViewId,
        flags: EntryFlags,
        host: &mut H,
    ) -> bool {
        let height = host.measure_height(view);
        let entry = QuickReturnEntry::new(view, flags.with_permanently_hidden(false), height);
        if !self.registry.insert(edge, index, entry) {
            debug!(?edge, index, "Attach position out of range, ignored");
            return false;
        }
        debug!(?edge, index, ?view, height, "Attached bar");

        self.push_layout(host);
        self.settle_positions(host);
        if flags.permanently_hidden && !self.permanently_hide(edge, index, false, host) {
            // mid-transition: park the new bar at its hidden position directly
            if let Some(entry) = self.registry.get_mut(edge, index) {
                entry.permanently_hidden = true;
            }
            self.push_layout(host);
            let ranges = travel_ranges(self.registry.side(edge));
            host.set_translation_y(view, edge.translation_for(ranges[index].hidden));
        }
        true
    }

    pub fn detach<H: Host>(&mut self, edge: Edge, index: usize, host: &mut H) -> Option<ViewId> {
        let removed = self.registry.remove(edge, index)?;
        debug!(?edge, index, view = ?removed.view, "Detached bar");
        self.push_layout(host);
        self.settle_positions(host);
        Some(removed.view)
    }

    pub fn detach_view<H: Host>(&mut self, view: ViewId, host: &mut H) -> bool {
        match self.registry.locate(view) {
            Some((edge, index)) => self.detach(edge, index, host).is_some(),
            None => false,
        }
    }

    /// Toggle whether a bar reacts to scrolling. A bar taken out returns to
    /// its shown position.
    pub fn set_participates<H: Host>(&mut self, edge: Edge, index: usize, participates: bool, host: &mut H) {
        let Some(entry) = self.registry.get_mut(edge, index) else {
            return;
        };
        entry.participates = participates;
        self.settle_positions(host);
    }

    pub fn set_view_participates<H: Host>(&mut self, view: ViewId, participates: bool, host: &mut H) -> bool {
        let Some((edge, index)) = self.registry.locate(view) else {
            return false;
        };
        self.set_participates(edge, index, participates, host);
        true
    }

    /// Re-measure every bar after a host layout pass
    pub fn on_layout<H: Host>(&mut self, host: &mut H) {
        for edge in Edge::BOTH {
            for entry in self.registry.side_mut(edge).iter_mut() {
                entry.height = host.measure_height(entry.view).max(0);
            }
        }
        self.push_layout(host);
        self.settle_positions(host);
    }

    fn push_layout<H: Host>(&self, host: &mut H) {
        let mut insets = ContentInsets::default();

        for edge in Edge::BOTH {
            let mut offset = 0;
            for entry in self.registry.side(edge) {
                host.set_stack_offset(entry.view, edge, offset);
                offset += entry.height;

                if entry.permanently_hidden {
                    continue;
                }
                let slot = match (edge, entry.renders_above_content) {
                    (Edge::Header, true) => &mut insets.top_padding,
                    (Edge::Header, false) => &mut insets.top_margin,
                    (Edge::Footer, true) => &mut insets.bottom_padding,
                    (Edge::Footer, false) => &mut insets.bottom_margin,
                };
                *slot += entry.height;
            }
        }

        host.set_content_insets(insets);
    }

    /// Bring every bar back inside its travel range. Fixed bars sit at their
    /// shown position and permanently hidden ones stay fully out.
    fn settle_positions<H: Host>(&self, host: &mut H) {
        if !self.tracker.state().is_steady() {
            return;
        }

        for edge in Edge::BOTH {
            let entries = self.registry.side(edge);
            for (entry, travel) in entries.iter().zip(travel_ranges(entries)) {
                let current = edge.collapse_of(host.translation_y(entry.view));
                let target = if entry.permanently_hidden {
                    travel.hidden
                } else if !entry.participates {
                    travel.shown
                } else {
                    travel.clamp(current)
                };
                if (target - current).abs() > POSITION_EPSILON {
                    host.set_translation_y(entry.view, edge.translation_for(target));
                }
            }
        }
    }

    pub fn on_scroll_changed<H: Host>(&mut self, change: ScrollChange, host: &mut H) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_scroll_changed(change);
        }

        if !self.registry.has_movable() {
            return;
        }

        let Some(intent) = self.tally.observe(
            change.y,
            change.old_y,
            self.config.min_delta_before_show,
            self.config.min_delta_before_hide,
        ) else {
            return;
        };

        self.last_direction = Some(intent.direction);
        if self.config.reveal_on_idle {
            self.arm_reveal_timer(host);
        }

        if self.tracker.state() == AnimationState::Showing {
            trace!("Show animation running, scroll step ignored");
            return;
        }

        match self.config.reveal_mode {
            RevealMode::ScrollLinked => self.scroll_linked_step(intent.diff, host),
            RevealMode::Animated => match (intent.direction, self.tracker.state()) {
                (ScrollDirection::Hide, AnimationState::Shown) => {
                    self.run_transition(TransitionKind::Hide, true, host);
                }
                (ScrollDirection::Reveal, AnimationState::Hidden) => {
                    self.run_transition(TransitionKind::Show, true, host);
                }
                _ => {}
            },
        }
    }

    pub fn on_scroll_state_changed<H: Host>(&mut self, state: ScrollState, host: &mut H) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_scroll_state_changed(state);
        }

        if state != ScrollState::Idle {
            return;
        }

        if self.config.reveal_mode == RevealMode::ScrollLinked && self.registry.has_movable() {
            let decision = snap::decide(
                self.config.snap,
                self.last_direction,
                &self.registry,
                |edge, view| edge.collapse_of(host.translation_y(view)),
            );
            if let Some(kind) = decision {
                debug!(policy = ?self.config.snap, ?kind, "Snapping on idle");
                self.run_transition(kind, true, host);
            }
        }

        if self.config.reveal_on_idle {
            self.arm_reveal_timer(host);
        }
    }

    fn scroll_linked_step<H: Host>(&mut self, diff: f32, host: &mut H) {
        let parallax = self.config.parallax_factor;

        for edge in Edge::BOTH {
            let entries = self.registry.side(edge);
            let collapse: Vec<f32> = entries
                .iter()
                .map(|e| edge.collapse_of(host.translation_y(e.view)))
                .collect();

            let next = scroll_step(entries, &collapse, diff, parallax);
            for ((entry, current), target) in entries.iter().zip(collapse).zip(next) {
                if let Some(target) = target {
                    if (target - current).abs() > POSITION_EPSILON {
                        host.set_translation_y(entry.view, edge.translation_for(target));
                    }
                }
            }
        }

        self.sync_steady_state(host);
    }

    /// After scrolling alone has pushed every bar to one end, record that end
    /// as the steady state so the next transition starts from the right place.
    fn sync_steady_state<H: Host>(&mut self, host: &H) {
        if !self.tracker.state().is_steady() {
            return;
        }

        let mut all_shown = true;
        let mut all_hidden = true;
        for edge in Edge::BOTH {
            let entries = self.registry.side(edge);
            for (entry, travel) in entries.iter().zip(travel_ranges(entries)) {
                if !entry.is_movable() {
                    continue;
                }
                let c = edge.collapse_of(host.translation_y(entry.view));
                all_shown &= (c - travel.shown).abs() <= POSITION_EPSILON;
                all_hidden &= (c - travel.hidden).abs() <= POSITION_EPSILON;
            }
        }

        if all_hidden && !all_shown {
            self.tracker.settle(TransitionKind::Hide);
        } else if all_shown && !all_hidden {
            self.tracker.settle(TransitionKind::Show);
        }
    }

    pub fn show_all<H: Host>(&mut self, animated: bool, host: &mut H) -> bool {
        self.run_transition(TransitionKind::Show, animated, host)
    }

    pub fn hide_all<H: Host>(&mut self, animated: bool, host: &mut H) -> bool {
        self.run_transition(TransitionKind::Hide, animated, host)
    }

    /// Move every participating bar to one end as a group.
    ///
    /// Ignored while another group is in flight or when nothing participates.
    fn run_transition<H: Host>(&mut self, kind: TransitionKind, animated: bool, host: &mut H) -> bool {
        if !self.tracker.state().is_steady() {
            debug!(state = ?self.tracker.state(), ?kind, "Transition requested mid-flight, ignored");
            return false;
        }
        if !self.registry.has_movable() {
            return false;
        }

        let mut moves: Vec<(Edge, Move)> = Vec::new();
        for edge in Edge::BOTH {
            let entries = self.registry.side(edge);
            for (entry, travel) in entries.iter().zip(travel_ranges(entries)) {
                if !entry.is_movable() {
                    continue;
                }
                let current = edge.collapse_of(host.translation_y(entry.view));
                let target = match kind {
                    TransitionKind::Show => travel.shown,
                    TransitionKind::Hide => travel.hidden,
                };
                if (target - current).abs() > POSITION_EPSILON {
                    moves.push((edge, (entry.view, current, target)));
                }
            }
        }

        if !animated {
            for (edge, (view, _, target)) in moves {
                host.set_translation_y(view, edge.translation_for(target));
            }
            self.tracker.settle(kind);
            debug!(?kind, "Bars moved without animation");
            return true;
        }

        let Some(id) = self.tracker.begin(kind, moves.len()) else {
            return false;
        };
        debug!(?kind, transition = id.0, bars = moves.len(), "Group transition started");

        let motion = self.motion_for(kind, Some(id));
        for (edge, mv) in moves {
            start_move(host, edge, mv, motion);
        }
        true
    }

    fn motion_for(&self, kind: TransitionKind, transition: Option<TransitionId>) -> Motion {
        match kind {
            TransitionKind::Show => Motion {
                duration: self.config.show_duration(),
                easing: self.config.show_easing,
                transition,
            },
            TransitionKind::Hide => Motion {
                duration: self.config.hide_duration(),
                easing: self.config.hide_easing,
                transition,
            },
        }
    }

    /// Called by the host when an interpolation it was asked to run finished
    pub fn on_interpolation_finished(&mut self, token: InterpolationToken) {
        if let Some(state) = self.tracker.finish_one(token.transition) {
            debug!(?state, transition = token.transition.0, "Group transition settled");
        }
    }

    /// Take a bar out of the show/hide cycle and push it off-screen. Bars
    /// further in move outwards by its height to close the gap.
    pub fn permanently_hide<H: Host>(&mut self, edge: Edge, index: usize, animated: bool, host: &mut H) -> bool {
        let Some(entry) = self.registry.get(edge, index) else {
            return false;
        };
        if entry.permanently_hidden {
            return false;
        }
        if !self.tracker.state().is_steady() {
            debug!(?edge, index, state = ?self.tracker.state(), "Permanent hide refused during a transition");
            return false;
        }
        let view = entry.view;
        let height = entry.height as f32;
        let own_collapse = edge.collapse_of(host.translation_y(view));

        if let Some(entry) = self.registry.get_mut(edge, index) {
            entry.permanently_hidden = true;
            entry.hide_record = None;
        }
        self.push_layout(host);

        let entries = self.registry.side(edge);
        let ranges = travel_ranges(entries);
        let mut moves: Vec<Move> = vec![(view, own_collapse, ranges[index].hidden)];
        let mut displaced = Vec::new();

        for (entry, travel) in entries.iter().zip(&ranges).skip(index + 1) {
            if entry.permanently_hidden {
                continue;
            }
            let current = edge.collapse_of(host.translation_y(entry.view));
            let target = if entry.participates {
                travel.clamp(current + height)
            } else {
                travel.shown
            };
            displaced.push((entry.view, target - current));
            moves.push((entry.view, current, target));
        }

        if let Some(entry) = self.registry.get_mut(edge, index) {
            entry.hide_record = Some(HideRecord {
                own_collapse,
                displaced,
            });
        }

        let transition = animated.then(|| self.tracker.detached_id());
        let motion = self.motion_for(TransitionKind::Hide, transition);
        self.apply_moves(host, edge, moves, motion);
        debug!(?edge, index, ?view, "Bar permanently hidden");
        true
    }

    /// Bring a permanently hidden bar back and undo the shift of the bars
    /// further in.
    pub fn unhide<H: Host>(&mut self, edge: Edge, index: usize, animated: bool, host: &mut H) -> bool {
        if !self.tracker.state().is_steady() {
            debug!(?edge, index, state = ?self.tracker.state(), "Unhide refused during a transition");
            return false;
        }
        let Some(entry) = self.registry.get_mut(edge, index) else {
            return false;
        };
        if !entry.permanently_hidden {
            return false;
        }
        entry.permanently_hidden = false;
        let record = entry.hide_record.take();
        let view = entry.view;
        let height = entry.height as f32;
        let participates = entry.participates;

        self.push_layout(host);

        let entries = self.registry.side(edge);
        let ranges = travel_ranges(entries);
        let own_current = edge.collapse_of(host.translation_y(view));
        let own_target = if participates {
            ranges[index].clamp(record.as_ref().map_or(ranges[index].shown, |r| r.own_collapse))
        } else {
            ranges[index].shown
        };
        let mut moves: Vec<Move> = vec![(view, own_current, own_target)];

        for (entry, travel) in entries.iter().zip(&ranges).skip(index + 1) {
            if entry.permanently_hidden {
                continue;
            }
            let current = edge.collapse_of(host.translation_y(entry.view));
            let shift = record
                .as_ref()
                .and_then(|r| r.displaced.iter().find(|(v, _)| *v == entry.view))
                .map_or(height, |(_, d)| *d);
            let target = if entry.participates {
                travel.clamp(current - shift)
            } else {
                travel.shown
            };
            moves.push((entry.view, current, target));
        }

        let transition = animated.then(|| self.tracker.detached_id());
        let motion = self.motion_for(TransitionKind::Show, transition);
        self.apply_moves(host, edge, moves, motion);
        debug!(?edge, index, ?view, "Bar unhidden");
        true
    }

    fn apply_moves<H: Host>(&self, host: &mut H, edge: Edge, moves: Vec<Move>, motion: Motion) {
        for mv in moves {
            let (view, current, target) = mv;
            if (target - current).abs() <= POSITION_EPSILON {
                continue;
            }
            if motion.transition.is_some() {
                start_move(host, edge, mv, motion);
            } else {
                host.set_translation_y(view, edge.translation_for(target));
            }
        }
    }

    fn arm_reveal_timer<H: Host>(&mut self, host: &mut H) {
        if let Some(handle) = self.reveal_timer.take() {
            host.cancel(handle);
        }
        let handle = host.schedule(self.config.reveal_on_idle_after());
        trace!(timer = handle.0, delay_ms = self.config.reveal_on_idle_after_ms, "Reveal timer armed");
        self.reveal_timer = Some(handle);
    }

    /// Called by the host when a scheduled callback fires
    pub fn on_timer_fired<H: Host>(&mut self, handle: TimerHandle, host: &mut H) {
        let from_source = match self.source.as_mut() {
            Some(source) if source.claims_timer(handle) => Some(source.timer_fired(handle)),
            _ => None,
        };
        if let Some(event) = from_source {
            if let Some(event) = event {
                self.dispatch(event, host);
            }
            return;
        }

        if self.reveal_timer == Some(handle) {
            self.reveal_timer = None;
            if self.config.reveal_on_idle {
                debug!("Idle period elapsed, revealing bars");
                self.run_transition(TransitionKind::Show, true, host);
            }
            return;
        }

        trace!(timer = handle.0, "Stale timer ignored");
    }
}

fn start_move<H: ViewHost>(host: &mut H, edge: Edge, (view, current, target): Move, motion: Motion) {
    let Some(transition) = motion.transition else {
        host.set_translation_y(view, edge.translation_for(target));
        return;
    };
    host.animate_translation_y(
        view,
        edge.translation_for(current),
        edge.translation_for(target),
        motion.duration,
        motion.easing,
        InterpolationToken { transition, view },
    );
}
