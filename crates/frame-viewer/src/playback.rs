//! Timeline playback: current frame, play/pause and speed.
//!
//! While playing, the frame advances by `speed` once per display refresh.
//! Ticks are requested one at a time from a [`TickScheduler`]; the next tick
//! is only requested after the previous one ran, so at most one request is
//! ever outstanding. Pausing (or dropping the controller) cancels it.

/// Speeds offered by the timeline.
pub const PLAYBACK_SPEEDS: [f32; 4] = [0.5, 1.0, 2.0, 4.0];

/// Identifies one requested animation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

/// Source of display-refresh callbacks.
pub trait TickScheduler {
    /// Asks for one callback on the next display refresh.
    fn request_tick(&mut self) -> TickId;
    /// Withdraws a request made by [`TickScheduler::request_tick`].
    fn cancel_tick(&mut self, id: TickId);
}

/// Tick source driven by the window's redraw loop.
///
/// A request stays pending until the next redraw takes it with
/// [`AnimationFrames::take_due`].
#[derive(Debug, Default)]
pub struct AnimationFrames {
    next_id: u64,
    pending: Option<TickId>,
}

impl AnimationFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per redraw; yields the pending tick, if any.
    pub fn take_due(&mut self) -> Option<TickId> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl TickScheduler for AnimationFrames {
    fn request_tick(&mut self) -> TickId {
        self.next_id += 1;
        let id = TickId(self.next_id);
        self.pending = Some(id);
        id
    }

    fn cancel_tick(&mut self, id: TickId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }
}

/// Snapshot of the playback fields the UI reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Position on the timeline. Fractional when `speed` is not integral.
    pub current_frame: f32,
    pub is_playing: bool,
    pub speed: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_frame: 0.0,
            is_playing: false,
            speed: 1.0,
        }
    }
}

pub struct Playback<S: TickScheduler> {
    state: PlaybackState,
    total_frames: u32,
    scheduler: S,
    pending: Option<TickId>,
}

impl<S: TickScheduler> Playback<S> {
    pub fn new(total_frames: u32, scheduler: S) -> Self {
        Self {
            state: PlaybackState::default(),
            total_frames,
            scheduler,
            pending: None,
        }
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    #[inline]
    pub fn current_frame(&self) -> f32 {
        self.state.current_frame
    }

    /// Whole frame index shown for the current position.
    #[inline]
    pub fn frame_index(&self) -> u32 {
        self.state.current_frame.max(0.0).floor() as u32
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn toggle_playback(&mut self) {
        self.state.is_playing = !self.state.is_playing;
        log::debug!(
            "Playback {}",
            if self.state.is_playing { "started" } else { "paused" }
        );
        self.sync_schedule();
    }

    /// Sets the frame directly. Callers clamp to `[0, total_frames)`.
    pub fn set_current_frame(&mut self, frame: f32) {
        self.state.current_frame = frame;
    }

    /// Any multiplier is accepted; the UI offers [`PLAYBACK_SPEEDS`].
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.state.speed = speed;
    }

    /// Moves one whole frame back, stopping at 0.
    pub fn step_backward(&mut self) {
        let prev = self.frame_index().saturating_sub(1);
        self.set_current_frame(prev as f32);
    }

    /// Moves one whole frame forward, stopping at the last frame.
    pub fn step_forward(&mut self) {
        let last = self.total_frames.saturating_sub(1);
        let next = (self.frame_index() + 1).min(last);
        self.set_current_frame(next as f32);
    }

    pub fn skip_to_start(&mut self) {
        self.set_current_frame(0.0);
    }

    pub fn skip_to_end(&mut self) {
        self.set_current_frame(self.total_frames.saturating_sub(1) as f32);
    }

    /// Runs the callback for tick `id`. Returns `false` for a tick that was
    /// cancelled or superseded, which leaves the state untouched.
    pub fn on_tick(&mut self, id: TickId) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;

        if self.state.is_playing {
            let next = self.state.current_frame + self.state.speed;
            // Wrap lands exactly on 0, even for speeds larger than the timeline.
            self.state.current_frame = if next >= self.total_frames as f32 { 0.0 } else { next };
            self.pending = Some(self.scheduler.request_tick());
        }
        true
    }

    fn sync_schedule(&mut self) {
        match (self.state.is_playing, self.pending) {
            (true, None) => self.pending = Some(self.scheduler.request_tick()),
            (false, Some(id)) => {
                self.scheduler.cancel_tick(id);
                self.pending = None;
            }
            _ => {}
        }
    }
}

impl<S: TickScheduler> Drop for Playback<S> {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_tick(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        requested: Vec<TickId>,
        cancelled: Vec<TickId>,
    }

    /// Records every request/cancel so tests can inspect them after drop.
    #[derive(Clone, Default)]
    struct RecordingScheduler {
        calls: Rc<RefCell<Calls>>,
    }

    impl TickScheduler for RecordingScheduler {
        fn request_tick(&mut self) -> TickId {
            let mut calls = self.calls.borrow_mut();
            let id = TickId(calls.requested.len() as u64 + 1);
            calls.requested.push(id);
            id
        }

        fn cancel_tick(&mut self, id: TickId) {
            self.calls.borrow_mut().cancelled.push(id);
        }
    }

    fn last_requested(s: &RecordingScheduler) -> TickId {
        *s.calls.borrow().requested.last().unwrap()
    }

    #[test]
    fn starts_paused_at_frame_zero() {
        let p = Playback::new(50, RecordingScheduler::default());
        assert_eq!(p.state(), PlaybackState::default());
        assert!(p.scheduler().calls.borrow().requested.is_empty());
    }

    #[test]
    fn toggle_flips_playing() {
        let mut p = Playback::new(50, RecordingScheduler::default());
        p.toggle_playback();
        assert!(p.is_playing());
        p.toggle_playback();
        assert!(!p.is_playing());
    }

    #[test]
    fn tick_advances_by_speed() {
        let mut p = Playback::new(50, RecordingScheduler::default());
        p.set_playback_speed(2.0);
        p.toggle_playback();
        let id = last_requested(p.scheduler());
        assert!(p.on_tick(id));
        assert_eq!(p.current_frame(), 2.0);
    }

    #[test]
    fn wraps_to_zero_past_the_last_frame() {
        let mut p = Playback::new(50, RecordingScheduler::default());
        p.set_current_frame(49.0);
        p.toggle_playback();
        let id = last_requested(p.scheduler());
        p.on_tick(id);
        assert_eq!(p.current_frame(), 0.0);
    }

    #[test]
    fn oversized_speed_lands_on_zero_not_modulo() {
        let mut p = Playback::new(10, RecordingScheduler::default());
        p.set_current_frame(3.0);
        p.set_playback_speed(25.0);
        p.toggle_playback();
        let id = last_requested(p.scheduler());
        p.on_tick(id);
        assert_eq!(p.current_frame(), 0.0);
    }

    #[test]
    fn half_speed_shows_each_frame_twice() {
        let mut p = Playback::new(50, RecordingScheduler::default());
        p.set_playback_speed(0.5);
        p.toggle_playback();
        let mut seen = Vec::new();
        for _ in 0..4 {
            let id = last_requested(p.scheduler());
            p.on_tick(id);
            seen.push(p.frame_index());
        }
        assert_eq!(seen, vec![0, 1, 1, 2]);
    }

    #[test]
    fn only_one_tick_outstanding() {
        let sched = RecordingScheduler::default();
        let mut p = Playback::new(50, sched.clone());
        p.toggle_playback();
        let first = last_requested(&sched);
        assert!(p.on_tick(first));
        // A replayed or stale id does nothing.
        assert!(!p.on_tick(first));
        assert_eq!(p.current_frame(), 1.0);
        assert_eq!(sched.calls.borrow().requested.len(), 2);
    }

    #[test]
    fn pausing_cancels_the_pending_tick() {
        let sched = RecordingScheduler::default();
        let mut p = Playback::new(50, sched.clone());
        p.toggle_playback();
        p.toggle_playback();
        let calls = sched.calls.borrow();
        assert_eq!(calls.requested.len(), 1);
        assert_eq!(calls.cancelled, calls.requested);
    }

    #[test]
    fn cancelled_tick_does_not_advance() {
        let sched = RecordingScheduler::default();
        let mut p = Playback::new(50, sched.clone());
        p.toggle_playback();
        let id = last_requested(&sched);
        p.toggle_playback();
        assert!(!p.on_tick(id));
        assert_eq!(p.current_frame(), 0.0);
    }

    #[test]
    fn drop_cancels_the_pending_tick() {
        let sched = RecordingScheduler::default();
        {
            let mut p = Playback::new(50, sched.clone());
            p.toggle_playback();
        }
        let calls = sched.calls.borrow();
        assert_eq!(calls.cancelled.len(), 1);
    }

    #[test]
    fn drop_while_paused_cancels_nothing() {
        let sched = RecordingScheduler::default();
        drop(Playback::new(50, sched.clone()));
        assert!(sched.calls.borrow().cancelled.is_empty());
    }

    #[test]
    fn steps_are_clamped_to_the_timeline() {
        let mut p = Playback::new(50, RecordingScheduler::default());
        p.step_backward();
        assert_eq!(p.frame_index(), 0);
        p.skip_to_end();
        p.step_forward();
        assert_eq!(p.frame_index(), 49);
        p.step_backward();
        assert_eq!(p.frame_index(), 48);
        p.skip_to_start();
        p.step_forward();
        assert_eq!(p.frame_index(), 1);
    }

    #[test]
    fn set_frame_and_speed_are_not_validated() {
        let mut p = Playback::new(50, RecordingScheduler::default());
        p.set_playback_speed(3.0);
        p.set_current_frame(12.0);
        assert_eq!(p.speed(), 3.0);
        assert_eq!(p.frame_index(), 12);
    }

    #[test]
    fn animation_frames_yield_one_pending_tick() {
        let mut frames = AnimationFrames::new();
        let a = frames.request_tick();
        assert!(frames.is_pending());
        frames.cancel_tick(TickId(a.0 + 100));
        assert_eq!(frames.take_due(), Some(a));
        assert_eq!(frames.take_due(), None);

        let b = frames.request_tick();
        frames.cancel_tick(b);
        assert_eq!(frames.take_due(), None);
    }

    #[test]
    fn redraw_loop_drives_playback() {
        let mut p = Playback::new(3, AnimationFrames::new());
        p.toggle_playback();
        let mut frames = Vec::new();
        for _ in 0..4 {
            if let Some(id) = p.scheduler_mut().take_due() {
                p.on_tick(id);
            }
            frames.push(p.frame_index());
        }
        assert_eq!(frames, vec![1, 2, 0, 1]);
        p.toggle_playback();
        assert!(!p.scheduler().is_pending());
    }

    proptest! {
        #[test]
        fn playing_never_leaves_the_timeline(
            total in 1u32..200,
            start in 0u32..200,
            speed_idx in 0usize..PLAYBACK_SPEEDS.len(),
            ticks in 1usize..500,
        ) {
            let mut p = Playback::new(total, AnimationFrames::new());
            p.set_current_frame((start % total) as f32);
            p.set_playback_speed(PLAYBACK_SPEEDS[speed_idx]);
            p.toggle_playback();
            for _ in 0..ticks {
                let id = p.scheduler_mut().take_due().unwrap();
                p.on_tick(id);
                prop_assert!(p.current_frame() >= 0.0);
                prop_assert!(p.current_frame() < total as f32);
            }
        }
    }
}
