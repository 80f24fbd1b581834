use std::time::{Duration, Instant};

use log::{debug, error, info, trace, warn};

use crate::error::ShellError;
use crate::input::{EventNormalizer, KeyboardEvent, MouseEvent};
use crate::time::FrameClock;

use super::callbacks::CallbackSlots;
use super::control::{Command, DispatchHandle};
use super::platform::{AcquireError, PlatformSurface};
use super::state::LoopState;

/// Run-loop tuning.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Minimum time between frames. Zero draws whenever the loop comes around.
    pub frame_interval: Duration,

    /// Consecutive transient acquisition failures tolerated before the
    /// surface is considered lost.
    pub transient_failure_limit: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / 60.0),
            transient_failure_limit: 120,
        }
    }
}

/// Single-threaded run loop over a [`PlatformSurface`].
///
/// Each iteration:
/// 1. drains raw input, normalizes it, and invokes the mouse/keyboard
///    callback per event in delivery order
/// 2. if a frame is due, acquires one drawable/target pair and invokes the
///    draw callback with it
/// 3. checks for an exit request or close signal
///
/// then suspends on the platform until input or the next frame deadline.
///
/// Exit is cooperative: it is honoured at step 3, never inside a callback.
/// A callback that does not return stalls the loop.
pub struct DispatchCore<P: PlatformSurface> {
    platform: P,
    slots: CallbackSlots<P::Drawable, P::Target>,
    handle: DispatchHandle<P::Drawable, P::Target>,
    normalizer: EventNormalizer,
    clock: FrameClock,
    state: LoopState,
    exit_requested: bool,
    transient_failures: u32,
    transient_failure_limit: u32,
}

impl<P: PlatformSurface> DispatchCore<P> {
    pub fn new(platform: P, config: DispatchConfig) -> Self {
        let mut state = LoopState::default();
        state.initialized();

        Self {
            platform,
            slots: CallbackSlots::new(),
            handle: DispatchHandle::default(),
            normalizer: EventNormalizer::new(),
            clock: FrameClock::new(config.frame_interval),
            state,
            exit_requested: false,
            transient_failures: 0,
            transient_failure_limit: config.transient_failure_limit,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames attempted so far.
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// Handle for use inside callbacks.
    pub fn handle(&self) -> DispatchHandle<P::Drawable, P::Target> {
        self.handle.clone()
    }

    // ── Callback registration ─────────────────────────────────────────────
    //
    // Direct setters first flush queued handle requests so that the most
    // recent registration wins regardless of which path made it.

    pub fn set_draw_function<F>(&mut self, f: F)
    where
        F: FnMut(P::Drawable, P::Target) + 'static,
    {
        self.apply_commands();
        self.slots.set_draw(Some(Box::new(f)));
    }

    pub fn clear_draw_function(&mut self) {
        self.apply_commands();
        self.slots.set_draw(None);
    }

    pub fn set_mouse_event_function<F>(&mut self, f: F)
    where
        F: FnMut(&MouseEvent) + 'static,
    {
        self.apply_commands();
        self.slots.set_mouse(Some(Box::new(f)));
    }

    pub fn clear_mouse_event_function(&mut self) {
        self.apply_commands();
        self.slots.set_mouse(None);
    }

    pub fn set_keyboard_event_function<F>(&mut self, f: F)
    where
        F: FnMut(&KeyboardEvent) + 'static,
    {
        self.apply_commands();
        self.slots.set_keyboard(Some(Box::new(f)));
    }

    pub fn clear_keyboard_event_function(&mut self) {
        self.apply_commands();
        self.slots.set_keyboard(None);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Requests termination. Idempotent; before `run` it makes `run` return
    /// without invoking any callback.
    pub fn exit(&mut self) {
        self.request_exit();
    }

    /// Runs the loop until exit, close, or a fatal surface error.
    ///
    /// Errors with [`ShellError::AlreadyRunning`] / [`ShellError::Stopped`]
    /// when not in the `Ready` state.
    pub fn run(&mut self) -> Result<(), ShellError> {
        self.state.start()?;
        info!("run loop started");

        self.apply_commands();
        let result = self.run_iterations();

        self.state.terminate();
        self.state.finish();

        match &result {
            Ok(()) => info!("run loop stopped after {} frames", self.clock.frames()),
            Err(e) => error!("run loop stopped: {e}"),
        }
        result
    }

    fn run_iterations(&mut self) -> Result<(), ShellError> {
        if self.should_stop() {
            return Ok(());
        }

        loop {
            self.dispatch_input();
            self.dispatch_frame()?;

            if self.should_stop() {
                return Ok(());
            }

            let deadline = self.next_deadline();
            self.platform.wait_for_next_frame_or_event(deadline);
        }
    }

    fn should_stop(&self) -> bool {
        if self.exit_requested {
            debug!("exit requested");
            return true;
        }
        if self.platform.close_signal() {
            info!("window closed");
            return true;
        }
        false
    }

    /// Deadline for the platform wait; `None` when no frame will be drawn
    /// until something external happens.
    fn next_deadline(&self) -> Option<Instant> {
        if !self.slots.has_draw() || !self.platform.can_present() {
            return None;
        }
        Some(self.clock.deadline().unwrap_or_else(Instant::now))
    }

    fn dispatch_input(&mut self) {
        for raw in self.platform.poll_input() {
            let event = self.normalizer.normalize(raw);
            trace!("input: {event:?}");
            self.slots.dispatch_input(&event);
            self.apply_commands();
        }
    }

    fn dispatch_frame(&mut self) -> Result<(), ShellError> {
        if !self.slots.has_draw() {
            return Ok(());
        }

        if !self.platform.can_present() {
            // Draw as soon as the surface comes back.
            self.clock.reset();
            return Ok(());
        }

        let now = Instant::now();
        if !self.clock.is_due(now) {
            return Ok(());
        }
        let frame = self.clock.tick(now);

        match self.platform.acquire_frame_target() {
            Ok((drawable, target)) => {
                self.transient_failures = 0;
                trace!("frame {}", frame.frame_index);
                self.slots.draw(drawable, target);
                self.apply_commands();
                Ok(())
            }

            Err(AcquireError::Transient(reason)) => {
                self.transient_failures = self.transient_failures.saturating_add(1);
                if self.transient_failures > self.transient_failure_limit {
                    return Err(ShellError::Surface(format!(
                        "{} consecutive frames could not be acquired (last: {reason})",
                        self.transient_failures
                    )));
                }
                warn!("skipping frame {}: {reason}", frame.frame_index);
                Ok(())
            }

            Err(AcquireError::Fatal(reason)) => Err(ShellError::Surface(reason)),
        }
    }

    fn request_exit(&mut self) {
        if !self.exit_requested {
            info!("exit requested");
        }
        self.exit_requested = true;
    }

    fn apply_commands(&mut self) {
        for cmd in self.handle.take_commands() {
            match cmd {
                Command::Exit => self.request_exit(),
                Command::SetDraw(f) => self.slots.set_draw(f),
                Command::SetMouse(f) => self.slots.set_mouse(f),
                Command::SetKeyboard(f) => self.slots.set_keyboard(f),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;
    use crate::coords::Vec2;
    use crate::input::{KeyboardEventKind, MouseEventKind, RawInput};

    /// In-memory platform: input arrives in scripted batches (one per
    /// `poll_input`), acquisitions follow a script and then succeed.
    #[derive(Default)]
    struct ScriptedSurface {
        input: VecDeque<Vec<RawInput>>,
        acquisitions: VecDeque<Result<(), AcquireError>>,
        close_after_frames: Option<u32>,
        unpresentable: bool,
        acquired: u32,
        attempts: u32,
        waits: u32,
    }

    impl ScriptedSurface {
        fn closing_after(frames: u32) -> Self {
            Self {
                close_after_frames: Some(frames),
                ..Self::default()
            }
        }
    }

    impl PlatformSurface for ScriptedSurface {
        /// Serial number of the acquisition attempt.
        type Drawable = u32;
        type Target = ();

        fn poll_input(&mut self) -> Vec<RawInput> {
            self.input.pop_front().unwrap_or_default()
        }

        fn can_present(&self) -> bool {
            !self.unpresentable
        }

        fn acquire_frame_target(&mut self) -> Result<(u32, ()), AcquireError> {
            self.attempts += 1;
            match self.acquisitions.pop_front().unwrap_or(Ok(())) {
                Ok(()) => {
                    self.acquired += 1;
                    Ok((self.attempts, ()))
                }
                Err(e) => Err(e),
            }
        }

        fn wait_for_next_frame_or_event(&mut self, _deadline: Option<Instant>) {
            self.waits += 1;
        }

        fn close_signal(&self) -> bool {
            // Safety valve so a broken test cannot spin forever.
            self.waits >= 10_000
                || self.close_after_frames.is_some_and(|n| self.acquired >= n)
        }
    }

    fn unpaced() -> DispatchConfig {
        DispatchConfig {
            frame_interval: Duration::ZERO,
            transient_failure_limit: 3,
        }
    }

    fn scripted(surface: ScriptedSurface) -> DispatchCore<ScriptedSurface> {
        DispatchCore::new(surface, unpaced())
    }

    fn counter() -> Rc<Cell<u32>> {
        Rc::new(Cell::new(0))
    }

    // ── Scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn ten_frames_then_exit() {
        let mut core = scripted(ScriptedSurface::default());
        assert_eq!(core.state(), LoopState::Ready);

        let frames = counter();
        let handle = core.handle();
        let f = frames.clone();
        core.set_draw_function(move |_, _| {
            f.set(f.get() + 1);
            if f.get() == 10 {
                handle.exit();
            }
        });

        core.run().unwrap();
        assert_eq!(frames.get(), 10);
        assert_eq!(core.state(), LoopState::Stopped);
    }

    #[test]
    fn close_signal_ends_the_loop() {
        let mut core = scripted(ScriptedSurface::closing_after(10));
        let frames = counter();
        let f = frames.clone();
        core.set_draw_function(move |_, _| f.set(f.get() + 1));

        core.run().unwrap();
        assert_eq!(frames.get(), 10);
    }

    #[test]
    fn press_move_release_reaches_mouse_callback() {
        let mut surface = ScriptedSurface::closing_after(1);
        surface.input.push_back(vec![
            RawInput::mouse_pressed(0),
            RawInput::mouse_moved(Vec2::new(5.0, 5.0)),
            RawInput::mouse_released(0),
        ]);
        let mut core = scripted(surface);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        core.set_mouse_event_function(move |ev: &MouseEvent| {
            s.borrow_mut().push((ev.detail, ev.buttons))
        });
        core.set_draw_function(|_, _| {});

        core.run().unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                (MouseEventKind::ButtonDown { button: 0 }, 0b1),
                (MouseEventKind::Move { delta: Vec2::new(5.0, 5.0) }, 0b1),
                (MouseEventKind::ButtonUp { button: 0 }, 0),
            ]
        );
    }

    // ── Registration ──────────────────────────────────────────────────────

    #[test]
    fn second_registration_replaces_first() {
        let mut surface = ScriptedSurface::closing_after(3);
        surface.input.push_back(vec![
            RawInput::mouse_pressed(0),
            RawInput::key_pressed(4, "a"),
        ]);
        let mut core = scripted(surface);

        let (d1, d2, m1, m2, k1, k2) =
            (counter(), counter(), counter(), counter(), counter(), counter());

        let c = d1.clone();
        core.set_draw_function(move |_, _| c.set(c.get() + 1));
        let c = d2.clone();
        core.set_draw_function(move |_, _| c.set(c.get() + 1));
        let c = m1.clone();
        core.set_mouse_event_function(move |_: &MouseEvent| c.set(c.get() + 1));
        let c = m2.clone();
        core.set_mouse_event_function(move |_: &MouseEvent| c.set(c.get() + 1));
        let c = k1.clone();
        core.set_keyboard_event_function(move |_: &KeyboardEvent| c.set(c.get() + 1));
        let c = k2.clone();
        core.set_keyboard_event_function(move |_: &KeyboardEvent| c.set(c.get() + 1));

        core.run().unwrap();
        assert_eq!((d1.get(), m1.get(), k1.get()), (0, 0, 0));
        assert_eq!((d2.get(), m2.get(), k2.get()), (3, 1, 1));
    }

    #[test]
    fn unset_slots_are_no_ops() {
        let mut surface = ScriptedSurface::default();
        surface.input.push_back(vec![RawInput::mouse_pressed(0), RawInput::key_pressed(4, "a")]);
        let mut core = scripted(surface);

        let handle = core.handle();
        core.set_keyboard_event_function(move |_: &KeyboardEvent| handle.exit());
        core.run().unwrap();

        // No draw callback: nothing was acquired.
        assert_eq!(core.platform().attempts, 0);
    }

    #[test]
    fn cleared_draw_function_stops_frames() {
        let mut core = scripted(ScriptedSurface::default());
        let frames = counter();
        let f = frames.clone();
        let handle = core.handle();
        core.set_draw_function(move |_, _| {
            f.set(f.get() + 1);
            handle.clear_draw_function();
            handle.exit();
        });
        core.run().unwrap();
        assert_eq!(frames.get(), 1);
    }

    #[test]
    fn mid_loop_registration_applies_to_next_event() {
        let mut surface = ScriptedSurface::closing_after(1);
        surface.input.push_back(vec![
            RawInput::key_pressed(4, "a"),
            RawInput::key_pressed(5, "b"),
            RawInput::key_pressed(6, "c"),
        ]);
        let mut core = scripted(surface);

        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));

        let handle = core.handle();
        let (f, s) = (first.clone(), second.clone());
        core.set_keyboard_event_function(move |ev: &KeyboardEvent| {
            f.borrow_mut().push(ev.key.clone());
            let s = s.clone();
            handle.set_keyboard_event_function(move |ev: &KeyboardEvent| {
                s.borrow_mut().push(ev.key.clone())
            });
        });
        core.set_draw_function(|_, _| {});

        core.run().unwrap();
        assert_eq!(*first.borrow(), vec!["a".to_string()]);
        assert_eq!(*second.borrow(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn direct_setter_wins_over_older_queued_request() {
        let mut core = scripted(ScriptedSurface::closing_after(1));
        let (queued, direct) = (counter(), counter());

        let q = queued.clone();
        core.handle().set_draw_function(move |_, _| q.set(q.get() + 1));
        let d = direct.clone();
        core.set_draw_function(move |_, _| d.set(d.get() + 1));

        core.run().unwrap();
        assert_eq!((queued.get(), direct.get()), (0, 1));
    }

    // ── Exit ──────────────────────────────────────────────────────────────

    #[test]
    fn exit_before_run_invokes_nothing() {
        let mut surface = ScriptedSurface::default();
        surface.input.push_back(vec![RawInput::mouse_pressed(0)]);
        let mut core = scripted(surface);

        let calls = counter();
        let c = calls.clone();
        core.set_draw_function(move |_, _| c.set(c.get() + 1));
        let c = calls.clone();
        core.set_mouse_event_function(move |_: &MouseEvent| c.set(c.get() + 1));

        core.exit();
        core.exit();
        core.handle().exit();

        core.run().unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(core.state(), LoopState::Stopped);
    }

    #[test]
    fn repeated_exit_terminates_once() {
        let mut core = scripted(ScriptedSurface::default());
        let frames = counter();
        let f = frames.clone();
        let handle = core.handle();
        core.set_draw_function(move |_, _| {
            f.set(f.get() + 1);
            handle.exit();
            handle.exit();
        });

        core.run().unwrap();
        assert_eq!(frames.get(), 1);
        assert_eq!(core.run(), Err(ShellError::Stopped));
    }

    #[test]
    fn exit_from_input_still_draws_this_iteration() {
        let mut surface = ScriptedSurface::default();
        surface.input.push_back(vec![RawInput::key_pressed(0x29, "")]);
        let mut core = scripted(surface);

        let frames = counter();
        let f = frames.clone();
        core.set_draw_function(move |_, _| f.set(f.get() + 1));
        let handle = core.handle();
        core.set_keyboard_event_function(move |_: &KeyboardEvent| handle.exit());

        core.run().unwrap();
        assert_eq!(frames.get(), 1);
    }

    // ── Ordering ──────────────────────────────────────────────────────────

    #[test]
    fn mixed_input_keeps_delivery_order_and_precedes_draw() {
        let mut surface = ScriptedSurface::closing_after(1);
        surface.input.push_back(vec![
            RawInput::mouse_pressed(1),
            RawInput::key_pressed(4, "a"),
            RawInput::mouse_moved(Vec2::new(1.0, 0.0)),
            RawInput::key_released(4, "a"),
        ]);
        let mut core = scripted(surface);

        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let l = log.clone();
        core.set_mouse_event_function(move |ev: &MouseEvent| {
            l.borrow_mut().push(match ev.detail {
                MouseEventKind::Move { .. } => "move".into(),
                MouseEventKind::ButtonDown { button } => format!("down{button}"),
                MouseEventKind::ButtonUp { button } => format!("up{button}"),
            })
        });
        let l = log.clone();
        core.set_keyboard_event_function(move |ev: &KeyboardEvent| {
            l.borrow_mut().push(match ev.detail {
                KeyboardEventKind::KeyDown => format!("keydown:{}", ev.key),
                KeyboardEventKind::KeyUp => format!("keyup:{}", ev.key),
            })
        });
        let l = log.clone();
        core.set_draw_function(move |_, _| l.borrow_mut().push("draw".into()));

        core.run().unwrap();
        assert_eq!(
            *log.borrow(),
            ["down1", "keydown:a", "move", "keyup:a", "draw"]
        );
    }

    #[test]
    fn callbacks_never_overlap() {
        let mut surface = ScriptedSurface::closing_after(4);
        for _ in 0..4 {
            surface.input.push_back(vec![
                RawInput::mouse_pressed(0),
                RawInput::key_pressed(4, "a"),
                RawInput::mouse_released(0),
            ]);
        }
        let mut core = scripted(surface);

        let busy = Rc::new(Cell::new(false));
        let overlaps = counter();

        fn guard(busy: &Cell<bool>, overlaps: &Cell<u32>) {
            if busy.replace(true) {
                overlaps.set(overlaps.get() + 1);
            }
            busy.set(false);
        }

        let (b, o) = (busy.clone(), overlaps.clone());
        core.set_draw_function(move |_, _| guard(&b, &o));
        let (b, o) = (busy.clone(), overlaps.clone());
        core.set_mouse_event_function(move |_: &MouseEvent| guard(&b, &o));
        let (b, o) = (busy.clone(), overlaps.clone());
        core.set_keyboard_event_function(move |_: &KeyboardEvent| guard(&b, &o));

        core.run().unwrap();
        assert_eq!(overlaps.get(), 0);
    }

    #[test]
    fn held_buttons_persist_across_iterations() {
        let mut surface = ScriptedSurface::closing_after(3);
        surface.input.push_back(vec![RawInput::mouse_pressed(0)]);
        surface.input.push_back(vec![RawInput::mouse_pressed(2)]);
        surface.input.push_back(vec![RawInput::mouse_moved(Vec2::new(1.0, 1.0))]);
        let mut core = scripted(surface);

        let masks = Rc::new(RefCell::new(Vec::new()));
        let m = masks.clone();
        core.set_mouse_event_function(move |ev: &MouseEvent| m.borrow_mut().push(ev.buttons));
        core.set_draw_function(|_, _| {});

        core.run().unwrap();
        assert_eq!(*masks.borrow(), vec![0b1, 0b101, 0b101]);
    }

    // ── Frame acquisition ─────────────────────────────────────────────────

    #[test]
    fn transient_failure_skips_only_that_frame() {
        let mut surface = ScriptedSurface::closing_after(2);
        surface.acquisitions.extend([
            Ok(()),
            Err(AcquireError::Transient("timeout".into())),
            Ok(()),
        ]);
        let mut core = scripted(surface);

        let drawn = Rc::new(RefCell::new(Vec::new()));
        let d = drawn.clone();
        core.set_draw_function(move |serial, _| d.borrow_mut().push(serial));

        core.run().unwrap();
        assert_eq!(*drawn.borrow(), vec![1, 3]);
    }

    #[test]
    fn failures_up_to_the_limit_are_tolerated() {
        let mut surface = ScriptedSurface::closing_after(1);
        surface
            .acquisitions
            .extend((0..3).map(|_| Err(AcquireError::Transient("outdated".into()))));
        let mut core = scripted(surface);
        core.set_draw_function(|_, _| {});

        core.run().unwrap();
        assert_eq!(core.platform().attempts, 4);
    }

    #[test]
    fn persistent_transient_failure_becomes_fatal() {
        let mut surface = ScriptedSurface::default();
        surface
            .acquisitions
            .extend((0..4).map(|_| Err(AcquireError::Transient("outdated".into()))));
        let mut core = scripted(surface);
        core.set_draw_function(|_, _| panic!("no frame should be drawn"));

        let err = core.run().unwrap_err();
        assert!(matches!(err, ShellError::Surface(_)), "{err:?}");
        assert_eq!(core.state(), LoopState::Stopped);
        assert_eq!(core.platform().attempts, 4);
    }

    #[test]
    fn unbounded_limit_never_overflows_the_failure_count() {
        let mut surface = ScriptedSurface::closing_after(1);
        surface
            .acquisitions
            .extend((0..2).map(|_| Err(AcquireError::Transient("timeout".into()))));
        let mut core = DispatchCore::new(
            surface,
            DispatchConfig {
                frame_interval: Duration::ZERO,
                transient_failure_limit: u32::MAX,
            },
        );
        core.transient_failures = u32::MAX - 1;
        core.set_draw_function(|_, _| {});

        core.run().unwrap();
        assert_eq!(core.platform().attempts, 3);
        assert_eq!(core.transient_failures, 0);
    }

    #[test]
    fn fatal_failure_terminates_immediately() {
        let mut surface = ScriptedSurface::default();
        surface
            .acquisitions
            .push_back(Err(AcquireError::Fatal("device lost".into())));
        let mut core = scripted(surface);
        core.set_draw_function(|_, _| {});

        assert_eq!(core.run(), Err(ShellError::Surface("device lost".into())));
        assert_eq!(core.state(), LoopState::Stopped);
    }

    #[test]
    fn unpresentable_surface_is_not_acquired() {
        let mut surface = ScriptedSurface::default();
        surface.unpresentable = true;
        surface.input.push_back(vec![]);
        surface.input.push_back(vec![RawInput::key_pressed(0x29, "")]);
        let mut core = scripted(surface);

        core.set_draw_function(|_, _| panic!("nothing to draw into"));
        let handle = core.handle();
        core.set_keyboard_event_function(move |_: &KeyboardEvent| handle.exit());

        core.run().unwrap();
        assert_eq!(core.platform().attempts, 0);
    }

    #[test]
    fn paced_loop_waits_between_frames() {
        let mut core = DispatchCore::new(
            ScriptedSurface::default(),
            DispatchConfig {
                frame_interval: Duration::from_secs(3600),
                transient_failure_limit: 3,
            },
        );
        let frames = counter();
        let f = frames.clone();
        core.set_draw_function(move |_, _| f.set(f.get() + 1));

        // The scripted wait returns immediately, so the loop spins until the
        // safety valve closes it; only the first frame is ever due.
        core.run().unwrap();
        assert_eq!(frames.get(), 1);
        assert_eq!(core.frames(), 1);
    }
}
