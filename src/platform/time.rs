//! Frame timing sources
//!
//! A timing source hands out one pending frame at a time. The controller
//! requests the next frame at the end of each tick and cancels it on stop,
//! so nothing is delivered once a run has been stopped.

use std::cell::RefCell;
use std::rc::Rc;

/// Identifies a requested frame so it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Monotonic time plus per-frame scheduling
pub trait TimingSource {
    /// Current time in milliseconds
    fn now(&self) -> f64;

    /// Ask for one frame callback at the next display refresh
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct ClockInner {
    now: f64,
    next_id: i32,
    pending: Vec<FrameHandle>,
}

/// Deterministic clock driven by hand (native runs and tests).
///
/// Clones share the same clock, so a test can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.inner.borrow_mut().now += ms;
    }

    pub fn set(&self, now: f64) {
        self.inner.borrow_mut().now = now;
    }

    /// Number of frames requested and not yet delivered or cancelled
    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Deliver the oldest pending frame, returning its timestamp
    pub fn deliver(&self) -> Option<f64> {
        let mut inner = self.inner.borrow_mut();
        if inner.pending.is_empty() {
            return None;
        }
        inner.pending.remove(0);
        Some(inner.now)
    }
}

impl TimingSource for ManualClock {
    fn now(&self) -> f64 {
        self.inner.borrow().now
    }

    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let handle = FrameHandle(inner.next_id);
        inner.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.inner.borrow_mut().pending.retain(|&h| h != handle);
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::{FrameHandle, TimingSource};

    /// Receives each delivered frame timestamp
    pub type FrameCallback = Box<dyn FnMut(f64)>;

    /// requestAnimationFrame-backed timing source. Clones share the target.
    #[derive(Clone)]
    pub struct AnimationFrameTimer {
        window: web_sys::Window,
        target: Rc<RefCell<Option<FrameCallback>>>,
    }

    impl AnimationFrameTimer {
        pub fn new(window: web_sys::Window) -> Self {
            Self {
                window,
                target: Rc::new(RefCell::new(None)),
            }
        }

        /// Install the function frames are delivered to
        pub fn set_target(&self, callback: FrameCallback) {
            *self.target.borrow_mut() = Some(callback);
        }
    }

    impl TimingSource for AnimationFrameTimer {
        fn now(&self) -> f64 {
            self.window
                .performance()
                .map(|p| p.now())
                .unwrap_or_else(js_sys::Date::now)
        }

        fn request_frame(&mut self) -> FrameHandle {
            let target = self.target.clone();
            // Frees itself after the single invocation
            let closure = Closure::once_into_js(move |time: f64| {
                if let Some(callback) = target.borrow_mut().as_mut() {
                    callback(time);
                }
            });
            match self
                .window
                .request_animation_frame(closure.unchecked_ref())
            {
                Ok(id) => FrameHandle(id),
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    FrameHandle(-1)
                }
            }
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if handle.0 >= 0 {
                let _ = self.window.cancel_animation_frame(handle.0);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{AnimationFrameTimer, FrameCallback};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_delivers_requested_frames() {
        let clock = ManualClock::new();
        let mut source = clock.clone();
        assert_eq!(clock.deliver(), None);

        source.request_frame();
        clock.advance(16.0);
        assert_eq!(clock.pending_frames(), 1);
        assert_eq!(clock.deliver(), Some(16.0));
        assert_eq!(clock.deliver(), None);
    }

    #[test]
    fn test_cancel_removes_pending_frame() {
        let clock = ManualClock::new();
        let mut source = clock.clone();
        let first = source.request_frame();
        let second = source.request_frame();
        assert_ne!(first, second);

        source.cancel_frame(first);
        assert_eq!(clock.pending_frames(), 1);
        source.cancel_frame(first);
        assert_eq!(clock.pending_frames(), 1);
        source.cancel_frame(second);
        assert_eq!(clock.pending_frames(), 0);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.set(1000.0);
        other.advance(5.0);
        assert_eq!(clock.now(), 1005.0);
    }
}
