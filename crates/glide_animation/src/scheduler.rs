//! Frame scheduler
//!
//! The host owns the clock: it calls [`FrameScheduler::frame`] once per
//! animation frame with a millisecond timestamp. Each frame runs three
//! phases in order:
//!
//! 1. **update** - every registered driver (running animation) is stepped
//! 2. **render** - queued render jobs run (element writes)
//! 3. **post-render** - queued post-render jobs run (velocity bookkeeping)
//!
//! Drivers started during a frame first run on the next frame. Jobs queued
//! during a phase run in the next occurrence of that phase, so a render job
//! queued from a driver still runs this frame while a render job queued from
//! a render job waits for the next one.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Frame delta used when there is no previous frame to measure against
pub const DEFAULT_TIMESTEP: f64 = 1000.0 / 60.0;

/// Longest delta a single frame may report
const MAX_ELAPSED: f64 = 40.0;

new_key_type! {
    /// Handle to a registered driver
    pub struct DriverId;
}

/// Timing of the frame being processed
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameData {
    /// Milliseconds since the previous frame
    pub delta: f64,
    /// Host timestamp in milliseconds
    pub timestamp: f64,
}

/// Per-frame step; returning `false` unregisters the driver
pub type DriverFn = Box<dyn FnMut(&FrameData) -> bool>;

/// One-shot job for the render or post-render phase
pub type FrameJob = Box<dyn FnOnce(&FrameData)>;

struct DriverSlot {
    /// Taken out while the driver runs so it can reach the scheduler
    update: Option<DriverFn>,
}

struct SchedulerInner {
    drivers: SlotMap<DriverId, DriverSlot>,
    render_jobs: Vec<FrameJob>,
    post_render_jobs: Vec<FrameJob>,
    frame: FrameData,
    last_timestamp: Option<f64>,
    /// Set when a frame ends with nothing left to do
    idle: bool,
}

impl SchedulerInner {
    fn has_pending_work(&self) -> bool {
        !self.drivers.is_empty() || !self.render_jobs.is_empty() || !self.post_render_jobs.is_empty()
    }

    fn start_driver(&mut self, update: DriverFn) -> DriverId {
        self.drivers.insert(DriverSlot {
            update: Some(update),
        })
    }
}

/// The frame scheduler that steps drivers and flushes frame jobs
///
/// Typically owned by the host; components hold a [`SchedulerHandle`].
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                drivers: SlotMap::with_key(),
                render_jobs: Vec::new(),
                post_render_jobs: Vec::new(),
                frame: FrameData::default(),
                last_timestamp: None,
                idle: true,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Process one frame at `timestamp` ms
    ///
    /// Returns true if there is still work pending (the host should request
    /// another frame).
    pub fn frame(&self, timestamp: f64) -> bool {
        let frame = {
            let mut inner = self.inner.borrow_mut();
            let delta = match inner.last_timestamp {
                Some(prev) if !inner.idle => (timestamp - prev).clamp(1.0, MAX_ELAPSED),
                _ => DEFAULT_TIMESTEP,
            };
            inner.frame = FrameData { delta, timestamp };
            inner.last_timestamp = Some(timestamp);
            inner.frame
        };
        tracing::trace!(timestamp, delta = frame.delta, "frame");

        self.run_drivers(&frame);

        let render_jobs = std::mem::take(&mut self.inner.borrow_mut().render_jobs);
        for job in render_jobs {
            job(&frame);
        }

        let post_render_jobs = std::mem::take(&mut self.inner.borrow_mut().post_render_jobs);
        for job in post_render_jobs {
            job(&frame);
        }

        let mut inner = self.inner.borrow_mut();
        let pending = inner.has_pending_work();
        inner.idle = !pending;
        pending
    }

    /// Process a frame `delta` ms after the previous one
    pub fn advance(&self, delta: f64) -> bool {
        let timestamp = self.timestamp() + delta;
        self.frame(timestamp)
    }

    fn run_drivers(&self, frame: &FrameData) {
        let ids: SmallVec<[DriverId; 16]> = self.inner.borrow().drivers.keys().collect();

        for id in ids {
            let update = self
                .inner
                .borrow_mut()
                .drivers
                .get_mut(id)
                .and_then(|slot| slot.update.take());
            let Some(mut update) = update else {
                continue;
            };

            let keep = update(frame);

            // A driver cancelled while it was running is dropped here
            let finished = {
                let mut inner = self.inner.borrow_mut();
                match inner.drivers.get_mut(id) {
                    Some(slot) if keep => {
                        slot.update = Some(update);
                        None
                    }
                    Some(_) => {
                        inner.drivers.remove(id);
                        Some(update)
                    }
                    None => Some(update),
                }
            };
            drop(finished);
        }
    }

    /// Timestamp of the most recent frame (0 before the first)
    pub fn timestamp(&self) -> f64 {
        self.inner.borrow().frame.timestamp
    }

    /// Get the number of registered drivers
    pub fn driver_count(&self) -> usize {
        self.inner.borrow().drivers.len()
    }

    /// Check if any drivers or jobs are waiting for a frame
    pub fn has_pending_work(&self) -> bool {
        self.inner.borrow().has_pending_work()
    }

    pub fn start_driver(&self, update: impl FnMut(&FrameData) -> bool + 'static) -> DriverId {
        self.inner.borrow_mut().start_driver(Box::new(update))
    }

    pub fn cancel_driver(&self, id: DriverId) {
        let removed = self.inner.borrow_mut().drivers.remove(id);
        drop(removed);
    }

    pub fn on_render(&self, job: impl FnOnce(&FrameData) + 'static) {
        self.inner.borrow_mut().render_jobs.push(Box::new(job));
    }

    pub fn on_post_render(&self, job: impl FnOnce(&FrameData) + 'static) {
        self.inner.borrow_mut().post_render_jobs.push(Box::new(job));
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the frame scheduler
///
/// This is passed to components that need to schedule work.
/// It won't prevent the scheduler from being dropped; once it is, every
/// operation becomes a no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a driver, stepped once per frame from the next frame on
    pub fn start_driver(
        &self,
        update: impl FnMut(&FrameData) -> bool + 'static,
    ) -> Option<DriverId> {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().start_driver(Box::new(update)))
    }

    /// Unregister a driver; safe to call from inside the driver itself
    pub fn cancel_driver(&self, id: DriverId) {
        if let Some(inner) = self.inner.upgrade() {
            let removed = inner.borrow_mut().drivers.remove(id);
            drop(removed);
        }
    }

    pub fn on_render(&self, job: impl FnOnce(&FrameData) + 'static) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().render_jobs.push(Box::new(job));
        }
    }

    pub fn on_post_render(&self, job: impl FnOnce(&FrameData) + 'static) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().post_render_jobs.push(Box::new(job));
        }
    }

    /// Timestamp of the most recent frame (0 before the first or once dropped)
    pub fn timestamp(&self) -> f64 {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().frame.timestamp)
            .unwrap_or(0.0)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
