//! Periodic tasks and frame animation.
//!
//! Geometry work is synchronous and happens on the caller's thread. The only
//! background work in the crate is timing: a [`PeriodicTask`] calls a closure
//! at a fixed interval on a worker thread, and an [`ImageAnimator`] uses one
//! to step the active frame of a shared multi-frame [`Bitmap`].

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Error, Result};
use crate::image::Bitmap;

/// Tick used by [`ImageAnimator::animate`].
pub const ANIMATION_TICK: Duration = Duration::from_millis(50);

// ============================================================================
// PeriodicTask
// ============================================================================

#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn raise(&self) {
        *self.lock() = true;
        self.wake.notify_all();
    }

    /// Sleep until `deadline` or until stopped. Returns true when stopped.
    fn wait_until(&self, deadline: Instant) -> bool {
        let mut stopped = self.lock();
        loop {
            if *stopped {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = self
                .wake
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// A closure called every `interval` on its own thread until stopped.
///
/// [`stop`](Self::stop) is synchronous: once it returns, the closure is not
/// running and never runs again. Called from inside the closure it only
/// flags the worker, which exits after the closure returns. Dropping the
/// task stops it.
#[derive(Debug)]
pub struct PeriodicTask {
    signal: Arc<StopSignal>,
    handle: Mutex<Option<JoinHandle<()>>>,
    worker: ThreadId,
    interval: Duration,
}

impl PeriodicTask {
    pub fn start<F>(interval: Duration, mut callback: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        if interval.is_zero() {
            return Err(Error::invalid("periodic task interval must be non-zero"));
        }
        let signal = Arc::new(StopSignal::default());
        let worker_signal = Arc::clone(&signal);
        let handle = thread::Builder::new()
            .name("plusgeom-periodic".into())
            .spawn(move || {
                let mut next = Instant::now() + interval;
                while !worker_signal.wait_until(next) {
                    callback();
                    next += interval;
                    let now = Instant::now();
                    if next < now {
                        next = now + interval;
                    }
                }
            })?;
        let worker = handle.thread().id();
        debug!(?interval, "periodic task started");
        Ok(Self {
            signal,
            handle: Mutex::new(Some(handle)),
            worker,
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_stopped(&self) -> bool {
        *self.signal.lock()
    }

    /// Stop the task and wait for the worker to finish.
    ///
    /// Concurrent callers all block until the worker has exited. The worker
    /// never takes the handle lock, so holding it across the join is safe.
    pub fn stop(&self) {
        self.signal.raise();
        if thread::current().id() == self.worker {
            return;
        }
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(worker) = handle.take() {
            let _ = worker.join();
            debug!(interval = ?self.interval, "periodic task stopped");
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// ImageAnimator
// ============================================================================

/// Steps the active frame of a shared bitmap according to its frame delays.
#[derive(Debug)]
pub struct ImageAnimator {
    task: PeriodicTask,
}

impl ImageAnimator {
    /// Animate `image`, calling `on_frame_changed` with the new frame index
    /// after each step. The bitmap must have more than one frame.
    pub fn animate<F>(image: Arc<Mutex<Bitmap>>, on_frame_changed: F) -> Result<Self>
    where
        F: FnMut(usize) + Send + 'static,
    {
        Self::animate_with_tick(image, ANIMATION_TICK, on_frame_changed)
    }

    /// Like [`animate`](Self::animate) with a custom timer resolution.
    /// Frames whose delay is shorter than `tick` last one tick.
    pub fn animate_with_tick<F>(
        image: Arc<Mutex<Bitmap>>,
        tick: Duration,
        mut on_frame_changed: F,
    ) -> Result<Self>
    where
        F: FnMut(usize) + Send + 'static,
    {
        let frames = image
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame_count();
        if frames < 2 {
            return Err(Error::invalid("image is not animated"));
        }
        let mut elapsed = Duration::ZERO;
        let task = PeriodicTask::start(tick, move || {
            elapsed += tick;
            let changed = {
                let mut bmp = image.lock().unwrap_or_else(PoisonError::into_inner);
                let delay = bmp.frame_delay(bmp.active_frame()).unwrap_or(Duration::ZERO);
                if elapsed >= delay {
                    elapsed = Duration::ZERO;
                    Some(bmp.advance_frame())
                } else {
                    None
                }
            };
            if let Some(frame) = changed {
                on_frame_changed(frame);
            }
        })?;
        Ok(Self { task })
    }

    /// Stop animating; the bitmap keeps its current frame.
    pub fn stop(&self) {
        self.task.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_stopped()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{OnceLock, Weak};

    fn wait_for(mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "timed out");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_rejects_zero_interval() {
        assert!(PeriodicTask::start(Duration::ZERO, || {}).is_err());
    }

    #[test]
    fn test_no_callbacks_after_stop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let task = PeriodicTask::start(Duration::from_millis(2), move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        wait_for(|| count.load(Ordering::SeqCst) >= 3);
        task.stop();
        assert!(task.is_stopped());
        let seen = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), seen);
        task.stop();
    }

    #[test]
    fn test_concurrent_stops_wait_for_callback() {
        let running = Arc::new(AtomicBool::new(false));
        let r = Arc::clone(&running);
        let task = PeriodicTask::start(Duration::from_millis(1), move || {
            r.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(30));
            r.store(false, Ordering::SeqCst);
        })
        .unwrap();
        wait_for(|| running.load(Ordering::SeqCst));
        thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| {
                    task.stop();
                    assert!(!running.load(Ordering::SeqCst));
                });
            }
        });
        assert!(task.is_stopped());
    }

    #[test]
    fn test_drop_stops_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let task = PeriodicTask::start(Duration::from_millis(2), move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        wait_for(|| count.load(Ordering::SeqCst) >= 1);
        drop(task);
        let seen = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[test]
    fn test_stop_from_inside_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let slot: Arc<OnceLock<Weak<PeriodicTask>>> = Arc::new(OnceLock::new());
        let (c, s) = (Arc::clone(&count), Arc::clone(&slot));
        let task = Arc::new(
            PeriodicTask::start(Duration::from_millis(2), move || {
                c.fetch_add(1, Ordering::SeqCst);
                if let Some(task) = s.get().and_then(Weak::upgrade) {
                    task.stop();
                }
            })
            .unwrap(),
        );
        slot.set(Arc::downgrade(&task)).unwrap();
        wait_for(|| task.is_stopped());
        let seen = count.load(Ordering::SeqCst);
        assert!(seen >= 1);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    fn animated_bitmap(delay: Duration) -> Bitmap {
        let mut bmp = Bitmap::new(2, 1).unwrap();
        bmp.set_frame_delay(0, delay).unwrap();
        bmp.add_frame(&[Color::BLACK; 2], delay).unwrap();
        bmp.add_frame(&[Color::WHITE; 2], delay).unwrap();
        bmp
    }

    #[test]
    fn test_animator_steps_frames() {
        let image = Arc::new(Mutex::new(animated_bitmap(Duration::from_millis(4))));
        let (tx, rx) = mpsc::channel();
        let animator = ImageAnimator::animate_with_tick(
            Arc::clone(&image),
            Duration::from_millis(2),
            move |frame| {
                let _ = tx.send(frame);
            },
        )
        .unwrap();
        let timeout = Duration::from_secs(5);
        assert_eq!(rx.recv_timeout(timeout).unwrap(), 1);
        assert_eq!(rx.recv_timeout(timeout).unwrap(), 2);
        assert_eq!(rx.recv_timeout(timeout).unwrap(), 0);
        animator.stop();
        assert!(animator.is_stopped());
        let frame = image.lock().unwrap().active_frame();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(image.lock().unwrap().active_frame(), frame);
    }

    #[test]
    fn test_animator_needs_frames() {
        let image = Arc::new(Mutex::new(Bitmap::new(1, 1).unwrap()));
        assert!(matches!(
            ImageAnimator::animate(image, |_| {}),
            Err(Error::InvalidArgument(_))
        ));
    }
}
