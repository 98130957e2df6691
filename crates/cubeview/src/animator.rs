//! Animation dispatcher.
//!
//! An [`Animator`] advances [`Interpolator`]s over time, either on a worker
//! thread at a fixed frame rate or instantly on the calling thread.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{JoinHandle, ThreadId};

use cubeprefs::InterpolateFn;
use parking_lot::{Condvar, Mutex};
use web_time::{Duration, Instant};

/// Higher number means faster exponential increase in twist speed.
const EXP_TWIST_FACTOR: f32 = 0.5;
/// Maximum speed multiplier from dynamic twist speed.
const MAX_SPEED_MOD: f32 = 8.0;

/// Something that changes over a span of time.
pub trait Interpolator: Send {
    /// Returns how long the animation lasts at normal speed.
    fn timespan(&self) -> Duration;

    /// Returns the easing curve that maps elapsed time to progress.
    fn curve(&self) -> InterpolateFn {
        InterpolateFn::Lerp
    }

    /// Returns whether the animation must wait for every earlier sequential
    /// animation to finish before it starts.
    fn is_sequential(&self) -> bool {
        false
    }

    /// Presents the state at `progress`, which is 0 at the start and
    /// exactly 1 at the end. Easing curves may overshoot in between.
    fn update(&mut self, progress: f32);
}

#[derive(Debug, Default)]
struct CompletionSignal {
    done: Mutex<bool>,
    condvar: Condvar,
}

/// Handle that can be used to wait for an animation to finish.
#[derive(Debug, Default, Clone)]
pub struct AnimationHandle(Arc<CompletionSignal>);
impl AnimationHandle {
    /// Returns a handle for an animation that has not finished.
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns a handle for an animation that has already finished.
    pub fn finished() -> Self {
        let ret = Self::new();
        ret.finish();
        ret
    }

    /// Returns whether the animation has finished.
    pub fn is_finished(&self) -> bool {
        *self.0.done.lock()
    }

    /// Blocks until the animation finishes.
    ///
    /// Stopping or dropping the animator finishes every animation, so this
    /// never blocks forever unless it is called on the animator thread.
    pub fn wait(&self) {
        let mut done = self.0.done.lock();
        while !*done {
            self.0.condvar.wait(&mut done);
        }
    }

    /// Blocks until the animation finishes or `timeout` elapses. Returns
    /// whether the animation finished.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        let mut done = self.0.done.lock();
        while !*done {
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return false;
            }
            self.0.condvar.wait_for(&mut done, timeout - elapsed);
        }
        true
    }

    fn finish(&self) {
        *self.0.done.lock() = true;
        self.0.condvar.notify_all();
    }
}

/// Handle that is finished when dropped.
struct FinishOnDrop(AnimationHandle);
impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Interpolator in progress.
struct Job {
    interpolator: Box<dyn Interpolator>,
    handle: AnimationHandle,
    /// Fraction of the timespan that has elapsed.
    fraction: f32,
    done: bool,
}
impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("timespan", &self.interpolator.timespan())
            .field("fraction", &self.fraction)
            .field("done", &self.done)
            .finish()
    }
}
impl Drop for Job {
    fn drop(&mut self) {
        // Never leave a waiter hanging, even if the job is discarded.
        self.handle.finish();
    }
}
impl Job {
    fn new(interpolator: Box<dyn Interpolator>) -> Self {
        Self {
            interpolator,
            handle: AnimationHandle::new(),
            fraction: 0.0,
            done: false,
        }
    }

    /// Advances the job by `elapsed` seconds at `speed` times normal speed.
    /// Returns whether the job has finished.
    fn advance(&mut self, elapsed: f32, speed: f32) -> bool {
        let timespan = self.interpolator.timespan().as_secs_f32();
        if timespan > 0.0 {
            self.fraction += elapsed * speed / timespan;
        } else {
            self.fraction = 1.0;
        }

        if self.fraction >= 1.0 {
            self.finish();
            true
        } else {
            let progress = self.interpolator.curve().interpolate(self.fraction);
            self.interpolator.update(progress);
            false
        }
    }

    /// Presents the final state and wakes waiters.
    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            self.fraction = 1.0;
            self.interpolator.update(1.0);
            self.handle.finish();
        }
    }
}

enum Command {
    Dispatch(Job),
    Stop(FinishOnDrop),
    Quit,
}

/// State of the animator thread.
#[derive(Debug)]
struct Worker {
    frame: Duration,
    dynamic_speed: Arc<AtomicBool>,

    /// Animations that run alongside everything else.
    concurrent: Vec<Job>,
    /// Animations that run one at a time, front first.
    sequential: VecDeque<Job>,
    /// Maximum length of `sequential` (reset when it is empty).
    queue_max: usize,

    /// Time of the last frame, or `None` if idle.
    last_tick: Option<Instant>,
}
impl Worker {
    fn new(frame: Duration, dynamic_speed: Arc<AtomicBool>) -> Self {
        Self {
            frame,
            dynamic_speed,
            concurrent: vec![],
            sequential: VecDeque::new(),
            queue_max: 0,
            last_tick: None,
        }
    }

    fn run(mut self, rx: mpsc::Receiver<Command>) {
        'run: loop {
            let command = if self.is_idle() {
                self.last_tick = None;
                match rx.recv() {
                    Ok(c) => Some(c),
                    Err(mpsc::RecvError) => break,
                }
            } else {
                match rx.recv_timeout(self.frame) {
                    Ok(c) => Some(c),
                    Err(mpsc::RecvTimeoutError::Timeout) => None,
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            };

            for command in command.into_iter().chain(std::iter::from_fn(|| rx.try_recv().ok())) {
                if !self.handle(command) {
                    break 'run;
                }
            }

            self.tick(Instant::now());
        }

        self.finish_all();
        log::debug!("Animator thread exiting");
    }

    fn is_idle(&self) -> bool {
        self.concurrent.is_empty() && self.sequential.is_empty()
    }

    /// Handles a command. Returns `false` if the thread should exit.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Dispatch(job) => {
                log::debug!("Dispatched animation {job:?}");
                if job.interpolator.is_sequential() {
                    self.sequential.push_back(job);
                    self.queue_max = std::cmp::max(self.queue_max, self.sequential.len());
                } else {
                    self.concurrent.push(job);
                }
                true
            }
            Command::Stop(_ack) => {
                self.finish_all();
                true
            }
            Command::Quit => false,
        }
    }

    /// Returns the speed multiplier for sequential animations.
    fn speed_mod(&self) -> f32 {
        if self.dynamic_speed.load(Ordering::Relaxed) && self.queue_max > 1 {
            // Twist exponentially faster if there are/were more twists in
            // the queue.
            ((self.queue_max - 1) as f32 * EXP_TWIST_FACTOR)
                .exp()
                .min(MAX_SPEED_MOD)
        } else {
            1.0
        }
    }

    fn tick(&mut self, now: Instant) {
        let elapsed = match self.last_tick {
            Some(last) => now.duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);

        self.concurrent.retain_mut(|job| !job.advance(elapsed, 1.0));

        let speed = self.speed_mod();
        let mut elapsed = elapsed;
        while let Some(job) = self.sequential.front_mut() {
            if !job.advance(elapsed, speed) {
                break;
            }
            log::debug!("Finished animation {job:?}");
            self.sequential.pop_front();
            // The next one starts from the beginning.
            elapsed = 0.0;
        }
        if self.sequential.is_empty() {
            self.queue_max = 0;
        }
    }

    fn finish_all(&mut self) {
        for mut job in self.concurrent.drain(..) {
            job.finish();
        }
        for mut job in self.sequential.drain(..) {
            job.finish();
        }
        self.queue_max = 0;
    }
}

enum Mode {
    Synchronous,
    Threaded {
        tx: mpsc::Sender<Command>,
        join_handle: Mutex<Option<JoinHandle<()>>>,
        thread_id: ThreadId,
    },
}

/// Dispatcher that runs animations.
pub struct Animator {
    mode: Mode,
    dynamic_speed: Arc<AtomicBool>,
}
impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("synchronous", &self.is_synchronous())
            .field("dynamic_speed", &self.dynamic_speed.load(Ordering::Relaxed))
            .finish()
    }
}
impl Default for Animator {
    fn default() -> Self {
        Self::synchronous()
    }
}
impl Drop for Animator {
    fn drop(&mut self) {
        if let Mode::Threaded {
            tx, join_handle, ..
        } = &self.mode
        {
            // The thread may have exited already.
            let _ = tx.send(Command::Quit);
            if !self.is_animator_thread() {
                if let Some(join_handle) = join_handle.lock().take() {
                    if join_handle.join().is_err() {
                        log::error!("Animator thread panicked");
                    }
                }
            }
        }
    }
}

impl Animator {
    /// Starts an animator thread that presents `frame_rate` frames per
    /// second. If the thread cannot be started, returns a synchronous
    /// animator instead.
    pub fn threaded(frame_rate: u32) -> Self {
        let frame = Duration::from_secs(1) / frame_rate.max(1);
        let dynamic_speed = Arc::new(AtomicBool::new(false));

        let (tx, rx) = mpsc::channel();
        let worker = Worker::new(frame, Arc::clone(&dynamic_speed));
        let spawn_result = std::thread::Builder::new()
            .name("cube-animator".to_string())
            .spawn(move || worker.run(rx));

        match spawn_result {
            Ok(join_handle) => Self {
                mode: Mode::Threaded {
                    tx,
                    thread_id: join_handle.thread().id(),
                    join_handle: Mutex::new(Some(join_handle)),
                },
                dynamic_speed,
            },
            Err(e) => {
                log::error!("Error starting animator thread: {e}");
                Self {
                    mode: Mode::Synchronous,
                    dynamic_speed,
                }
            }
        }
    }

    /// Returns an animator that finishes every animation as soon as it is
    /// dispatched, on the calling thread.
    pub fn synchronous() -> Self {
        Self {
            mode: Mode::Synchronous,
            dynamic_speed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns whether animations finish as soon as they are dispatched.
    pub fn is_synchronous(&self) -> bool {
        matches!(self.mode, Mode::Synchronous)
    }
    /// Returns whether the current thread is the animator thread.
    pub fn is_animator_thread(&self) -> bool {
        match &self.mode {
            Mode::Synchronous => false,
            Mode::Threaded { thread_id, .. } => *thread_id == std::thread::current().id(),
        }
    }

    /// Sets whether sequential animations speed up when several are
    /// waiting.
    pub fn set_dynamic_speed(&self, dynamic_speed: bool) {
        self.dynamic_speed.store(dynamic_speed, Ordering::Relaxed);
    }

    /// Starts an animation and returns a handle to wait for it.
    pub fn dispatch(&self, interpolator: impl Interpolator + 'static) -> AnimationHandle {
        let mut job = Job::new(Box::new(interpolator));
        let handle = job.handle.clone();
        match &self.mode {
            Mode::Synchronous => job.finish(),
            Mode::Threaded { tx, .. } => {
                if let Err(mpsc::SendError(command)) = tx.send(Command::Dispatch(job)) {
                    log::error!("Animator thread is gone; skipping to the end of the animation");
                    if let Command::Dispatch(mut job) = command {
                        job.finish();
                    }
                }
            }
        }
        handle
    }

    /// Blocks until the animation finishes, unless called on the animator
    /// thread (where waiting would never end).
    pub fn wait(&self, handle: &AnimationHandle) {
        if self.is_animator_thread() {
            log::debug!("Not waiting for animation on the animator thread");
            return;
        }
        handle.wait();
    }

    /// Finishes every running and pending animation immediately, presenting
    /// its final state, and wakes all waiters. Returns once the animator has
    /// done so, unless called on the animator thread.
    pub fn stop(&self) {
        if let Mode::Threaded { tx, .. } = &self.mode {
            let ack = AnimationHandle::new();
            if tx.send(Command::Stop(FinishOnDrop(ack.clone()))).is_ok() {
                self.wait(&ack);
            }
        }
    }
}
