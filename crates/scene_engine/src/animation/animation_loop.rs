//! # Animation loop
//!
//! Drives the per-frame update of a [`Stage`]. The loop is either running or
//! stopped; [`AnimationLoop::start`] blocks, ticking once per
//! [`FrameScheduler::wait_for_frame`], until something calls
//! [`LoopHandle::stop`], the optional tick limit is reached, or the renderer
//! fails.
//!
//! ## Tick order
//!
//! 1. The camera controller updates the camera
//! 2. The tick callback runs with a [`TickContext`]
//! 3. Registered mutators run over the graph in pre-order
//! 4. The renderer draws the scene from the camera

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use super::mutator::MutatorRegistry;
use super::scheduler::FrameScheduler;
use crate::config::LoopSettings;
use crate::foundation::time::Timer;
use crate::render::{CameraController, RenderError, Renderer};
use crate::scene::Stage;

/// Errors returned to the host by the loop
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoopError {
    /// `start` was called while the loop's handle is already running
    #[error("Animation loop is already running")]
    AlreadyRunning,

    /// The renderer failed; the loop stopped
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No ticks are being issued
    Stopped,
    /// Ticks are issued once per frame
    Running,
}

/// Shared handle to a loop's running state
///
/// Clones share the same state. Stopping is idempotent and takes effect
/// before the next tick: the tick in progress, if any, still completes.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    state: Rc<Cell<LoopState>>,
}

impl Default for LoopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopHandle {
    /// Handle in the stopped state
    pub fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(LoopState::Stopped)),
        }
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state.get()
    }

    /// Whether ticks are being issued
    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    /// Stop issuing ticks
    pub fn stop(&self) {
        if self.state.replace(LoopState::Stopped) == LoopState::Running {
            log::debug!("Animation loop stop requested");
        }
    }

    fn begin(&self) -> Result<(), LoopError> {
        if self.is_running() {
            return Err(LoopError::AlreadyRunning);
        }
        self.state.set(LoopState::Running);
        Ok(())
    }
}

/// Returns its handle to `Stopped` when dropped, unwinding included
struct RunningGuard(LoopHandle);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Everything the tick callback may touch
pub struct TickContext<'a> {
    /// Stage being animated
    pub stage: &'a mut Stage,
    /// Mutators run after the callback; may be edited here
    pub mutators: &'a mut MutatorRegistry,
    /// Ticks completed before this one
    pub tick: u64,
    /// Seconds since the previous tick
    pub delta_time: f32,
    handle: &'a LoopHandle,
}

impl TickContext<'_> {
    /// Stop the loop after this tick
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// The loop's handle
    pub fn handle(&self) -> &LoopHandle {
        self.handle
    }
}

/// Summary of one `start` call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopStats {
    /// Ticks run by this call
    pub ticks: u64,
    /// Ticks run by every call on this loop
    pub elapsed_ticks: u64,
    /// Mutations applied during this call
    pub mutations_applied: u64,
    /// Mutations rolled back during this call
    pub mutator_failures: u64,
    /// Wall time of this call in seconds
    pub total_time: f32,
}

impl LoopStats {
    /// Average ticks per second over this call
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.ticks as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Per-frame driver for a stage
pub struct AnimationLoop {
    handle: LoopHandle,
    scheduler: Box<dyn FrameScheduler>,
    mutators: MutatorRegistry,
    max_ticks: Option<u64>,
    elapsed_ticks: u64,
}

impl std::fmt::Debug for AnimationLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLoop")
            .field("state", &self.handle.state())
            .field("mutators", &self.mutators)
            .field("max_ticks", &self.max_ticks)
            .field("elapsed_ticks", &self.elapsed_ticks)
            .finish_non_exhaustive()
    }
}

impl AnimationLoop {
    /// Loop paced by `scheduler`, with no tick limit
    pub fn new(scheduler: impl FrameScheduler + 'static) -> Self {
        Self::with_handle(scheduler, LoopHandle::new())
    }

    /// Loop sharing an existing handle
    ///
    /// Loops on the same handle stop together, and only one of them may run
    /// at a time.
    pub fn with_handle(scheduler: impl FrameScheduler + 'static, handle: LoopHandle) -> Self {
        Self {
            handle,
            scheduler: Box::new(scheduler),
            mutators: MutatorRegistry::new(),
            max_ticks: None,
            elapsed_ticks: 0,
        }
    }

    /// Loop configured from settings
    pub fn from_settings(scheduler: impl FrameScheduler + 'static, settings: &LoopSettings) -> Self {
        Self::new(scheduler).with_max_ticks(settings.max_ticks)
    }

    /// Stop automatically after `max_ticks` ticks per `start` call
    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Handle for stopping the loop from anywhere
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.handle.state()
    }

    /// Registered mutators
    pub fn mutators(&self) -> &MutatorRegistry {
        &self.mutators
    }

    /// Registered mutators, for adding or removing entries
    pub fn mutators_mut(&mut self) -> &mut MutatorRegistry {
        &mut self.mutators
    }

    /// Ticks run across every `start` call
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Run until stopped
    ///
    /// Blocks the calling thread. Returns the statistics of this run when
    /// the loop is stopped or reaches its tick limit, and
    /// [`LoopError::Render`] if the renderer fails. The loop is stopped on
    /// return, including when the controller, callback or renderer panics.
    pub fn start<C, R, F>(
        &mut self,
        stage: &mut Stage,
        controller: &mut C,
        renderer: &mut R,
        mut tick: F,
    ) -> Result<LoopStats, LoopError>
    where
        C: CameraController + ?Sized,
        R: Renderer + ?Sized,
        F: FnMut(&mut TickContext<'_>),
    {
        self.handle.begin()?;
        let _running = RunningGuard(self.handle.clone());
        log::info!("Animation loop started");

        let mut stats = LoopStats::default();
        let mut timer = Timer::new();

        loop {
            if !self.handle.is_running() {
                break;
            }
            self.scheduler.wait_for_frame();
            if !self.handle.is_running() {
                break;
            }

            timer.update();
            let tick_index = self.elapsed_ticks;

            controller.update(&mut stage.camera);

            let mut context = TickContext {
                stage: &mut *stage,
                mutators: &mut self.mutators,
                tick: tick_index,
                delta_time: timer.delta_time(),
                handle: &self.handle,
            };
            tick(&mut context);

            let report = self.mutators.apply(&mut stage.scene.graph, tick_index);
            stats.mutations_applied += report.applied;
            stats.mutator_failures += report.failed;

            if let Err(error) = renderer.render(&stage.scene, &stage.camera) {
                self.handle.stop();
                log::error!("Renderer failed on tick {tick_index}: {error}");
                return Err(LoopError::Render(error));
            }

            self.elapsed_ticks += 1;
            stats.ticks += 1;
            log::trace!("Tick {tick_index} complete");

            if self.max_ticks.is_some_and(|max| stats.ticks >= max) {
                log::debug!("Reached tick limit of {}", stats.ticks);
                self.handle.stop();
            }
        }

        stats.elapsed_ticks = self.elapsed_ticks;
        stats.total_time = timer.total_time();
        log::info!(
            "Animation loop stopped after {} ticks ({} mutator failures)",
            stats.ticks,
            stats.mutator_failures
        );
        Ok(stats)
    }
}
