#![forbid(unsafe_code)]

//! Mount/unmount lifecycle for the render loop.
//!
//! The host owns the actual frame scheduling (`requestAnimationFrame`) and the
//! size observers. [`Lifecycle`] decides when to call them so that:
//!
//! - at most one frame request is outstanding at any time,
//! - `stop` cancels the outstanding request and detaches observers,
//! - a frame callback that fires after `stop` does nothing.
//!
//! ```text
//! Idle --start--> Running --stop--> Stopped
//!                   |  ^
//!                   +--+ frame_fired (reschedule)
//! ```

use thiserror::Error;

/// Opaque id of a scheduled frame (the value `requestAnimationFrame` returns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// A host call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host call failed: {0}")]
pub struct HostError(pub String);

/// Frame scheduling and observation provided by the embedder.
pub trait FrameHost {
    /// Schedule one frame callback.
    fn request_frame(&mut self) -> Result<FrameHandle, HostError>;

    /// Cancel a scheduled callback. Cancelling a handle that already fired is
    /// harmless.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start listening for size changes and pointer presses.
    fn attach_observers(&mut self) -> Result<(), HostError>;

    /// Stop listening. Must tolerate partially attached state.
    fn detach_observers(&mut self);
}

/// Lifecycle misuse or host failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("render loop is already running")]
    AlreadyRunning,
    #[error("render loop is not running")]
    NotRunning,
    #[error("render loop was stopped and cannot be restarted")]
    Stopped,
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Tracks whether the render loop runs and which frame is outstanding.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
    pending: Option<FrameHandle>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// The outstanding frame request, if any.
    #[inline]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Attach observers and schedule the first frame.
    ///
    /// If scheduling fails the observers are detached again and the
    /// lifecycle stays idle.
    pub fn start(&mut self, host: &mut impl FrameHost) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Running => return Err(LifecycleError::AlreadyRunning),
            LifecycleState::Stopped => return Err(LifecycleError::Stopped),
            LifecycleState::Idle => {}
        }

        if let Err(err) = host.attach_observers() {
            host.detach_observers();
            return Err(err.into());
        }
        match host.request_frame() {
            Ok(handle) => self.pending = Some(handle),
            Err(err) => {
                host.detach_observers();
                return Err(err.into());
            }
        }

        self.state = LifecycleState::Running;
        tracing::info!("spark render loop started");
        Ok(())
    }

    /// Record that the outstanding frame fired and schedule the next one.
    ///
    /// Returns `Ok(false)` when the loop is not running, in which case the
    /// caller must not draw.
    pub fn frame_fired(&mut self, host: &mut impl FrameHost) -> Result<bool, LifecycleError> {
        if !self.is_running() {
            return Ok(false);
        }
        self.pending = None;
        let handle = host.request_frame()?;
        self.pending = Some(handle);
        Ok(true)
    }

    /// Cancel the outstanding frame and detach observers.
    ///
    /// Valid exactly once, after a successful [`start`](Self::start).
    pub fn stop(&mut self, host: &mut impl FrameHost) -> Result<(), LifecycleError> {
        if !self.is_running() {
            return Err(LifecycleError::NotRunning);
        }
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        host.detach_observers();
        self.state = LifecycleState::Stopped;
        tracing::info!("spark render loop stopped");
        Ok(())
    }
}
