//! Co-operative cancellation for the tour algorithms.
//!
//! None of the algorithms can be interrupted at arbitrary points. Instead, every entry point
//! receives an [`Interrupt`] which is polled at well-defined phase boundaries (spanning tree
//! built, odd vertices selected, matching computed, circuit extracted) and once per stage of
//! the blossom algorithm. If it fires, the algorithm drops all intermediate structures and
//! returns [`TspError::Timeout`] carrying the phase that was about to start.

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use serde::Serialize;

use crate::{
    errors::{Result, TspError},
    utils::signal_handling,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub enum Phase {
    SpanningTree,
    OddVertices,
    Matching,
    EulerianCircuit,
    Shortcutting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::SpanningTree => "spanning tree construction",
            Phase::OddVertices => "odd vertex selection",
            Phase::Matching => "perfect matching",
            Phase::EulerianCircuit => "eulerian circuit extraction",
            Phase::Shortcutting => "shortcutting",
        };
        f.write_str(name)
    }
}

/// [`Interrupt`] is queried by the algorithms between phases. Implementations must be cheap to
/// evaluate, since the blossom algorithm asks once per augmentation stage.
///
/// # Example
/// ```
/// use metric_tsp::algorithm::{Deadline, Interrupt, Phase};
/// use std::time::Duration;
///
/// let deadline = Deadline::new(Duration::from_secs(3600));
/// assert!(!deadline.is_interrupted());
/// assert!(deadline.check(Phase::Matching).is_ok());
/// ```
pub trait Interrupt {
    /// Returns true iff the caller wants the computation to stop
    fn is_interrupted(&self) -> bool;

    /// Returns [`TspError::Timeout`] if the interrupt fired before `phase` could start
    fn check(&self, phase: Phase) -> Result<()> {
        if self.is_interrupted() {
            Err(TspError::Timeout { phase })
        } else {
            Ok(())
        }
    }
}

/// Never fires
#[derive(Clone, Copy, Default, Debug)]
pub struct Never;

impl Interrupt for Never {
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// Fires once the wall-clock passed a fixed point in time
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    deadline: Instant,
}

impl Deadline {
    pub fn new(timeout: Duration) -> Self {
        Self::at(Instant::now() + timeout)
    }

    pub fn at(deadline: Instant) -> Self {
        Self { deadline }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl Interrupt for Deadline {
    fn is_interrupted(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Fires after the process received SIGINT/SIGTERM; requires [`signal_handling::initialize`]
#[derive(Clone, Copy, Default, Debug)]
pub struct CtrlC;

impl Interrupt for CtrlC {
    fn is_interrupted(&self) -> bool {
        signal_handling::received_ctrl_c()
    }
}

impl Interrupt for AtomicBool {
    fn is_interrupted(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<I: Interrupt + ?Sized> Interrupt for &I {
    fn is_interrupted(&self) -> bool {
        (**self).is_interrupted()
    }
}

impl<I: Interrupt> Interrupt for Option<I> {
    fn is_interrupted(&self) -> bool {
        self.as_ref().is_some_and(|i| i.is_interrupted())
    }
}

/// Fires as soon as either of its parts fires
impl<A: Interrupt, B: Interrupt> Interrupt for (A, B) {
    fn is_interrupted(&self) -> bool {
        self.0.is_interrupted() || self.1.is_interrupted()
    }
}
