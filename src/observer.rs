//! Step observer trait for monitoring the substep pipeline.

/// Hooks called while a substep runs.
///
/// Implement this to watch solver progress (debugging, visualization,
/// profiling). All methods default to no-ops.
pub trait StepObserver {
    /// Called after all particles have been integrated (Verlet step).
    fn on_integrate(&mut self) {}

    /// Called after each relaxation pass over the springs.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called after sphere collision with the number of particles pushed out.
    fn on_collision(&mut self, _resolved: usize) {}

    /// Called when a substep is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Forwards every hook to `tracing` at trace level.
#[derive(Debug, Default)]
pub struct TracingObserver {
    substep: u64,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substeps completed so far.
    pub fn substeps(&self) -> u64 {
        self.substep
    }
}

impl StepObserver for TracingObserver {
    fn on_integrate(&mut self) {
        tracing::trace!(substep = self.substep, "integrated");
    }

    fn on_constraint_iteration(&mut self, iteration: usize) {
        tracing::trace!(substep = self.substep, iteration, "relaxation pass");
    }

    fn on_collision(&mut self, resolved: usize) {
        if resolved > 0 {
            tracing::trace!(substep = self.substep, resolved, "sphere contacts resolved");
        }
    }

    fn on_step_complete(&mut self) {
        tracing::trace!(substep = self.substep, "substep complete");
        self.substep += 1;
    }
}
