// Tue Jan 13 2026 - Alex

use crate::engine::error::TaskError;
use crate::engine::task::SharedTask;

/// Verdict returned by the gating hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Skip the remaining work and finish successfully.
    Skip,
    /// Fail the run with `TaskError::Vetoed`.
    Abort,
}

impl Flow {
    pub fn from_bool(proceed: bool) -> Self {
        if proceed {
            Flow::Continue
        } else {
            Flow::Skip
        }
    }
}

impl Default for Flow {
    fn default() -> Self {
        Flow::Continue
    }
}

/// Lifecycle callbacks invoked by `DependencyOrchestrator` on the caller's thread.
///
/// Every method has a permissive default, so implementors override only what
/// they need. `main_result` is `None` when the main task produced no value.
pub trait OrchestrationHooks<R>: Send {
    /// Gate before the main task runs. `Skip` returns without running it.
    fn before_main_task(&mut self, dependents: &[SharedTask]) -> Flow {
        Flow::Continue
    }

    /// Gate before fan-out. `Skip` succeeds without running any dependent.
    fn before_dependents(&mut self, main_result: Option<&R>, dependents: &[SharedTask]) -> Flow {
        Flow::Continue
    }

    /// Called once when every dependent finished and is done.
    fn after_dependents(&mut self, main_result: Option<&R>, dependents: &[SharedTask]) {}

    /// Called before any orchestration failure is returned. It cannot suppress the failure.
    fn on_execution_error(
        &mut self,
        main_result: Option<&R>,
        dependents: &[SharedTask],
        error: &TaskError,
    ) {
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl<R> OrchestrationHooks<R> for DefaultHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_from_bool() {
        assert_eq!(Flow::from_bool(true), Flow::Continue);
        assert_eq!(Flow::from_bool(false), Flow::Skip);
        assert_eq!(Flow::default(), Flow::Continue);
    }

    #[test]
    fn test_default_hooks_are_permissive() {
        let mut hooks = DefaultHooks;
        let dependents: Vec<SharedTask> = Vec::new();

        assert_eq!(OrchestrationHooks::<u32>::before_main_task(&mut hooks, &dependents), Flow::Continue);
        assert_eq!(hooks.before_dependents(Some(&1u32), &dependents), Flow::Continue);
        OrchestrationHooks::<u32>::after_dependents(&mut hooks, None, &dependents);
        OrchestrationHooks::<u32>::on_execution_error(&mut hooks, None, &dependents, &TaskError::Interrupted);
    }
}
