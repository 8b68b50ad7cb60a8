// Tue Jan 13 2026 - Alex

use crate::engine::builder::OrchestratorSpec;
use crate::engine::error::TaskError;
use crate::engine::hooks::{DefaultHooks, Flow, OrchestrationHooks};
use crate::engine::latch::{CountDownLatch, WaitOutcome};
use crate::engine::signal::CompletionSignal;
use crate::engine::task::{Runnable, SharedTask, Task};
use crate::engine::worker::{Executor, WorkerPool};
use crate::utils::logging::ScopedTimer;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Created,
    MainRunning,
    FanOutRunning,
    Succeeded,
    TimedOut,
    Incomplete,
    Interrupted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::TimedOut | RunState::Incomplete | RunState::Interrupted
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Created => "created",
            RunState::MainRunning => "main running",
            RunState::FanOutRunning => "fan-out running",
            RunState::Succeeded => "succeeded",
            RunState::TimedOut => "timed out",
            RunState::Incomplete => "incomplete",
            RunState::Interrupted => "interrupted",
        };
        write!(f, "{}", s)
    }
}

#[derive(Default)]
struct InterruptSlot {
    requested: bool,
    latch: Option<Arc<CountDownLatch>>,
}

/// Cancels an orchestrator's barrier wait from another thread.
///
/// An interrupt raised before the wait begins is remembered and delivered as
/// soon as the wait starts.
#[derive(Clone, Default)]
pub struct InterruptHandle {
    slot: Arc<Mutex<InterruptSlot>>,
}

impl InterruptHandle {
    pub fn interrupt(&self) {
        let mut slot = self.slot.lock();
        if let Some(latch) = slot.latch.as_ref() {
            latch.interrupt();
            return;
        }
        slot.requested = true;
    }

    fn attach(&self, latch: Arc<CountDownLatch>) {
        let mut slot = self.slot.lock();
        if slot.requested {
            slot.requested = false;
            latch.interrupt();
        }
        slot.latch = Some(latch);
    }

    fn detach(&self) {
        self.slot.lock().latch = None;
    }
}

/// Runs a main task on the caller's thread, then fans out to its dependents on a
/// pool sized to the dependent count and waits for all of them up to a timeout.
///
/// Dependents still running when the run ends (timeout, interrupt) are abandoned:
/// the pool is torn down without joining them and they are not told to stop, so
/// their side effects may continue after the failure has been reported.
pub struct DependencyOrchestrator<M, H = DefaultHooks> {
    main: M,
    hooks: H,
    dependents: Vec<SharedTask>,
    timeout: Duration,
    executor: Box<dyn Executor>,
    state: RunState,
    interrupt: InterruptHandle,
}

impl<M: Task> DependencyOrchestrator<M, DefaultHooks> {
    pub fn new(main: M, spec: OrchestratorSpec) -> Self {
        Self::with_hooks(main, DefaultHooks, spec)
    }
}

impl<M, H> DependencyOrchestrator<M, H>
where
    M: Task,
    H: OrchestrationHooks<M::Output>,
{
    pub fn with_hooks(main: M, hooks: H, spec: OrchestratorSpec) -> Self {
        let pool = WorkerPool::with_name_prefix(spec.dependent_count(), spec.thread_name_prefix());
        Self::with_executor(main, hooks, spec, Box::new(pool))
    }

    pub fn with_executor(main: M, hooks: H, spec: OrchestratorSpec, executor: Box<dyn Executor>) -> Self {
        let (dependents, timeout, _) = spec.into_parts();

        Self {
            main,
            hooks,
            dependents,
            timeout,
            executor,
            state: RunState::Created,
            interrupt: InterruptHandle::default(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn dependents(&self) -> &[SharedTask] {
        &self.dependents
    }

    pub fn main_task(&self) -> &M {
        &self.main
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    pub fn all_dependents_done(&self) -> bool {
        self.dependents.iter().all(dependent_done)
    }

    /// Dependents that did not reach a successful terminal state. A dependent
    /// still held by an abandoned worker counts as not done.
    pub fn dependent_failures(&self) -> Vec<SharedTask> {
        self.dependents
            .iter()
            .filter(|task| !dependent_done(task))
            .cloned()
            .collect()
    }

    fn run(&mut self) -> Result<(), TaskError> {
        if self.state != RunState::Created {
            return Err(TaskError::AlreadyExecuted);
        }

        let _timer = ScopedTimer::new(&format!("orchestration of {}", self.main.name()));
        let outcome = self.drive();
        self.executor.shutdown_now();

        outcome
    }

    fn drive(&mut self) -> Result<(), TaskError> {
        self.state = RunState::MainRunning;
        log::debug!(
            "Executing {} with {} dependent task(s)",
            self.main.name(),
            self.dependents.len()
        );

        match self.hooks.before_main_task(&self.dependents) {
            Flow::Continue => {}
            Flow::Skip => {
                log::info!("Main task {} skipped by hook", self.main.name());
                return Ok(());
            }
            Flow::Abort => {
                return Err(self.fail(TaskError::Vetoed { phase: "before_main_task" }));
            }
        }

        self.main.execute()?;

        self.state = RunState::FanOutRunning;

        match self.hooks.before_dependents(self.main.result(), &self.dependents) {
            Flow::Continue => {}
            Flow::Skip => {
                log::info!("Dependent tasks of {} skipped by hook", self.main.name());
                self.state = RunState::Succeeded;
                return Ok(());
            }
            Flow::Abort => {
                return Err(self.fail(TaskError::Vetoed { phase: "before_dependents" }));
            }
        }

        let latch = Arc::new(CountDownLatch::new(self.dependents.len()));

        if let Err(err) = self.submit_dependents(&latch) {
            return Err(self.fail(err));
        }

        self.interrupt.attach(latch.clone());
        let waited = latch.wait_timeout(self.timeout);
        self.interrupt.detach();

        match waited {
            WaitOutcome::TimedOut => {
                log::error!("Error, timeout reached executing: {}", self.main.name());
                self.state = RunState::TimedOut;
                let pending = latch.count();
                Err(self.fail(TaskError::Timeout { timeout: self.timeout, pending }))
            }
            WaitOutcome::Interrupted => {
                log::error!("Thread interrupted waiting for dependent tasks of {}", self.main.name());
                self.state = RunState::Interrupted;
                Err(self.fail(TaskError::Interrupted))
            }
            WaitOutcome::Released => {
                // every worker released its task lock before counting down
                let failed: Vec<String> = self
                    .dependents
                    .iter()
                    .filter_map(|task| {
                        let task = task.lock();
                        if task.is_done() {
                            None
                        } else {
                            Some(task.name())
                        }
                    })
                    .collect();

                if !failed.is_empty() {
                    log::error!("Task: {} finished with error", self.main.name());
                    self.state = RunState::Incomplete;
                    return Err(self.fail(TaskError::Incomplete { failed }));
                }

                log::info!("Task {} finished", self.main.name());
                self.state = RunState::Succeeded;
                self.hooks.after_dependents(self.main.result(), &self.dependents);
                Ok(())
            }
        }
    }

    fn submit_dependents(&mut self, latch: &Arc<CountDownLatch>) -> Result<(), TaskError> {
        for task in &self.dependents {
            let mut signal = CompletionSignal::new(task.clone(), latch.clone());

            self.executor.submit(Box::new(move || {
                let name = signal.name();
                if let Err(err) = signal.execute() {
                    log::error!("Error executing dependent task: {}: {}", name, err);
                }
            }))?;
        }

        log::debug!("Submitted {} dependent task(s)", self.dependents.len());
        Ok(())
    }

    fn fail(&mut self, error: TaskError) -> TaskError {
        self.hooks.on_execution_error(self.main.result(), &self.dependents, &error);
        error
    }
}

fn dependent_done(task: &SharedTask) -> bool {
    task.try_lock().map_or(false, |t| t.is_done())
}

impl<M, H> Runnable for DependencyOrchestrator<M, H>
where
    M: Task,
    H: OrchestrationHooks<M::Output>,
{
    fn execute(&mut self) -> Result<(), TaskError> {
        self.run()
    }

    fn is_done(&self) -> bool {
        self.state == RunState::Succeeded
    }

    fn name(&self) -> String {
        self.main.name()
    }
}

impl<M, H> Task for DependencyOrchestrator<M, H>
where
    M: Task,
    H: OrchestrationHooks<M::Output>,
{
    type Output = M::Output;

    fn result(&self) -> Option<&M::Output> {
        self.main.result()
    }
}
