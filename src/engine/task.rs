// Tue Jan 13 2026 - Alex

use crate::engine::error::TaskError;
use crate::engine::result::ResultHolder;
use parking_lot::Mutex;
use std::sync::Arc;

/// A unit of work that can be run once and asked whether it finished.
///
/// This is the object-safe half of a task: dependents of different result
/// types live side by side as `dyn Runnable`.
pub trait Runnable: Send {
    fn execute(&mut self) -> Result<(), TaskError>;

    /// True once the task reached a successful terminal state.
    fn is_done(&self) -> bool;

    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// A runnable that produces a typed result.
pub trait Task: Runnable {
    type Output;

    /// The last stored result, or `None` if the task has not produced one.
    fn result(&self) -> Option<&Self::Output>;
}

/// A dependent task shared between the orchestrator and the worker that runs it.
pub type SharedTask = Arc<Mutex<dyn Runnable>>;

pub fn shared<T: Runnable + 'static>(task: T) -> SharedTask {
    Arc::new(Mutex::new(task))
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Runs a closure and keeps its value.
pub struct FnTask<R, F> {
    name: String,
    func: F,
    result: ResultHolder<R>,
}

impl<R, F> FnTask<R, F>
where
    F: FnMut() -> Result<R, TaskError>,
{
    pub fn new(name: &str, func: F) -> Self {
        Self {
            name: name.to_string(),
            func,
            result: ResultHolder::new(),
        }
    }

    pub fn take_result(&mut self) -> Option<R> {
        self.result.take()
    }
}

impl<R, F> Runnable for FnTask<R, F>
where
    R: Send,
    F: FnMut() -> Result<R, TaskError> + Send,
{
    fn execute(&mut self) -> Result<(), TaskError> {
        let value = (self.func)()?;
        self.result.set(value);
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.result.is_set()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<R, F> Task for FnTask<R, F>
where
    R: Send,
    F: FnMut() -> Result<R, TaskError> + Send,
{
    type Output = R;

    fn result(&self) -> Option<&R> {
        self.result.get()
    }
}
