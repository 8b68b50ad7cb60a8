// Tue Jan 13 2026 - Alex

pub mod builder;
pub mod core;
pub mod error;
pub mod hooks;
pub mod latch;
pub mod result;
pub mod signal;
pub mod task;
pub mod worker;

pub use self::core::{DependencyOrchestrator, InterruptHandle, RunState};
pub use builder::{OrchestratorBuilder, OrchestratorSpec};
pub use error::{Result, TaskError};
pub use hooks::{DefaultHooks, Flow, OrchestrationHooks};
pub use latch::{CountDownLatch, WaitOutcome};
pub use result::ResultHolder;
pub use signal::CompletionSignal;
pub use task::{shared, FnTask, Runnable, SharedTask, Task};
pub use worker::{Executor, Job, WorkerPool, DEFAULT_THREAD_NAME_PREFIX};
