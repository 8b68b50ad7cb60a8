// Tue Jan 15 2026 - Alex

#![allow(unused_variables)]

pub mod config;
pub mod engine;
pub mod utils;

pub use config::OrchestratorConfig;
pub use engine::{
    DependencyOrchestrator, Flow, FnTask, OrchestrationHooks, OrchestratorBuilder, RunState, Runnable,
    SharedTask, Task, TaskError,
};
