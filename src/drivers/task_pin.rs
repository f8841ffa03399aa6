//! FreeRTOS task spawning with explicit priority and stack size.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task with the requested priority and stack. On non-ESP
//! targets, falls back to a plain named thread.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread, so the config→spawn pair must not be interleaved
//! with other thread creation on the same thread.

use std::io;
use std::thread::JoinHandle;

/// Priority/stack pair for one controller task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Null-terminated (e.g. `"sampler\0"`).
    pub name: &'static str,
    pub priority: u8,
    pub stack_kb: usize,
}

/// Sensor sampler: highest priority so reads stay on schedule.
pub const SAMPLER_TASK: TaskSpec = TaskSpec {
    name: "sampler\0",
    priority: 5,
    stack_kb: 4,
};

/// Controller: consumes readings, edges, and commands.
pub const CONTROLLER_TASK: TaskSpec = TaskSpec {
    name: "controller\0",
    priority: 4,
    stack_kb: 8,
};

/// Emergency button monitor.
pub const MONITOR_TASK: TaskSpec = TaskSpec {
    name: "btn-monitor\0",
    priority: 3,
    stack_kb: 3,
};

impl TaskSpec {
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Spawn a FreeRTOS task with the given priority and stack.
#[cfg(target_os = "espidf")]
pub fn spawn_task(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    // SAFETY: the default config is plain data; `name` is a 'static,
    // null-terminated string that outlives the spawned task.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.prio = spec.priority as i32;
        cfg.stack_size = (spec.stack_kb * 1024) as _;
        cfg.thread_name = spec.name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    log::info!(
        "Spawning '{}' (pri={}, stack={}KB)",
        spec.display_name(),
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
}

/// Simulation fallback; ignores priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, no priority, stack={}KB)",
        spec.display_name(),
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb.max(64) * 1024)
        .spawn(f)
}
