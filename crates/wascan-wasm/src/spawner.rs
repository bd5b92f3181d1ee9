//! Task spawning on the JavaScript event loop

use futures::future::LocalBoxFuture;
use wascan_core::TaskSpawner;

/// Runs controller tasks as microtasks via `wasm_bindgen_futures`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSpawner;

impl TaskSpawner for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
