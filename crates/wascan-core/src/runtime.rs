//! Native task spawning

use crate::ports::TaskSpawner;
use futures::future::LocalBoxFuture;

/// Spawns onto the current Tokio `LocalSet`
///
/// Spawning outside a `LocalSet` panics, as `tokio::task::spawn_local` does.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLocalSpawner;

impl TaskSpawner for TokioLocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}
