//! Live-pattern change notifications.

use bl_ir::PatternId;
use ringbuf::traits::Producer;
use ringbuf::HeapProd;
use tracing::warn;

/// Receives the id of the pattern playback moved to.
///
/// Called from the transport tick; implementations must not block.
pub trait PatternObserver {
    fn live_pattern_changed(&mut self, id: PatternId);
}

impl PatternObserver for HeapProd<PatternId> {
    fn live_pattern_changed(&mut self, id: PatternId) {
        if self.try_push(id).is_err() {
            warn!(?id, "pattern notification queue full, dropping");
        }
    }
}
