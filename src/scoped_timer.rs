use tokio::time::Instant;
use tracing::trace;

/// Reports how long one client call took, batch size included, when dropped
pub(crate) struct ScopedTimer {
    started_at: Instant,
    op: &'static str,
    items: usize,
}

impl ScopedTimer {
    pub(crate) fn start(op: &'static str) -> Self {
        Self {
            started_at: Instant::now(),
            op,
            items: 0,
        }
    }

    pub(crate) fn set_items(
        &mut self,
        items: usize,
    ) {
        self.items = items;
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        trace!(
            target: "timing",
            op = self.op,
            items = self.items,
            "[TIMING] {} took {} us",
            self.op,
            self.started_at.elapsed().as_micros()
        );
    }
}
