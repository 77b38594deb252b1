//! Progress reporting port for the batch scan.

/// Events emitted while a batch scan runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A batch started.
    BatchStarted {
        /// Batch index (0-based).
        batch: usize,
        /// Total batches in the session.
        total: usize,
        /// Measurements needed to complete the batch.
        frames: usize,
    },
    /// A frame produced a measurement.
    FrameMeasured {
        /// Batch index (0-based).
        batch: usize,
        /// Measurements collected so far in this batch.
        collected: usize,
    },
    /// A frame produced no measurement.
    FrameRejected {
        /// Batch index (0-based).
        batch: usize,
        /// User-facing reason.
        reason: String,
    },
    /// The face was lost for too long and the partial batch was discarded.
    BatchReset {
        /// Batch index (0-based).
        batch: usize,
        /// Measurements discarded.
        discarded: usize,
    },
    /// A batch completed.
    BatchCompleted {
        /// Batch index (0-based).
        batch: usize,
    },
    /// The frame stream ended before the batch could complete.
    BatchAbandoned {
        /// Batch index (0-based).
        batch: usize,
        /// Measurements collected before the stream ended.
        collected: usize,
    },
    /// The scan finished, successfully or not.
    Finished {
        /// Batches completed.
        completed: usize,
        /// Batches requested.
        total: usize,
    },
}

/// Port for receiving scan progress events.
pub trait ProgressSink {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ScanEvent);
}
