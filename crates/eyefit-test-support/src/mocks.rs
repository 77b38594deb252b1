//! Mock implementations of core port traits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use eyefit_core::domain::{Circle, Rect, ScanSummary};
use eyefit_core::ports::{
    CircleFinder, FaceEyeDetector, FrameSource, HoughParams, ProgressSink, ScanEvent,
    SummaryOutput,
};
use image::{GrayImage, RgbImage};

/// Detector that returns fixed face and eye candidates.
///
/// Records the size of every image it was asked to search.
#[derive(Default)]
pub struct ScriptedDetector {
    faces: Vec<Rect>,
    eyes: Vec<Rect>,
    face_calls: Arc<Mutex<Vec<(u32, u32)>>>,
    eye_calls: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl ScriptedDetector {
    /// Creates a detector that finds nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the face candidates returned for every frame.
    #[must_use]
    pub fn with_faces(mut self, faces: Vec<Rect>) -> Self {
        self.faces = faces;
        self
    }

    /// Sets the eye candidates returned for every face.
    #[must_use]
    pub fn with_eyes(mut self, eyes: Vec<Rect>) -> Self {
        self.eyes = eyes;
        self
    }

    /// Dimensions of every frame passed to `detect_faces`.
    #[must_use]
    pub fn face_calls(&self) -> Vec<(u32, u32)> {
        self.face_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Dimensions of every face crop passed to `detect_eyes`.
    #[must_use]
    pub fn eye_calls(&self) -> Vec<(u32, u32)> {
        self.eye_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A handle onto the recorded eye calls that survives moving the detector.
    #[must_use]
    pub fn eye_call_log(&self) -> Arc<Mutex<Vec<(u32, u32)>>> {
        Arc::clone(&self.eye_calls)
    }
}

impl FaceEyeDetector for ScriptedDetector {
    fn detect_faces(&mut self, gray: &GrayImage) -> anyhow::Result<Vec<Rect>> {
        self.face_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(gray.dimensions());
        Ok(self.faces.clone())
    }

    fn detect_eyes(&mut self, face: &GrayImage) -> anyhow::Result<Vec<Rect>> {
        self.eye_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(face.dimensions());
        Ok(self.eyes.clone())
    }
}

/// Circle finder that returns fixed iris and pupil circles.
///
/// Iris and pupil searches are told apart by their minimum radius.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCircleFinder {
    iris: Vec<Circle>,
    pupil: Vec<Circle>,
    fail: bool,
}

impl ScriptedCircleFinder {
    /// A finder that never finds a circle.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A finder returning `iris` for iris searches and `pupil` for pupil searches.
    #[must_use]
    pub fn new(iris: Vec<Circle>, pupil: Vec<Circle>) -> Self {
        Self {
            iris,
            pupil,
            fail: false,
        }
    }

    /// A finder whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl CircleFinder for ScriptedCircleFinder {
    fn find_circles(
        &mut self,
        _gray: &GrayImage,
        params: &HoughParams,
    ) -> anyhow::Result<Vec<Circle>> {
        if self.fail {
            anyhow::bail!("circle transform unavailable");
        }
        if params.min_radius == HoughParams::pupil(0).min_radius {
            Ok(self.pupil.clone())
        } else {
            Ok(self.iris.clone())
        }
    }
}

/// Frame source that yields a scripted sequence, then ends.
pub struct MockFrameSource {
    frames: VecDeque<anyhow::Result<RgbImage>>,
    reads: Arc<Mutex<usize>>,
}

impl MockFrameSource {
    /// Creates a source yielding `frames` in order.
    #[must_use]
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames: frames.into_iter().map(Ok).collect(),
            reads: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a source yielding `count` copies of `frame`.
    #[must_use]
    pub fn repeat(frame: &RgbImage, count: usize) -> Self {
        Self::new(vec![frame.clone(); count])
    }

    /// Appends a read failure to the script.
    #[must_use]
    pub fn then_fail(mut self, message: &str) -> Self {
        self.frames.push_back(Err(anyhow::anyhow!(message.to_string())));
        self
    }

    /// Appends a frame to the script.
    #[must_use]
    pub fn then_frame(mut self, frame: RgbImage) -> Self {
        self.frames.push_back(Ok(frame));
        self
    }

    /// Number of `next_frame` calls so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FrameSource for MockFrameSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<RgbImage>> {
        *self.reads.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.frames.pop_front().transpose()
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ScanEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `BatchCompleted` events.
    #[must_use]
    pub fn completed_batches(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ScanEvent::BatchCompleted { .. }))
            .count()
    }

    /// Returns the number of `BatchReset` events.
    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ScanEvent::BatchReset { .. }))
            .count()
    }

    /// Returns the rejection reasons in order.
    #[must_use]
    pub fn rejections(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::FrameRejected { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }

    /// Returns the counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ScanEvent::Finished { completed, total } => Some((*completed, *total)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ScanEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Mock implementation of `SummaryOutput` for testing.
#[derive(Default)]
pub struct MockSummaryOutput {
    summaries: Arc<Mutex<Vec<ScanSummary>>>,
}

impl MockSummaryOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured summaries.
    #[must_use]
    pub fn summaries(&self) -> Vec<ScanSummary> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SummaryOutput for MockSummaryOutput {
    fn write(&self, summary: &ScanSummary) -> anyhow::Result<()> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*summary);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use eyefit_core::domain::Measurement;

    #[test]
    fn test_scripted_detector_records_calls() {
        let mut detector = ScriptedDetector::new().with_faces(vec![Rect::new(1, 2, 3, 4)]);

        let faces = detector.detect_faces(&GrayImage::new(10, 8)).unwrap();
        let eyes = detector.detect_eyes(&GrayImage::new(3, 4)).unwrap();

        assert_eq!(faces, vec![Rect::new(1, 2, 3, 4)]);
        assert!(eyes.is_empty());
        assert_eq!(detector.face_calls(), vec![(10, 8)]);
        assert_eq!(detector.eye_calls(), vec![(3, 4)]);
    }

    #[test]
    fn test_scripted_circles_split_by_search() {
        let iris = Circle::new(10.0, 10.0, 8.0);
        let pupil = Circle::new(11.0, 9.0, 3.0);
        let mut finder = ScriptedCircleFinder::new(vec![iris], vec![pupil]);
        let gray = GrayImage::new(30, 30);

        assert_eq!(
            finder.find_circles(&gray, &HoughParams::iris(30)).unwrap(),
            vec![iris]
        );
        assert_eq!(
            finder.find_circles(&gray, &HoughParams::pupil(30)).unwrap(),
            vec![pupil]
        );
        assert!(ScriptedCircleFinder::failing()
            .find_circles(&gray, &HoughParams::iris(30))
            .is_err());
    }

    #[test]
    fn test_mock_frame_source_sequence() {
        let mut source = MockFrameSource::new(vec![RgbImage::new(2, 2)])
            .then_fail("dropped")
            .then_frame(RgbImage::new(3, 3));

        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().is_err());
        assert_eq!(
            source.next_frame().unwrap().map(|f| f.dimensions()),
            Some((3, 3))
        );
        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.reads(), 4);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();
        sink.on_event(ScanEvent::FrameRejected {
            batch: 0,
            reason: "nope".into(),
        });
        sink.on_event(ScanEvent::BatchCompleted { batch: 0 });
        sink.on_event(ScanEvent::Finished {
            completed: 1,
            total: 1,
        });

        assert_eq!(sink.rejections(), vec!["nope".to_string()]);
        assert_eq!(sink.completed_batches(), 1);
        assert_eq!(sink.finished_counts(), Some((1, 1)));
    }

    #[test]
    fn test_mock_summary_output() {
        let output = MockSummaryOutput::new();
        let summary = ScanSummary {
            measurement: Measurement {
                eye_width_mm: 1.0,
                bridge_width_mm: 2.0,
                b_size_mm: 3.0,
            },
            batches: 5,
            frames: 100,
        };
        output.write(&summary).unwrap();
        assert_eq!(output.summaries(), vec![summary]);
    }
}
