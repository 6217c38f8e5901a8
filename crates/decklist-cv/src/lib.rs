//! Decklist importer computer vision library
//!
//! Multi-scale template matching over captured device frames, plus the narrow
//! device interfaces (screen capture, gestures, time) the matcher drives.

pub mod device;
pub mod error;
pub mod point;
pub mod scale;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use device::{Clock, RetryPolicy, SimulatedClock, SystemClock};
pub use error::CvError;
pub use point::{MatchPoint, Region};
pub use scale::{Calibration, CalibrationSweep, ResolutionBucket, ScaleProfile};
pub use template::{
    ConfidenceThresholds, Detection, LocateRequest, MatchConfig, MatchingMethod, Template,
    TemplateCategory, TemplateLoader, TemplateMatcher, TemplateSet,
};
pub use traits::{GestureExecutor, ScreenSource, TemplateStore};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Interfaces to the host platform and to template storage.
pub mod traits {
    use super::*;
    use image::DynamicImage;

    /// Supplies screenshots on demand.
    pub trait ScreenSource {
        /// Grab the current frame, or `None` when the platform has no new image yet.
        fn capture(&mut self) -> Option<DynamicImage>;
    }

    /// Dispatches synthetic touch input.
    pub trait GestureExecutor {
        /// Tap `(x, y)` `repeat` times. `label` names the target for logging.
        fn tap(&mut self, x: u32, y: u32, label: &str, repeat: u32) -> Result<()>;

        fn swipe(&mut self, from: (u32, u32), to: (u32, u32), duration_ms: u64) -> Result<()>;

        /// Publish the text the input service pastes into the next focused field.
        fn paste_text(&mut self, text: &str) -> Result<()>;
    }

    /// Named template images, split by category.
    pub trait TemplateStore {
        fn get(&self, name: &str, category: TemplateCategory) -> Result<Template>;
    }

    impl<T: ScreenSource + ?Sized> ScreenSource for &mut T {
        fn capture(&mut self) -> Option<DynamicImage> {
            (**self).capture()
        }
    }

    impl<T: GestureExecutor + ?Sized> GestureExecutor for &mut T {
        fn tap(&mut self, x: u32, y: u32, label: &str, repeat: u32) -> Result<()> {
            (**self).tap(x, y, label, repeat)
        }

        fn swipe(&mut self, from: (u32, u32), to: (u32, u32), duration_ms: u64) -> Result<()> {
            (**self).swipe(from, to, duration_ms)
        }

        fn paste_text(&mut self, text: &str) -> Result<()> {
            (**self).paste_text(text)
        }
    }

    impl<T: TemplateStore + ?Sized> TemplateStore for &T {
        fn get(&self, name: &str, category: TemplateCategory) -> Result<Template> {
            (**self).get(name, category)
        }
    }
}
