use super::clock::Clock;
use crate::traits::{GestureExecutor, ScreenSource};
use crate::Result;
use image::DynamicImage;
use std::time::Duration;
use tracing::debug;

/// Short vertical swipe that makes the platform publish a fresh frame.
pub const NUDGE_FROM: (u32, u32) = (500, 500);
pub const NUDGE_TO: (u32, u32) = (500, 400);
pub const NUDGE_DURATION_MS: u64 = 100;

/// Capture a frame, nudging the screen while none is available.
///
/// Every failed capture spends one attempt from `budget`. Returns `None` once
/// the budget is spent without a frame.
pub fn acquire_frame(
    screen: &mut dyn ScreenSource,
    gestures: &mut dyn GestureExecutor,
    clock: &dyn Clock,
    budget: &mut u32,
    backoff: Duration,
) -> Result<Option<DynamicImage>> {
    while *budget > 0 {
        if let Some(frame) = screen.capture() {
            return Ok(Some(frame));
        }

        *budget -= 1;
        debug!(remaining = *budget, "No frame available, nudging the screen");

        gestures.swipe(NUDGE_FROM, NUDGE_TO, NUDGE_DURATION_MS)?;
        gestures.swipe(NUDGE_TO, NUDGE_FROM, NUDGE_DURATION_MS)?;
        clock.sleep(backoff);
    }

    Ok(None)
}
