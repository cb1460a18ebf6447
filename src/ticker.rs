use std::time::Duration;

/// UI frame interval in milliseconds (leaf animation and input polling)
pub const DEFAULT_FRAME_MS: u64 = 250;

/// Get frame duration
pub fn frame_duration() -> Duration {
    Duration::from_millis(DEFAULT_FRAME_MS)
}

/// Number of frames that fit in `millis`, at least one
pub fn frames_for(millis: u64) -> u32 {
    (millis / DEFAULT_FRAME_MS).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let duration = frame_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_frames_for() {
        assert_eq!(frames_for(2000), 8);
        assert_eq!(frames_for(400), 1);
        assert_eq!(frames_for(0), 1);
    }
}
