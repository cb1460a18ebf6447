use super::enums::TaskStatus;
use super::task::Task;

/// Format signed seconds as "MM:SS"; overdue time gets a leading "+"
pub fn format_clock(seconds: i64) -> String {
    let sign = if seconds < 0 { "+" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// Format a reminder offset compactly ("30s", "5m", "1m 30s")
pub fn format_offset(seconds: i64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;

    if minutes > 0 && secs > 0 {
        format!("{}m {}s", minutes, secs)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", secs)
    }
}

/// Choose leaf glyph based on how much of the target is left
pub fn leaf_glyph(task: &Task, use_emoji: bool) -> &'static str {
    let ratio = task.progress_ratio();
    if use_emoji {
        if task.status == TaskStatus::Completed {
            "🍂" // Fallen leaf
        } else if task.is_overdue() {
            "🍁" // Turned
        } else if ratio > 0.5 {
            "🌱"
        } else {
            "🌿"
        }
    } else if task.status == TaskStatus::Completed {
        "x"
    } else if task.is_overdue() {
        "!"
    } else if ratio > 0.5 {
        "*"
    } else {
        "+"
    }
}

/// Get status badge text
pub fn status_badge(task: &Task, is_active: bool) -> &'static str {
    match task.status {
        TaskStatus::Running => "(RUNNING)",
        TaskStatus::Completed => "(DONE)",
        TaskStatus::Paused if is_active => "(PAUSED)",
        TaskStatus::Paused if task.remaining_time != task.total_duration => "(PAUSED)",
        TaskStatus::Paused => "",
    }
}

/// Render a text progress bar with reminder dots, e.g. "██████··•····"
///
/// The filled part is the time still remaining; dots mark reminder offsets.
pub fn progress_track(task: &Task, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let filled = (task.progress_ratio() * width as f64).round() as usize;
    let mut cells: Vec<char> = (0..width)
        .map(|i| if i < filled { '█' } else { '·' })
        .collect();

    for (offset, position) in task.reminder_positions() {
        // Dots are placed on the elapsed axis, mirrored onto the remaining bar
        let index = (((1.0 - position) * width as f64).round() as usize).min(width - 1);
        cells[index] = if task.fired_reminders.contains(&offset) {
            '◦'
        } else {
            '•'
        };
    }

    cells.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;

    fn task(total: i64, remaining: i64) -> Task {
        let mut task = Task::new(&TaskDraft::new("Bike Sketch", total, [300]).unwrap());
        task.remaining_time = remaining;
        task
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(-125), "+02:05");
        assert_eq!(format_clock(7200), "120:00");
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(30), "30s");
        assert_eq!(format_offset(300), "5m");
        assert_eq!(format_offset(90), "1m 30s");
    }

    #[test]
    fn test_leaf_glyph() {
        assert_eq!(leaf_glyph(&task(600, 500), false), "*");
        assert_eq!(leaf_glyph(&task(600, 100), false), "+");
        assert_eq!(leaf_glyph(&task(600, -1), false), "!");
        let mut done = task(600, 0);
        done.mark_completed();
        assert_eq!(leaf_glyph(&done, true), "🍂");
    }

    #[test]
    fn test_status_badge() {
        let fresh = task(600, 600);
        assert_eq!(status_badge(&fresh, false), "");
        assert_eq!(status_badge(&fresh, true), "(PAUSED)");
        assert_eq!(status_badge(&task(600, 200), false), "(PAUSED)");
    }

    #[test]
    fn test_progress_track_marks_reminders() {
        let t = task(600, 600);
        let track = progress_track(&t, 10);
        assert_eq!(track.chars().count(), 10);
        // 300s before the end of 600s sits in the middle
        assert_eq!(track.chars().nth(5), Some('•'));

        let mut fired = task(600, 200);
        fired.fired_reminders.insert(300);
        let track = progress_track(&fired, 10);
        assert_eq!(track.chars().nth(5), Some('◦'));
        assert_eq!(track.chars().filter(|c| *c == '█').count(), 3);
    }
}
