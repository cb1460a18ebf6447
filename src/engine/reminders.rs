use crate::domain::Task;

/// Offsets that fall due at the task's current remaining time
///
/// An offset `r` is due when `remaining <= r` and `remaining > r - window`. With `window`
/// equal to the tick step every offset lands in exactly one tick. Offsets already fired in
/// this run are never returned, so evaluating the same tick twice cannot fire twice.
/// Results are ordered largest offset first, which is the order a countdown meets them.
pub fn due_reminders(task: &Task, window: i64) -> Vec<i64> {
    let remaining = task.remaining_time;
    task.reminders
        .iter()
        .rev()
        .copied()
        .filter(|offset| !task.fired_reminders.contains(offset))
        .filter(|&offset| remaining <= offset && remaining > offset - window)
        .collect()
}
