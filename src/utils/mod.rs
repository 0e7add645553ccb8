//! Some utility functions

pub mod comparison;

use crate::notification::NotificationEvent;
use crate::task::Task;

/// A debug utility that pretty-prints a list of tasks
pub fn print_task_list<'a, I: IntoIterator<Item = &'a Task>>(tasks: I) {
    let mut count = 0;
    for task in tasks {
        print_task(task);
        count += 1;
    }
    if count == 0 {
        println!("    No tasks found");
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.done() { "✓" } else { " " };
    let start = task.start_time()
        .map(crate::task::timestamp::format)
        .unwrap_or_else(|| "?".to_string());
    let end = task.end_time()
        .map(crate::task::timestamp::format)
        .unwrap_or_else(|| "?".to_string());
    println!("    {} [{}] {}\t{} -> {}\t({}, {})",
        completion, task.id(), task.description(), start, end, task.priority(), task.category());
    if let Some(notes) = task.notes() {
        println!("        {}", notes);
    }
}

pub fn print_notification(event: &NotificationEvent) {
    println!("⚠️ Alert: {}", event);
}
