use crate::config::Settings;
use crate::model::{CalendarDate, Task};
use crate::render;
use crate::status::task_status;
use crate::ui;
use crate::window::DateWindow;
use anyhow::Result;

pub fn tui(settings: &Settings) -> Result<()> {
    let today = settings.today();
    log::info!("starting tui, today is {}", today);
    ui::run(settings.initial_store(), DateWindow::around(today))
}

pub fn chart(settings: &Settings) -> Result<()> {
    let store = settings.initial_store();
    let window = DateWindow::around(settings.today());
    let rows = render::project(store.tasks(), &window);
    print!("{}", render::plain(&rows, &window));
    Ok(())
}

pub fn list(settings: &Settings) -> Result<()> {
    let store = settings.initial_store();
    let today = settings.today();
    println!("Tasks as of {}", today);
    if store.tasks().is_empty() {
        println!("  (empty)");
    }
    for task in store.tasks() {
        println!("{}", task_line(task, today));
    }
    Ok(())
}

fn task_line(task: &Task, today: CalendarDate) -> String {
    let check = if task.completed { "x" } else { " " };
    format!(
        "  [{}] {}: {}  {} .. {}  ({})",
        check,
        task.id,
        task.name,
        task.start_date,
        task.due_date,
        task_status(task, today).label()
    )
}
