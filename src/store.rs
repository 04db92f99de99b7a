use crate::model::{CalendarDate, Draft, DraftError, Task, TaskId};

/// Whether the form commits a new task or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Created(TaskId),
    Updated(TaskId),
    /// The task being edited was deleted before the form was submitted.
    EditTargetGone(TaskId),
}

/// Ordered task list plus the form draft that feeds it.
///
/// Operations validate before touching anything, so a rejected call leaves
/// the store exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    draft: Draft,
    edit_id: Option<TaskId>,
}

impl TaskStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        TaskStore {
            tasks,
            ..TaskStore::default()
        }
    }

    /// Three example tasks in March 2025, one of them already completed.
    pub fn sample() -> Self {
        let seed: [(&str, (i32, u32, u32), (i32, u32, u32), bool); 3] = [
            ("Write report", (2025, 3, 1), (2025, 3, 10), false),
            ("Prepare meeting", (2025, 3, 3), (2025, 3, 5), true),
            ("Presentation slides", (2025, 3, 5), (2025, 3, 15), false),
        ];
        let tasks = seed
            .iter()
            .zip(1..)
            .filter_map(|((name, start, due, completed), id)| {
                let start = CalendarDate::from_ymd(start.0, start.1, start.2)?;
                let due = CalendarDate::from_ymd(due.0, due.1, due.2)?;
                let mut task = Task::new(id, *name, start, due);
                task.completed = *completed;
                Some(task)
            })
            .collect();
        TaskStore::with_tasks(tasks)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn mode(&self) -> FormMode {
        match self.edit_id {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn next_id(&self) -> TaskId {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    pub fn create(&mut self, draft: &Draft) -> Result<TaskId, DraftError> {
        let fields = draft.validate()?;
        let id = self.next_id();
        self.tasks.push(Task::new(
            id,
            fields.name,
            fields.start_date,
            fields.due_date,
        ));
        log::debug!("created task {} ({} tasks)", id, self.tasks.len());
        Ok(id)
    }

    /// Rewrites name and dates only. `Ok(false)` when no task has `id`.
    pub fn update(&mut self, id: TaskId, draft: &Draft) -> Result<bool, DraftError> {
        let fields = draft.validate()?;
        let task = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => task,
            None => {
                log::trace!("update ignored, no task {}", id);
                return Ok(false);
            }
        };
        task.name = fields.name;
        task.start_date = fields.start_date;
        task.due_date = fields.due_date;
        log::debug!("updated task {}", id);
        Ok(true)
    }

    /// Returns the new completion flag.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id);
        match task {
            Some(task) => {
                task.completed = !task.completed;
                log::debug!("task {} completed={}", id, task.completed);
                Some(task.completed)
            }
            None => {
                log::trace!("toggle ignored, no task {}", id);
                None
            }
        }
    }

    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let idx = match self.position(id) {
            Some(idx) => idx,
            None => {
                log::trace!("delete ignored, no task {}", id);
                return None;
            }
        };
        let removed = self.tasks.remove(idx);
        log::debug!("deleted task {} ({} tasks)", id, self.tasks.len());
        Some(removed)
    }

    /// Loads the task into the draft and switches the form to edit mode.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        let draft = match self.get(id) {
            Some(task) => Draft::from_task(task),
            None => {
                log::trace!("edit ignored, no task {}", id);
                return false;
            }
        };
        self.draft = draft;
        self.edit_id = Some(id);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.draft = Draft::default();
        self.edit_id = None;
    }

    /// Commits the draft in the current form mode, then resets the form.
    /// On error the draft is kept as typed.
    pub fn submit(&mut self) -> Result<Submitted, DraftError> {
        let draft = self.draft.clone();
        let outcome = match self.edit_id {
            Some(id) => {
                if self.update(id, &draft)? {
                    Submitted::Updated(id)
                } else {
                    Submitted::EditTargetGone(id)
                }
            }
            None => Submitted::Created(self.create(&draft)?),
        };
        self.cancel_edit();
        Ok(outcome)
    }
}
