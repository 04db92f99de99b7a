use crate::model::{CalendarDate, Task};
use crate::store::TaskStore;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.yml`. Every key is optional.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Pins "today" instead of reading the local clock.
    pub today: Option<CalendarDate>,
    /// Log records go here instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Initial tasks. Absent means the built-in sample tasks.
    pub tasks: Option<Vec<SeedTask>>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SeedTask {
    pub name: String,
    pub start_date: CalendarDate,
    pub due_date: CalendarDate,
    #[serde(default)]
    pub completed: bool,
}

impl Settings {
    pub fn today(&self) -> CalendarDate {
        self.today.unwrap_or_else(CalendarDate::today)
    }

    pub fn initial_store(&self) -> TaskStore {
        match &self.tasks {
            None => TaskStore::sample(),
            Some(seed) => {
                let tasks = seed
                    .iter()
                    .zip(1..)
                    .map(|(s, id)| {
                        let mut task = Task::new(id, s.name.clone(), s.start_date, s.due_date);
                        task.completed = s.completed;
                        task
                    })
                    .collect();
                TaskStore::with_tasks(tasks)
            }
        }
    }
}

/// An explicit path must exist; the platform default is used only if present.
pub fn locate_config(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }
    let path = default_config_path()?;
    Ok(path.exists().then_some(path))
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    parse_settings(&data).with_context(|| format!("parsing {:?}", path))
}

pub fn parse_settings(data: &str) -> Result<Settings> {
    if data.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings = serde_yaml::from_str(data).context("parsing settings")?;
    Ok(settings)
}

/// Config file (if any) with command-line overrides applied on top.
pub fn resolve(explicit: Option<&Path>, today: Option<&str>) -> Result<Settings> {
    let mut settings = match locate_config(explicit)? {
        Some(path) => load_settings(&path)?,
        None => Settings::default(),
    };
    if let Some(raw) = today {
        settings.today = Some(raw.parse::<CalendarDate>().context("--today")?);
    }
    Ok(settings)
}

fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "gantt-todo").context("locating config directory")?;
    Ok(dirs.config_dir().join("config.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse_settings("  \n").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.initial_store().tasks().len(), 3);
    }

    #[test]
    fn seed_tasks_get_sequential_ids() {
        let yaml = r#"
today: "2025-03-04"
tasks:
  - name: Draft outline
    start_date: "2025-03-01"
    due_date: "2025-03-02"
  - name: Review
    start_date: "2025-03-03"
    due_date: "2025-03-06"
    completed: true
"#;
        let settings = parse_settings(yaml).unwrap();
        assert_eq!(settings.today().to_string(), "2025-03-04");
        let store = settings.initial_store();
        let tasks = store.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!((tasks[0].id, tasks[1].id), (1, 2));
        assert!(!tasks[0].completed);
        assert!(tasks[1].completed);
        assert_eq!(store.next_id(), 3);
    }

    #[test]
    fn empty_task_list_means_empty_store() {
        let settings = parse_settings("tasks: []\n").unwrap();
        assert!(settings.initial_store().tasks().is_empty());
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let yaml = "tasks:\n  - name: x\n    start_date: \"2025-3-1\"\n    due_date: \"2025-03-02\"\n";
        assert!(parse_settings(yaml).is_err());
        assert!(parse_settings("colour: blue\n").is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let path = Path::new("/definitely/not/here/gantt-todo.yml");
        assert!(locate_config(Some(path)).is_err());
    }

    #[test]
    fn today_flag_overrides_file() {
        let path = std::env::temp_dir().join(format!("gantt-todo-{}.yml", std::process::id()));
        fs::write(&path, "today: \"2025-01-01\"\ntasks: []\n").unwrap();
        let from_file = resolve(Some(path.as_path()), None).unwrap();
        let overridden = resolve(Some(path.as_path()), Some("2025-03-20"));
        let bad = resolve(Some(path.as_path()), Some("soon"));
        let padded = resolve(Some(path.as_path()), Some(" 2025-03-21 "));
        fs::remove_file(&path).unwrap();

        assert_eq!(from_file.today().to_string(), "2025-01-01");
        assert_eq!(overridden.unwrap().today().to_string(), "2025-03-20");
        assert!(bad.is_err());
        assert_eq!(padded.unwrap().today().to_string(), "2025-03-21");
    }
}
