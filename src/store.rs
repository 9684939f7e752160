use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::TaskApi;
use crate::error::{ApiError, ApiResult};
use crate::filter::Filter;
use crate::task::{
    truncate, Difficulty, StatusPayload, Task, TaskId, TaskPayload, DESCRIPTION_LIMIT, TITLE_LIMIT,
};

/// A user action on the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Load,
    Add {
        title: String,
        description: String,
        difficulty: Difficulty,
    },
    EditTitle {
        id: TaskId,
        text: String,
    },
    EditDescription {
        id: TaskId,
        text: String,
    },
    Toggle {
        id: TaskId,
    },
    Delete {
        id: TaskId,
    },
    /// Indices are positions in the list as shown under `filter`.
    /// `to` is `None` when the move ended without a drop target.
    Reorder {
        filter: Filter,
        from: usize,
        to: Option<usize>,
    },
}

/// Ordered task list kept in sync with the remote API.
///
/// Order in `tasks` is display order. Every mutating call other than the
/// reorders goes through the API first and only touches local state once the
/// server has answered successfully.
pub struct TaskStore {
    tasks: Vec<Task>,
    api: Arc<dyn TaskApi>,
}

impl TaskStore {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            tasks: Vec::new(),
            api,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    fn position(&self, id: &TaskId) -> ApiResult<usize> {
        self.tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| ApiError::UnknownTask(id.clone()))
    }

    /// Tasks matching `filter`, in store order.
    pub fn visible(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Replace the whole list with the server's.
    pub async fn load(&mut self) -> ApiResult<()> {
        let tasks = self.api.list().await?;
        info!(count = tasks.len(), "Loaded tasks");
        self.tasks = tasks;
        Ok(())
    }

    /// Create a task and append the server's record. Title and description go out as typed.
    pub async fn create(
        &mut self,
        title: &str,
        description: &str,
        difficulty: Difficulty,
    ) -> ApiResult<TaskId> {
        let payload = TaskPayload {
            task: title.to_string(),
            description: description.to_string(),
            completed: false,
            difficulty,
        };
        let created = self.api.create(&payload).await?;
        let id = created.id.clone();
        info!(task_id = %id, "Created task");
        self.tasks.push(created);
        Ok(id)
    }

    /// Send a full replacement, keeping the current completion flag.
    ///
    /// Both title and description are truncated before they go out.
    pub async fn update(
        &mut self,
        id: &TaskId,
        title: &str,
        description: &str,
        difficulty: Difficulty,
    ) -> ApiResult<()> {
        self.put(
            id,
            truncate(title, TITLE_LIMIT),
            truncate(description, DESCRIPTION_LIMIT),
            difficulty,
        )
        .await
    }

    /// PUT the record exactly as given, keeping the current completion flag.
    async fn put(
        &mut self,
        id: &TaskId,
        task: String,
        description: String,
        difficulty: Difficulty,
    ) -> ApiResult<()> {
        let index = self.position(id)?;
        let payload = TaskPayload {
            task,
            description,
            completed: self.tasks[index].completed,
            difficulty,
        };
        let updated = self.api.update(id, &payload).await?;
        info!(task_id = %id, "Updated task");
        self.replace(id, updated)
    }

    pub async fn toggle_completed(&mut self, id: &TaskId) -> ApiResult<()> {
        let index = self.position(id)?;
        let status = StatusPayload {
            completed: !self.tasks[index].completed,
        };
        let updated = self.api.set_status(id, status).await?;
        info!(task_id = %id, completed = updated.completed, "Toggled task");
        self.replace(id, updated)
    }

    pub async fn delete(&mut self, id: &TaskId) -> ApiResult<()> {
        self.api.delete(id).await?;
        info!(task_id = %id, "Deleted task");
        self.tasks.retain(|t| &t.id != id);
        Ok(())
    }

    fn replace(&mut self, id: &TaskId, task: Task) -> ApiResult<()> {
        let index = self.position(id)?;
        self.tasks[index] = task;
        Ok(())
    }

    /// Move the task at `from` to `to`. Local only, nothing is sent to the server.
    ///
    /// Returns `false` and leaves the list alone when either index is out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tasks.len() || to >= self.tasks.len() {
            debug!(from, to, len = self.tasks.len(), "Ignoring out-of-range reorder");
            return false;
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        from != to
    }

    /// Like `reorder`, but `from` and `to` index the list as shown under `filter`.
    ///
    /// Only the slots held by matching tasks are permuted; hidden tasks stay
    /// exactly where they are.
    pub fn reorder_visible(&mut self, filter: Filter, from: usize, to: usize) -> bool {
        if filter == Filter::All {
            return self.reorder(from, to);
        }
        let slots: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| filter.matches(t))
            .map(|(i, _)| i)
            .collect();
        if from >= slots.len() || to >= slots.len() {
            debug!(from, to, visible = slots.len(), "Ignoring out-of-range reorder");
            return false;
        }
        // adjacent swaps between visible slots == remove + insert within the subset
        if from < to {
            for k in from..to {
                self.tasks.swap(slots[k], slots[k + 1]);
            }
        } else {
            for k in (to..from).rev() {
                self.tasks.swap(slots[k], slots[k + 1]);
            }
        }
        from != to
    }

    /// Apply an intent. Failures are logged and dropped; the list is left as it was.
    ///
    /// Returns whether the list changed.
    pub async fn dispatch(&mut self, intent: Intent) -> bool {
        let result = match intent {
            Intent::Load => self.load().await.map(|_| true),
            Intent::Add {
                title,
                description,
                difficulty,
            } => self
                .create(&title, &description, difficulty)
                .await
                .map(|_| true),
            Intent::EditTitle { id, text } => self.edit_title(&id, &text).await,
            Intent::EditDescription { id, text } => self.edit_description(&id, &text).await,
            Intent::Toggle { id } => self.toggle_completed(&id).await.map(|_| true),
            Intent::Delete { id } => self.delete(&id).await.map(|_| true),
            Intent::Reorder { to: None, .. } => Ok(false),
            Intent::Reorder {
                filter,
                from,
                to: Some(to),
            } => Ok(self.reorder_visible(filter, from, to)),
        };
        match result {
            Ok(changed) => changed,
            Err(err) => {
                warn!(error = %err, "Task operation failed");
                false
            }
        }
    }

    async fn edit_title(&mut self, id: &TaskId, text: &str) -> ApiResult<bool> {
        let current = self.tasks[self.position(id)?].clone();
        if current.completed {
            debug!(task_id = %id, "Title of a completed task is read-only");
            return Ok(false);
        }
        // the description goes back untouched
        self.put(
            id,
            truncate(text, TITLE_LIMIT),
            current.description,
            current.difficulty,
        )
        .await
        .map(|_| true)
    }

    async fn edit_description(&mut self, id: &TaskId, text: &str) -> ApiResult<bool> {
        let current = self.tasks[self.position(id)?].clone();
        self.put(
            id,
            current.task,
            truncate(text, DESCRIPTION_LIMIT),
            current.difficulty,
        )
        .await
        .map(|_| true)
    }
}
