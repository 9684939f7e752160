use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::TaskApi;
use crate::error::{ApiError, ApiResult};
use crate::task::{Difficulty, StatusPayload, Task, TaskId, TaskPayload};

pub fn task(id: &str, title: &str, difficulty: Difficulty) -> Task {
    Task {
        id: TaskId::from(id),
        task: title.to_string(),
        description: String::new(),
        completed: false,
        difficulty,
    }
}

/// Server-side task list kept in memory. Behaves like the real API, including
/// keeping its own order regardless of local reorders.
#[derive(Default)]
pub struct InMemoryApi {
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicUsize,
    requests: AtomicUsize,
    fail_next: AtomicBool,
}

impl InMemoryApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            next_id: AtomicUsize::new(100),
            ..Default::default()
        }
    }

    pub fn replace_all(&self, tasks: Vec<Task>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    /// Make the next request fail with a 500.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn stored(&self, id: &TaskId) -> Option<Task> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.id == id)
            .cloned()
    }

    fn begin(&self) -> ApiResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".into(),
            });
        }
        Ok(())
    }

    fn not_found(id: &TaskId) -> ApiError {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: format!("no task {}", id),
        }
    }
}

#[async_trait]
impl TaskApi for InMemoryApi {
    async fn list(&self) -> ApiResult<Vec<Task>> {
        self.begin()?;
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn create(&self, payload: &TaskPayload) -> ApiResult<Task> {
        self.begin()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Task {
            id: TaskId(id.to_string()),
            task: payload.task.clone(),
            description: payload.description.clone(),
            completed: payload.completed,
            difficulty: payload.difficulty,
        };
        self.tasks.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &TaskId, payload: &TaskPayload) -> ApiResult<Task> {
        self.begin()?;
        let mut tasks = self.tasks.lock().unwrap();
        let stored = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        stored.task = payload.task.clone();
        stored.description = payload.description.clone();
        stored.completed = payload.completed;
        stored.difficulty = payload.difficulty;
        Ok(stored.clone())
    }

    async fn set_status(&self, id: &TaskId, status: StatusPayload) -> ApiResult<Task> {
        self.begin()?;
        let mut tasks = self.tasks.lock().unwrap();
        let stored = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        stored.completed = status.completed;
        Ok(stored.clone())
    }

    async fn delete(&self, id: &TaskId) -> ApiResult<()> {
        self.begin()?;
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        if tasks.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
