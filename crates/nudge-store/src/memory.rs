//! In-memory task store (non-persistent).

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use nudge_scheduler::{NewTask, StoreError, Task, TaskId, TaskStore};

/// Task store that forgets everything on drop. For tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
    next_id: AtomicI64,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending tasks currently held.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn save(&self, task: NewTask) -> Result<Task, StoreError> {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let task = Task {
            id,
            chat_id: task.chat_id,
            due_at: task.due_at,
            text: task.text,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find_due(&self, cutoff: NaiveDateTime) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .filter(|t| t.due_at <= cutoff)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.tasks.write().await.retain(|t| t.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nudge_scheduler::ChatId;

    fn dt(h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn new_task(due_at: NaiveDateTime, text: &str) -> NewTask {
        NewTask {
            chat_id: ChatId(1),
            due_at,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn save_find_delete_cycle() {
        let store = MemoryTaskStore::new();
        let task = store.save(new_task(dt(12, 0), "hello")).await.unwrap();

        assert_eq!(store.find_due(dt(12, 0)).await.unwrap(), vec![task.clone()]);
        assert!(store.find_due(dt(11, 59)).await.unwrap().is_empty());

        store.delete(task.id).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = MemoryTaskStore::new();
        let a = store.save(new_task(dt(12, 0), "a")).await.unwrap();
        let b = store.save(new_task(dt(12, 0), "b")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn delete_twice_is_a_no_op() {
        let store = MemoryTaskStore::new();
        let task = store.save(new_task(dt(12, 0), "once")).await.unwrap();

        store.delete(task.id).await.unwrap();
        store.delete(task.id).await.unwrap();
        assert!(store.is_empty().await);
    }
}
