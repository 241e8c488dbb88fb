//! Job Service - the only code path that mutates the job collection.
//!
//! Every mutation loads the whole collection, changes it in memory and writes
//! it back. A single async mutex serialises those cycles, so two concurrent
//! requests can no longer drop each other's change.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{Job, JobPatch, NewJob};
use crate::store::JobStore;

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
    /// Last id handed out. Holding this lock is what makes a caller the writer.
    last_id: Arc<Mutex<i64>>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            store,
            last_id: Arc::new(Mutex::new(0)),
        }
    }

    /// Full collection in insertion order.
    pub async fn list(&self) -> Vec<Job> {
        self.store.load_all().await
    }

    pub async fn create(&self, new_job: NewJob) -> Result<Job, AppError> {
        let mut last_id = self.last_id.lock().await;
        let mut jobs = self.store.load_all().await;

        let id = allocate_id(Utc::now().timestamp_millis(), *last_id, &jobs);
        let job = new_job.into_job(id);
        jobs.push(job.clone());
        self.store.save_all(&jobs).await?;

        *last_id = id;
        info!(job_id = id, "Job created");
        Ok(job)
    }

    pub async fn update(&self, id: i64, patch: JobPatch) -> Result<Job, AppError> {
        let _writer = self.last_id.lock().await;
        let mut jobs = self.store.load_all().await;

        let job = jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or_else(AppError::job_not_found)?;
        patch.apply_to(job);
        let updated = job.clone();
        self.store.save_all(&jobs).await?;

        info!(job_id = id, "Job updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let _writer = self.last_id.lock().await;
        let jobs = self.store.load_all().await;

        let before = jobs.len();
        let remaining: Vec<Job> = jobs.into_iter().filter(|job| job.id != id).collect();
        if remaining.len() == before {
            return Err(AppError::job_not_found());
        }
        self.store.save_all(&remaining).await?;

        info!(job_id = id, "Job deleted");
        Ok(())
    }
}

/// Ids stay close to the creation timestamp in milliseconds, but are always
/// strictly greater than anything issued or stored, so two creates in the
/// same millisecond still get distinct ids.
fn allocate_id(now_millis: i64, last_issued: i64, existing: &[Job]) -> i64 {
    let max_existing = existing.iter().map(|job| job.id).max().unwrap_or(0);
    now_millis
        .max(last_issued.saturating_add(1))
        .max(max_existing.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::job::JobStatus;
    use crate::store::JsonFileStore;

    fn service(dir: &tempfile::TempDir) -> JobService {
        JobService::new(Arc::new(JsonFileStore::new(dir.path().join("jobs.json"))))
    }

    fn acme() -> NewJob {
        NewJob {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            link: "https://acme.example/job".to_string(),
            status: JobStatus::Applied,
        }
    }

    fn bare_job(id: i64) -> Job {
        NewJob::default().into_job(id)
    }

    #[test]
    fn test_allocate_id_uses_clock_when_ahead() {
        assert_eq!(allocate_id(1_000, 10, &[bare_job(500)]), 1_000);
    }

    #[test]
    fn test_allocate_id_same_millisecond_does_not_collide() {
        assert_eq!(allocate_id(1_000, 1_000, &[]), 1_001);
    }

    #[test]
    fn test_allocate_id_stays_above_stored_ids() {
        // Clock behind a stored id (e.g. file copied from another machine).
        assert_eq!(allocate_id(1_000, 0, &[bare_job(5_000)]), 5_001);
    }

    #[tokio::test]
    async fn test_create_appends_exactly_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        svc.create(acme()).await.unwrap();
        let before = svc.list().await.len();

        let created = svc.create(acme()).await.unwrap();
        let after = svc.list().await;

        assert_eq!(after.len(), before + 1);
        assert_eq!(after.last(), Some(&created));
    }

    #[tokio::test]
    async fn test_create_then_find_matches_input() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let created = svc.create(acme()).await.unwrap();

        let found = svc
            .list()
            .await
            .into_iter()
            .find(|job| job.id == created.id)
            .unwrap();
        assert_eq!(found, acme().into_job(created.id));
    }

    #[tokio::test]
    async fn test_rapid_creates_get_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);

        let mut ids = HashSet::new();
        for _ in 0..25 {
            ids.insert(svc.create(acme()).await.unwrap().id);
        }
        assert_eq!(ids.len(), 25);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.create(acme()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let jobs = svc.list().await;
        assert_eq!(jobs.len(), 10);
        let ids: HashSet<i64> = jobs.iter().map(|job| job.id).collect();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let created = svc.create(acme()).await.unwrap();

        let patch = JobPatch {
            status: Some(JobStatus::Offer),
            ..JobPatch::default()
        };
        let updated = svc.update(created.id, patch).await.unwrap();

        assert_eq!(updated.status, JobStatus::Offer);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.company, created.company);
        assert_eq!(updated.link, created.link);
        assert_eq!(svc.list().await, vec![updated]);
    }

    #[tokio::test]
    async fn test_update_missing_id_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        svc.create(acme()).await.unwrap();
        let before = svc.list().await;

        let patch = JobPatch {
            title: Some("Ghost".to_string()),
            ..JobPatch::default()
        };
        let err = svc.update(-1, patch).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(svc.list().await, before);
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_id() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let first = svc.create(acme()).await.unwrap();
        let second = svc.create(acme()).await.unwrap();

        svc.delete(first.id).await.unwrap();

        let jobs = svc.list().await;
        assert_eq!(jobs.len(), 1);
        assert!(jobs.iter().all(|job| job.id != first.id));
        assert_eq!(jobs[0].id, second.id);
    }

    #[tokio::test]
    async fn test_delete_missing_id_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        svc.create(acme()).await.unwrap();
        let before = svc.list().await;

        let err = svc.delete(42).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(svc.list().await, before);
    }

    #[tokio::test]
    async fn test_create_accepts_empty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let created = svc.create(NewJob::default()).await.unwrap();
        assert_eq!(created.title, "");
        assert_eq!(created.status, JobStatus::Applied);
    }

    #[tokio::test]
    async fn test_create_keeps_records_with_unknown_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "title": "A", "company": "Acme", "link": "", "status": "Applied"},
                {"id": 2, "title": "B", "company": "Acme", "link": "", "status": "Ghosted"}
            ]"#,
        )
        .unwrap();
        let svc = JobService::new(Arc::new(JsonFileStore::new(&path)));

        let created = svc.create(NewJob::default()).await.unwrap();

        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let titles: Vec<&str> = raw.iter().filter_map(|r| r["title"].as_str()).collect();
        assert_eq!(raw.len(), 3);
        assert!(titles.contains(&"A"));
        assert!(titles.contains(&"B"));
        assert!(raw.iter().any(|r| r["id"] == created.id));
        assert_eq!(raw[1]["status"], "Applied");
    }
}
