use serde::{Deserialize, Serialize};

/// Where an application currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Applied,
    Interviewing,
    Rejected,
    Offer,
}

/// A tracked job application, as persisted in the jobs file.
///
/// Text fields default to empty so records written by older clients with
/// missing keys still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub status: JobStatus,
}

/// Body of `POST /jobs`. Nothing is required; the server does not validate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub link: String,
    pub status: JobStatus,
}

impl NewJob {
    pub fn into_job(self, id: i64) -> Job {
        Job {
            id,
            title: self.title,
            company: self.company,
            link: self.link,
            status: self.status,
        }
    }
}

/// Body of `PUT /jobs/:id`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub link: Option<String>,
    pub status: Option<JobStatus>,
}

impl JobPatch {
    /// Shallow field overwrite. The id is never touched.
    pub fn apply_to(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title;
        }
        if let Some(company) = self.company {
            job.company = company;
        }
        if let Some(link) = self.link {
            job.link = link;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
    }
}
