//! Key namespaces for store entries
//!
//! Every key is scoped under one job id, so all of a job's state shares its
//! expiry fate.

const ROOT: &str = "papertrail";

pub fn job(job_id: &str) -> String {
    format!("{}:jobs:{}", ROOT, job_id)
}

pub fn claims(job_id: &str) -> String {
    format!("{}:claims:{}", ROOT, job_id)
}

pub fn verification(job_id: &str, claim_id: &str) -> String {
    format!("{}:verifications:{}:{}", ROOT, job_id, claim_id)
}
