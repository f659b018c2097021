//! Upload, submit, and poll AssemblyAI transcription jobs.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use scriba_core::types::Transcript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

/// Production AssemblyAI v2 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Fixed delay between consecutive status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default poll deadline before a stuck job is reported as timed out.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(3600);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transcription job parameters sent to `POST /transcript`.
#[derive(Clone, Debug, Serialize)]
pub struct JobRequest {
    /// Media location, usually the URL returned by [`Client::upload`]
    pub audio_url: String,

    /// Spoken language code
    pub language_code: String,

    /// Request speaker diarization
    pub speaker_labels: bool,

    /// Expected speaker count, used by diarization
    pub speakers_expected: u32,
}

impl JobRequest {
    /// Job for an uploaded file with the default language and diarization
    /// settings (German, two expected speakers).
    pub fn new(audio_url: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            language_code: "de".to_string(),
            speaker_labels: true,
            speakers_expected: 2,
        }
    }
}

/// Polling cadence and deadline.
#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    /// Delay between consecutive status requests. The cadence is fixed;
    /// there is no backoff.
    pub interval: Duration,

    /// Give up after this long; `None` polls until a terminal status.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: Some(DEFAULT_POLL_TIMEOUT),
        }
    }
}

/// Lifecycle states reported for a transcription job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

/// Status fields probed out of the raw job document while polling.
#[derive(Debug, Deserialize)]
struct JobProbe {
    status: JobStatus,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Blocking AssemblyAI client.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl Client {
    /// Client authenticated against the production endpoint.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against a non-default endpoint (tests, proxies).
    pub fn with_base_url(api_key: &str, base_url: impl Into<String>) -> Result<Self> {
        // AssemblyAI takes the raw key in `authorization`, no Bearer prefix.
        let mut value = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        // Uploads and polls can legitimately take minutes; only the connect
        // phase gets a deadline here.
        let http = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None)
            .build()?;

        let base_url = base_url.into();

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload a local media file; returns the service's upload URL.
    pub fn upload(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .body(file)
            .send()?;

        let UploadResponse { upload_url } = parse(response)?;
        Ok(upload_url)
    }

    /// Start a transcription job; returns its id.
    pub fn submit(&self, request: &JobRequest) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/transcript", self.base_url))
            .json(request)
            .send()?;

        let SubmitResponse { id } = parse(response)?;
        Ok(id)
    }

    /// Fetch the raw job document.
    pub fn fetch(&self, id: &str) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/transcript/{id}", self.base_url))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response));
        }

        Ok(response.text()?)
    }

    /// Poll a job on a fixed cadence until it completes.
    ///
    /// Requests are strictly sequential, so at most one poll is in flight
    /// at a time, and nothing is surfaced until the job is terminal. The
    /// deadline in `poll.timeout` turns a stuck job into
    /// [`Error::Timeout`]; a job that ends in the service's `error` status
    /// becomes [`Error::Job`].
    pub fn wait(&self, id: &str, poll: &PollConfig) -> Result<Transcript> {
        let started = Instant::now();

        loop {
            std::thread::sleep(poll.interval);

            let body = self.fetch(id)?;
            let probe: JobProbe = serde_json::from_str(&body)?;

            match probe.status {
                JobStatus::Completed => return Ok(serde_json::from_str(&body)?),
                JobStatus::Error => {
                    return Err(Error::Job {
                        id: id.to_string(),
                        message: probe
                            .error
                            .unwrap_or_else(|| "unknown transcription failure".to_string()),
                    });
                }
                status => {
                    tracing::debug!(id, %status, elapsed = ?started.elapsed(), "job still running");

                    if let Some(timeout) = poll.timeout
                        && started.elapsed() >= timeout
                    {
                        return Err(Error::Timeout {
                            id: id.to_string(),
                            status,
                            waited: started.elapsed(),
                        });
                    }
                }
            }
        }
    }
}

/// Deserialize a success response, or surface the service's error message.
fn parse<T: serde::de::DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(api_error(status, response));
    }

    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

fn api_error(status: reqwest::StatusCode, response: reqwest::blocking::Response) -> Error {
    let message = response
        .json::<ApiErrorBody>()
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    Error::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_request_serializes_with_wire_field_names() {
        let request = JobRequest::new("https://cdn.example/upload/1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["audio_url"], "https://cdn.example/upload/1");
        assert_eq!(value["language_code"], "de");
        assert_eq!(value["speaker_labels"], true);
        assert_eq!(value["speakers_expected"], 2);
    }

    #[test]
    fn probe_reads_status_and_error() {
        let probe: JobProbe =
            serde_json::from_str(r#"{"status": "error", "error": "bad audio"}"#).unwrap();

        assert_eq!(probe.status, JobStatus::Error);
        assert_eq!(probe.error.as_deref(), Some("bad audio"));
    }

    #[test]
    fn probe_tolerates_extra_fields() {
        let probe: JobProbe =
            serde_json::from_str(r#"{"status": "processing", "text": null, "id": "x"}"#).unwrap();

        assert_eq!(probe.status, JobStatus::Processing);
        assert_eq!(probe.error, None);
    }

    #[test]
    fn completed_document_deserializes_into_transcript() {
        let body = r#"{
            "id": "job-1",
            "status": "completed",
            "text": "hallo welt",
            "audio_duration": 65,
            "utterances": [
                {"speaker": "A", "start": 0.0, "end": 2.0, "text": "hallo"},
                {"speaker": "B", "start": 2.0, "end": 4.0, "text": "welt"}
            ]
        }"#;

        let transcript: Transcript = serde_json::from_str(body).unwrap();

        assert_eq!(transcript.id.as_deref(), Some("job-1"));
        assert_eq!(transcript.audio_duration, Some(65.0));
        assert_eq!(transcript.utterances.as_ref().unwrap().len(), 2);
        assert_eq!(transcript.extra["status"], "completed");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = Client::with_base_url("key", "http://localhost:9000/v2/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/v2");
    }

    #[test]
    fn default_poll_config_is_bounded() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(poll.timeout, Some(DEFAULT_POLL_TIMEOUT));
    }
}
