//! scriba-api: blocking client for the AssemblyAI v2 transcription API.
//!
//! Wraps the three calls a transcription needs: raw byte upload, job
//! submission, and status polling until a terminal state. Polling is
//! strictly sequential (one request in flight, fixed cadence) and never
//! surfaces partial results.
//!
//! ```no_run
//! use scriba_api::{Client, JobRequest, PollConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("api-key")?;
//!
//! let audio_url = client.upload("recording.mp3".as_ref())?;
//! let id = client.submit(&JobRequest::new(audio_url))?;
//! let transcript = client.wait(&id, &PollConfig::default())?;
//!
//! println!("{}", transcript.text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{Client, JobRequest, JobStatus, PollConfig};
pub use error::{Error, Result};
