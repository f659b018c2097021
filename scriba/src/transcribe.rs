//! Transcribe subcommand - upload a recording and wait for the transcript.

use crate::cli::StoreArgs;
use chrono::Utc;
use color_eyre::Section;
use eyre::{eyre, Context, Result};
use scriba_api::{Client, JobRequest, PollConfig};
use scriba_core::export::{base_file_name, render, Format};
use scriba_core::store::TranscriptMeta;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Upload size limit enforced before any network call.
const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// CLI arguments for transcription.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the audio or video file
    pub path: PathBuf,

    /// Also write the raw transcript JSON to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// AssemblyAI API key
    #[arg(long, env = "ASSEMBLYAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Spoken language code passed to the service
    #[arg(long, default_value = "de")]
    pub language: String,

    /// Expected number of speakers for diarization
    #[arg(long, default_value_t = 2)]
    pub speakers: u32,

    /// Disable speaker diarization
    #[arg(long)]
    pub no_diarization: bool,

    /// Skip saving the result to history
    #[arg(long)]
    pub no_save: bool,

    #[command(flatten)]
    pub poll: PollArgs,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Polling cadence flags.
#[derive(clap::Args, Clone, Copy, Debug)]
pub struct PollArgs {
    /// Seconds between job status checks
    #[arg(long, default_value_t = 2.0)]
    pub poll_interval: f64,

    /// Give up after this many seconds (0 polls forever)
    #[arg(long, default_value_t = 3600.0)]
    pub poll_timeout: f64,
}

impl TryFrom<PollArgs> for PollConfig {
    type Error = eyre::Error;

    fn try_from(args: PollArgs) -> Result<Self> {
        let interval = Duration::try_from_secs_f64(args.poll_interval)
            .map_err(|_| eyre!("invalid poll interval: {}", args.poll_interval))?;

        let timeout = if args.poll_timeout == 0.0 {
            None
        } else {
            let timeout = Duration::try_from_secs_f64(args.poll_timeout)
                .map_err(|_| eyre!("invalid poll timeout: {}", args.poll_timeout))?;
            Some(timeout)
        };

        Ok(Self { interval, timeout })
    }
}

/// Resolved configuration for transcription.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub api_key: String,
    pub language: String,
    pub speakers: u32,
    pub diarize: bool,
    pub save: bool,
    pub poll: PollConfig,
    pub store: StoreArgs,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let api_key = args
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| eyre!("no AssemblyAI API key configured"))
            .suggestion("set ASSEMBLYAI_API_KEY or pass --api-key")?;

        Ok(Self {
            path: args.path,
            output: args.output,
            api_key,
            language: args.language,
            speakers: args.speakers,
            diarize: !args.no_diarization,
            save: !args.no_save,
            poll: args.poll.try_into()?,
            store: args.store,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let metadata = std::fs::metadata(&config.path)
        .wrap_err_with(|| format!("failed to read file: {:?}", config.path.display()))?;

    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(eyre!(
            "file size exceeds the 100MB upload limit: {:.2} MB",
            metadata.len() as f64 / (1024.0 * 1024.0)
        ));
    }

    let client = Client::new(&config.api_key)?;

    tracing::info!(
        path = ?config.path.display(),
        bytes = metadata.len(),
        "uploading file"
    );

    let s = Instant::now();
    let audio_url = client.upload(&config.path).wrap_err("upload failed")?;

    let d = s.elapsed();
    tracing::info!(duration = %format_secs(d.as_secs_f64()), "upload completed");

    let request = JobRequest {
        audio_url,
        language_code: config.language.clone(),
        speaker_labels: config.diarize,
        speakers_expected: config.speakers,
    };

    let id = client
        .submit(&request)
        .wrap_err("failed to start transcription")?;

    tracing::info!(id, language = config.language, "transcription started");

    let s = Instant::now();
    let transcript = client
        .wait(&id, &config.poll)
        .wrap_err("transcription failed")?;

    let d = s.elapsed();
    tracing::info!(duration = %format_secs(d.as_secs_f64()), "transcription completed");

    let name = file_name(&config.path);

    if config.save {
        let meta = TranscriptMeta {
            id: transcript.id.clone().unwrap_or_else(|| id.clone()),
            name: name.clone(),
            date: Utc::now().to_rfc3339(),
            duration: TranscriptMeta::duration_label(transcript.audio_duration),
        };

        let saved_id = meta.id.clone();
        config
            .store
            .open()?
            .save(meta, &transcript)
            .wrap_err("failed to record transcript in history")
            .with_note(|| format!("the transcript itself is complete, job id {id}"))?;

        tracing::info!(id = saved_id, "saved to history");
    }

    if let Some(output) = &config.output {
        let content = render(&transcript, Format::Json, base_file_name(&name))
            .wrap_err("failed to serialize transcript")?;

        std::fs::write(output, content)
            .wrap_err_with(|| format!("failed to write transcript: {:?}", output.display()))?;

        tracing::info!(path = ?output.display(), "transcript json written");
    }

    let color = std::io::stdout().is_terminal();
    print!("{}", crate::view::render_blocks(&transcript, None, color));

    Ok(())
}

/// File name component of the upload path, used as the history entry name.
fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Audio".to_string())
}

/// Format seconds as a string with two decimal places.
fn format_secs(secs: f64) -> String {
    format!("{:.2}s", secs)
}
