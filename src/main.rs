use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::{error, info};

use toefl_studio::config::{self, StudioConfig, DEFAULT_TTS_MODEL};
use toefl_studio::media::MediaTools;
use toefl_studio::parser::{GeminiParser, ScriptParser};
use toefl_studio::tasks::{self, TaskProfile};
use toefl_studio::transcript;
use toefl_studio::tts::{ElevenLabsClient, SpeechRequest, SpeechSynthesizer};
use toefl_studio::Studio;

#[derive(Parser)]
#[command(
    name = "toefl-studio",
    version,
    about = "Assemble multi-speaker TOEFL practice audio from plain-text scripts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available task presets
    Tasks,
    /// Parse a raw script into a reviewable transcript JSON
    Parse {
        /// Plain-text script file
        script: PathBuf,
        /// Task preset slug (see `tasks`)
        #[arg(long)]
        task: String,
        /// Output transcript path
        #[arg(long, default_value = "transcript.json")]
        out: PathBuf,
    },
    /// Produce the master audio track from a transcript
    Produce {
        /// Transcript JSON produced by `parse` (and optionally hand-edited)
        transcript: PathBuf,
        /// Task preset slug (see `tasks`)
        #[arg(long)]
        task: String,
        /// Directory for per-row clips (the synthesis cache)
        #[arg(long, default_value = "output_toefl_raw")]
        raw_dir: PathBuf,
        /// Directory for the master track
        #[arg(long, default_value = "output_toefl_final")]
        out_dir: PathBuf,
        /// Also bundle the per-row clips into a ZIP
        #[arg(long)]
        archive: bool,
        /// Re-render clips at this tempo before assembly (0.5..=2.0)
        #[arg(long)]
        tempo: Option<f64>,
    },
    /// List the ElevenLabs voices available to the account
    Voices,
    /// Generate a short sample clip for every account voice
    Samples {
        /// Output directory for the samples
        #[arg(long, default_value = "output_voicesample")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Tasks => list_tasks(),
        Command::Parse { script, task, out } => parse_script(&script, &task, &out).await?,
        Command::Produce {
            transcript,
            task,
            raw_dir,
            out_dir,
            archive,
            tempo,
        } => produce(&transcript, &task, raw_dir, out_dir, archive, tempo).await?,
        Command::Voices => list_voices().await?,
        Command::Samples { out_dir } => generate_samples(&out_dir).await?,
    }
    Ok(())
}

fn lookup_task(slug: &str) -> anyhow::Result<&'static TaskProfile> {
    match tasks::find_task(slug) {
        Some(task) => Ok(task),
        None => {
            let known: Vec<&str> = tasks::TASKS.iter().map(|t| t.slug).collect();
            bail!("unknown task {:?}; available: {}", slug, known.join(", "))
        }
    }
}

fn elevenlabs_client() -> anyhow::Result<ElevenLabsClient> {
    let api_key = config::api_key_from_env("ELEVENLABS_API_KEY")?;
    Ok(ElevenLabsClient::new(api_key, DEFAULT_TTS_MODEL.to_string())?)
}

fn list_tasks() {
    println!(
        "{:<20} | {:<9} | {:<24} | {:<34} | Roles",
        "Slug", "Section", "Name", "Pause rule"
    );
    println!("{}", "-".repeat(120));
    for task in tasks::TASKS {
        println!(
            "{:<20} | {:<9} | {:<24} | {:<34} | {}",
            task.slug,
            task.section.as_str(),
            task.name,
            task.pause_rule,
            task.expected_roles.join(", ")
        );
    }
}

async fn parse_script(script: &PathBuf, task_slug: &str, out: &PathBuf) -> anyhow::Result<()> {
    let task = lookup_task(task_slug)?;
    let raw_text = std::fs::read_to_string(script)
        .with_context(|| format!("cannot read script {}", script.display()))?;

    let api_key = config::api_key_from_env("GEMINI_API_KEY")?;
    let parser = GeminiParser::new(api_key)?;

    let rows = parser.parse(&raw_text, task).await?;
    transcript::validate_rows(&rows)?;
    transcript::save_rows(out, &rows)?;

    println!("Parsed {} rows into {}:", rows.len(), out.display());
    for (index, row) in rows.iter().enumerate() {
        println!("  {:>3}  {:<20} {}", index, row.role, row.text);
    }
    println!("\nReview/edit the transcript, then run `toefl-studio produce`.");
    Ok(())
}

async fn produce(
    transcript_path: &PathBuf,
    task_slug: &str,
    raw_dir: PathBuf,
    out_dir: PathBuf,
    archive: bool,
    tempo: Option<f64>,
) -> anyhow::Result<()> {
    let task = lookup_task(task_slug)?;
    let rows = transcript::load_rows(transcript_path)?;
    transcript::validate_rows(&rows)?;

    let tools = MediaTools::locate()?;
    let client = elevenlabs_client()?;
    client.validate_api_key().await?;

    let studio = Studio::new(StudioConfig {
        raw_dir,
        final_dir: out_dir,
        tempo_factor: tempo,
        bundle_clips: archive,
        ..StudioConfig::default()
    });

    let outcome = studio.produce(&rows, task, &client, &tools).await?;
    println!("Master track: {}", outcome.master_track.display());
    if let Some(archive_path) = outcome.archive {
        println!("Clip archive: {}", archive_path.display());
    }
    Ok(())
}

async fn list_voices() -> anyhow::Result<()> {
    let client = elevenlabs_client()?;
    let voices = client.list_voices().await?;

    println!(
        "{:<20} | {:<15} | {:<30} | Labels",
        "Name", "Category", "Voice ID"
    );
    println!("{}", "-".repeat(100));
    for voice in &voices {
        println!(
            "{:<20} | {:<15} | {:<30} | {}, {}, {}",
            voice.name,
            voice.category,
            voice.voice_id,
            voice.label("accent"),
            voice.label("gender"),
            voice.label("description"),
        );
    }
    Ok(())
}

async fn generate_samples(out_dir: &PathBuf) -> anyhow::Result<()> {
    let client = elevenlabs_client()?;
    std::fs::create_dir_all(out_dir)?;

    let voices = client.list_voices().await?;
    println!("Found {} voices. Starting generation...", voices.len());

    for (index, voice) in voices.iter().enumerate() {
        let request = SpeechRequest {
            text: format!(
                "Hello, my name is {}. This is a sample of my voice for your project.",
                voice.name
            ),
            voice_id: voice.voice_id.clone(),
            stability: 0.5,
            similarity: 0.75,
        };
        let output = out_dir.join(format!("{}_{}.mp3", voice.name, voice.voice_id));

        info!("[{}/{}] Generating sample for {}", index + 1, voices.len(), voice.name);
        // Samples are a convenience listing; a single bad voice should not
        // stop the sweep.
        match client.synthesize(&request).await {
            Ok(audio) => std::fs::write(&output, audio)?,
            Err(e) => error!("Failed to generate {}: {}", voice.name, e),
        }
    }

    println!("Samples written to {}", out_dir.display());
    Ok(())
}
