//! CLI binary for lecture2notes.
//!
//! A thin shim over the library crate that maps CLI flags to `NotesConfig`,
//! prints the generated notes and writes the DOCX file.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lecture2notes::{
    generate_notes, write_docx, NotesConfig, NotesProgressCallback, OutputKind, ProgressCallback,
    SubjectMode, DEFAULT_FILE_NAME,
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar over the requested sections plus one
/// log line per finished section.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<OutputKind, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:30.green/238}] {pos}/{len} sections  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Generating");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self, kind: OutputKind) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&kind))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl NotesProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_sections: usize) {
        self.bar.set_length(total_sections as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total_sections} section(s)…"))
        ));
    }

    fn on_section_start(&self, kind: OutputKind, _index: usize, _total: usize) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(kind, Instant::now());
        }
        self.bar.set_message(kind.label());
    }

    fn on_section_complete(&self, kind: OutputKind, _index: usize, _total: usize, text_len: usize) {
        let secs = self.elapsed_secs(kind);
        self.bar.println(format!(
            "  {} {:<18} {}  {}",
            green("✓"),
            kind.label(),
            dim(&format!("{text_len:>6} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_section_error(&self, kind: OutputKind, _index: usize, _total: usize, error: &str) {
        let secs = self.elapsed_secs(kind);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Keep the log line on one terminal row.
        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(std::iter::once('…')).collect()
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:<18} {}  {}",
            red("✗"),
            kind.label(),
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_sections: usize, success_count: usize) {
        let failed = total_sections.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} section(s) generated",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} sections generated  ({} failed)",
                if failed == total_sections {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_sections,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Exam notes for a CS lecture (writes exam_notes.docx)
  lecture2notes lecture.txt

  # Everything, theory style, custom output file
  lecture2notes -s theory -k exam-notes,mcqs,revision week3.pdf -o week3.docx

  # MCQs only, printed as JSON, no document
  lecture2notes -k mcqs --json --no-export lecture.txt

  # From a URL, all three sections in parallel
  lecture2notes -k exam-notes,mcqs,revision -c 3 https://example.com/lecture.txt

OUTPUT ORDER:
  Sections always appear as Exam Notes → MCQs → Last-Day Revision, whatever
  order --kinds lists them in. A section whose API call fails is replaced by
  the error message; the other sections are still generated.

INPUT FORMATS:
  .txt   decoded as UTF-8 (invalid bytes dropped)
  .pdf   text layer via pdfium (PDFIUM_LIB_PATH or system library);
         falls back to raw decoding when unavailable
  .mp3   decoded as text; no transcription is performed

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key (--provider openai)
  ANTHROPIC_API_KEY       Anthropic API key (--provider anthropic)
  LECTURE2NOTES_PROVIDER  Override provider
  LECTURE2NOTES_MODEL     Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium for PDF text extraction

  A .env file in the working directory is loaded first.
"#;

/// Turn lecture material into exam-ready notes using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "lecture2notes",
    version,
    about = "Turn lecture material into exam-ready notes, MCQs and revision sheets",
    long_about = "Turn a lecture file (.txt, .pdf or .mp3 transcript; local path or URL) into \
exam-oriented notes, multiple-choice questions and last-day revision sheets using a \
text-generation model, and save the result as a DOCX document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Lecture file path or HTTP/HTTPS URL (.txt, .pdf, .mp3).
    input: String,

    /// Write the DOCX document to this file.
    #[arg(short, long, env = "LECTURE2NOTES_OUTPUT", default_value = DEFAULT_FILE_NAME)]
    output: PathBuf,

    /// Subject style for exam notes.
    #[arg(short, long, env = "LECTURE2NOTES_SUBJECT", value_enum, default_value = "cs")]
    subject: SubjectArg,

    /// Output kinds, comma-separated.
    #[arg(
        short,
        long,
        env = "LECTURE2NOTES_KINDS",
        value_enum,
        value_delimiter = ',',
        default_value = "exam-notes"
    )]
    kinds: Vec<KindArg>,

    /// LLM provider: gemini, openai, anthropic, ollama, …
    #[arg(long, env = "LECTURE2NOTES_PROVIDER", default_value = lecture2notes::config::DEFAULT_PROVIDER)]
    provider: String,

    /// LLM model ID.
    #[arg(long, env = "LECTURE2NOTES_MODEL", default_value = lecture2notes::config::DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature (0.0–2.0). Provider default when unset.
    #[arg(long, env = "LECTURE2NOTES_TEMPERATURE")]
    temperature: Option<f32>,

    /// Max output tokens per section. Provider default when unset.
    #[arg(long, env = "LECTURE2NOTES_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Sections generated at once (output order is unaffected).
    #[arg(short, long, env = "LECTURE2NOTES_CONCURRENCY", default_value_t = 1,
          value_parser = clap::value_parser!(u8).range(1..=3))]
    concurrency: u8,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "LECTURE2NOTES_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print the full result (sections, stats) as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Do not write the DOCX document.
    #[arg(long)]
    no_export: bool,

    /// Disable progress bar.
    #[arg(long, env = "LECTURE2NOTES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LECTURE2NOTES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LECTURE2NOTES_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SubjectArg {
    #[value(alias = "computer-science")]
    Cs,
    Theory,
}

impl From<SubjectArg> for SubjectMode {
    fn from(v: SubjectArg) -> Self {
        match v {
            SubjectArg::Cs => SubjectMode::ComputerScience,
            SubjectArg::Theory => SubjectMode::Theory,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    #[value(alias = "notes")]
    ExamNotes,
    #[value(alias = "mcq")]
    Mcqs,
    Revision,
}

impl From<KindArg> for OutputKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::ExamNotes => OutputKind::ExamNotes,
            KindArg::Mcqs => OutputKind::Mcqs,
            KindArg::Revision => OutputKind::Revision,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so env-backed flags and API keys can come from .env.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn NotesProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Generate ─────────────────────────────────────────────────────────
    let output = generate_notes(&cli.input, &config)
        .await
        .context("Notes generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
    }

    // ── Export ───────────────────────────────────────────────────────────
    if output.is_empty() {
        if !cli.quiet {
            eprintln!("{} No output kinds selected; nothing to export", cyan("⚠"));
        }
        return Ok(());
    }

    if !cli.no_export {
        write_docx(&cli.output, &output.text)
            .await
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    }

    if !cli.quiet && !cli.json {
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} sections  {}ms{}",
            if stats.failed_sections == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.generated_sections,
            stats.requested_sections,
            stats.total_duration_ms,
            if cli.no_export {
                String::new()
            } else {
                format!("  →  {}", bold(&cli.output.display().to_string()))
            },
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.total_input_tokens.to_string()),
            dim(&stats.total_output_tokens.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `NotesConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<NotesConfig> {
    let mut builder = NotesConfig::builder()
        .subject(cli.subject.into())
        .outputs(cli.kinds.iter().map(|k| OutputKind::from(*k)))
        .provider_name(cli.provider.clone())
        .model(cli.model.clone())
        .concurrency(cli.concurrency as usize)
        .download_timeout_secs(cli.download_timeout);

    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["lecture2notes", "lecture.txt"]).unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(cli.output, PathBuf::from("exam_notes.docx"));
        assert_eq!(config.subject, SubjectMode::ComputerScience);
        assert_eq!(config.outputs.in_canonical_order(), vec![OutputKind::ExamNotes]);
        assert_eq!(config.model, "gemini-2.0-flash");
    }

    #[test]
    fn cli_kinds_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "lecture2notes",
            "-k",
            "revision,mcqs",
            "-s",
            "theory",
            "x.pdf",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.subject, SubjectMode::Theory);
        assert_eq!(
            config.outputs.in_canonical_order(),
            vec![OutputKind::Mcqs, OutputKind::Revision]
        );
    }

    #[test]
    fn cli_rejects_concurrency_above_three() {
        assert!(Cli::try_parse_from(["lecture2notes", "-c", "4", "x.txt"]).is_err());
    }
}
