use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use sentence_align::{
    aggregate_chapters, compute_bilingual_report, compute_chapter_report, AlignmentProfile,
    BilingualAlignerBuilder, Chapter, LanguageProfile, Meta, ParallelCorpus, Report, Sentence,
    Transcript, TranscriptAlignerBuilder, TranscriptReport, SCHEMA_VERSION,
};
use tracing_subscriber::EnvFilter;

#[path = "alignment_report/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Parser)]
#[command(name = "alignment_report")]
#[command(about = "Align book sentences with transcripts or parallel translations and report the matches")]
struct Args {
    /// JSON file overriding aligner tuning (windows, thresholds).
    #[arg(long, env = "SENTENCE_ALIGN_CONFIG")]
    config: Option<PathBuf>,
    /// Report destination; printed to stdout when omitted.
    #[arg(long, env = "SENTENCE_ALIGN_OUT")]
    out: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match chapter sentences against word-level transcripts.
    Transcript {
        /// JSON manifest listing chapters; relative paths resolve against its directory.
        #[arg(long, env = "SENTENCE_ALIGN_MANIFEST")]
        manifest: PathBuf,
        #[arg(long, env = "SENTENCE_ALIGN_LANGUAGE", default_value = "english")]
        language: String,
        /// Language profile JSON; takes precedence over --language.
        #[arg(long, env = "SENTENCE_ALIGN_PROFILE")]
        profile: Option<PathBuf>,
    },
    /// Pair sentences of two independently translated editions.
    Bilingual {
        #[arg(long)]
        primary_originals: PathBuf,
        #[arg(long)]
        primary_translations: PathBuf,
        #[arg(long)]
        secondary_originals: PathBuf,
        #[arg(long)]
        secondary_translations: PathBuf,
        /// Profile for the primary originals; the neutral profile applies no stopwords.
        #[arg(long, default_value = "neutral")]
        primary_language: String,
        #[arg(long, default_value = "neutral")]
        secondary_language: String,
        /// Exit with an error when fewer primary sentences than this percentage match.
        #[arg(long, env = "SENTENCE_ALIGN_MIN_SUCCESS_RATE")]
        min_success_rate: Option<f64>,
    },
}

#[derive(Debug, Deserialize)]
struct Manifest {
    chapters: Vec<ManifestChapter>,
}

#[derive(Debug, Deserialize)]
struct ManifestChapter {
    id: String,
    sentences: PathBuf,
    transcript: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let profile = match args.config.as_ref() {
        Some(path) => AlignmentProfile::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => AlignmentProfile::default(),
    };

    let (report, gate) = match args.command {
        Command::Transcript {
            manifest,
            language,
            profile: profile_path,
        } => (
            run_transcript(&manifest, &language, profile_path.as_deref(), &profile)?,
            None,
        ),
        Command::Bilingual {
            primary_originals,
            primary_translations,
            secondary_originals,
            secondary_translations,
            primary_language,
            secondary_language,
            min_success_rate,
        } => {
            let primary = ParallelCorpus::load(&primary_originals, &primary_translations)
                .map_err(|err| format!("Failed to load primary corpus: {err}"))?;
            let secondary = ParallelCorpus::load(&secondary_originals, &secondary_translations)
                .map_err(|err| format!("Failed to load secondary corpus: {err}"))?;
            let aligner = BilingualAlignerBuilder::new(profile.bilingual.clone())
                .with_primary_profile(resolve_language(&primary_language)?)
                .with_secondary_profile(resolve_language(&secondary_language)?)
                .build()
                .map_err(|err| format!("Failed to build bilingual aligner: {err}"))?;
            let result = aligner.align_corpora(&primary, &secondary);
            let report = Report {
                schema_version: SCHEMA_VERSION,
                meta: meta("bilingual", primary.len()),
                transcript: None,
                bilingual: Some(compute_bilingual_report(
                    primary.len(),
                    secondary.len(),
                    &result,
                )),
            };
            (report, min_success_rate.map(|min| (min, result.success_rate())))
        }
    };

    match args.out.as_ref() {
        Some(path) => {
            json_report_formatter::write_report(path, &report)?;
            println!("{}", path.display());
        }
        None => json_report_formatter::print_report(&report)?,
    }

    match gate {
        Some((min, actual)) => check_success_rate(actual, min),
        None => Ok(()),
    }
}

fn check_success_rate(actual: f64, min: f64) -> Result<(), String> {
    if actual < min {
        return Err(format!(
            "success rate {actual:.1}% is below the required {min:.1}%"
        ));
    }
    Ok(())
}

fn run_transcript(
    manifest_path: &Path,
    language: &str,
    profile_path: Option<&Path>,
    profile: &AlignmentProfile,
) -> Result<Report, String> {
    let data = fs::read_to_string(manifest_path).map_err(|err| {
        format!(
            "Failed to read manifest '{}': {err}",
            manifest_path.display()
        )
    })?;
    let manifest: Manifest = serde_json::from_str(&data).map_err(|err| {
        format!(
            "Failed to parse manifest '{}': {err}",
            manifest_path.display()
        )
    })?;
    if manifest.chapters.is_empty() {
        return Err("Manifest lists no chapters.".to_string());
    }
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let builder = TranscriptAlignerBuilder::new(profile.transcript.clone());
    let builder = match profile_path {
        Some(path) => builder.with_profile_path(path),
        None => builder.with_profile(resolve_language(language)?),
    };
    let aligner = builder
        .build()
        .map_err(|err| format!("Failed to build transcript aligner: {err}"))?;

    let progress = ProgressBar::new(manifest.chapters.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );

    let mut chapters = Vec::with_capacity(manifest.chapters.len());
    for entry in &manifest.chapters {
        progress.set_message(entry.id.clone());
        chapters.push(load_chapter(base_dir, entry)?);
        progress.inc(1);
    }
    progress.finish_with_message("aligning");

    let results = aligner.align_chapters(&chapters);
    let chapter_reports: Vec<_> = manifest
        .chapters
        .iter()
        .zip(chapters.iter())
        .zip(results)
        .map(|((entry, chapter), matches)| {
            compute_chapter_report(
                &entry.id,
                &chapter.transcript.audio_path().display().to_string(),
                &chapter.sentences,
                matches,
            )
        })
        .collect();
    let aggregate = aggregate_chapters(&chapter_reports);

    Ok(Report {
        schema_version: SCHEMA_VERSION,
        meta: meta("transcript", chapter_reports.len()),
        transcript: Some(TranscriptReport {
            chapters: chapter_reports,
            aggregate,
        }),
        bilingual: None,
    })
}

fn load_chapter(base_dir: &Path, entry: &ManifestChapter) -> Result<Chapter, String> {
    let sentences_path = resolve_path(base_dir, &entry.sentences);
    let data = fs::read_to_string(&sentences_path).map_err(|err| {
        format!(
            "{}: failed to read sentences '{}': {err}",
            entry.id,
            sentences_path.display()
        )
    })?;
    let mut sentences: Vec<Sentence> = serde_json::from_str(&data).map_err(|err| {
        format!(
            "{}: failed to parse sentences '{}': {err}",
            entry.id,
            sentences_path.display()
        )
    })?;
    Sentence::link_neighbours(&mut sentences);

    let transcript_path = resolve_path(base_dir, &entry.transcript);
    let transcript = Transcript::load(&transcript_path).map_err(|err| {
        format!(
            "{}: failed to load transcript '{}': {err}",
            entry.id,
            transcript_path.display()
        )
    })?;
    Ok(Chapter {
        sentences,
        transcript,
    })
}

fn resolve_language(name: &str) -> Result<LanguageProfile, String> {
    LanguageProfile::builtin(name).ok_or_else(|| {
        format!("Unknown language '{name}'; expected neutral, english, polish or russian, or pass --profile.")
    })
}

fn meta(command: &str, case_count: usize) -> Meta {
    Meta {
        generated_at: Utc::now().to_rfc3339(),
        command: command.to_string(),
        case_count,
    }
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_gate() {
        assert!(check_success_rate(70.0, 35.0).is_ok());
        assert!(check_success_rate(35.0, 35.0).is_ok());
        let err = check_success_rate(20.0, 35.0).expect_err("below minimum");
        assert!(err.contains("20.0%"));
        assert!(err.contains("35.0%"));
    }

    #[test]
    fn manifest_paths_resolve_against_manifest_dir() {
        let base = Path::new("/data/book");
        assert_eq!(
            resolve_path(base, Path::new("ch1/sentences.json")),
            PathBuf::from("/data/book/ch1/sentences.json")
        );
        assert_eq!(
            resolve_path(base, Path::new("/abs/transcript.json")),
            PathBuf::from("/abs/transcript.json")
        );
    }

    #[test]
    fn manifest_parses_chapter_entries() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "chapters": [ { "id": "ch1", "sentences": "s.json", "transcript": "t.json" } ] }"#,
        )
        .expect("manifest");
        assert_eq!(manifest.chapters.len(), 1);
        assert_eq!(manifest.chapters[0].id, "ch1");
        assert_eq!(manifest.chapters[0].transcript, PathBuf::from("t.json"));
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(resolve_language("neutral").is_ok());
        assert!(resolve_language("klingon").is_err());
    }
}
