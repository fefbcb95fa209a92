//! Highlight detection entry points.
//!
//! Orchestrates the complete flow:
//! input → timeline → windows → judge panel → consensus → artifacts

use crate::artifacts::{ArtifactPaths, project, write_artifacts};
use crate::backend::create_backend;
use crate::cli::InputArgs;
use crate::config::Config;
use crate::detector::{HighlightDetector, RunReport};
use crate::error::Result;
use crate::timeline::load_timeline;
use crate::window::{Window, generate_windows};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::{info, warn};

/// CLI overrides for the `detect` command.
#[derive(Debug, Clone, Default)]
pub struct DetectOverrides {
    pub out_dir: Option<PathBuf>,
    pub tag: Option<String>,
    pub model: Option<String>,
    pub backend_url: Option<String>,
    pub threshold: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Apply CLI flags on top of file and environment configuration.
pub fn apply_overrides(config: &mut Config, input: &InputArgs, overrides: &DetectOverrides) {
    if let Some(size) = input.window_size {
        config.windowing.window_size = size;
    }
    if let Some(step) = input.step_size {
        config.windowing.step_size = step;
    }
    if let Some(ref dir) = overrides.out_dir {
        config.output.dir = dir.clone();
    }
    if let Some(ref tag) = overrides.tag {
        config.output.tag = Some(tag.clone());
    }
    if let Some(ref model) = overrides.model {
        config.backend.model = model.clone();
        config.summarizer.model = None;
        for judge in &mut config.judges {
            judge.model = None;
        }
    }
    if let Some(ref url) = overrides.backend_url {
        config.backend.base_url = Some(url.clone());
    }
    if let Some(threshold) = overrides.threshold {
        config.consensus.threshold = Some(threshold);
    }
    if let Some(secs) = overrides.timeout_secs {
        config.backend.timeout_secs = secs;
    }
}

/// Load the input and slice it into windows.
fn prepare_windows(config: &Config, input: &InputArgs) -> Result<Vec<Window>> {
    let (timeline, report) = load_timeline(&input.input, input.format)?;
    if report.skipped > 0 || report.invalid_time > 0 {
        info!(
            skipped = report.skipped,
            invalid_time = report.invalid_time,
            "ignored unusable input records"
        );
    }
    info!(
        events = timeline.event_count(),
        seconds = timeline.len(),
        "timeline built"
    );
    generate_windows(&timeline, &config.window_config())
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }
    match ProgressStyle::default_bar()
        .template("{spinner:.green} Evaluating highlights [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => warn!(error = %e, "invalid progress bar template"),
    }
    pb
}

/// Run the detect command: score windows and write both artifacts.
pub async fn run_detect_command(
    mut config: Config,
    input: InputArgs,
    overrides: DetectOverrides,
    quiet: bool,
) -> Result<RunReport> {
    apply_overrides(&mut config, &input, &overrides);
    config.validate()?;

    let windows = prepare_windows(&config, &input)?;
    let backend = create_backend(&config.backend)?;
    info!(
        backend = backend.name(),
        url = config.backend.resolved_base_url(),
        model = %config.backend.model,
        "using chat backend"
    );

    let detector = HighlightDetector::from_config(&config, backend);
    let pb = progress_bar(windows.len(), quiet);
    let mut accepted = 0;
    let detection = detector
        .run_with_progress(windows, |outcome| {
            if outcome.decision.is_some() {
                accepted += 1;
                pb.set_message(accepted_message(accepted));
            }
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    let tag = config.tag();
    let artifacts = project(&detection.decisions, &tag, &config.consensus.sentinel);
    let paths = ArtifactPaths::new(&config.output.dir, &tag);
    write_artifacts(&artifacts, &paths)?;

    if !quiet {
        print_summary(&detection.report, &paths);
    }
    Ok(detection.report)
}

fn accepted_message(accepted: usize) -> String {
    match accepted {
        1 => "1 highlight".to_string(),
        n => format!("{n} highlights"),
    }
}

fn print_summary(report: &RunReport, paths: &ArtifactPaths) {
    eprintln!(
        "{} {} of {} windows selected",
        "Done!".green().bold(),
        report.accepted,
        report.windows
    );
    if report.judge_abstentions > 0 {
        eprintln!(
            "{}",
            format!("{} judge calls gave no vote", report.judge_abstentions).yellow()
        );
    }
    if report.summary_failures > 0 {
        eprintln!(
            "{}",
            format!("{} summaries fell back to the sentinel", report.summary_failures).yellow()
        );
    }
    eprintln!(" - {}", paths.segments.display());
    eprintln!(" - {}", paths.events.display());
}

/// Run the windows command: print generated windows as JSON.
pub fn run_windows_command(mut config: Config, input: InputArgs) -> Result<()> {
    apply_overrides(&mut config, &input, &DetectOverrides::default());
    config.validate()?;
    let windows = prepare_windows(&config, &input)?;
    println!("{}", serde_json::to_string_pretty(&windows)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::InputFormat;

    fn input_args(path: PathBuf) -> InputArgs {
        InputArgs {
            input: path,
            format: InputFormat::Auto,
            window_size: None,
            step_size: None,
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = Config::default();
        config.judges[0].model = Some("phi3".to_string());
        config.summarizer.model = Some("phi3".to_string());
        let input = InputArgs {
            window_size: Some(30),
            step_size: Some(10),
            ..input_args(PathBuf::from("x.json"))
        };
        let overrides = DetectOverrides {
            out_dir: Some(PathBuf::from("out")),
            tag: Some("run1".to_string()),
            model: Some("mistral".to_string()),
            backend_url: Some("http://gpu:11434".to_string()),
            threshold: Some(3),
            timeout_secs: Some(30),
        };

        apply_overrides(&mut config, &input, &overrides);

        assert_eq!(config.windowing.window_size, 30);
        assert_eq!(config.windowing.step_size, 10);
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.tag(), "run1");
        assert_eq!(config.judge_model(&config.judges[0]), "mistral");
        assert_eq!(config.summarizer_model(), "mistral");
        assert_eq!(config.backend.resolved_base_url(), "http://gpu:11434");
        assert_eq!(config.threshold(), 3);
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn progress_message_counts_highlights_not_votes() {
        assert_eq!(accepted_message(1), "1 highlight");
        assert_eq!(accepted_message(3), "3 highlights");
    }

    #[test]
    fn no_overrides_leave_config_untouched() {
        let mut config = Config::default();
        apply_overrides(
            &mut config,
            &input_args(PathBuf::from("x.json")),
            &DetectOverrides::default(),
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn prepare_windows_from_caption_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captions.json");
        std::fs::write(
            &path,
            r#"{"annotations":[
                {"gameTime":"1 - 01:40","description":"Goal"},
                {"gameTime":"1 - 01:45","description":"Celebration"},
                {"gameTime":"1 - 05:00","description":"Corner"}
            ]}"#,
        )
        .unwrap();

        let windows = prepare_windows(&Config::default(), &input_args(path)).unwrap();
        let at_80 = windows.iter().find(|w| w.start_seconds == 80).unwrap();
        assert_eq!(
            at_80.events,
            ["[commentary] Goal", "[commentary] Celebration"]
        );
    }

    #[test]
    fn prepare_windows_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"annotations":[{"foo":"bar"}]}"#).unwrap();
        let err = prepare_windows(&Config::default(), &input_args(path)).unwrap_err();
        assert!(matches!(err, crate::error::MatchJuryError::EmptyInput));
    }
}
