use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use quickreturn_core::{AppConfig, QuickReturnConfig, RevealMode, SnapPolicy};
use quickreturn_sim::{ReplaySession, ScrollTrace, Snapshot};

/// Settings given on the command line, applied over the trace and config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub mode: Option<RevealMode>,
    pub snap: Option<SnapPolicy>,
    pub parallax: Option<f32>,
    pub reveal_on_idle: bool,
}

impl Overrides {
    fn apply(&self, mut config: QuickReturnConfig) -> QuickReturnConfig {
        if let Some(mode) = self.mode {
            config.reveal_mode = mode;
        }
        if let Some(snap) = self.snap {
            config.snap = snap;
        }
        if let Some(parallax) = self.parallax {
            config.parallax_factor = parallax;
        }
        if self.reveal_on_idle {
            config.reveal_on_idle = true;
        }
        config
    }
}

pub fn run(config: &AppConfig, trace_path: &Path, overrides: Overrides, settle: bool, json: bool) -> Result<()> {
    let trace = ScrollTrace::load(trace_path)
        .with_context(|| format!("Failed to load trace {}", trace_path.display()))?;

    let base = trace
        .config
        .clone()
        .unwrap_or_else(|| config.quick_return.clone());
    let engine_config = overrides.apply(base);
    engine_config.validate()?;

    info!(
        trace = %trace_path.display(),
        mode = ?engine_config.reveal_mode,
        snap = ?engine_config.snap,
        steps = trace.steps.len(),
        "Replaying trace"
    );

    let mut session = ReplaySession::new(&trace, engine_config)?;
    for (index, step) in trace.steps.iter().enumerate() {
        session
            .apply(step)
            .with_context(|| format!("Step {} failed", index))?;
        print_snapshot(&session.snapshot(index), json)?;
    }

    if settle {
        session.settle();
        print_snapshot(&session.snapshot(trace.steps.len()), json)?;
    }

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
        return Ok(());
    }

    println!(
        "[{:>6} ms] step {:>3}  {:<8} headers {}  footers {}",
        snapshot.time_ms,
        snapshot.step,
        format!("{:?}", snapshot.state),
        format_positions(&snapshot.headers),
        format_positions(&snapshot.footers),
    );
    Ok(())
}

fn format_positions(positions: &[f32]) -> String {
    if positions.is_empty() {
        return "-".to_string();
    }
    let items: Vec<String> = positions.iter().map(|y| format!("{:.1}", y)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_over_base() {
        let overrides = Overrides {
            mode: Some(RevealMode::ScrollLinked),
            snap: None,
            parallax: Some(0.5),
            reveal_on_idle: true,
        };
        let base = QuickReturnConfig {
            snap: SnapPolicy::ToMidpoint,
            ..Default::default()
        };

        let config = overrides.apply(base);
        assert_eq!(config.reveal_mode, RevealMode::ScrollLinked);
        assert_eq!(config.snap, SnapPolicy::ToMidpoint);
        assert!((config.parallax_factor - 0.5).abs() < f32::EPSILON);
        assert!(config.reveal_on_idle);
    }

    #[test]
    fn test_format_positions() {
        assert_eq!(format_positions(&[]), "-");
        assert_eq!(format_positions(&[-40.0, -12.26]), "[-40.0, -12.3]");
    }
}
