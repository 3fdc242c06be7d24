//! Recorded scroll traces
//!
//! A trace lists the bars to attach and a sequence of steps: raw scroll input,
//! clock advances and imperative calls. Traces are written as JSON or TOML.
//!
//! ```toml
//! source = "continuous"
//!
//! [[headers]]
//! height = 56
//!
//! [[steps]]
//! op = "touch"
//! phase = "down"
//!
//! [[steps]]
//! op = "scroll"
//! y = 120
//!
//! [[steps]]
//! op = "wait"
//! ms = 300
//! ```

use std::path::Path;

use quickreturn_core::{Edge, EntryFlags, Error, QuickReturnConfig, Result, ScrollState, TouchPhase};
use serde::{Deserialize, Serialize};

/// How scroll input reaches the engine during replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSource {
    /// Positions go straight to the engine
    #[default]
    Direct,
    /// Item list, positions rebuilt from item heights
    List,
    /// Continuous scroll container with inferred idle
    Continuous,
    /// Relative scroll amounts
    Delta,
}

fn default_true() -> bool {
    true
}

/// One bar to attach before replay starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSpec {
    pub height: i32,
    #[serde(default = "default_true")]
    pub participates: bool,
    /// Drawn over the content rather than beside it
    #[serde(default = "default_true")]
    pub overlay: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl BarSpec {
    pub fn flags(&self) -> EntryFlags {
        EntryFlags::default()
            .with_participates(self.participates)
            .with_renders_above_content(self.overlay)
            .with_permanently_hidden(self.hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TraceStep {
    /// Absolute vertical position, for direct and continuous sources
    Scroll { y: i32 },
    /// Relative movement, for delta sources
    ScrollBy { dy: i32 },
    /// Item-list layout pass
    List {
        first_visible: usize,
        first_top: i32,
        heights: Vec<i32>,
    },
    State { state: ScrollState },
    Touch { phase: TouchPhase },
    ContentChanged,
    /// Let the virtual clock run
    Wait { ms: u64 },
    ShowAll {
        #[serde(default = "default_true")]
        animated: bool,
    },
    HideAll {
        #[serde(default = "default_true")]
        animated: bool,
    },
    Hide {
        edge: Edge,
        index: usize,
        #[serde(default = "default_true")]
        animated: bool,
    },
    Unhide {
        edge: Edge,
        index: usize,
        #[serde(default = "default_true")]
        animated: bool,
    },
    Resize { edge: Edge, index: usize, height: i32 },
    Participate { edge: Edge, index: usize, value: bool },
}

impl TraceStep {
    /// Whether the step only makes sense for a particular source
    fn accepted_by(&self, source: TraceSource) -> bool {
        match self {
            TraceStep::Scroll { .. } => matches!(source, TraceSource::Direct | TraceSource::Continuous),
            TraceStep::ScrollBy { .. } => source == TraceSource::Delta,
            TraceStep::List { .. } | TraceStep::ContentChanged => source == TraceSource::List,
            TraceStep::Touch { .. } => source == TraceSource::Continuous,
            // continuous sources infer their own scroll state
            TraceStep::State { .. } => source != TraceSource::Continuous,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollTrace {
    #[serde(default)]
    pub source: TraceSource,
    /// Overrides the configured engine settings for this trace
    #[serde(default)]
    pub config: Option<QuickReturnConfig>,
    #[serde(default)]
    pub headers: Vec<BarSpec>,
    #[serde(default)]
    pub footers: Vec<BarSpec>,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

impl ScrollTrace {
    /// Load a trace, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let trace: Self = serde_json::from_str(content)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let trace: Self = toml::from_str(content)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn validate(&self) -> Result<()> {
        for (index, bar) in self.headers.iter().chain(&self.footers).enumerate() {
            if bar.height < 0 {
                return Err(Error::InvalidTrace(format!(
                    "bar {} has negative height {}",
                    index, bar.height
                )));
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            if !step.accepted_by(self.source) {
                return Err(Error::InvalidTrace(format!(
                    "step {} ({:?}) cannot be used with a {:?} source",
                    index, step, self.source
                )));
            }
        }
        if let Some(config) = &self.config {
            config.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_trace() {
        let trace = ScrollTrace::from_toml(
            r#"
            source = "continuous"

            [[headers]]
            height = 56

            [[footers]]
            height = 48
            overlay = false

            [[steps]]
            op = "touch"
            phase = "down"

            [[steps]]
            op = "scroll"
            y = 120

            [[steps]]
            op = "hide"
            edge = "header"
            index = 0
            "#,
        )
        .unwrap();

        assert_eq!(trace.source, TraceSource::Continuous);
        assert!(!trace.footers[0].flags().renders_above_content);
        assert_eq!(
            trace.steps,
            vec![
                TraceStep::Touch { phase: TouchPhase::Down },
                TraceStep::Scroll { y: 120 },
                TraceStep::Hide {
                    edge: Edge::Header,
                    index: 0,
                    animated: true,
                },
            ]
        );
    }

    #[test]
    fn test_json_trace_with_config() {
        let trace = ScrollTrace::from_json(
            r#"{
                "config": { "reveal_mode": "scroll_linked", "snap": "to_intent" },
                "headers": [{ "height": 40 }, { "height": 30, "participates": false }],
                "steps": [
                    { "op": "scroll", "y": 200 },
                    { "op": "state", "state": "idle" },
                    { "op": "wait", "ms": 500 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(trace.source, TraceSource::Direct);
        let config = trace.config.unwrap();
        assert_eq!(config.min_delta_before_hide, 30);
        assert!(!trace.headers[1].flags().participates);
        assert_eq!(trace.steps[2], TraceStep::Wait { ms: 500 });
    }

    #[test]
    fn test_bundled_demos_parse() {
        let toml_demo = ScrollTrace::from_toml(include_str!("../../../demos/reveal_on_idle.toml")).unwrap();
        assert_eq!(toml_demo.headers.len(), 3);
        assert!(toml_demo.config.unwrap().reveal_on_idle);

        let json_demo = ScrollTrace::from_json(include_str!("../../../demos/list_animated.json")).unwrap();
        assert_eq!(json_demo.source, TraceSource::List);
        assert_eq!(json_demo.steps.len(), 9);
    }

    #[test]
    fn test_step_must_fit_source() {
        let err = ScrollTrace::from_json(r#"{ "source": "list", "steps": [{ "op": "scroll", "y": 10 }] }"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTrace(_)));

        let err = ScrollTrace::from_json(r#"{ "steps": [{ "op": "scroll_by", "dy": 10 }] }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTrace(_)));

        let err = ScrollTrace::from_json(r#"{ "source": "continuous", "steps": [{ "op": "state", "state": "idle" }] }"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTrace(_)));
    }

    #[test]
    fn test_malformed_trace_is_reported() {
        assert!(matches!(
            ScrollTrace::from_json("{ not json"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            ScrollTrace::from_toml("steps = 3"),
            Err(Error::TomlParse(_))
        ));
        assert!(ScrollTrace::from_json(r#"{ "headers": [{ "height": -4 }] }"#).is_err());
    }
}
