// src/analysis.rs
// Structured analysis document returned for every homework image

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The validated analysis of one homework question.
///
/// Field names are the wire contract shared with storage and the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    pub subject: String,
    /// Dotted key "subject.category.specific"
    pub topic: String,
    pub parent_context: ParentContext,
    pub solution_steps: Vec<SolutionStep>,
    pub teaching_tips: Vec<TeachingTip>,
    pub common_mistakes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram: Option<Diagram>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentContext {
    pub what_it_tests: Vec<String>,
    pub key_idea: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionStep {
    pub step: u32,
    pub title: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingTip {
    pub tip: String,
}

/// Geometry visualisation, present only for geometry questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(rename = "viewBox")]
    pub view_box: ViewBox,
    pub elements: Vec<DiagramElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_padding")]
    pub padding: u32,
}

fn default_padding() -> u32 {
    20
}

/// `[x, y]` in view-box coordinates
pub type Point = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Polygon,
    Circle,
    Arc,
    Line,
    Point,
    Angle,
    Label,
}

/// One drawable element.
///
/// Geometry by kind: polygon/line use `points`; circle uses
/// `center` + `radius`; arc adds `start_angle` + `end_angle` (degrees);
/// point and label use `position`; angle uses `vertex` + `rays`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Solution steps during which this element is emphasised
    #[serde(rename = "highlightSteps", default)]
    pub highlight_steps: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(rename = "startAngle", default, skip_serializing_if = "Option::is_none")]
    pub start_angle: Option<f64>,
    #[serde(rename = "endAngle", default, skip_serializing_if = "Option::is_none")]
    pub end_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rays: Option<Vec<Point>>,
    /// "solid" or "dashed"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<DiagramLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<DiagramLabel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramLabel {
    pub text: String,
    /// "top", "bottom", "left", "right" or "center"
    pub position: String,
}

/// Why a candidate document was rejected
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema violation: {0}")]
    Invalid(String),
}

impl StructuredAnalysis {
    /// Parse and validate a JSON document
    pub fn parse(json: &str) -> Result<Self, SchemaError> {
        let analysis: Self = serde_json::from_str(json)?;
        analysis.validate()?;
        Ok(analysis)
    }

    /// Checks serde cannot express.
    ///
    /// Step numbering gaps are tolerated; only non-positive steps are rejected.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.subject.trim().is_empty() {
            return Err(SchemaError::Invalid("`subject` must not be empty".into()));
        }
        if self.topic.trim().is_empty() {
            return Err(SchemaError::Invalid("`topic` must not be empty".into()));
        }
        if let Some(bad) = self.solution_steps.iter().find(|s| s.step == 0) {
            return Err(SchemaError::Invalid(format!(
                "solution step numbers must start at 1, got 0 for \"{}\"",
                bad.title
            )));
        }
        Ok(())
    }
}
