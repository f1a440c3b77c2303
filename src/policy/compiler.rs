// src/policy/compiler.rs
// Compiles learner preferences and topic state into model instructions

use crate::state::{AbstractionLevel, HintDepth, TopicState};
use serde::{Deserialize, Serialize};

/// Mastery below this asks for extra patience
pub const STRUGGLING_MASTERY: f64 = 0.3;
/// Mastery above this allows a faster pace
pub const STRONG_MASTERY: f64 = 0.7;

/// Learner-wide settings owned by the profile store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPreferences {
    /// Grade code such as "year_3"
    pub grade_alignment: String,
    /// Curriculum authority code such as "NSW"
    pub curriculum_code: String,
    /// "zh" for Chinese; anything else yields English
    pub language_preference: String,
    pub default_explanation_style: String,
    pub no_direct_answer: bool,
}

impl Default for GlobalPreferences {
    fn default() -> Self {
        Self {
            grade_alignment: "year_3".to_string(),
            curriculum_code: "NSW".to_string(),
            language_preference: "zh_en".to_string(),
            default_explanation_style: "balanced".to_string(),
            no_direct_answer: true,
        }
    }
}

/// Human-readable grade; unknown codes pass through verbatim
pub fn grade_description(grade: &str) -> &str {
    match grade {
        "year_1" => "Year 1 (ages 5-6)",
        "year_2" => "Year 2 (ages 6-7)",
        "year_3" => "Year 3 (ages 7-8)",
        "year_4" => "Year 4 (ages 8-9)",
        "year_5" => "Year 5 (ages 9-10)",
        "year_6" => "Year 6 (ages 10-11)",
        "year_7" => "Year 7 (ages 11-12)",
        "year_8" => "Year 8 (ages 12-13)",
        other => other,
    }
}

pub fn language_directive(language: &str) -> &'static str {
    if language == "zh" {
        "Respond entirely in Chinese."
    } else {
        "Respond in English."
    }
}

pub fn abstraction_directive(level: AbstractionLevel) -> &'static str {
    match level {
        AbstractionLevel::MoreConcrete => {
            "Use concrete examples, real-world objects, and visual explanations. Avoid abstract terminology."
        }
        AbstractionLevel::Balanced => "Balance concrete examples with conceptual explanations.",
        AbstractionLevel::MoreAbstract => {
            "You may use mathematical notation and abstract concepts when appropriate."
        }
    }
}

pub fn depth_directive(depth: HintDepth) -> &'static str {
    match depth {
        HintDepth::LightHints => {
            "Keep explanations concise. Focus on key steps without extensive detail."
        }
        HintDepth::Moderate => "Provide clear explanations with moderate detail.",
        HintDepth::StepByStep => {
            "Provide detailed explanations with thorough breakdowns of each step."
        }
    }
}

/// Tone adjustment for the mastery band, if any
pub fn mastery_directive(mastery: f64) -> Option<&'static str> {
    if mastery < STRUGGLING_MASTERY {
        Some(
            "This child finds this topic challenging. Be extra patient and break concepts into smaller pieces.",
        )
    } else if mastery > STRONG_MASTERY {
        Some("This child is strong in this topic. You can move more quickly through basic concepts.")
    } else {
        None
    }
}

const CORE_RULES: &str = "Core Rules:
1. You are helping the PARENT understand the question so they can guide their child.
2. Provide a complete step-by-step solution that walks through how to solve the problem.
3. Include teaching tips to help parents explain the concepts to their child.
4. Focus on both the solution AND the learning process.";

const MATH_FORMATTING: &str = r#"Math Formatting:
IMPORTANT: Wrap ALL mathematical expressions in dollar-sign delimiters for LaTeX rendering.
- Inline math: $expression$ (e.g., $\frac{3}{4}$, $x^2 + 5$, $\sqrt{18}$, $3 \times 4 = 12$)
- Use LaTeX notation: \frac{a}{b} for fractions, ^{n} for exponents, \sqrt{x} for roots, \times for multiplication, \div for division, \pi for pi, etc.
- Example: Instead of "3/4 + 1/2", write "$\frac{3}{4} + \frac{1}{2}$"
- Example: Instead of "area = length × width", write "area $= \text{length} \times \text{width}$"
- Apply this to ALL text fields: key_idea, explanation, tip, common_mistakes"#;

const OUTPUT_FORMAT: &str = r#"Output Format:
You must respond with valid JSON only. The JSON must contain:
- "subject": The subject area (e.g., "math", "english")
- "topic": A topic key in format "subject.category.specific" (e.g., "math.geometry.area_perimeter")
- "parent_context": An object with:
  - "what_it_tests": Array of skills being tested
  - "key_idea": The main concept parents should understand
- "solution_steps": Array of solution steps, each with:
  - "step": Step number (1, 2, 3, etc.)
  - "title": Short title for the step (e.g., "Understand the shape")
  - "explanation": Detailed explanation of this step
- "teaching_tips": Array of objects, each with a "tip" field holding one short piece of teaching advice for parents
- "common_mistakes": Array of strings, each describing one common mistake to watch for

For GEOMETRY questions only: also include a "diagram" field with:
- "viewBox": {"width": int, "height": int, "padding": int}
- "elements": Array of shapes, each with "id", "type" (one of "polygon", "circle", "arc", "line", "point", "angle", "label") and "highlightSteps" (the step numbers that use it), plus the geometry for its type:
  - polygon/line: "points" as [[x, y], ...]
  - circle: "center" [x, y] and "radius"; arc adds "startAngle" and "endAngle" in degrees
  - point/label: "position" [x, y]
  - angle: "vertex" [x, y] and "rays" [[x, y], [x, y]]
  - optional "style" ("solid" or "dashed"), "label" or "labels" as {"text", "position"}
For non-geometry questions, omit this field entirely."#;

const CLOSING: &str =
    "Write the solution as you would explain it to the parent, clearly and step-by-step.";

fn curriculum_block(context: &str) -> String {
    format!(
        "Curriculum Alignment:\n\
         The following are relevant syllabus outcomes and content descriptions for this topic and grade level:\n\
         ---\n\
         {}\n\
         ---\n\
         Use this curriculum information to align your explanation with what the student is expected to learn. \
         Reference specific outcomes or content descriptions where appropriate.",
        context.trim()
    )
}

/// Build the system instructions for one analysis.
///
/// Deterministic: identical inputs produce byte-identical output. Without a
/// topic state the balanced/moderate defaults and a neutral mastery apply.
/// Blank curriculum context is treated as absent.
pub fn compile_policy(
    prefs: &GlobalPreferences,
    topic: Option<&TopicState>,
    curriculum_context: Option<&str>,
) -> String {
    let (abstraction, depth, mastery) = match topic {
        Some(t) => (t.preferred_abstraction, t.preferred_hint_depth, t.mastery),
        None => (AbstractionLevel::default(), HintDepth::default(), 0.5),
    };

    let mut sections = vec![
        format!(
            "You are a homework tutor helping a parent guide their {} child through homework.\nCurriculum: {}",
            grade_description(&prefs.grade_alignment),
            prefs.curriculum_code
        ),
        language_directive(&prefs.language_preference).to_string(),
        CORE_RULES.to_string(),
    ];

    if let Some(context) = curriculum_context.filter(|c| !c.trim().is_empty()) {
        sections.push(curriculum_block(context));
    }

    let mut style = format!(
        "Explanation Style:\n{}\n{}",
        abstraction_directive(abstraction),
        depth_directive(depth)
    );
    if let Some(tone) = mastery_directive(mastery) {
        style.push('\n');
        style.push_str(tone);
    }
    sections.push(style);

    sections.push(MATH_FORMATTING.to_string());
    sections.push(OUTPUT_FORMAT.to_string());
    sections.push(CLOSING.to_string());

    sections.join("\n\n")
}

/// Fixed user-turn instructions sent alongside the image
pub fn compile_analysis_prompt() -> &'static str {
    "Analyze this homework question image and provide:
1. What subject and topic this question belongs to
2. What skills and concepts it tests
3. The key idea that parents need to understand
4. A complete step-by-step solution showing how to solve the problem
5. Teaching tips for parents on how to explain this to their child
6. Common mistakes children make on this type of question
7. For GEOMETRY questions: Generate an interactive diagram spec that visualizes the problem

Respond with valid JSON only."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LearnerId;

    fn prefs() -> GlobalPreferences {
        GlobalPreferences {
            grade_alignment: "year_4".into(),
            curriculum_code: "NSW".into(),
            language_preference: "en".into(),
            ..Default::default()
        }
    }

    fn topic(mastery: f64) -> TopicState {
        TopicState {
            mastery,
            ..TopicState::new(LearnerId::new(), "math", "math.fractions.addition")
        }
    }

    // ============================================================================
    // Directives
    // ============================================================================

    #[test]
    fn test_grade_table() {
        assert_eq!(grade_description("year_1"), "Year 1 (ages 5-6)");
        assert_eq!(grade_description("year_8"), "Year 8 (ages 12-13)");
        assert_eq!(grade_description("kindergarten"), "kindergarten");
    }

    #[test]
    fn test_language_directive() {
        assert_eq!(language_directive("zh"), "Respond entirely in Chinese.");
        assert_eq!(language_directive("zh_en"), "Respond in English.");
        assert_eq!(language_directive("en"), "Respond in English.");
    }

    #[test]
    fn test_mastery_bands() {
        assert!(mastery_directive(0.29).unwrap().contains("extra patient"));
        assert!(mastery_directive(0.3).is_none());
        assert!(mastery_directive(0.5).is_none());
        assert!(mastery_directive(0.7).is_none());
        assert!(mastery_directive(0.71).unwrap().contains("move more quickly"));
    }

    // ============================================================================
    // compile_policy
    // ============================================================================

    #[test]
    fn test_deterministic() {
        let t = topic(0.2);
        let a = compile_policy(&prefs(), Some(&t), Some("Outcome MA2-FRC"));
        let b = compile_policy(&prefs(), Some(&t), Some("Outcome MA2-FRC"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_absent_topic_uses_defaults() {
        let with_default = compile_policy(&prefs(), Some(&topic(0.5)), None);
        let without = compile_policy(&prefs(), None, None);
        assert_eq!(with_default, without);
        assert!(without.contains(abstraction_directive(AbstractionLevel::Balanced)));
        assert!(without.contains(depth_directive(HintDepth::Moderate)));
        assert!(!without.contains("extra patient"));
    }

    #[test]
    fn test_section_order() {
        let policy = compile_policy(&prefs(), Some(&topic(0.1)), Some("Outcome MA2-FRC"));
        let markers = [
            "You are a homework tutor helping a parent guide their Year 4 (ages 8-9) child",
            "Curriculum: NSW",
            "Respond in English.",
            "Core Rules:",
            "Curriculum Alignment:",
            "Outcome MA2-FRC",
            "Explanation Style:",
            "extra patient",
            "Math Formatting:",
            "Output Format:",
            "Write the solution as you would explain it",
        ];
        let mut last = 0;
        for marker in markers {
            let pos = policy[last..]
                .find(marker)
                .unwrap_or_else(|| panic!("missing or out of order: {marker}"));
            last += pos + marker.len();
        }
    }

    #[test]
    fn test_curriculum_block_optional() {
        let policy = compile_policy(&prefs(), None, None);
        assert!(!policy.contains("Curriculum Alignment:"));
        let blank = compile_policy(&prefs(), None, Some("  \n"));
        assert_eq!(policy, blank);
    }

    #[test]
    fn test_preferences_change_directives() {
        let t = TopicState {
            preferred_abstraction: AbstractionLevel::MoreConcrete,
            preferred_hint_depth: HintDepth::StepByStep,
            ..topic(0.9)
        };
        let policy = compile_policy(&prefs(), Some(&t), None);
        assert!(policy.contains("Use concrete examples"));
        assert!(policy.contains("thorough breakdowns"));
        assert!(policy.contains("move more quickly"));
    }

    #[test]
    fn test_output_schema_describes_arrays() {
        let policy = compile_policy(&prefs(), None, None);
        assert!(policy.contains("\"teaching_tips\": Array of objects, each with a \"tip\" field"));
        assert!(policy.contains("\"common_mistakes\": Array of strings"));
        assert!(policy.contains("\"highlightSteps\""));
        assert!(policy.contains(r"$\frac{3}{4}$"));
    }

    #[test]
    fn test_analysis_prompt() {
        let prompt = compile_analysis_prompt();
        assert!(prompt.starts_with("Analyze this homework question image"));
        assert!(prompt.contains("7. For GEOMETRY questions"));
        assert!(prompt.ends_with("Respond with valid JSON only."));
    }
}
