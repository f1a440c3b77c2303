// src/policy/mod.rs
// Adaptive policy: learner state to model instructions

mod compiler;

pub use compiler::{
    GlobalPreferences, STRONG_MASTERY, STRUGGLING_MASTERY, abstraction_directive,
    compile_analysis_prompt, compile_policy, depth_directive, grade_description,
    language_directive, mastery_directive,
};
