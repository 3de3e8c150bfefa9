//! Read models for the current step.

use kitchenquest_directives::{HeatDirective, HeatLevel, TimerDirective, parse};
use serde::Serialize;

use crate::domain::aggregates::QuestRun;
use crate::domain::micro_step::MiniGameType;

/// Display-ready view of the current micro-step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// 1-based step id.
    pub step_id: u32,
    /// Level banner.
    pub level_name: String,
    /// Step name.
    pub name: String,
    /// Instruction with directive tokens removed.
    pub clean_instruction: String,
    /// Timer directive, if the instruction carried one.
    pub timer: Option<TimerDirective>,
    /// Heat directive, if the instruction carried one.
    pub heat: Option<HeatDirective>,
    /// Heat indicator text; absent for `N/A` heat.
    pub heat_display: Option<String>,
    /// Mini-game type.
    pub mini_game_type: MiniGameType,
    /// Progress label, e.g. `STAGE 2/5`.
    pub stage_label: String,
    /// What the finished step should look like.
    pub reference_visual: Option<String>,
    /// Prompt for generating a reference image.
    pub reference_image_prompt: Option<String>,
}

impl StepView {
    /// Renders the current step of `run`; `None` unless a step is current.
    #[must_use]
    pub fn from_run(run: &QuestRun) -> Option<Self> {
        let index = run.current_index()?;
        let step = run.current_step()?;
        let parsed = parse(&step.raw_instruction);

        Some(Self {
            step_id: step.id,
            level_name: step.level_name.clone(),
            name: step.name.clone(),
            clean_instruction: parsed.clean_instruction,
            heat_display: heat_display(parsed.heat.as_ref()),
            timer: parsed.timer,
            heat: parsed.heat,
            mini_game_type: step.mini_game_type,
            stage_label: format!("STAGE {}/{}", index + 1, run.steps().len()),
            reference_visual: step.reference_visual.clone(),
            reference_image_prompt: step.reference_image_prompt.clone(),
        })
    }
}

/// Heat indicator text: flames, then the label in parentheses when present.
#[must_use]
pub fn heat_display(heat: Option<&HeatDirective>) -> Option<String> {
    let heat = heat?;
    if heat.level == HeatLevel::NotApplicable {
        return None;
    }
    if heat.label.is_empty() {
        Some(heat.flames())
    } else {
        Some(format!("{} ({})", heat.flames(), heat.label))
    }
}

/// Formats seconds as `MM:SS`.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
