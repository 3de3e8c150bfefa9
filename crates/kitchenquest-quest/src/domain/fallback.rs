//! The fixed five-step sequence used when decomposition is unavailable.

use super::micro_step::{MicroStepDraft, MiniGameType};

struct FallbackStep {
    level_name: &'static str,
    name: &'static str,
    instruction: &'static str,
    mini_game_type: MiniGameType,
    reference_visual: &'static str,
    reference_image_prompt: &'static str,
}

const FALLBACK_STEPS: [FallbackStep; 5] = [
    FallbackStep {
        level_name: "LEVEL 1: THE PEPPER CHOP",
        name: "Dice Peppers",
        instruction: "Take the expiring peppers. Carefully cut them into very small, square-shaped pieces. [HEAT: N/A]",
        mini_game_type: MiniGameType::Chop,
        reference_visual: "Small, even, square pieces of red and green bell peppers on a cutting board.",
        reference_image_prompt: "Diced red and green bell peppers, small and uniform cubes, on a dark wooden cutting board, photorealistic, no hands, no tools, food only.",
    },
    FallbackStep {
        level_name: "LEVEL 2: PAN HEAT-UP",
        name: "Heat the Pan",
        instruction: "Place a pan on the stove. Turn on the stove to a medium-high heat setting. Let the pan warm up for a few minutes. [HEAT: 🔥🔥 (Steady)]",
        mini_game_type: MiniGameType::Wait,
        reference_visual: "A flat-bottomed pan on a stove burner, no visible food, surface shimmering slightly with heat.",
        reference_image_prompt: "Empty stainless steel frying pan on a gas stove burner, burner glowing red, slight heat shimmer above pan, dark kitchen background, photorealistic, no hands, no tools, food only.",
    },
    FallbackStep {
        level_name: "LEVEL 3: OIL UP!",
        name: "Add Cooking Oil",
        instruction: "Carefully pour a small amount of cooking oil into the hot pan. Just enough to lightly coat the bottom. [HEAT: 🔥🔥 (Steady)]",
        mini_game_type: MiniGameType::Prep,
        reference_visual: "A thin, even layer of glistening oil coating the bottom of a hot pan.",
        reference_image_prompt: "Close-up of olive oil shimmering lightly in a hot black frying pan, thin layer covering the bottom, dark kitchen background, photorealistic, no hands, no tools, food only.",
    },
    FallbackStep {
        level_name: "LEVEL 4: MEAT DROP",
        name: "Add Ground Meat",
        instruction: "Gently place the ground meat into the hot pan. [HEAT: 🔥🔥🔥 (Searing!)]",
        mini_game_type: MiniGameType::Prep,
        reference_visual: "Raw ground meat in small chunks spread out in a single layer in the hot pan.",
        reference_image_prompt: "Raw ground beef, broken into small pieces, spread evenly across a hot cast iron skillet, photorealistic, dark kitchen background, no hands, no tools, food only.",
    },
    FallbackStep {
        level_name: "LEVEL 5: THE SEAR",
        name: "Cook Ground Meat",
        instruction: "Cook the ground meat for 7 minutes, using a spoon or spatula to break it apart into small pieces as it cooks. Stir it often until it's browned. [ACTION: SET_TIMER | TIME: 7m | LABEL: \"BROWN THE MEAT\"]. [HEAT: 🔥🔥🔥 (Searing!)]",
        mini_game_type: MiniGameType::Sizzle,
        reference_visual: "All the ground meat should be cooked through and turned brown, with no pink parts left.",
        reference_image_prompt: "Cooked ground beef, evenly browned with some crispy edges, no pink visible, in a black frying pan, dark kitchen background, photorealistic, no hands, no tools, food only.",
    },
];

/// Returns the fallback micro-steps in order.
#[must_use]
pub fn fallback_drafts() -> Vec<MicroStepDraft> {
    FALLBACK_STEPS
        .iter()
        .map(|step| MicroStepDraft {
            level_name: step.level_name.to_owned(),
            name: step.name.to_owned(),
            raw_instruction: step.instruction.to_owned(),
            mini_game_type: step.mini_game_type,
            reference_visual: Some(step.reference_visual.to_owned()),
            reference_image_prompt: Some(step.reference_image_prompt.to_owned()),
        })
        .collect()
}
