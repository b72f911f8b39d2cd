//! Shipped task families: outpainting configuration and story generation.

use super::TaskPrompts;
use crate::core::backend::BackendId;

/// Council prompts for the folk-painting outpainting task.
///
/// Stage 1 asks every backend to fill a fixed JSON template describing
/// how to expand the image; the user query does not vary the draft
/// prompt, so all first-tier backends receive identical text.
pub struct OutpaintingPrompts;

impl TaskPrompts for OutpaintingPrompts {
    fn family(&self) -> &str {
        "outpainting"
    }

    fn stage1_prompt(&self, _query: &str) -> String {
        r#"Return ONLY valid JSON (no markdown, no extra text).
I want to scale/expand this image using outpainting by adding detailed scenery or elements around the image, NOT decorating its borders. Please fill in the following JSON template with the most detailed information.

{
  "task_type": "outpainting",
  "expansion_settings": {
    "direction": "",
    "pixel_amount": 0,
    "mask_blur": 0
  },
  "context_awareness": {
    "original_style": "",
    "seamless_blending_keywords": []
  },
  "scenarios": [
    {
      "scenario_id": "",
      "description": "",
      "prompt": ""
    },
    {
      "scenario_id": "",
      "description": "",
      "prompt": ""
    },
    {
      "scenario_id": "",
      "description": "",
      "prompt": ""
    },
    {
      "scenario_id": "",
      "description": "",
      "prompt": ""
    }
  ]
}
"#
        .to_string()
    }

    fn stage2_prompt(&self, origin: &BackendId, original: &str) -> String {
        format!(
            r#"You are an expert folk painting outpainter. Look at this image and review/complete the following outpainting JSON to make it perfect.

Initial Response from {origin}:
{original}

Your task: Complete and perfect this outpainting JSON by:
1. Enhancing the expansion settings with appropriate direction, pixel_amount, and mask_blur values
2. Adding detailed original_style description and seamless_blending_keywords
3. Describe creative and detailed surrounding scenarios without affecting the original image.

Provide the same format outpainting JSON:"#
        )
    }

    fn stage3_prompt(&self, _query: &str, rendered_candidates: &str) -> String {
        format!(
            r#"You are an expert evaluator of folk painting outpainting JSON configurations.
I have several candidates for the outpainting configuration. Some are **Initial Versions (Stage 1)** and some are **Refined Versions (Stage 2)**.

Your goal is to compare them and select the single best JSON configuration that yields the most artistic, seamless, and culturally appropriate outpainting for a Vietnamese traditional folk painting.

Responses to evaluate:
{rendered_candidates}

Your task:
1. Evaluate each response based on:
   - **JSON Validity:** Must be strictly valid JSON.
   - **Expansion Settings:** Logic of direction and pixel amount.
   - **Context Awareness:** How well it captures the "folk" style (keywords, blending).
   - **Creativity:** The quality of the scenarios.
   - **Comparison:** specific check if the Refined Version actually improved upon the Initial Draft or if it over-complicated things.

2. At the end, clearly state your selection in this exact format:
BEST RESPONSE: Response X (where X is A, B, C, etc.)

Provide your evaluation and final selection:"#
        )
    }
}

/// Council prompts for the folk-painting four-frame story task.
pub struct StoryPrompts;

impl TaskPrompts for StoryPrompts {
    fn family(&self) -> &str {
        "story"
    }

    fn stage1_prompt(&self, query: &str) -> String {
        format!(
            r#"You are a storyteller specializing in folk painting narratives. Given the attached folk painting, create a four-frame story that brings the painting to life.

User Request: {query}

Create a four-frame story where each frame:
- Has a clear visual description
- Advances the narrative
- Maintains folk painting aesthetic
- Includes dialogue or narration

Format as:
Frame 1: [Description]
Frame 2: [Description]
Frame 3: [Description]
Frame 4: [Description]"#
        )
    }

    fn stage2_prompt(&self, origin: &BackendId, original: &str) -> String {
        format!(
            r#"You are an expert folk painting storyteller. Review and complete the following four-frame story to make it perfect.

Initial Story from {origin}:
{original}

Your task: Complete and perfect this story by:
1. Sharpening each frame's visual description
2. Strengthening the narrative arc across the four frames
3. Keeping the folk painting aesthetic consistent throughout
4. Polishing the dialogue or narration in every frame

Provide the same four-frame format:"#
        )
    }

    fn stage3_prompt(&self, query: &str, rendered_candidates: &str) -> String {
        format!(
            r#"You are an expert evaluator of folk painting stories. Several candidate four-frame stories were written for the request below. Some are **Initial Versions (Stage 1)** and some are **Refined Versions (Stage 2)**.

User Request: {query}

Responses to evaluate:
{rendered_candidates}

Your task:
1. Evaluate each response based on:
   - Narrative coherence across the four frames
   - Vividness of the visual descriptions
   - Fidelity to the folk painting aesthetic
   - Quality of dialogue or narration

2. At the end, clearly state your selection in this exact format:
BEST RESPONSE: Response X (where X is A, B, C, etc.)

Provide your evaluation and final selection:"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outpainting_stage1_is_json_template() {
        let prompt = OutpaintingPrompts.stage1_prompt("");
        assert!(prompt.contains("ONLY valid JSON"));
        assert!(prompt.contains("expansion_settings"));
        assert!(prompt.contains("scenarios"));
    }

    #[test]
    fn test_stage2_embeds_origin_and_text() {
        let origin = BackendId::new("scholar_gpt");
        let prompt = OutpaintingPrompts.stage2_prompt(&origin, "the draft");
        assert!(prompt.contains("scholar_gpt"));
        assert!(prompt.contains("the draft"));
    }

    #[test]
    fn test_stage3_carries_selection_instruction() {
        for prompts in [&OutpaintingPrompts as &dyn TaskPrompts, &StoryPrompts] {
            let prompt = prompts.stage3_prompt("expand it", "Response A (x):\nfoo");
            assert!(prompt.contains("BEST RESPONSE: Response X"));
            assert!(prompt.contains("Response A"));
        }
    }

    #[test]
    fn test_story_stage1_embeds_request() {
        let prompt = StoryPrompts.stage1_prompt("tell the mouse wedding story");
        assert!(prompt.contains("mouse wedding"));
        assert!(prompt.contains("Frame 4"));
    }
}
