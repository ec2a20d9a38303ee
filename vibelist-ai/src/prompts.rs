//! Prompt builders for every completion the pipeline makes
//!
//! Token budgets and temperatures are fixed per request kind.

use crate::completion::{ChatMessage, CompletionRequest, ContentPart, ModelChoice};
use vibelist_common::SynthesisConstraints;

/// Knob values above this read as "high"
pub const HIGH_SIGNAL_THRESHOLD: u8 = 5;

const IMAGE_VIBE_INSTRUCTION: &str = "\
You are an expert music vibe interpreter analyzing images to understand the emotional atmosphere and mood they convey.

Analyze this image and extract the core emotional vibe, mood, and atmosphere that would translate to music preferences. Consider:

1. **Visual Elements**: Colors, lighting, composition, objects, people, settings
2. **Emotional Atmosphere**: What feelings does this image evoke?
3. **Energy Level**: Is it calm/peaceful or energetic/dynamic?
4. **Musical Associations**: What kind of music would fit this scene/mood?
5. **Contextual Clues**: Time of day, activity, location, style

**Examples of good vibe extractions:**
- Sunset beach photo -> \"warm, nostalgic, golden hour serenity with gentle waves of emotion\"
- City nightlife -> \"electric urban energy, neon-lit confidence, late night adventure vibes\"
- Cozy coffee shop -> \"intimate acoustic warmth, contemplative morning focus, artisanal comfort\"
- Mountain landscape -> \"expansive freedom, natural majesty, adventure-seeking spirit\"

Respond with ONLY a detailed vibe description (2-3 sentences) that captures the musical essence of this image.";

/// Vision request describing the musical vibe of an image
pub fn image_vibe_request(models: &ModelChoice, image_base64: &str) -> CompletionRequest {
    CompletionRequest {
        model: models.vision.clone(),
        messages: vec![ChatMessage::user_parts(vec![
            ContentPart::Text {
                text: IMAGE_VIBE_INSTRUCTION.to_string(),
            },
            ContentPart::jpeg_base64(image_base64),
        ])],
        max_tokens: 200,
        temperature: 0.7,
    }
}

/// Short creative title for a vibe
pub fn title_request(models: &ModelChoice, vibe: &str) -> CompletionRequest {
    let instruction = format!(
        "Based on this musical vibe description, generate a creative, short playlist title (2-5 words maximum):

Vibe: \"{vibe}\"

The title should be:
- Catchy and memorable
- Reflective of the mood/atmosphere
- Not generic (avoid \"chill vibes\", \"good music\", etc.)
- Creative but not overly complex

Examples:
\"warm nostalgic golden hour serenity\" -> \"Golden Hour Dreams\"
\"electric urban neon-lit confidence\" -> \"Neon Nights\"
\"intimate acoustic morning focus\" -> \"Morning Coffee\"

Respond with ONLY the playlist title, no quotes or extra text."
    );

    CompletionRequest {
        model: models.text.clone(),
        messages: vec![ChatMessage::system(instruction), ChatMessage::user(vibe)],
        max_tokens: 50,
        temperature: 0.8,
    }
}

/// Implicit vibe of a free-text request, shaded by time context
pub fn text_vibe_request(models: &ModelChoice, prompt: &str, context: &str) -> CompletionRequest {
    let instruction = format!(
        "You are a music vibe interpreter with human natural contextual awareness.

User request: \"{prompt}\"
Contextual timing: {context}

Extract the core emotional vibe, naturally considering the time context and any implicit mood cues.
If they mention places, activities, or objects, interpret the associated atmosphere and feeling.
Consider how the current time of day/week might influence the desired mood.

Examples:
\"study music\" (evening weekday) -> \"focused evening concentration with calm determination\"
\"workout playlist\" (morning weekend) -> \"energetic weekend motivation with fresh drive\"
\"road trip to california\" -> \"freedom, adventure, sunny optimism, open highway feeling\"

Respond with ONLY the vibe description."
    );

    CompletionRequest {
        model: models.text.clone(),
        messages: vec![ChatMessage::system(instruction), ChatMessage::user(prompt)],
        max_tokens: 150,
        temperature: 0.7,
    }
}

/// Merge an image vibe with the user's text and the time context
pub fn combined_vibe_request(
    models: &ModelChoice,
    image_vibe: &str,
    prompt: &str,
    context: &str,
) -> CompletionRequest {
    let instruction = format!(
        "You have two sources of vibe information:
1. Image Analysis: \"{image_vibe}\"
2. User Text: \"{prompt}\"
3. Context: {context}

Combine these into a single, cohesive musical vibe description that incorporates both the visual atmosphere and the user's text preferences.

Respond with ONLY the combined vibe description."
    );

    CompletionRequest {
        model: models.text.clone(),
        messages: vec![
            ChatMessage::system(instruction),
            ChatMessage::user("Combine the vibes now."),
        ],
        max_tokens: 150,
        temperature: 0.7,
    }
}

fn high_or_low(value: u8, high: &'static str, low: &'static str) -> &'static str {
    if value > HIGH_SIGNAL_THRESHOLD {
        high
    } else {
        low
    }
}

/// Parameter lines for the synthesis instruction
///
/// The obscurity line is always present; each numeric line only when its
/// signal is.
pub fn constraint_lines(constraints: &SynthesisConstraints) -> Vec<String> {
    let mut lines = vec![format!(
        "- {}",
        if constraints.include_obscure {
            "Mix popular tracks with hidden gems"
        } else {
            "Focus on well-known, recognizable tracks"
        }
    )];

    if let Some(energy) = constraints.energy_level {
        lines.push(format!(
            "- Energy level: {energy}/10 {}",
            high_or_low(energy, "(high energy, upbeat)", "(low energy, relaxed)")
        ));
    }
    if let Some(tempo) = constraints.tempo {
        lines.push(format!(
            "- Tempo: {tempo}/10 {}",
            high_or_low(tempo, "(faster paced)", "(slower paced)")
        ));
    }
    if let Some(diversity) = constraints.diversity {
        lines.push(format!(
            "- Artist diversity: {diversity}/10 {}",
            high_or_low(diversity, "(wide variety of artists)", "(can repeat artists)")
        ));
    }

    lines
}

/// Full synthesis instruction demanding strict JSON output
pub fn playlist_instruction(
    vibe: &str,
    context: &str,
    song_count: usize,
    constraints: &SynthesisConstraints,
) -> String {
    let parameters = constraint_lines(constraints).join("\n");
    format!(
        "You are an expert AI music curator creating a {song_count} song playlist.

**Target Vibe:** {vibe}
**Context:** {context}

**Parameters:**
{parameters}

**Requirements:**
- Return exactly {song_count} songs
- Match the target vibe perfectly with natural time awareness
- Create smooth flow between songs
- Songs should evoke the same emotional atmosphere as described in the vibe

**Output Format (STRICT JSON, no commentary):**
{{
  \"playlist\": [
    {{ \"title\": \"Song Name\", \"artist\": \"Artist Name\" }}
  ]
}}"
    )
}

/// Structured-output synthesis request
pub fn playlist_request(
    models: &ModelChoice,
    vibe: &str,
    context: &str,
    song_count: usize,
    constraints: &SynthesisConstraints,
) -> CompletionRequest {
    CompletionRequest {
        model: models.text.clone(),
        messages: vec![
            ChatMessage::system(playlist_instruction(vibe, context, song_count, constraints)),
            ChatMessage::user("Generate the playlist now."),
        ],
        max_tokens: 2000,
        temperature: 0.7,
    }
}
