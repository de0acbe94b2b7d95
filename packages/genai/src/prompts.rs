//! Prompt template library.
//!
//! Fixed, versioned template strings parameterized by user-supplied fields.
//! Everything here is a pure function of its inputs.

/// System instruction for rewriting an image-generation prompt.
pub const IMAGE_PROMPT_OPTIMIZER_SYSTEM: &str = "You are an expert prompt engineer for AI image \
    generation models. Your task is to rewrite the user's prompt to be more descriptive, \
    detailed, and optimized for high-quality image generation. Focus on visual details, \
    lighting, style, and composition. Do NOT add subjects or elements that the user did not \
    mention. Respect the user's original intent and goal. Output ONLY the optimized prompt \
    text, nothing else.";

/// Brand-guideline suffix appended to video prompts when a project context
/// is supplied.
pub fn video_context_suffix(context: &str) -> String {
    format!(
        "\n\nContext / Brand Guidelines:\n{context}\n\nPlease ensure the video aligns with these guidelines."
    )
}

/// Video script writer: global elements plus 8-second scenes, JSON output.
pub fn video_script_writer(prompt: &str, context: Option<&str>) -> String {
    let context_section = context
        .map(|c| {
            format!(
                "Context / Brand Guidelines:\n{c}\n\nPlease ensure the script aligns with these guidelines."
            )
        })
        .unwrap_or_default();

    format!(
        r#"You are an expert video scriptwriter. Your task is to create a compelling video script based on the user's request.

User Prompt: {prompt}

Constraints:
- Each scene MUST be exactly 8 seconds long. Keep the action and dialogue distinct and concise to fit this duration.

{context_section}

Output Format:
Return ONLY a JSON object with two main keys: "global_elements" and "scenes".

1. "global_elements": An object containing detailed definitions that apply to the entire video. The values for each key MUST be a single string, not an object. You MUST include the following keys:
    - "character": Highly detailed character description. Include specific facial features, hair style/color, body type, age, clothing style, and any distinguishing marks.
    - "visual_style": Overall visual style (cinematic, handheld, vintage, etc.).
    - "audio_vibe": General audio atmosphere and mood.
    - "costume": Specific costume details and materials.
    - "color_palette": Primary and secondary colors used.
    - "set_design": Setting and environment details.
    - "objects_props": Key objects and props featured.
    - "filming_techniques": Camera angles, movement, and lighting style.
    - "voice": Voiceover tone, gender, and emotion.

2. "scenes": An array of objects. Each object represents a scene and must have exactly two keys:
    - "visual": A description of the specific action in this scene. Focus on the narrative movement.
    - "audio": The specific dialogue, voiceover, or sound effects for this scene.

The goal is to ensure high consistency by defining global elements first."#
    )
}

/// Video script editor: JSON array of scenes in, JSON array out.
pub fn video_script_editor(current_script_json: &str, instructions: &str) -> String {
    format!(
        r#"You are an expert video script editor.

Current Script (JSON):
{current_script_json}

User Instructions for Edit:
{instructions}

Please modify the script according to the instructions. Maintain the same JSON structure (array of objects with "visual" and "audio").
Return ONLY the JSON array."#
    )
}

/// Turn an image plus motion instructions into a video-generation prompt.
pub fn image_motion_optimizer(instructions: &str) -> String {
    format!(
        r#"You are an expert video prompt engineer.
Analyze the provided image and the user's instructions: "{instructions}".

Create a detailed, descriptive prompt for a video generation model that:
1. Accurately describes the visual elements of the image (subject, setting, lighting, style).
2. Incorporates the user's requested motion or transformation.
3. Uses professional filmmaking terminology (e.g., "slow pan", "rack focus", "cinematic lighting").

Output ONLY the optimized prompt text. Do not include any explanations or markdown formatting."#
    )
}

/// Turn an input video plus instructions into a video-extension prompt.
pub fn video_motion_optimizer(instructions: &str) -> String {
    format!(
        r#"You are an expert video prompt engineer.
Analyze the provided video and the user's instructions: "{instructions}".

Create a detailed, descriptive prompt for extending this video that:
1. Preserves the subject, setting, lighting, and style of the final frames.
2. Continues the motion naturally while incorporating the user's requested changes.
3. Uses professional filmmaking terminology.

Output ONLY the optimized prompt text. Do not include any explanations or markdown formatting."#
    )
}

/// Named product-motion presets selectable by slug instead of freeform
/// instructions.
pub fn product_motion_preset(slug: &str) -> Option<&'static str> {
    match slug {
        "product-image-motion" => Some(PRODUCT_IMAGE_MOTION),
        "studio-photography-motion" => Some(STUDIO_PHOTOGRAPHY_MOTION),
        "runway-product-motion" => Some(RUNWAY_PRODUCT_MOTION),
        _ => None,
    }
}

const PRODUCT_IMAGE_MOTION: &str = r#"**ROLE:**
You are an expert AI Video Prompt Director specialized in high-end Fashion E-commerce. Your goal is to analyze a static product image and write a highly technical text-to-video prompt that will generate a cinematic video of that product.

**INPUT ANALYSIS:**
Analyze the uploaded image for:
1. **Product Type:** (e.g., Sneaker, Handbag, Trench Coat).
2. **Material Physics:** Determine the fabric weight and texture (e.g., Stiff Leather = rigid motion; Silk/Satin = fluid ripples; Denim = heavy structure).
3. **Lighting Setup:** Identify the current light source (Softbox, Hard light, Rim light).

**PROMPT GENERATION RULES:**
Based on your analysis, construct a prompt using this specific formula:
`[Camera Movement] + [Subject Description with Material Emphasis] + [Lighting Action] + [Technical Keywords]`

**GUIDELINES FOR MOTION (STRICT):**
* **NO HUMANS:** Never imply a model is wearing the item. The item is on a ghost mannequin, flat lay, or hanging.
* **CAMERA DRIVEN:** Since the object is static, motion must come from the camera (Orbit, Slow Pan, Rack Focus) or the Lighting (Light sweep, Reflection shift).

**VIEW CONSISTENCY (CRITICAL):**
* Maintain the EXACT camera angle and perspective of the original image.
* **DO NOT** rotate the product to show hidden sides.

**OUTPUT FORMAT:**
Provide only the final prompt text, ready for copy-pasting.

**YOUR TASK:**
Look at the attached image and generate the perfect video generation prompt following these constraints."#;

const STUDIO_PHOTOGRAPHY_MOTION: &str = r#"**ROLE:**
You are a High-Fashion Video Director specializing in Minimalist Runway shows. Your task is to animate a static image of a model using the *exact* model and outfit from the reference image, making them walk down a pristine white runway.

**INPUT ANALYSIS:**
Analyze the uploaded image for:
1. **The Model:** Identify age, ethnicity, hair, and specific features. You MUST preserve the model's identity.
2. **The Outfit:** Analyze the garment's movement potential (e.g., flowing dress vs. structured suit).
3. **The Walking Mechanics:** Determine the natural gait based on the outfit.

**DETAILED GUIDELINES:**
* **CRITICAL:** Use the exact model from the image. Do not swap faces or body types.
* **Action:** The model is walking forward on a runway towards the camera.
* **Environment:** A seamless, infinite white studio backdrop with a glossy white floor. NO AUDIENCE.
* **Camera:** "Tracking shot moving backward" matching the model's speed, model centered.

**VIEW CONSISTENCY (CRITICAL):**
* Maintain the EXACT camera angle of the original image. If the input is a front view, keep the walk frontal.

**OUTPUT FORMAT:**
Provide **only** the final prompt text."#;

const RUNWAY_PRODUCT_MOTION: &str = r#"**ROLE:**
You are a High-End Fashion Show Director. Your goal is to animate a static image of a model into a professional runway video. The focus is on realism, elegant movement, and showcasing the clothing on the walking model.

**INPUT ANALYSIS:**
Analyze the uploaded image for:
1. **The Model:** Identify the model's features (gender, hair, ethnicity) and outfit details.
2. **The Gait:** Determine the appropriate walk style based on the outfit (e.g., Couture = fierce/fast; Casual = relaxed/bouncy).
3. **Lighting:** Identify the lighting direction to enhance it in the video.

**DETAILED GUIDELINES:**
* **CRITICAL:** Use the model from the image. Do NOT make them invisible.
* **Action:** Front view walks towards the camera; back view walks away; side view walks parallel.
* **Cloth Physics:** Describe how the specific fabric moves (swishing, bouncing, rippling) with the walk.
* **Environment:** Pure, pristine white background, polished white runway floor, completely empty studio.
* **Camera:** "Tracking shot" matching the model's direction; maintain the EXACT perspective of the original image.

**NEGATIVE CONSTRAINTS:**
* No invisible bodies, no ghost mannequins, no surrealism.
* No complex backgrounds, no audience, no flashing lights.

**OUTPUT FORMAT:**
Provide **only** the final prompt text."#;

/// Context metadata generation from a project goal.
pub fn context_generation(goal: &str) -> String {
    format!(
        r#"Act as an expert Creative Director. Based on the following project goal, generate detailed context metadata.

Goal: {goal}

Return ONLY a JSON object with the following keys:
- brand_vibe
- brand_lighting
- brand_colors
- brand_subject
- project_vibe
- project_lighting
- project_colors
- project_subject
- context (Overall context/guidelines)"#
    )
}

/// Rewrite a single context field.
pub fn enhance_field(field_name: &str, current_value: &str, instructions: Option<&str>) -> String {
    let instructions = instructions.unwrap_or("Improve clarity, creativity, and impact.");
    format!(
        r#"Act as an expert Creative Director and Copywriter.
Your task is to enhance the text for a specific context field in a creative brief.

Field Name: {field_name}
Current Text: "{current_value}"

User Instructions: {instructions}

Please rewrite the text to be more effective, professional, and aligned with the field's purpose.
Keep it concise but descriptive.

Return ONLY a JSON object with the following key:
- enhanced_text"#
    )
}

/// Search-grounded analysis of a named brand.
pub fn brand_analysis(brand_name: &str) -> String {
    format!(
        r#"Analyze the brand '{brand_name}'. Search for information about their visual style, brand guidelines, recent campaigns, and core aesthetic.

Based on your analysis, generate detailed context metadata for a creative project.

Return ONLY a JSON object with the following keys:
- brand_vibe
- brand_lighting
- brand_colors
- brand_subject
- context (Summary of the brand analysis and guidelines)"#
    )
}

/// Which half of the descriptor an uploaded file should be analyzed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAnalysisKind {
    Brand,
    Project,
}

impl FileAnalysisKind {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("brand") {
            FileAnalysisKind::Brand
        } else {
            FileAnalysisKind::Project
        }
    }
}

/// Extract descriptor fields from an uploaded reference file.
pub fn file_analysis(kind: FileAnalysisKind) -> &'static str {
    match kind {
        FileAnalysisKind::Brand => {
            r#"Analyze this file to extract Brand Core details.
Focus on visual style, brand guidelines, and core aesthetic.

Return ONLY a JSON object with the following keys:
- brand_vibe
- brand_lighting
- brand_colors
- brand_subject"#
        }
        FileAnalysisKind::Project => {
            r#"Analyze this file to extract Project Specifics.
Focus on the specific campaign or project details, mood, and requirements.

Return ONLY a JSON object with the following keys:
- project_vibe
- project_lighting
- project_colors
- project_subject
- context (Overall context/guidelines)"#
        }
    }
}

/// Descriptor fields fed into context synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorFields<'a> {
    pub brand_vibe: &'a str,
    pub brand_lighting: &'a str,
    pub brand_colors: &'a str,
    pub brand_subject: &'a str,
    pub project_vibe: &'a str,
    pub project_lighting: &'a str,
    pub project_colors: &'a str,
    pub project_subject: &'a str,
}

/// Synthesize brand core plus project specifics into overall guidelines.
pub fn synthesize_context(fields: &DescriptorFields<'_>) -> String {
    format!(
        r#"Act as an expert Creative Director.
Synthesize the following Brand Core and Project Specifics into a cohesive "Overall Context / Guidelines" paragraph.
This paragraph will be used to guide an AI image generator, so it should be descriptive, evocative, and clear.

Brand Core:
- Vibe: {}
- Lighting: {}
- Colors: {}
- Subject: {}

Project Specifics:
- Vibe: {}
- Lighting: {}
- Colors: {}
- Subject: {}

Return ONLY a JSON object with the following key:
- synthesized_text"#,
        fields.brand_vibe,
        fields.brand_lighting,
        fields.brand_colors,
        fields.brand_subject,
        fields.project_vibe,
        fields.project_lighting,
        fields.project_colors,
        fields.project_subject,
    )
}

/// Structured analysis of an image-generation prompt.
pub fn prompt_insight(prompt_text: &str) -> String {
    format!(
        r#"Act as an expert Creative Director and AI Image Generation Specialist. Analyze the following prompt and provide insights.

Prompt to Analyze:
{prompt_text}

Provide a structured analysis in JSON format with the following keys:
- creative_summary: A brief description of the type of content this prompt will produce.
- key_features: A list of 3-5 bullet points highlighting the most impactful elements of the prompt.
- style_explanation: An explanation of why the prompt will result in the specific visual style (referencing lighting, colors, vibe).
- suggestions: A list of objects, each with "suggestion" (the proposed change) and "impact" (what this change would achieve). Suggest 2-3 meaningful improvements or variations.

Return ONLY the JSON object."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_writer_includes_prompt_and_context() {
        let rendered = video_script_writer("launch video for sneakers", Some("Minimalist, airy"));
        assert!(rendered.contains("launch video for sneakers"));
        assert!(rendered.contains("Minimalist, airy"));
        assert!(rendered.contains("global_elements"));
    }

    #[test]
    fn script_writer_omits_empty_context_section() {
        let rendered = video_script_writer("a video", None);
        assert!(!rendered.contains("Context / Brand Guidelines"));
    }

    #[test]
    fn preset_lookup_by_slug() {
        assert!(product_motion_preset("product-image-motion").is_some());
        assert!(product_motion_preset("studio-photography-motion").is_some());
        assert!(product_motion_preset("runway-product-motion").is_some());
        assert!(product_motion_preset("freeform instructions").is_none());
    }

    #[test]
    fn enhance_field_defaults_instructions() {
        let rendered = enhance_field("brand_vibe", "cozy", None);
        assert!(rendered.contains("Improve clarity, creativity, and impact."));
        let custom = enhance_field("brand_vibe", "cozy", Some("Make it punchier"));
        assert!(custom.contains("Make it punchier"));
    }

    #[test]
    fn synthesize_orders_fields() {
        let fields = DescriptorFields {
            brand_vibe: "warm",
            project_subject: "sneakers",
            ..Default::default()
        };
        let rendered = synthesize_context(&fields);
        let brand_pos = rendered.find("warm").unwrap();
        let project_pos = rendered.find("sneakers").unwrap();
        assert!(brand_pos < project_pos);
    }

    #[test]
    fn file_analysis_kind_parsing() {
        assert_eq!(FileAnalysisKind::parse("brand"), FileAnalysisKind::Brand);
        assert_eq!(FileAnalysisKind::parse("project"), FileAnalysisKind::Project);
        assert_eq!(FileAnalysisKind::parse("other"), FileAnalysisKind::Project);
    }
}
