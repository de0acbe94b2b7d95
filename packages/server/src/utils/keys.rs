use uuid::Uuid;

/// Fresh storage key for a generated image.
pub fn image_key() -> String {
    format!("{}.png", Uuid::new_v4().simple())
}

/// Canonical storage key for a generated video.
pub fn video_key() -> String {
    format!("generated_videos/{}.mp4", Uuid::new_v4())
}

/// Storage key for a temporary provider input.
pub fn temp_input_key(suffix: &str) -> String {
    format!("temp_inputs/{}{suffix}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_shaped() {
        let a = image_key();
        let b = image_key();
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));

        assert!(video_key().starts_with("generated_videos/"));
        assert!(video_key().ends_with(".mp4"));

        let t = temp_input_key("_first.png");
        assert!(t.starts_with("temp_inputs/"));
        assert!(t.ends_with("_first.png"));
    }
}
