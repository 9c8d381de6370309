//! Downloadable worksheet artifacts.

use crate::constants::PNG_MIME_TYPE;
use crate::prompt::ActivityType;

/// A generated worksheet image ready to be shown or downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorksheetImage {
    pub activity_type: String,
    pub file_name: String,
    pub mime_type: &'static str,
    pub caption: String,
    pub bytes: Vec<u8>,
}

impl WorksheetImage {
    pub fn new(activity: &ActivityType, bytes: Vec<u8>) -> Self {
        Self {
            activity_type: activity.label().to_owned(),
            file_name: download_file_name(activity.label()),
            mime_type: PNG_MIME_TYPE,
            caption: format!("Generated: {}", activity.label()),
            bytes,
        }
    }
}

/// Download name for a worksheet about `topic`: spaces become underscores, `.png` is appended.
pub fn download_file_name(topic: &str) -> String {
    format!("{}.png", topic.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::KnownActivity;

    #[test]
    fn file_name_replaces_spaces_only() {
        assert_eq!(download_file_name("CVC Blending"), "CVC_Blending.png");
        assert_eq!(
            download_file_name("Brushing Teeth & Hands"),
            "Brushing_Teeth_&_Hands.png"
        );
        assert_eq!(download_file_name("Other/Custom"), "Other/Custom.png");
    }

    #[test]
    fn image_carries_caption_and_mime() {
        let image = WorksheetImage::new(&KnownActivity::ShapeTracing.into(), vec![1, 2, 3]);
        assert_eq!(image.file_name, "Shape_Tracing.png");
        assert_eq!(image.caption, "Generated: Shape Tracing");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }
}
