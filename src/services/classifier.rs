use crate::config::MimePolicy;

/// Storage folder a content type is routed to. `File` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Image,
    Video,
    Audio,
    File,
}

impl Folder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Image => "image",
            Folder::Video => "video",
            Folder::Audio => "audio",
            Folder::File => "file",
        }
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes declared content types to storage folders using the configured
/// allow-lists. Lookup order is image -> video -> audio -> document; first
/// match wins. Classification is total: missing or unknown types land in
/// the `file` folder.
#[derive(Debug, Clone)]
pub struct MimeClassifier {
    categories: Vec<(Folder, Vec<String>)>,
}

impl MimeClassifier {
    pub fn new(policy: &MimePolicy) -> Self {
        let lower = |list: &[String]| list.iter().map(|m| m.to_lowercase()).collect();
        Self {
            categories: vec![
                (Folder::Image, lower(&policy.image)),
                (Folder::Video, lower(&policy.video)),
                (Folder::Audio, lower(&policy.audio)),
                (Folder::File, lower(&policy.document)),
            ],
        }
    }

    pub fn classify(&self, content_type: Option<&str>) -> Folder {
        let Some(content_type) = content_type else {
            return Folder::File;
        };
        let normalized = content_type.to_lowercase();

        for (folder, types) in &self.categories {
            if types.iter().any(|t| *t == normalized) {
                return *folder;
            }
        }
        Folder::File
    }

    /// Membership in the union of all configured lists; the only admission
    /// filter the upload pipeline applies.
    pub fn is_allowed(&self, content_type: &str) -> bool {
        let normalized = content_type.to_lowercase();
        self.categories
            .iter()
            .any(|(_, types)| types.iter().any(|t| *t == normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> MimeClassifier {
        MimeClassifier::new(&MimePolicy::default())
    }

    #[test]
    fn test_classify_known_types() {
        let c = classifier();
        assert_eq!(c.classify(Some("image/png")), Folder::Image);
        assert_eq!(c.classify(Some("video/mp4")), Folder::Video);
        assert_eq!(c.classify(Some("audio/mpeg")), Folder::Audio);
        assert_eq!(c.classify(Some("application/pdf")), Folder::File);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let c = classifier();
        assert_eq!(c.classify(Some("IMAGE/PNG")), Folder::Image);
        assert_eq!(c.classify(Some("Video/Mp4")), Folder::Video);
    }

    #[test]
    fn test_classify_defaults_to_file() {
        let c = classifier();
        assert_eq!(c.classify(None), Folder::File);
        assert_eq!(c.classify(Some("")), Folder::File);
        assert_eq!(c.classify(Some("application/x-unheard-of")), Folder::File);
    }

    #[test]
    fn test_every_configured_type_maps_to_its_category() {
        let policy = MimePolicy::default();
        let c = MimeClassifier::new(&policy);
        for t in &policy.image {
            assert_eq!(c.classify(Some(t)), Folder::Image, "{}", t);
        }
        for t in &policy.video {
            assert_eq!(c.classify(Some(t)), Folder::Video, "{}", t);
        }
        for t in &policy.audio {
            assert_eq!(c.classify(Some(t)), Folder::Audio, "{}", t);
        }
        for t in &policy.document {
            assert_eq!(c.classify(Some(t)), Folder::File, "{}", t);
        }
    }

    #[test]
    fn test_is_allowed_union() {
        let c = classifier();
        assert!(c.is_allowed("image/png"));
        assert!(c.is_allowed("application/pdf"));
        assert!(c.is_allowed("APPLICATION/PDF"));
        assert!(!c.is_allowed("application/x-malware"));
    }
}
