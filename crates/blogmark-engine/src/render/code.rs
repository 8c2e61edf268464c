/// Caption and language of a fenced block, derived from its info tag.
///
/// A tag naming a file (`main.rs`) keeps the file name as caption and takes
/// the extension as language. A bare lower-case language name (`html`) is
/// capitalized for the caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeInfo {
    pub caption: String,
    pub language: String,
}

impl CodeInfo {
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if let Some((_, extension)) = tag.rsplit_once('.').filter(|(_, ext)| !ext.is_empty()) {
            return Self {
                caption: tag.to_string(),
                language: extension.to_lowercase(),
            };
        }

        let caption = if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_lowercase()) {
            capitalize(tag)
        } else {
            tag.to_string()
        };

        Self {
            caption,
            language: tag.to_lowercase(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
