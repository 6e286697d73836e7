//! Translation instructions sent to the model.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth**: changing how the model is instructed
//!    (tone, fidelity rules, hint handling) requires editing exactly one place.
//!
//! 2. **Testability**: unit tests can inspect the instructions directly
//!    without a live API call, making prompt regressions easy to catch.

/// Instruction for translating extracted page text.
///
/// The model is told to return only the translation: downstream assembly
/// treats the response as opaque page text, so commentary or preambles would
/// leak into the artifact.
pub fn text_instruction(target_language: &str) -> String {
    format!(
        "Translate the following text into {target_language}. \
         Preserve the meaning and context of the original exactly, and phrase \
         the result as natural {target_language}. \
         Output ONLY the translation, with no commentary and no headings.\n\n\
         Source text:\n"
    )
}

/// Instruction for translating a rendered page image.
///
/// The optional `hint` carries cheaply-extracted page text; models transcribe
/// more faithfully when the image is accompanied by the text they should be
/// seeing, and hallucinate less on low-contrast scans.
pub fn image_instruction(target_language: &str, hint: Option<&str>) -> String {
    let mut prompt = format!(
        "The attached image is one page of a document. Read its full content \
         in natural reading order and translate it into {target_language}. \
         Include text found in figures and tables where it carries meaning. \
         Output ONLY the translated page content, with no commentary."
    );
    if let Some(hint) = hint {
        if !hint.trim().is_empty() {
            prompt.push_str(
                "\n\nFor reference, the machine-extracted text of this page is \
                 given below. Trust the image where they disagree.\n\n",
            );
            prompt.push_str(hint);
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_instruction_names_language() {
        let p = text_instruction("Korean");
        assert!(p.contains("Korean"));
        assert!(p.contains("ONLY the translation"));
    }

    #[test]
    fn image_instruction_includes_hint() {
        let p = image_instruction("Japanese", Some("Chapter 1: Introduction"));
        assert!(p.contains("Japanese"));
        assert!(p.contains("Chapter 1: Introduction"));
    }

    #[test]
    fn image_instruction_skips_blank_hint() {
        let p = image_instruction("Korean", Some("   "));
        assert!(!p.contains("machine-extracted"));
        let q = image_instruction("Korean", None);
        assert!(!q.contains("machine-extracted"));
    }
}
