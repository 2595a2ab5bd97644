const INSTRUCTION: &str = "You are given a quiz question with multiple-choice options. Provide ONLY the exact text of the best option. Do not add explanation.";
const NO_OPTIONS_HINT: &str = "(No structured options detected; if the selection includes options inline, pick the snippet that best answers.)";

/// Build the single prompt sent to every provider.
///
/// Options are relabelled A, B, C, ... in list order regardless of the
/// labels they had in the selection. The question is inserted verbatim.
pub fn build_prompt(question: &str, options: &[String]) -> String {
    let mut prompt = String::from(INSTRUCTION);

    if options.is_empty() {
        prompt.push('\n');
        prompt.push_str(NO_OPTIONS_HINT);
    } else {
        prompt.push_str("\nOptions:");
        for (i, option) in options.iter().enumerate() {
            prompt.push('\n');
            prompt.push(option_letter(i));
            prompt.push_str(". ");
            prompt.push_str(option);
        }
    }

    prompt.push_str("\nQuestion/Context:\n");
    prompt.push_str(question);
    prompt.push_str("\nAnswer:");
    prompt
}

/// `0 -> 'A'`, `1 -> 'B'`, ...
fn option_letter(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| char::from_u32('A' as u32 + i))
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prompt_with_options() {
        let prompt = build_prompt("Capital of France?", &opts(&["Paris", "London"]));

        assert!(prompt.contains("A. Paris"));
        assert!(prompt.contains("B. London"));
        assert!(prompt.ends_with("Capital of France?\nAnswer:"));
        assert_eq!(
            prompt,
            format!(
                "{INSTRUCTION}\nOptions:\nA. Paris\nB. London\nQuestion/Context:\nCapital of France?\nAnswer:"
            )
        );
    }

    #[test]
    fn test_prompt_without_options() {
        let prompt = build_prompt("Which is heavier?", &[]);

        assert!(!prompt.contains("Options:"));
        assert_eq!(
            prompt,
            format!("{INSTRUCTION}\n{NO_OPTIONS_HINT}\nQuestion/Context:\nWhich is heavier?\nAnswer:")
        );
    }

    #[test]
    fn test_question_is_verbatim() {
        let question = "  Line one\nA) not relabelled\n";
        let prompt = build_prompt(question, &opts(&["x"]));
        assert!(prompt.contains("Question/Context:\n  Line one\nA) not relabelled\n\nAnswer:"));
    }

    #[test]
    fn test_letters_continue_past_d() {
        let options = opts(&["1", "2", "3", "4", "5", "6"]);
        let prompt = build_prompt("q", &options);
        assert!(prompt.contains("\nE. 5\nF. 6\n"));
    }
}
