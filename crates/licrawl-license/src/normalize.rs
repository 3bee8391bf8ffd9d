//! Text normalisation shared by license templates and candidate files.

/// Lower-cased word tokens of a license text.
///
/// Copyright and "all rights reserved" lines are dropped since they differ
/// in every copy of a license. Anything that is not an ASCII letter or digit
/// separates words, and British spellings of "licence" are folded.
pub fn normalize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for line in text.lines() {
        let line = line.trim().to_ascii_lowercase();
        if is_notice_line(&line) {
            continue;
        }
        words.extend(
            line.split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|w| !w.is_empty())
                .map(fold_spelling),
        );
    }
    words
}

fn is_notice_line(line: &str) -> bool {
    let line = line.trim_start_matches(|c: char| !c.is_alphanumeric() && c != '(' && c != '©');
    if let Some(rest) = line.strip_prefix("copyright") {
        let rest = rest.trim_start();
        return rest.starts_with("(c)")
            || rest.starts_with('©')
            || rest.starts_with(|c: char| c.is_ascii_digit());
    }
    line.starts_with("(c) ") || line.starts_with('©') || line.starts_with("all rights reserved")
}

fn fold_spelling(word: &str) -> String {
    match word {
        "licence" => "license".to_string(),
        "licences" => "licenses".to_string(),
        "licenced" => "licensed".to_string(),
        other => other.to_string(),
    }
}
