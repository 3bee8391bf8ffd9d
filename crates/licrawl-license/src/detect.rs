//! License file discovery and scoring.

use std::collections::BTreeMap;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use licrawl_util::errors::LicrawlError;
use regex::Regex;

use crate::filer::Filer;
use crate::normalize::normalize;
use crate::templates::{LicenseTemplate, TemplateSet};

/// Template matches below this confidence are discarded.
pub const MIN_CONFIDENCE: f32 = 0.75;

/// Confidence assigned to a license merely named in a README.
pub const README_CONFIDENCE: f32 = 0.5;

/// How far into a file a license text may start (e.g. after a title line).
const MAX_LEADING_WORDS: usize = 32;

const LICENSE_FILE_PATTERNS: &[&str] = &[
    "LICENSE*",
    "LICENCE*",
    "COPYING*",
    "UNLICENSE*",
    "COPYRIGHT*",
    "MIT-LICENSE*",
    "*.LICENSE",
];

const README_FILE_PATTERNS: &[&str] = &["README*"];

/// License names recognised in README prose.
const README_NAMES: &[(&str, &str)] = &[
    (r"\bMIT\s+licen[cs]e", "MIT"),
    (r"\bApache\s+licen[cs]e,?\s+(version\s+)?2\.0\b", "Apache-2.0"),
    (r"\bApache[\s-]2\.0\b", "Apache-2.0"),
    (r"\bBSD[\s-]3[\s-]clause\b", "BSD-3-Clause"),
    (r"\bBSD[\s-]2[\s-]clause\b", "BSD-2-Clause"),
    (r"\bISC\s+licen[cs]e", "ISC"),
    (r"\bMozilla\s+Public\s+Licen[cs]e,?\s+(version\s+)?2\.0\b", "MPL-2.0"),
    (r"\bMPL[\s-]2\.0\b", "MPL-2.0"),
    (r"\bLGPL[\s-]?v?3\b", "LGPL-3.0"),
    (r"\bGPL[\s-]?v?3\b", "GPL-3.0"),
    (r"\bGPL[\s-]?v?2\b", "GPL-2.0"),
    (r"\bunlicense\b", "Unlicense"),
];

/// Scores the files of a tree against the built-in license templates.
pub struct LicenseDetector {
    templates: TemplateSet,
    license_files: GlobSet,
    readme_files: GlobSet,
    spdx: Regex,
    readme_names: Vec<(Regex, &'static str)>,
}

impl LicenseDetector {
    pub fn new() -> miette::Result<Self> {
        let readme_names = README_NAMES
            .iter()
            .map(|(pattern, id)| Ok((compile_regex(&format!("(?i){pattern}"))?, *id)))
            .collect::<Result<Vec<_>, LicrawlError>>()?;

        Ok(Self {
            templates: TemplateSet::builtin(),
            license_files: compile_globset(LICENSE_FILE_PATTERNS)?,
            readme_files: compile_globset(README_FILE_PATTERNS)?,
            spdx: compile_regex(r"SPDX-License-Identifier:\s*([A-Za-z0-9.+-]+)")?,
            readme_names,
        })
    }

    /// Candidate licenses of a tree, keyed by SPDX identifier.
    ///
    /// The highest confidence per identifier is kept. A tree without any
    /// recognisable license yields an error rather than an empty map.
    pub fn detect(&self, filer: &dyn Filer) -> Result<BTreeMap<String, f32>, LicrawlError> {
        let files = filer.root_files()?;
        let license_files: Vec<&String> = files
            .iter()
            .filter(|name| self.license_files.is_match(name.as_str()))
            .collect();

        let mut matches = BTreeMap::new();
        for name in &license_files {
            let text = String::from_utf8_lossy(&filer.read_file(name)?).into_owned();
            for (id, confidence) in self.score_text(&text) {
                tracing::debug!("{}: {name} matches {id} ({confidence:.3})", filer.describe());
                insert_max(&mut matches, id, confidence);
            }
        }

        if matches.is_empty() {
            for name in files.iter().filter(|n| self.readme_files.is_match(n.as_str())) {
                let text = String::from_utf8_lossy(&filer.read_file(name)?).into_owned();
                for (re, id) in &self.readme_names {
                    if re.is_match(&text) {
                        insert_max(&mut matches, id, README_CONFIDENCE);
                    }
                }
            }
        }

        if matches.is_empty() {
            return Err(LicrawlError::License {
                message: "no license file was found".to_string(),
            });
        }
        Ok(matches)
    }

    /// Scores one license file's text.
    pub fn score_text(&self, text: &str) -> Vec<(&'static str, f32)> {
        if let Some(caps) = self.spdx.captures(text) {
            if let Some(id) = self.template_id(&caps[1]) {
                return vec![(id, 1.0)];
            }
        }

        let words = normalize(text);
        self.templates
            .iter()
            .map(|template| (template.id, score_template(&words, template)))
            .filter(|(_, confidence)| *confidence >= MIN_CONFIDENCE)
            .collect()
    }

    /// Map an SPDX tag onto a known identifier, tolerating case and the
    /// `-only` / `-or-later` suffixes.
    fn template_id(&self, tag: &str) -> Option<&'static str> {
        let base = tag
            .trim_end_matches("-only")
            .trim_end_matches("-or-later")
            .trim_end_matches('+');
        self.templates
            .ids()
            .into_iter()
            .find(|id| id.eq_ignore_ascii_case(base))
    }
}

/// The single best candidate: strictly higher confidence wins, so equal
/// scores resolve to the lexicographically smallest identifier.
pub fn pick_best(matches: &BTreeMap<String, f32>) -> Option<(&str, f32)> {
    let mut best: Option<(&str, f32)> = None;
    for (id, &confidence) in matches {
        if best.map_or(true, |(_, top)| confidence > top) {
            best = Some((id.as_str(), confidence));
        }
    }
    best
}

fn insert_max(matches: &mut BTreeMap<String, f32>, id: &str, confidence: f32) {
    let entry = matches.entry(id.to_string()).or_insert(confidence);
    if confidence > *entry {
        *entry = confidence;
    }
}

/// Word-level similarity of a text against a template.
///
/// Compares a template-sized window of the text with the template, trying
/// window starts among the first words where the template's first word occurs.
fn score_template(words: &[String], template: &LicenseTemplate) -> f32 {
    let expected = &template.words;
    let Some(first) = expected.first() else {
        return 0.0;
    };

    let mut starts = vec![0];
    starts.extend(
        words
            .iter()
            .take(MAX_LEADING_WORDS)
            .enumerate()
            .skip(1)
            .filter(|(_, w)| *w == first)
            .map(|(i, _)| i),
    );

    starts
        .into_iter()
        .map(|start| {
            let end = (start + expected.len()).min(words.len());
            let window = words[start..end].to_vec();
            let longest = window.len().max(expected.len());
            let distance = strsim::generic_levenshtein(&window, expected);
            1.0 - distance as f32 / longest as f32
        })
        .fold(0.0, f32::max)
}

fn compile_globset(patterns: &[&str]) -> Result<GlobSet, LicrawlError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|e| LicrawlError::License {
                message: format!("invalid license file pattern {pattern:?}: {e}"),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| LicrawlError::License {
        message: format!("Failed to build license file patterns: {e}"),
    })
}

fn compile_regex(pattern: &str) -> Result<Regex, LicrawlError> {
    Regex::new(pattern).map_err(|e| LicrawlError::License {
        message: format!("invalid pattern {pattern:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_best_prefers_higher_confidence() {
        let mut matches = BTreeMap::new();
        matches.insert("MIT".to_string(), 0.9);
        matches.insert("Apache-2.0".to_string(), 0.95);
        assert_eq!(pick_best(&matches), Some(("Apache-2.0", 0.95)));
    }

    #[test]
    fn pick_best_ties_resolve_lexicographically() {
        let mut matches = BTreeMap::new();
        matches.insert("MIT".to_string(), 0.8);
        matches.insert("ISC".to_string(), 0.8);
        matches.insert("Zlib".to_string(), 0.8);
        assert_eq!(pick_best(&matches), Some(("ISC", 0.8)));
    }

    #[test]
    fn pick_best_of_nothing() {
        assert_eq!(pick_best(&BTreeMap::new()), None);
    }

    #[test]
    fn insert_max_keeps_highest() {
        let mut matches = BTreeMap::new();
        insert_max(&mut matches, "MIT", 0.8);
        insert_max(&mut matches, "MIT", 0.9);
        insert_max(&mut matches, "MIT", 0.7);
        assert_eq!(matches["MIT"], 0.9);
    }

    #[test]
    fn spdx_tag_is_exact() {
        let detector = LicenseDetector::new().unwrap();
        let scores = detector.score_text("// SPDX-License-Identifier: apache-2.0\n");
        assert_eq!(scores, vec![("Apache-2.0", 1.0)]);
        let scores = detector.score_text("SPDX-License-Identifier: GPL-3.0-or-later");
        assert_eq!(scores, vec![("GPL-3.0", 1.0)]);
    }

    #[test]
    fn template_scores_itself_fully() {
        let set = crate::templates::TemplateSet::builtin();
        let mit = set.iter().find(|t| t.id == "MIT").unwrap();
        assert_eq!(score_template(&mit.words, mit), 1.0);

        let mut shifted = vec!["preamble".to_string(), "words".to_string()];
        shifted.extend(mit.words.iter().cloned());
        assert_eq!(score_template(&shifted, mit), 1.0);

        assert_eq!(score_template(&[], mit), 0.0);
    }
}
