//! Reference license texts compiled into the binary via `include_str!`.

use crate::normalize::normalize;

/// A normalised reference text for one license identifier.
#[derive(Debug, Clone)]
pub struct LicenseTemplate {
    /// SPDX identifier.
    pub id: &'static str,
    pub words: Vec<String>,
}

/// Registry of all built-in license templates.
///
/// An identifier may have several templates (e.g. the full Apache text and
/// its short per-file notice).
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: Vec<LicenseTemplate>,
}

impl TemplateSet {
    /// Build the registry from all embedded texts.
    pub fn builtin() -> Self {
        let raw_templates: Vec<(&'static str, &'static str)> = vec![
            ("MIT", include_str!("../templates/MIT.txt")),
            ("ISC", include_str!("../templates/ISC.txt")),
            ("BSD-2-Clause", include_str!("../templates/BSD-2-Clause.txt")),
            ("BSD-3-Clause", include_str!("../templates/BSD-3-Clause.txt")),
            ("Apache-2.0", include_str!("../templates/Apache-2.0.txt")),
            ("Apache-2.0", include_str!("../templates/Apache-2.0-notice.txt")),
            ("MPL-2.0", include_str!("../templates/MPL-2.0.txt")),
            ("GPL-2.0", include_str!("../templates/GPL-2.0.txt")),
            ("GPL-3.0", include_str!("../templates/GPL-3.0.txt")),
            ("LGPL-3.0", include_str!("../templates/LGPL-3.0.txt")),
            ("Unlicense", include_str!("../templates/Unlicense.txt")),
            ("Zlib", include_str!("../templates/Zlib.txt")),
        ];

        let templates = raw_templates
            .into_iter()
            .map(|(id, text)| LicenseTemplate {
                id,
                words: normalize(text),
            })
            .collect();
        Self { templates }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LicenseTemplate> {
        self.templates.iter()
    }

    /// Distinct identifiers, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.templates.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
