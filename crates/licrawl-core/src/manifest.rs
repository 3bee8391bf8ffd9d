//! `go.mod` parsing: direct requirements and replace directives.

use std::path::Path;

use licrawl_util::errors::LicrawlError;

/// File name of a module manifest inside a project or module-cache directory.
pub const MANIFEST_FILE: &str = "go.mod";

/// The parsed representation of a `go.mod` file.
///
/// Only the parts the crawler needs are kept; `exclude`, `retract` and other
/// directives are recognised and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub module: Option<String>,
    pub go_version: Option<String>,
    pub requires: Vec<Requirement>,
    pub replaces: Vec<Replacement>,
}

/// A `require` line: a direct dependency at a declared version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    /// Marked `// indirect` in the manifest.
    pub indirect: bool,
}

/// A `replace old [oldVersion] => new [newVersion]` directive.
///
/// `new_version` is `None` when the target is a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub old_path: String,
    pub old_version: Option<String>,
    pub new_path: String,
    pub new_version: Option<String>,
}

impl Replacement {
    /// Whether this directive only applies to one declared version of the old path.
    pub fn is_version_specific(&self) -> bool {
        self.old_version.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// The error reported when resolution meets this directive but cannot handle it.
    pub fn unsupported(&self) -> LicrawlError {
        LicrawlError::UnsupportedReplacement {
            old_path: self.old_path.clone(),
            old_version: self.old_version.clone().unwrap_or_default(),
            new_path: self.new_path.clone(),
            new_version: self.new_version.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Require,
    Replace,
    Skipped,
}

impl Manifest {
    /// Parse `go.mod` content. `source` names the file in error messages.
    pub fn parse(content: &str, source: &str) -> miette::Result<Self> {
        let mut manifest = Manifest::default();
        let mut block: Option<Block> = None;
        let mut block_start = 0;

        for (idx, raw) in content.lines().enumerate() {
            let lineno = idx + 1;
            let line = tokenize(raw).map_err(|e| manifest_error(source, lineno, &e))?;
            if line.tokens.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line.tokens.iter().map(String::as_str).collect();

            if let Some(kind) = block {
                match tokens.as_slice() {
                    [")"] => block = None,
                    args => manifest.apply(kind, args, line.indirect, source, lineno)?,
                }
                continue;
            }

            let (verb, args) = (tokens[0], &tokens[1..]);
            if verb == ")" {
                return Err(manifest_error(source, lineno, "unexpected ')'").into());
            }
            let kind = match verb {
                "module" => {
                    manifest.module = Some(single_arg(args, "module", source, lineno)?);
                    continue;
                }
                "go" => {
                    manifest.go_version = Some(single_arg(args, "go", source, lineno)?);
                    continue;
                }
                "require" => Block::Require,
                "replace" => Block::Replace,
                "exclude" | "retract" | "toolchain" | "godebug" | "tool" | "ignore" => {
                    Block::Skipped
                }
                other => {
                    tracing::warn!("{source}:{lineno}: skipping unknown directive {other:?}");
                    Block::Skipped
                }
            };

            match args {
                ["(", ")"] => {}
                ["("] => {
                    block = Some(kind);
                    block_start = lineno;
                }
                args => manifest.apply(kind, args, line.indirect, source, lineno)?,
            }
        }

        if block.is_some() {
            return Err(manifest_error(source, block_start, "unterminated block").into());
        }
        Ok(manifest)
    }

    /// Load and parse a `go.mod` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LicrawlError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Load the manifest inside `dir`, returning `Ok(None)` when it has none.
    ///
    /// A missing manifest is a normal condition for leaf modules; a manifest
    /// that exists but does not parse is an error.
    pub fn load(dir: &Path) -> miette::Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Self::from_path(&path).map(Some)
    }

    /// Reject manifests carrying any version-specific replace directive.
    pub fn validate_replacements(&self) -> Result<(), LicrawlError> {
        match self.replaces.iter().find(|r| r.is_version_specific()) {
            Some(r) => Err(r.unsupported()),
            None => Ok(()),
        }
    }

    fn apply(
        &mut self,
        kind: Block,
        args: &[&str],
        indirect: bool,
        source: &str,
        lineno: usize,
    ) -> miette::Result<()> {
        match kind {
            Block::Require => {
                let [path, version] = args else {
                    return Err(manifest_error(
                        source,
                        lineno,
                        "usage: require module/path v1.2.3",
                    )
                    .into());
                };
                self.requires.push(Requirement {
                    path: path.to_string(),
                    version: version.to_string(),
                    indirect,
                });
            }
            Block::Replace => {
                let replacement = parse_replacement(args).ok_or_else(|| {
                    manifest_error(
                        source,
                        lineno,
                        "usage: replace module/path [v1.2.3] => other/module v1.4 | local/dir",
                    )
                })?;
                self.replaces.push(replacement);
            }
            Block::Skipped => {}
        }
        Ok(())
    }
}

fn parse_replacement(args: &[&str]) -> Option<Replacement> {
    let arrow = args.iter().position(|t| *t == "=>")?;
    let (old, new) = (&args[..arrow], &args[arrow + 1..]);
    let (old_path, old_version) = match old {
        [path] => (path, None),
        [path, version] => (path, Some(version.to_string())),
        _ => return None,
    };
    let (new_path, new_version) = match new {
        [path] => (path, None),
        [path, version] => (path, Some(version.to_string())),
        _ => return None,
    };
    Some(Replacement {
        old_path: old_path.to_string(),
        old_version,
        new_path: new_path.to_string(),
        new_version,
    })
}

fn single_arg(args: &[&str], verb: &str, source: &str, lineno: usize) -> miette::Result<String> {
    match args {
        [value] => Ok(value.to_string()),
        _ => Err(manifest_error(source, lineno, &format!("usage: {verb} <value>")).into()),
    }
}

fn manifest_error(source: &str, lineno: usize, message: &str) -> LicrawlError {
    LicrawlError::Manifest {
        message: format!("{source}:{lineno}: {message}"),
    }
}

/// Tokens of one manifest line plus whether its comment marks it indirect.
struct Line {
    tokens: Vec<String>,
    indirect: bool,
}

/// Split a line into whitespace-separated tokens, honouring `"..."` and
/// `` `...` `` quoting and stopping at a `//` comment.
fn tokenize(raw: &str) -> Result<Line, String> {
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut chars = raw.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if raw[start..].starts_with("//") {
            comment = Some(raw[start + 2..].trim());
            break;
        }
        match c {
            '"' => {
                chars.next();
                let mut token = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some((_, escaped)) => token.push(escaped),
                            None => break,
                        },
                        '"' => {
                            closed = true;
                            break;
                        }
                        other => token.push(other),
                    }
                }
                if !closed {
                    return Err("unterminated quoted string".to_string());
                }
                tokens.push(token);
            }
            '`' => {
                chars.next();
                let rest = &raw[start + 1..];
                let Some(end) = rest.find('`') else {
                    return Err("unterminated raw string".to_string());
                };
                tokens.push(rest[..end].to_string());
                while chars.peek().is_some_and(|&(i, _)| i <= start + 1 + end) {
                    chars.next();
                }
            }
            '(' | ')' => {
                chars.next();
                tokens.push(c.to_string());
            }
            _ => {
                let mut end = raw.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || raw[i..].starts_with("//") {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                tokens.push(raw[start..end].to_string());
            }
        }
    }

    let indirect = comment.is_some_and(|c| c == "indirect" || c.starts_with("indirect;"));
    Ok(Line { tokens, indirect })
}
