//! Source scanning for the layering rules.
//!
//! The crate's `src/` tree is read once into a [`SourceTree`]; rules are
//! plain data ([`LayerRule`], [`Confinement`]) checked against it.

use std::fmt;
use std::fs;
use std::path::Path;

/// One source line that broke a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub file: String,
    pub line: usize,
    pub text: String,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.text.trim())
    }
}

/// Imports a layer must never mention.
pub struct LayerRule {
    pub layer: &'static str,
    pub forbidden: &'static [&'static str],
}

/// Constructors that may only appear in the listed files.
pub struct Confinement {
    pub needles: &'static [&'static str],
    pub allowed_in: &'static [&'static str],
}

struct SourceFile {
    /// Path relative to the manifest directory, `/`-separated.
    path: String,
    text: String,
}

/// Every `.rs` file under `src/`, sorted by path.
pub struct SourceTree {
    files: Vec<SourceFile>,
}

impl SourceTree {
    pub fn load() -> Self {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let mut files = Vec::new();
        walk(root, &root.join("src"), &mut files);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self { files }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    pub fn text(&self, path: &str) -> &str {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.text.as_str())
            .unwrap_or_else(|| panic!("{path} is not part of the source tree"))
    }

    /// Lines under `prefix` mentioning any of `needles`.
    pub fn mentions(&self, prefix: &str, needles: &[&str]) -> Vec<Hit> {
        self.lines_under(prefix)
            .filter(|(_, _, text)| needles.iter().any(|n| text.contains(n)))
            .map(hit)
            .collect()
    }

    pub fn check_layer(&self, rule: &LayerRule) -> Vec<Hit> {
        self.mentions(rule.layer, rule.forbidden)
    }

    pub fn check_confinement(&self, rule: &Confinement) -> Vec<Hit> {
        self.mentions("src/", rule.needles)
            .into_iter()
            .filter(|h| !rule.allowed_in.contains(&h.file.as_str()))
            .collect()
    }

    /// Lines in `mod.rs` files that do more than declare or re-export.
    pub fn mod_file_logic(&self) -> Vec<Hit> {
        self.files
            .iter()
            .filter(|f| f.path.ends_with("/mod.rs"))
            .flat_map(numbered)
            .filter(|(_, _, text)| !is_export_line(text.trim()))
            .map(hit)
            .collect()
    }

    fn lines_under<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, usize, &'a str)> + 'a {
        self.files
            .iter()
            .filter(move |f| f.path.starts_with(prefix))
            .flat_map(numbered)
    }
}

fn numbered(file: &SourceFile) -> impl Iterator<Item = (&str, usize, &str)> {
    file.text
        .lines()
        .enumerate()
        .map(move |(idx, text)| (file.path.as_str(), idx + 1, text))
}

fn hit((file, line, text): (&str, usize, &str)) -> Hit {
    Hit {
        file: file.to_string(),
        line,
        text: text.to_string(),
    }
}

fn is_export_line(line: &str) -> bool {
    line.is_empty()
        || ["//", "pub mod ", "pub use ", "mod ", "#[cfg"]
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<SourceFile>) {
    let entries = fs::read_dir(dir).unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()));
    for entry in entries {
        let path = entry.expect("directory entry").path();
        if path.is_dir() {
            walk(root, &path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let text = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
            let relative = path.strip_prefix(root).unwrap_or(&path);
            out.push(SourceFile {
                path: relative.to_string_lossy().replace('\\', "/"),
                text,
            });
        }
    }
}

/// Render hits one per line for assertion messages.
pub fn report(hits: &[Hit]) -> String {
    hits.iter().map(|h| format!("\n  {h}")).collect()
}
