use anyhow::{Context, Result};
use related::doc::{FrontMatter, RawDocument};
use related::store::DocumentStore;
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

/// Markdown articles on disk: one `<id>.md` per document, `---`-fenced YAML
/// front matter ahead of the body. The file stem is the stable document id.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.md"))
    }
}

impl DocumentStore for FsStore {
    fn load_all(&self) -> Result<Vec<RawDocument>> {
        let mut docs = Vec::new();
        let walker = WalkDir::new(&self.root).max_depth(1).sort_by_file_name();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("md") {
                continue;
            }
            let id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let (front, body) = parse_front_matter(&text)
                .with_context(|| format!("parsing front matter in {}", path.display()))?;
            docs.push(RawDocument { id, front, body });
        }
        tracing::debug!(num_docs = docs.len(), root = %self.root.display(), "loaded articles");
        Ok(docs)
    }

    fn write(&self, doc: &RawDocument) -> Result<()> {
        let path = self.path_for(&doc.id);
        let text = serialize_front_matter(&doc.front, &doc.body)?;
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Split `---`-fenced YAML front matter from the body. A file without a
/// well-formed fence is treated as all body with empty front matter.
pub fn parse_front_matter(text: &str) -> Result<(FrontMatter, String)> {
    let Some(rest) = text.strip_prefix("---\n") else {
        return Ok((FrontMatter::default(), text.to_string()));
    };
    let Some(end) = rest.find("\n---\n") else {
        return Ok((FrontMatter::default(), text.to_string()));
    };
    let raw = &rest[..end];
    let front: FrontMatter = if raw.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(raw)?
    };
    let body = rest[end + "\n---\n".len()..].to_string();
    Ok((front, body))
}

/// Inverse of `parse_front_matter`: fenced YAML, then the body verbatim.
pub fn serialize_front_matter(front: &FrontMatter, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(front)?;
    Ok(format!("---\n{yaml}---\n{body}"))
}
