//! Mock markup source for tests and offline play.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;

use biotrivia_core::error::SourceError;
use biotrivia_core::matcher::target_key;
use biotrivia_core::model::RawMarkup;
use biotrivia_core::traits::MarkupSource;

const CURIE_HTML: &str = r#"<div class="mw-parser-output">
<table class="infobox"><tr><th>Born</th><td>7 November 1867</td></tr></table>
<p><b>Marie Curie</b> was a Polish and naturalised-French physicist and chemist who conducted pioneering research on radioactivity.<sup class="reference">[1]</sup></p>
<div class="mw-heading mw-heading2"><h2 id="Life">Life</h2><span class="mw-editsection">[edit]</span></div>
<p>She was born in Warsaw. She moved to Paris in 1891 to continue her studies.</p>
<h2>Scientific work</h2>
<p>She discovered polonium and radium with Pierre Curie. She won two Nobel Prizes.</p>
<h2>References</h2>
<ol class="references"><li>Biography source</li></ol>
</div>"#;

const LOVELACE_WIKI: &str = "{{Short description|English mathematician}}\n{{Infobox person\n| name = Ada Lovelace\n| birth_date = {{birth date|1815|12|10}}\n}}\n\n'''Augusta Ada King, Countess of Lovelace''' ({{birth date|1815|12|10}} – {{death date|1852|11|27}}) was an English [[mathematician]] and writer.<ref>Toole 1998</ref>\n\nShe is chiefly known for her work on [[Charles Babbage]]'s proposed [[Analytical Engine|mechanical general-purpose computer]].\n\n== Early life ==\nShe was the only legitimate child of the poet Lord Byron.";

const EINSTEIN_HTML: &str = r#"<div class="mw-parser-output">
<p><b>Albert Einstein</b> was a German-born theoretical physicist who developed the theory of relativity.<sup class="reference">[2]</sup></p>
<p>He received the 1921 Nobel Prize in Physics.</p>
<h2>Early life</h2>
<p>He was born in Ulm in 1879. His family moved to Munich soon after.</p>
<h2>See also</h2>
<ul><li>Relativity</li></ul>
</div>"#;

/// A mock markup source serving canned articles keyed by target.
///
/// Targets are looked up by their normalized key, so case, accents and
/// disambiguation suffixes do not matter. Unknown targets fail with
/// [`SourceError::ArticleNotFound`].
pub struct MockSource {
    /// Map of target key to markup.
    articles: HashMap<String, RawMarkup>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last target requested.
    last_target: Mutex<Option<String>>,
}

impl MockSource {
    /// Create a mock source from target name to markup pairs.
    pub fn new(articles: impl IntoIterator<Item = (String, RawMarkup)>) -> Self {
        Self {
            articles: articles
                .into_iter()
                .map(|(name, raw)| (target_key(&name), raw))
                .collect(),
            call_count: AtomicU32::new(0),
            last_target: Mutex::new(None),
        }
    }

    /// A mock with a few built-in articles in both dialects.
    pub fn sample() -> Self {
        Self::new([
            (
                "Marie Curie".to_string(),
                RawMarkup::Structural(CURIE_HTML.to_string()),
            ),
            (
                "Ada Lovelace".to_string(),
                RawMarkup::Legacy(LOVELACE_WIKI.to_string()),
            ),
            (
                "Albert Einstein".to_string(),
                RawMarkup::Structural(EINSTEIN_HTML.to_string()),
            ),
        ])
    }

    /// Load articles from a directory. `<name>.html` files are rendered
    /// markup and `<name>.wiki` files are wikitext; the file stem is the
    /// target name. Other files are ignored.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read article directory {}", dir.display()))?;

        let mut articles = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let make: fn(String) -> RawMarkup =
                match path.extension().and_then(|e| e.to_str()) {
                    Some("html") | Some("htm") => RawMarkup::Structural,
                    Some("wiki") => RawMarkup::Legacy,
                    _ => continue,
                };
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            articles.push((stem.to_string(), make(content)));
        }

        tracing::debug!(count = articles.len(), "loaded mock articles from {}", dir.display());
        Ok(Self::new(articles))
    }

    /// Number of articles served.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last target requested from this source.
    pub fn last_target(&self) -> Option<String> {
        self.last_target
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MarkupSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_raw_markup(&self, target: &str) -> anyhow::Result<RawMarkup> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_target.lock() {
            *last = Some(target.to_string());
        }

        self.articles
            .get(&target_key(target))
            .cloned()
            .ok_or_else(|| SourceError::ArticleNotFound(target.to_string()).into())
    }
}
