//! Run-scoped diagnostics shared by every entry of one conversion run.

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use std::fmt;

use crate::log;

/// Identifies the entry a note belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryLabel {
    /// Publish timestamp as shown in the feed.
    pub published: String,
    pub title: String,
}

impl EntryLabel {
    pub fn new(published: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            published: published.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.published, self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    UnknownElementTag,
    UnresolvableLinkTarget,
    MalformedUrl,
    BlockQuote,
    Table,
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownElementTag => "unknown element",
            Self::UnresolvableLinkTarget => "unresolved post link",
            Self::MalformedUrl => "unparseable link",
            Self::BlockQuote => "blockquote",
            Self::Table => "table",
        })
    }
}

/// One line of the diagnostic log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub kind: NoteKind,
    pub entry: EntryLabel,
    pub detail: String,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.entry)?;
        if !self.detail.is_empty() {
            write!(f, " {}", self.detail)?;
        }
        Ok(())
    }
}

/// Accumulators that outlive a single entry.
///
/// Created at the start of a run and dropped at its end; both collections
/// only ever grow.
#[derive(Debug, Default)]
pub struct RunContext {
    warned_tags: Mutex<FxHashSet<String>>,
    notes: Mutex<Vec<Note>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn about an untranslated tag, once per tag name per run.
    ///
    /// Returns `true` if this was the first sighting.
    pub fn warn_unknown_tag(&self, tag: &str, entry: &EntryLabel) -> bool {
        let first = self.warned_tags.lock().insert(tag.to_owned());
        if first {
            log!("warning"; "unknown element <{}> first seen in \"{}\", kept as raw markup", tag, entry.title);
            self.note(NoteKind::UnknownElementTag, entry, format!("<{tag}>"));
        }
        first
    }

    /// Append a note to the diagnostic log.
    pub fn note(&self, kind: NoteKind, entry: &EntryLabel, detail: impl Into<String>) {
        self.notes.lock().push(Note {
            kind,
            entry: entry.clone(),
            detail: detail.into(),
        });
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().clone()
    }

    pub fn note_count(&self) -> usize {
        self.notes.lock().len()
    }

    /// Diagnostic log contents, one note per line.
    pub fn render_log(&self) -> String {
        self.notes
            .lock()
            .iter()
            .map(|note| format!("{note}\n"))
            .collect()
    }
}
