/// A plain text run, the smallest text-bearing unit inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Tracked-revision metadata and the text it wraps.
///
/// Serialized as `w:ins` or `w:del` depending on the owning [`Node`] variant.
/// Word requires `id` to be unique per document; `author` and `date` are the
/// provenance shown in the Review pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: u32,
    pub author: String,
    pub date: String,
    pub text: String,
}

/// A child node of a paragraph's run list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Ordinary visible text.
    Run(Run),
    /// Tracked insertion wrapping newly added text.
    Insertion(Revision),
    /// Tracked deletion wrapping the removed text.
    Deletion(Revision),
}

impl Node {
    pub fn run(text: impl Into<String>) -> Self {
        Node::Run(Run::new(text))
    }

    /// Text this node contributes to the paragraph's searchable surface.
    ///
    /// Only plain runs count: text inside existing insertion or deletion
    /// markup is not a valid anchor for further changes.
    pub fn visible_text(&self) -> Option<&str> {
        match self {
            Node::Run(run) => Some(&run.text),
            Node::Insertion(_) | Node::Deletion(_) => None,
        }
    }
}
