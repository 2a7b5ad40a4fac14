use smallvec::SmallVec;

/// How an error note is rendered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocErrorNoteKind {
    /// Extra context. Rendered as `= note: ...`.
    General,
    /// An actionable suggestion. Rendered as `= help: ...`.
    Help,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocErrorNote {
    pub kind: DocErrorNoteKind,
    pub message: String,
}

impl DocErrorNote {
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            kind: DocErrorNoteKind::General,
            message: message.into(),
        }
    }

    pub fn help(message: impl Into<String>) -> Self {
        Self {
            kind: DocErrorNoteKind::Help,
            message: message.into(),
        }
    }
}

/// Most errors carry zero to two notes.
pub type DocErrorNotes = SmallVec<[DocErrorNote; 2]>;
