use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The kind of code element an annotation is attached to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TargetKind {
    /// No specific element; every annotation type is accepted.
    All,
    Class,
    Method,
    Property,
    /// Nested inside another annotation's arguments.
    Annotation,
}

impl TargetKind {
    pub const VARIANTS: [TargetKind; 5] = [
        TargetKind::All,
        TargetKind::Class,
        TargetKind::Method,
        TargetKind::Property,
        TargetKind::Annotation,
    ];

    fn bits(self) -> u8 {
        match self {
            TargetKind::All => Targets::ALL.0,
            TargetKind::Class => Targets::CLASS.0,
            TargetKind::Method => Targets::METHOD.0,
            TargetKind::Property => Targets::PROPERTY.0,
            TargetKind::Annotation => Targets::ANNOTATION.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::All => "ALL",
            TargetKind::Class => "CLASS",
            TargetKind::Method => "METHOD",
            TargetKind::Property => "PROPERTY",
            TargetKind::Annotation => "ANNOTATION",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a [`TargetKind`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error(
    "Invalid target \"{0}\". Available targets: [ALL, CLASS, METHOD, PROPERTY, ANNOTATION]"
)]
pub struct UnknownTargetError(pub String);

impl FromStr for TargetKind {
    type Err = UnknownTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::VARIANTS
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTargetError(s.to_string()))
    }
}

/// The set of element kinds an annotation type may be declared on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Targets(u8);

impl Targets {
    pub const CLASS: Targets = Targets(1);
    pub const METHOD: Targets = Targets(1 << 1);
    pub const PROPERTY: Targets = Targets(1 << 2);
    pub const ANNOTATION: Targets = Targets(1 << 3);
    pub const ALL: Targets = Targets(0b1111);

    pub const fn empty() -> Self {
        Targets(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, kind: TargetKind) {
        self.0 |= kind.bits();
    }

    pub fn contains(&self, kind: TargetKind) -> bool {
        self.0 & kind.bits() == kind.bits()
    }

    /// Returns `true` if an annotation restricted to these targets may be
    /// used where `kind` is the current target.
    pub fn allows(&self, kind: TargetKind) -> bool {
        self.0 & kind.bits() != 0
    }

    /// Comma-separated names of the targets, or `ALL` when unrestricted.
    pub fn literal(&self) -> String {
        if *self == Targets::ALL {
            return TargetKind::All.as_str().to_string();
        }
        [
            TargetKind::Class,
            TargetKind::Method,
            TargetKind::Property,
            TargetKind::Annotation,
        ]
        .into_iter()
        .filter(|kind| self.contains(*kind))
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl Default for Targets {
    fn default() -> Self {
        Targets::ALL
    }
}

impl From<TargetKind> for Targets {
    fn from(kind: TargetKind) -> Self {
        Targets(kind.bits())
    }
}

impl FromIterator<TargetKind> for Targets {
    fn from_iter<I: IntoIterator<Item = TargetKind>>(iter: I) -> Self {
        let mut targets = Targets::empty();
        for kind in iter {
            targets.insert(kind);
        }
        targets
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}
