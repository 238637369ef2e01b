//! A fix: one or more edits applied together, tagged with how safe they are.

use get_size2::GetSize;
use quell_text_size::{Ranged, TextSize};

use crate::edit::Edit;

/// How confidently a fix can be applied without changing program behavior.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, GetSize, is_macro::Is)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Applicability {
    /// The fix may change meaning or remove information; apply only when
    /// explicitly requested.
    Unsafe,
    /// The fix preserves meaning and can be applied unconditionally.
    Safe,
}

/// A batch of edits that together resolve one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, GetSize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    /// The edits, sorted by start position.
    edits: Vec<Edit>,
    applicability: Applicability,
}

impl Fix {
    /// A safe fix from a single edit.
    pub fn safe_edit(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            applicability: Applicability::Safe,
        }
    }

    /// A safe fix from several edits.
    pub fn safe_edits(edit: Edit, rest: impl IntoIterator<Item = Edit>) -> Self {
        let mut edits: Vec<Edit> = std::iter::once(edit).chain(rest).collect();
        edits.sort_by_key(|edit| (edit.start(), edit.end()));
        Self {
            edits,
            applicability: Applicability::Safe,
        }
    }

    /// An unsafe fix from a single edit.
    pub fn unsafe_edit(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            applicability: Applicability::Unsafe,
        }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn applicability(&self) -> Applicability {
        self.applicability
    }

    /// Whether this fix may be applied under the given applicability bar.
    pub fn applies(&self, bar: Applicability) -> bool {
        self.applicability >= bar
    }

    /// The smallest start offset of any edit.
    pub fn min_start(&self) -> Option<TextSize> {
        self.edits.iter().map(Ranged::start).min()
    }
}
