use crate::page::PageId;
use crate::quiz::QuizProgress;
use crate::tape::TapeId;
use crate::tools::ToolKind;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolChanged {
        old: ToolKind,
        new: ToolKind,
    },
    GestureChanged {
        old: &'static str,
        new: &'static str,
    },
    SelectionChanged {
        selected: Vec<TapeId>,
    },
    /// A change to the page that should be persisted.
    PageCommitted {
        page_id: PageId,
        command: &'static str,
    },
    QuizStarted {
        page_id: PageId,
        total: usize,
    },
    QuizProgressed(QuizProgress),
    QuizCompleted {
        page_id: PageId,
        total: usize,
    },
    QuizEnded {
        page_id: PageId,
    },
    /// User-visible notice; the page was left unchanged.
    ImportFailed {
        page_id: PageId,
        message: String,
    },
}
