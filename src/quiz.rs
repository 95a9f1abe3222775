use crate::page::Page;

/// Revealed strips out of all strips on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizProgress {
    pub current: usize,
    pub total: usize,
}

impl QuizProgress {
    pub fn of(page: &Page) -> Self {
        Self {
            current: page.revealed_count(),
            total: page.tapes().len(),
        }
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f32 / self.total as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current == self.total
    }
}

/// Tracks one self-quiz session over the active page.
///
/// Progress is always derived from the page. Completion is edge-triggered:
/// `observe` reports it the first time the page is fully revealed and never
/// again until the next `start`.
#[derive(Debug, Clone, Default)]
pub struct QuizTracker {
    active: bool,
    completed: bool,
    started_with: usize,
    progress: QuizProgress,
}

impl QuizTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a session. The caller hides every strip first; `page` is the
    /// already-hidden snapshot. Refuses pages without tape.
    pub fn start(&mut self, page: &Page) -> bool {
        if page.tapes().is_empty() {
            return false;
        }
        self.active = true;
        self.completed = false;
        self.started_with = page.tapes().len();
        self.progress = QuizProgress::of(page);
        true
    }

    /// Recomputes progress. Returns true exactly once per session, when the
    /// page first becomes fully revealed.
    pub fn observe(&mut self, page: &Page) -> bool {
        if !self.active {
            return false;
        }
        self.progress = QuizProgress::of(page);
        if self.progress.is_complete() && !self.completed {
            self.completed = true;
            return true;
        }
        false
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn progress(&self) -> QuizProgress {
        self.progress
    }

    /// Strip count recorded when the session started.
    pub fn started_with(&self) -> usize {
        self.started_with
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::tape::{TapeColor, TapeStrip};
    use egui::pos2;

    fn page_with_tapes(n: usize) -> Page {
        let mut page = Page::new("Quiz");
        for i in 0..n {
            page.tapes.push(TapeStrip::new(pos2(0.0, i as f32 * 50.0), 100.0, 40.0, TapeColor::Yellow));
        }
        page
    }

    #[test]
    fn test_refuses_empty_page() {
        let mut quiz = QuizTracker::new();
        assert!(!quiz.start(&Page::new("Empty")));
        assert!(!quiz.is_active());
    }

    #[test]
    fn test_completion_fires_once() {
        let mut page = page_with_tapes(3);
        let mut quiz = QuizTracker::new();
        assert!(quiz.start(&page));
        assert_eq!(quiz.started_with(), 3);

        let ids: Vec<_> = page.tapes().iter().map(|t| t.id.clone()).collect();
        let mut fired = 0;
        for id in &ids {
            page = page.apply(&Command::ToggleReveal(id.clone()));
            if quiz.observe(&page) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(quiz.progress(), QuizProgress { current: 3, total: 3 });

        page = page.apply(&Command::ToggleReveal(ids[0].clone()));
        assert!(!quiz.observe(&page));
        page = page.apply(&Command::ToggleReveal(ids[0].clone()));
        assert!(!quiz.observe(&page));
        assert!(quiz.is_completed());
    }

    #[test]
    fn test_restart_rearms_completion() {
        let mut page = page_with_tapes(1);
        let id = page.tapes()[0].id.clone();
        let mut quiz = QuizTracker::new();
        quiz.start(&page);
        page = page.apply(&Command::ToggleReveal(id.clone()));
        assert!(quiz.observe(&page));

        page = page.apply(&Command::SetAllRevealed(false));
        quiz.start(&page);
        page = page.apply(&Command::ToggleReveal(id));
        assert!(quiz.observe(&page));
    }

    #[test]
    fn test_fraction() {
        assert_eq!(QuizProgress { current: 1, total: 4 }.fraction(), 0.25);
        assert_eq!(QuizProgress::default().fraction(), 0.0);
    }
}
