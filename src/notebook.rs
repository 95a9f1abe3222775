use serde::{Deserialize, Serialize};

use crate::id_generator::define_id;
use crate::page::{Background, Page, PageId};

define_id!(
    /// Identifier of a notebook in the library.
    NotebookId
);

pub const UNTITLED_NOTEBOOK: &str = "Untitled Notebook";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: NotebookId,
    pub title: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Notebook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NotebookId::new(),
            title: title.into(),
            is_favorite: false,
            tags: Vec::new(),
            pages: vec![Page::new(page_title(0))],
        }
    }

    /// Appends a blank white portrait page named after its position.
    pub fn add_page(&mut self) -> &Page {
        let index = self.pages.len();
        self.pages.push(Page::new(page_title(index)));
        &self.pages[index]
    }

    pub fn page_index(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|p| &p.id == id)
    }
}

fn page_title(index: usize) -> String {
    format!("Page {}", index + 1)
}

/// Data shown on first launch, or when stored data cannot be read.
pub fn seed_notebooks() -> Vec<Notebook> {
    vec![
        Notebook {
            id: NotebookId::from("1"),
            title: "Anatomy & Physiology".into(),
            is_favorite: true,
            tags: vec!["medical".into(), "study".into()],
            pages: vec![Page::with_id(
                PageId::from("p1"),
                "The Skeletal System",
                Background::Paper,
            )],
        },
        Notebook {
            id: NotebookId::from("2"),
            title: "Organic Chemistry".into(),
            is_favorite: false,
            tags: vec!["science".into()],
            pages: vec![Page::with_id(PageId::from("p2"), "Hydrocarbons", Background::Grid)],
        },
    ]
}

/// Position of a page inside the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    pub notebook: usize,
    pub page: usize,
}

/// All notebooks, with one page checked out to the canvas at a time.
///
/// A checked-out page is represented in the library by a shell carrying only
/// its id, title and background; `checkin` puts the live page back in the slot
/// with the same id.
#[derive(Debug, Clone, Default)]
pub struct Library {
    notebooks: Vec<Notebook>,
    checked_out: Option<PageRef>,
}

impl Library {
    pub fn new(notebooks: Vec<Notebook>) -> Self {
        Self {
            notebooks,
            checked_out: None,
        }
    }

    pub fn notebooks(&self) -> &[Notebook] {
        &self.notebooks
    }

    pub fn notebook(&self, index: usize) -> Option<&Notebook> {
        self.notebooks.get(index)
    }

    pub fn page(&self, at: PageRef) -> Option<&Page> {
        self.notebooks.get(at.notebook)?.pages.get(at.page)
    }

    pub fn checked_out(&self) -> Option<PageRef> {
        self.checked_out
    }

    /// Take a page out for editing. Returns None for an unknown slot or the
    /// page that is already out.
    pub fn checkout(&mut self, at: PageRef) -> Option<Page> {
        if self.checked_out == Some(at) {
            return None;
        }
        let slot = self.notebooks.get_mut(at.notebook)?.pages.get_mut(at.page)?;
        let shell = Page::with_id(slot.id.clone(), slot.title.clone(), slot.background);
        let page = std::mem::replace(slot, shell);
        self.checked_out = Some(at);
        Some(page)
    }

    /// Return a page taken by `checkout` to the slot with its id.
    pub fn checkin(&mut self, page: Page) -> bool {
        let Some(at) = self.locate(&page.id) else {
            log::error!("Page {} has no slot in the library", page.id);
            return false;
        };
        if self.checked_out == Some(at) {
            self.checked_out = None;
        }
        self.notebooks[at.notebook].pages[at.page] = page;
        true
    }

    pub fn locate(&self, id: &PageId) -> Option<PageRef> {
        self.notebooks.iter().enumerate().find_map(|(notebook, nb)| {
            nb.page_index(id).map(|page| PageRef { notebook, page })
        })
    }

    /// Notebooks with `live` written into its slot, for saving.
    pub fn snapshot(&self, live: &Page) -> Vec<Notebook> {
        let mut notebooks = self.notebooks.clone();
        if let Some(at) = self.locate(&live.id) {
            notebooks[at.notebook].pages[at.page] = live.clone();
        }
        notebooks
    }

    pub fn add_page(&mut self, notebook: usize) -> Option<PageRef> {
        let nb = self.notebooks.get_mut(notebook)?;
        nb.add_page();
        Some(PageRef {
            notebook,
            page: nb.pages.len() - 1,
        })
    }

    /// Appends an untitled notebook and returns a reference to its first page.
    pub fn new_notebook(&mut self) -> PageRef {
        self.notebooks.push(Notebook::new(UNTITLED_NOTEBOOK));
        PageRef {
            notebook: self.notebooks.len() - 1,
            page: 0,
        }
    }

    pub fn toggle_favorite(&mut self, notebook: usize) -> Option<bool> {
        let nb = self.notebooks.get_mut(notebook)?;
        nb.is_favorite = !nb.is_favorite;
        Some(nb.is_favorite)
    }

    pub fn rename_notebook(&mut self, notebook: usize, title: impl Into<String>) -> bool {
        match self.notebooks.get_mut(notebook) {
            Some(nb) => {
                nb.title = title.into();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::page::Orientation;

    #[test]
    fn test_seed_contents() {
        let seed = seed_notebooks();
        assert_eq!(seed.len(), 2);
        assert!(seed[0].is_favorite);
        assert_eq!(seed[0].pages[0].background, Background::Paper);
        assert_eq!(seed[1].pages[0].title, "Hydrocarbons");
    }

    #[test]
    fn test_add_page_numbering() {
        let mut notebook = Notebook::new("Bio");
        let page = notebook.add_page();
        assert_eq!(page.title, "Page 2");
        assert_eq!(page.background, Background::White);
        assert_eq!(page.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_checkout_checkin_round_trip() {
        let mut library = Library::new(seed_notebooks());
        let at = PageRef { notebook: 0, page: 0 };
        let page = library.checkout(at).unwrap();
        assert!(library.checkout(at).is_none());
        assert_eq!(library.page(at).unwrap().id, page.id);

        let edited = page.apply(&Command::Rename("Bones".into()));
        assert_eq!(library.snapshot(&edited)[0].pages[0].title, "Bones");

        assert!(library.checkin(edited));
        assert_eq!(library.notebooks()[0].pages[0].title, "Bones");
        assert!(library.checked_out().is_none());
    }

    #[test]
    fn test_switching_pages() {
        let mut library = Library::new(seed_notebooks());
        let first = PageRef { notebook: 0, page: 0 };
        let second = PageRef { notebook: 1, page: 0 };
        let live = library.checkout(first).unwrap().apply(&Command::ClearPage);

        let next = library.checkout(second).unwrap();
        assert!(library.checkin(live));
        assert_eq!(library.checked_out(), Some(second));
        assert_eq!(next.title, "Hydrocarbons");
        assert!(library.checkout(PageRef { notebook: 5, page: 0 }).is_none());
    }

    #[test]
    fn test_new_notebook_has_first_page() {
        let mut library = Library::new(Vec::new());
        let at = library.new_notebook();
        let notebook = library.notebook(at.notebook).unwrap();
        assert_eq!(notebook.title, UNTITLED_NOTEBOOK);
        assert_eq!(notebook.pages[0].title, "Page 1");
    }

    #[test]
    fn test_rename_notebook_keeps_pages() {
        let mut library = Library::new(seed_notebooks());
        assert!(library.rename_notebook(1, "Organic Chem II"));
        let notebook = library.notebook(1).unwrap();
        assert_eq!(notebook.title, "Organic Chem II");
        assert_eq!(notebook.pages[0].title, "Hydrocarbons");
        assert!(!library.rename_notebook(7, "Nowhere"));
    }

    #[test]
    fn test_toggle_favorite() {
        let mut library = Library::new(seed_notebooks());
        assert_eq!(library.toggle_favorite(1), Some(true));
        assert_eq!(library.toggle_favorite(9), None);
    }
}
