//! "Go to page" dialog state.

/// Digit-only page input with 1-based validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageJumpDialog {
    visible: bool,
    input: String,
}

impl PageJumpDialog {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Hides the dialog and clears its input.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.input.clear();
    }

    /// Replaces the input, keeping ASCII digits only.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.chars().filter(char::is_ascii_digit).collect();
    }

    /// Returns the 0-based target when the input is a page in `1..=total_pages`.
    pub fn target_page(&self, total_pages: u32) -> Option<u32> {
        let page = self.input.parse::<u32>().ok()?;
        if (1..=total_pages).contains(&page) {
            Some(page - 1)
        } else {
            None
        }
    }
}
