//! Modal stack for overlays drawn above the dashboard
//!
//! Only the top modal receives key events.

/// What a picker dialog is choosing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPurpose {
    /// District filter of the elevation view
    District,
    /// Snapshot date of the groundwater heatmap
    HeatmapDate,
}

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Keyboard reference
    Help,
    /// Single-choice list
    Picker(PickerPurpose),
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Push `modal`, or pop it if it is already on top
    pub fn toggle(&mut self, modal: Modal) {
        if self.top() == Some(&modal) {
            self.stack.pop();
        } else {
            self.stack.push(modal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::Help);
        stack.push(Modal::QuitConfirm);

        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert_eq!(stack.pop(), Some(Modal::Help));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_modal_stack_toggle() {
        let mut stack = ModalStack::new();
        stack.toggle(Modal::Help);
        assert_eq!(stack.top(), Some(&Modal::Help));

        stack.toggle(Modal::Help);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_toggle_only_pops_matching_top() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Picker(PickerPurpose::District));
        stack.toggle(Modal::Help);
        assert_eq!(stack.top(), Some(&Modal::Help));
        assert_eq!(stack.pop(), Some(Modal::Help));
        assert_eq!(stack.top(), Some(&Modal::Picker(PickerPurpose::District)));
    }
}
