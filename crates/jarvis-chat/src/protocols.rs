/// A labelled shortcut that submits a fixed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub command: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 6] = [
    QuickAction { label: "YOUTUBE", command: "OPEN YOUTUBE" },
    QuickAction { label: "STARK_SRCH", command: "SEARCH STARK INDUSTRIES" },
    QuickAction { label: "GITHUB", command: "OPEN GITHUB" },
    QuickAction { label: "MEASURE", command: "OPEN TOOL" },
    QuickAction { label: "TIME", command: "TIME PROTOCOL" },
    QuickAction { label: "HELLO", command: "HI JARVIS" },
];

impl QuickAction {
    /// Case-insensitive lookup by label.
    pub fn find(label: &str) -> Option<&'static QuickAction> {
        let label = label.trim();
        QUICK_ACTIONS
            .iter()
            .find(|a| a.label.eq_ignore_ascii_case(label))
    }
}
