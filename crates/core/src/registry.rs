//! The component registry: the closed set of library components a plan may
//! reference and the layout topologies a plan may request.
//!
//! Pure data. The visual library behind these names is fixed; plans can
//! only select, nest, and configure them.

use std::fmt;

/// Component names the library exports, in registry order.
pub const ALLOWED_COMPONENTS: [&str; 8] = [
    "Button", "Card", "Input", "Table", "Modal", "Sidebar", "Navbar", "Chart",
];

/// Whether `name` is an allow-listed component (exact, case-sensitive).
pub fn is_allowed_component(name: &str) -> bool {
    ALLOWED_COMPONENTS.contains(&name)
}

/// Documented props for a library component, or `None` for unknown names.
pub fn documented_props(name: &str) -> Option<&'static [&'static str]> {
    let props: &'static [&'static str] = match name {
        "Button" => &["variant", "size", "onClick", "disabled", "fullWidth", "type"],
        "Card" => &["title", "subtitle", "footer", "variant", "padding"],
        "Input" => &[
            "label",
            "type",
            "placeholder",
            "value",
            "onChange",
            "error",
            "helperText",
            "required",
            "disabled",
            "fullWidth",
        ],
        "Table" => &["columns", "data", "variant", "hoverable"],
        "Modal" => &["isOpen", "onClose", "title", "size", "footer"],
        "Sidebar" => &["items", "width", "collapsible"],
        "Navbar" => &["brand", "brandLogo", "items", "actions", "sticky"],
        "Chart" => &["type", "data", "title", "height", "showLegend"],
        _ => return None,
    };
    Some(props)
}

/// Layout topology of a generated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Single,
    SidebarMain,
    NavbarContent,
    Dashboard,
    ModalOverlay,
}

impl Layout {
    /// Every layout, in registry order.
    pub const ALL: [Layout; 5] = [
        Layout::Single,
        Layout::SidebarMain,
        Layout::NavbarContent,
        Layout::Dashboard,
        Layout::ModalOverlay,
    ];

    /// Resolve a plan's `structure` tag.
    pub fn from_tag(tag: &str) -> Option<Layout> {
        Layout::ALL.into_iter().find(|l| l.as_str() == tag)
    }

    /// The wire tag used in plans.
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Single => "single",
            Layout::SidebarMain => "sidebar-main",
            Layout::NavbarContent => "navbar-content",
            Layout::Dashboard => "dashboard",
            Layout::ModalOverlay => "modal-overlay",
        }
    }

    /// One-line description used in prompts and the registry listing.
    pub fn description(self) -> &'static str {
        match self {
            Layout::Single => "Simple single-column layout",
            Layout::SidebarMain => "Left sidebar + main content area",
            Layout::NavbarContent => "Top navbar + content below",
            Layout::Dashboard => "Navbar + Sidebar + Main content",
            Layout::ModalOverlay => "Modal dialog over content",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
