//! Fixed source fragments for the generated component file.

use loom_core::Layout;

/// Module path the component library is imported from.
pub const LIBRARY_IMPORT_SOURCE: &str = "@/components/library";

/// Name of the single exported component.
pub const UNIT_NAME: &str = "GeneratedUI";

/// Declaration every generated file must contain.
pub const EXPORT_MARKER: &str = "export default function GeneratedUI";

/// Opening and closing markup around the transcribed component tree.
pub(crate) struct LayoutWrapper {
    pub opening: &'static str,
    pub closing: &'static str,
}

/// Wrapper for a plan's `structure` tag.
///
/// Unknown tags get the single-column wrapper. Validation rejects them
/// before generation, so this only matters for callers that skip it.
pub(crate) fn layout_wrapper(structure: &str) -> LayoutWrapper {
    match Layout::from_tag(structure).unwrap_or(Layout::Single) {
        Layout::Single => LayoutWrapper {
            opening: "    <div className=\"min-h-screen bg-gray-50 flex items-center justify-center p-4\">\n      <div className=\"w-full max-w-2xl\">",
            closing: "      </div>\n    </div>",
        },
        Layout::SidebarMain => LayoutWrapper {
            opening: "    <div className=\"min-h-screen bg-gray-50 flex\">",
            closing: "    </div>",
        },
        Layout::NavbarContent | Layout::Dashboard => LayoutWrapper {
            opening: "    <div className=\"min-h-screen bg-gray-50\">",
            closing: "    </div>",
        },
        Layout::ModalOverlay => LayoutWrapper {
            opening: "    <div className=\"min-h-screen bg-gray-50 p-4\">",
            closing: "    </div>",
        },
    }
}

/// Import header: React plus the library components the tree references.
pub(crate) fn import_header(component_types: &[String]) -> String {
    format!(
        "import React from 'react';\nimport {{ {types} }} from '{source}';",
        types = component_types.join(", "),
        source = LIBRARY_IMPORT_SOURCE,
    )
}

/// Assemble the complete component file.
pub(crate) fn component_unit(header: &str, wrapper: &LayoutWrapper, tree: &str) -> String {
    format!(
        r#"{header}

{export}() {{
  // State management
  const [isModalOpen, setIsModalOpen] = React.useState(false);

  return (
{opening}
{tree}
{closing}
  );
}}"#,
        header = header,
        export = EXPORT_MARKER,
        opening = wrapper.opening,
        tree = tree,
        closing = wrapper.closing,
    )
}
