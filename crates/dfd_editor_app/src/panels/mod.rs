// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor panel implementations.

mod help;
mod label_types;
mod palette;

pub use help::HelpOverlay;
pub use label_types::LabelTypeEditor;
pub use palette::ToolPalette;
