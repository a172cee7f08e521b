//! Tabbed workspace and location routing

pub mod panel;
pub mod router;
pub mod tabs;

pub use panel::{DebugField, PanelView, ResponsePane, ResponseState, TabPanel};
pub use router::{parse_fragment, route, Router};
pub use tabs::{tab_id, Tab, TabSnapshot, TabWorkspace};
