//! Error pages and the host error logger bridge

pub mod adapter;
pub mod page;
pub mod renderer;

pub use adapter::DebugScreenAdapter;
pub use page::{DebugPage, HtmlDebugPage};
pub use renderer::BlueScreenRenderer;
