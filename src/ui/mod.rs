pub mod layout;
pub mod variant;

pub use layout::{layout_for, CompactLayout, ModalLayout, ViewportClass, WideLayout};
pub use variant::ButtonVariant;
