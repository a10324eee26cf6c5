//! Presentation helpers shared by the directory screens.

pub mod avatar;
pub mod import;
pub mod paging;
pub mod phone;
pub mod status;

pub use avatar::{avatar_colors, initials, AvatarColors, AvatarKey};
pub use import::{import_products, ImportReport, RowError};
pub use paging::{paginate, sort_by_key, PageInfo, SortDirection};
pub use phone::{format_phone, is_complete_phone};
pub use status::{display_status, status_classes, AccountStatus, BadgeTone, DisplayStatus, OrderStatus};
