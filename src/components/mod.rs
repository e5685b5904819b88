//! UI Components
//!
//! Reusable Leptos components.

mod delete_confirm_button;
mod modal;
mod page_tab_bar;
mod pagination;
mod preview_modal;
mod record_form;
mod record_page;
mod search_box;
mod toast;
mod upload_modal;
mod year_selector;

pub use delete_confirm_button::DeleteConfirmButton;
pub use modal::Modal;
pub use page_tab_bar::PageTabBar;
pub use pagination::Pagination;
pub use record_page::RecordPage;
pub use search_box::SearchBox;
pub use toast::ToastContainer;
pub use year_selector::YearSelector;
