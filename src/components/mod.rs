//! UI Components
//!
//! Screens and the reusable pieces they are built from.

mod confirm_button;
mod notice_banner;
mod login_form;
mod rack_grid;
mod rack_dialog;
mod rack_screen;
mod gecko_screen;
mod care_log_section;
mod photo_list;

pub use confirm_button::ConfirmButton;
pub use notice_banner::NoticeBanner;
pub use login_form::LoginForm;
pub use rack_screen::RackScreen;
pub use gecko_screen::GeckoScreen;
pub use care_log_section::CareLogSection;
pub use photo_list::PhotoList;
