pub mod auth_callback;
pub mod filter;
pub mod forgot_password;
pub mod index;
pub mod login;
pub mod not_found;
pub mod register;
pub mod register_confirmation;
pub mod reset_password;

pub use auth_callback::auth_callback_page;
pub use filter::{filter_page, FilterVm};
pub use forgot_password::forgot_password_page;
pub use index::{index_page, IndexVm};
pub use login::login_page;
pub use not_found::not_found_page;
pub use register::register_page;
pub use register_confirmation::register_confirmation_page;
pub use reset_password::reset_password_page;
