pub mod dashboard;
pub mod login;

pub use dashboard::{dashboard_page, DashboardData, DashboardVm};
pub use login::login_page;
