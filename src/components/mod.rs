pub mod home;
pub mod report_form;
pub mod upload_actions;

pub use home::HomeScreen;
pub use report_form::NewReportScreen;
