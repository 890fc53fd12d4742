mod auth_tests;
mod browse_tests;
mod session_tests;
