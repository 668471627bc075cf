pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod grades;
pub mod groups;
pub mod notifications;
pub mod pages;
pub mod schedules;
pub mod students;
pub mod teachers;
