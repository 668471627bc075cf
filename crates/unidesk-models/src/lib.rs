//! # Unidesk Models
//!
//! Database rows, request DTOs and OpenAPI schemas for the Unidesk API.
//!
//! Rows derive [`sqlx::FromRow`], DTOs derive [`validator::Validate`] and
//! every public type carries a [`utoipa::ToSchema`] so it appears in the
//! generated document.
//!
//! # Modules
//!
//! - [`auth`]: login accounts, login/`me` payloads
//! - [`students`], [`teachers`], [`departments`], [`groups`]
//! - [`courses`]: courses and enrollments
//! - [`grades`], [`schedules`], [`attendance`], [`notifications`]

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod grades;
pub mod groups;
pub mod notifications;
pub mod schedules;
pub mod students;
pub mod teachers;

// Re-export commonly used types at crate root for convenience
pub use auth::{LoginRequest, LoginResponse, MeResponse, MessageResponse, UserAccount};

pub use students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};

pub use teachers::{
    CreateTeacherDto, GradePermissionAudit, GradePermissionState, PaginatedTeachersResponse,
    Teacher, TeacherFilterParams, UpdateTeacherDto,
};

pub use departments::{
    CreateDepartmentDto, Department, PaginatedDepartmentsResponse, UpdateDepartmentDto,
};

pub use groups::{
    CreateGroupDto, GroupFilterParams, PaginatedGroupsResponse, StudentGroup, UpdateGroupDto,
};

pub use courses::{
    Course, CourseFilterParams, CreateCourseDto, EnrollStudentDto, Enrollment,
    PaginatedCoursesResponse, UpdateCourseDto,
};

pub use grades::{
    CreateGradeDto, Grade, GradeFilterParams, GradeType, PaginatedGradesResponse, UpdateGradeDto,
};

pub use schedules::{
    CreateScheduleDto, PaginatedSchedulesResponse, Schedule, ScheduleFilterParams,
    UpdateScheduleDto,
};

pub use attendance::{
    Attendance, AttendanceFilterParams, AttendanceStatus, CreateAttendanceDto,
    PaginatedAttendanceResponse, UpdateAttendanceDto,
};

pub use notifications::{
    CreateNotificationDto, MarkAllReadResponse, Notification, NotificationFilterParams,
    PaginatedNotificationsResponse, UnreadCountResponse,
};
