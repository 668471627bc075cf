use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi};

use unidesk_auth::Principal;
use unidesk_config::jwt::DEFAULT_SESSION_COOKIE;
use unidesk_core::{PaginationMeta, Role};
use unidesk_models::{
    Attendance, AttendanceStatus, Course, CreateAttendanceDto, CreateCourseDto,
    CreateDepartmentDto, CreateGradeDto, CreateGroupDto, CreateNotificationDto,
    CreateScheduleDto, CreateStudentDto, CreateTeacherDto, Department, EnrollStudentDto,
    Enrollment, Grade, GradePermissionAudit, GradePermissionState, GradeType, LoginRequest,
    LoginResponse, MarkAllReadResponse, MeResponse, MessageResponse, Notification,
    PaginatedAttendanceResponse, PaginatedCoursesResponse, PaginatedDepartmentsResponse,
    PaginatedGradesResponse, PaginatedGroupsResponse, PaginatedNotificationsResponse,
    PaginatedSchedulesResponse, PaginatedStudentsResponse, PaginatedTeachersResponse, Schedule,
    Student, StudentGroup, Teacher, UnreadCountResponse, UpdateAttendanceDto, UpdateCourseDto,
    UpdateDepartmentDto, UpdateGradeDto, UpdateGroupDto, UpdateScheduleDto, UpdateStudentDto,
    UpdateTeacherDto,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::teachers::controller::toggle_grade_permission,
        crate::modules::teachers::controller::grade_permission_history,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::groups::controller::get_groups,
        crate::modules::groups::controller::get_group,
        crate::modules::groups::controller::create_group,
        crate::modules::groups::controller::update_group,
        crate::modules::groups::controller::delete_group,
        crate::modules::groups::controller::get_group_students,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::enroll_student,
        crate::modules::courses::controller::unenroll_student,
        crate::modules::grades::controller::get_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::schedules::controller::get_schedules,
        crate::modules::schedules::controller::get_schedule,
        crate::modules::schedules::controller::create_schedule,
        crate::modules::schedules::controller::update_schedule,
        crate::modules::schedules::controller::delete_schedule,
        crate::modules::attendance::controller::get_attendance,
        crate::modules::attendance::controller::get_attendance_record,
        crate::modules::attendance::controller::create_attendance,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::notifications::controller::get_notifications,
        crate::modules::notifications::controller::create_notification,
        crate::modules::notifications::controller::unread_count,
        crate::modules::notifications::controller::mark_all_read,
        crate::modules::notifications::controller::mark_read,
        crate::modules::notifications::controller::delete_notification,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            Role,
            Principal,
            LoginRequest,
            LoginResponse,
            MeResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            PaginatedTeachersResponse,
            GradePermissionState,
            GradePermissionAudit,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            PaginatedDepartmentsResponse,
            StudentGroup,
            CreateGroupDto,
            UpdateGroupDto,
            PaginatedGroupsResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            PaginatedCoursesResponse,
            Enrollment,
            EnrollStudentDto,
            Grade,
            GradeType,
            CreateGradeDto,
            UpdateGradeDto,
            PaginatedGradesResponse,
            Schedule,
            CreateScheduleDto,
            UpdateScheduleDto,
            PaginatedSchedulesResponse,
            Attendance,
            AttendanceStatus,
            CreateAttendanceDto,
            UpdateAttendanceDto,
            PaginatedAttendanceResponse,
            Notification,
            CreateNotificationDto,
            PaginatedNotificationsResponse,
            UnreadCountResponse,
            MarkAllReadResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Session login, logout and capability lookup"),
        (name = "Students", description = "Student records"),
        (name = "Teachers", description = "Teacher records and grade-edit overrides"),
        (name = "Departments", description = "Academic departments"),
        (name = "Groups", description = "Student groups"),
        (name = "Courses", description = "Courses and enrollments"),
        (name = "Grades", description = "Grade book"),
        (name = "Schedules", description = "Timetable slots"),
        (name = "Attendance", description = "Attendance register"),
        (name = "Notifications", description = "Per-user notifications")
    ),
    info(
        title = "Unidesk API",
        version = "0.1.0",
        description = "University management API with a role-based permission matrix, built with Rust, Axum and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(DEFAULT_SESSION_COOKIE))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_guarded_endpoints() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/auth/login"));
        assert!(paths.contains_key("/api/teachers/{id}/grade-permission"));
        assert!(paths.contains_key("/api/notifications/read-all"));

        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
