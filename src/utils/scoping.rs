//! Per-role data scoping.
//!
//! Guards decide whether a request may proceed at all; the functions here
//! decide what slice of the data it may see or touch once it has. They are
//! pure so the rules can be tested without a database.
//!
//! A role that needs its related record to be scoped and has none is denied
//! with 404 `identity not found`, never given an unscoped result.

use uuid::Uuid;

use unidesk_auth::Authorized;
use unidesk_core::permissions::effective_grade_edit;
use unidesk_core::{AppError, Capability, Role};
use unidesk_models::{AttendanceFilterParams, GradeFilterParams};

/// Which courses a principal may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseScope {
    All,
    /// Courses taught by this teacher
    TaughtBy(Uuid),
    /// Courses this student is enrolled in
    EnrolledStudent(Uuid),
}

impl CourseScope {
    pub fn for_principal(auth: &Authorized) -> Result<Self, AppError> {
        match auth.role {
            Role::Admin => Ok(CourseScope::All),
            Role::Teacher => Ok(CourseScope::TaughtBy(auth.related_id()?)),
            Role::Student => Ok(CourseScope::EnrolledStudent(auth.related_id()?)),
        }
    }

    pub fn taught_by(&self) -> Option<Uuid> {
        match self {
            CourseScope::TaughtBy(id) => Some(*id),
            _ => None,
        }
    }

    pub fn enrolled_student(&self) -> Option<Uuid> {
        match self {
            CourseScope::EnrolledStudent(id) => Some(*id),
            _ => None,
        }
    }
}

/// Students only ever see their own grades; any requested filter is
/// discarded. Admins and teachers filter freely.
pub fn scope_grade_filter(
    auth: &Authorized,
    requested: GradeFilterParams,
) -> Result<GradeFilterParams, AppError> {
    match auth.role {
        Role::Student => Ok(GradeFilterParams {
            student_id: Some(auth.related_id()?),
            course_id: None,
        }),
        Role::Admin | Role::Teacher => Ok(requested),
    }
}

/// Same rule as [`scope_grade_filter`]. A student keeps the date filter.
pub fn scope_attendance_filter(
    auth: &Authorized,
    requested: AttendanceFilterParams,
) -> Result<AttendanceFilterParams, AppError> {
    match auth.role {
        Role::Student => Ok(AttendanceFilterParams {
            student_id: Some(auth.related_id()?),
            course_id: None,
            date: requested.date,
        }),
        Role::Admin | Role::Teacher => Ok(requested),
    }
}

/// Whether a single record owned by `owner_student_id` is visible.
pub fn student_owns(auth: &Authorized, owner_student_id: Uuid) -> Result<bool, AppError> {
    match auth.role {
        Role::Student => Ok(auth.related_id()? == owner_student_id),
        Role::Admin | Role::Teacher => Ok(true),
    }
}

/// Person records (students, teachers): either the role may view all of
/// them, or it may view its own and `record_id` is its own.
pub fn ensure_record_access(
    auth: &Authorized,
    view_all: Capability,
    view_own: Capability,
    record_id: Uuid,
) -> Result<(), AppError> {
    if auth.can(view_all) {
        return Ok(());
    }
    if !auth.can(view_own) {
        return Err(AppError::forbidden(format!(
            "missing permission: {}",
            view_own.name()
        )));
    }
    if auth.related_id()? != record_id {
        return Err(AppError::forbidden("forbidden"));
    }
    Ok(())
}

/// The teacher recorded as submitter. Teachers always submit as themselves;
/// admins may name any teacher or none.
pub fn submitting_teacher(
    auth: &Authorized,
    requested: Option<Uuid>,
) -> Result<Option<Uuid>, AppError> {
    match auth.role {
        Role::Admin => Ok(requested),
        Role::Teacher => Ok(Some(auth.related_id()?)),
        Role::Student => Err(AppError::forbidden("admin or teacher access required")),
    }
}

/// Grade edits: admins edit anything. A teacher edits only grades they
/// submitted, and only while the role grant or their own override allows it.
pub fn ensure_grade_editable(
    auth: &Authorized,
    submitted_by: Option<Uuid>,
    teacher_override: bool,
) -> Result<(), AppError> {
    match auth.role {
        Role::Admin => Ok(()),
        Role::Teacher => {
            let own = auth.related_id()?;
            if submitted_by != Some(own) {
                return Err(AppError::forbidden(
                    "grade was submitted by another teacher",
                ));
            }
            if !effective_grade_edit(auth.can(Capability::EditGrades), teacher_override) {
                return Err(AppError::forbidden("grade editing is disabled"));
            }
            Ok(())
        }
        Role::Student => Err(AppError::forbidden("missing permission: canEditGrades")),
    }
}

/// Notification operations are always scoped to the caller's own record.
pub fn notification_recipient(auth: &Authorized) -> Result<Uuid, AppError> {
    auth.related_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use unidesk_auth::Principal;

    fn auth(role: Role, related_id: Option<Uuid>) -> Authorized {
        Authorized {
            role,
            principal: Principal {
                id: Uuid::new_v4(),
                email: "p@uni.test".to_string(),
                role,
                related_id,
            },
        }
    }

    #[test]
    fn test_course_scope_per_role() {
        let teacher_id = Uuid::new_v4();
        let student_id = Uuid::new_v4();
        assert_eq!(
            CourseScope::for_principal(&auth(Role::Admin, None)).unwrap(),
            CourseScope::All
        );
        assert_eq!(
            CourseScope::for_principal(&auth(Role::Teacher, Some(teacher_id))).unwrap(),
            CourseScope::TaughtBy(teacher_id)
        );
        let scope = CourseScope::for_principal(&auth(Role::Student, Some(student_id))).unwrap();
        assert_eq!(scope.enrolled_student(), Some(student_id));
        assert_eq!(scope.taught_by(), None);
    }

    #[test]
    fn test_course_scope_without_identity() {
        let err = CourseScope::for_principal(&auth(Role::Student, None)).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "identity not found");
    }

    #[test]
    fn test_student_grade_filter_is_forced() {
        let me = Uuid::new_v4();
        let requested = GradeFilterParams {
            student_id: Some(Uuid::new_v4()),
            course_id: Some(Uuid::new_v4()),
        };
        let scoped = scope_grade_filter(&auth(Role::Student, Some(me)), requested).unwrap();
        assert_eq!(scoped.student_id, Some(me));
        assert_eq!(scoped.course_id, None);
    }

    #[test]
    fn test_staff_grade_filter_passes_through() {
        let requested = GradeFilterParams {
            student_id: None,
            course_id: Some(Uuid::new_v4()),
        };
        let scoped =
            scope_grade_filter(&auth(Role::Teacher, Some(Uuid::new_v4())), requested.clone())
                .unwrap();
        assert_eq!(scoped.course_id, requested.course_id);
        assert_eq!(scoped.student_id, None);
    }

    #[test]
    fn test_student_attendance_filter_keeps_date() {
        let me = Uuid::new_v4();
        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let scoped = scope_attendance_filter(
            &auth(Role::Student, Some(me)),
            AttendanceFilterParams {
                student_id: Some(Uuid::new_v4()),
                course_id: Some(Uuid::new_v4()),
                date: Some(date),
            },
        )
        .unwrap();
        assert_eq!(scoped.student_id, Some(me));
        assert_eq!(scoped.course_id, None);
        assert_eq!(scoped.date, Some(date));
    }

    #[test]
    fn test_record_access() {
        let me = Uuid::new_v4();
        let student = auth(Role::Student, Some(me));
        assert!(
            ensure_record_access(&student, Capability::ViewAllStudents, Capability::ViewStudents, me)
                .is_ok()
        );
        let err = ensure_record_access(
            &student,
            Capability::ViewAllStudents,
            Capability::ViewStudents,
            Uuid::new_v4(),
        )
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let teacher = auth(Role::Teacher, Some(Uuid::new_v4()));
        assert!(
            ensure_record_access(
                &teacher,
                Capability::ViewAllStudents,
                Capability::ViewStudents,
                Uuid::new_v4()
            )
            .is_ok()
        );

        // Students hold no teacher view capability at all.
        let err = ensure_record_access(
            &student,
            Capability::ViewAllTeachers,
            Capability::ViewTeachers,
            me,
        )
        .unwrap_err();
        assert_eq!(err.public_message(), "missing permission: canViewTeachers");
    }

    #[test]
    fn test_submitting_teacher() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert_eq!(
            submitting_teacher(&auth(Role::Teacher, Some(me)), Some(other)).unwrap(),
            Some(me)
        );
        assert_eq!(
            submitting_teacher(&auth(Role::Admin, None), Some(other)).unwrap(),
            Some(other)
        );
        assert!(submitting_teacher(&auth(Role::Student, Some(me)), None).is_err());
    }

    #[test]
    fn test_grade_edit_rules() {
        let me = Uuid::new_v4();
        let teacher = auth(Role::Teacher, Some(me));
        assert!(ensure_grade_editable(&teacher, Some(me), false).is_ok());
        assert!(ensure_grade_editable(&teacher, Some(Uuid::new_v4()), true).is_err());
        assert!(ensure_grade_editable(&teacher, None, true).is_err());
        assert!(ensure_grade_editable(&auth(Role::Admin, None), None, false).is_ok());
    }

    #[test]
    fn test_notification_recipient_requires_identity() {
        let err = notification_recipient(&auth(Role::Admin, None)).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        let me = Uuid::new_v4();
        assert_eq!(
            notification_recipient(&auth(Role::Student, Some(me))).unwrap(),
            me
        );
    }

    #[test]
    fn test_student_owns() {
        let me = Uuid::new_v4();
        assert!(student_owns(&auth(Role::Student, Some(me)), me).unwrap());
        assert!(!student_owns(&auth(Role::Student, Some(me)), Uuid::new_v4()).unwrap());
        assert!(student_owns(&auth(Role::Teacher, Some(Uuid::new_v4())), me).unwrap());
    }
}
