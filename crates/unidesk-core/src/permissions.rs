//! Role-based permission matrix and route access table.
//!
//! Everything in this module is process-wide immutable data. The matrix is
//! built once on first use and shared by reference; the route table is a set
//! of `const` slices. Nothing here is ever mutated after initialisation, so
//! concurrent readers need no synchronisation.
//!
//! # Example
//!
//! ```ignore
//! use unidesk_core::permissions::{Capability, Role, can_access_route, has_permission};
//!
//! assert!(Role::Admin.can(Capability::CreateStudent));
//! assert!(!has_permission(Role::Student, "canViewAllStudents"));
//! assert!(!can_access_route(Role::Student, "/students/123"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// The three roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Resolves the role carried by a session.
    ///
    /// A missing or unrecognised value falls back to [`Role::Student`], the
    /// least privileged role.
    pub fn from_claim(value: Option<&str>) -> Role {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(Role::Student)
    }

    /// Whether the role-derived permission set grants `capability`.
    pub fn can(self, capability: Capability) -> bool {
        get_permissions(self).allows(capability)
    }

    const fn index(self) -> usize {
        match self {
            Role::Admin => 0,
            Role::Teacher => 1,
            Role::Student => 2,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Declares the closed set of capabilities together with their wire names.
macro_rules! capabilities {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A single named permission flag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Capability {
            $($variant),+
        }

        impl Capability {
            pub const ALL: &'static [Capability] = &[$(Capability::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Capability::$variant => $name),+
                }
            }

            pub fn from_name(name: &str) -> Option<Capability> {
                match name {
                    $($name => Some(Capability::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

capabilities! {
    ViewStudents => "canViewStudents",
    ViewAllStudents => "canViewAllStudents",
    CreateStudent => "canCreateStudent",
    EditStudent => "canEditStudent",
    DeleteStudent => "canDeleteStudent",

    ViewTeachers => "canViewTeachers",
    ViewAllTeachers => "canViewAllTeachers",
    CreateTeacher => "canCreateTeacher",
    EditTeacher => "canEditTeacher",
    DeleteTeacher => "canDeleteTeacher",

    ViewCourses => "canViewCourses",
    ViewAllCourses => "canViewAllCourses",
    CreateCourse => "canCreateCourse",
    EditCourse => "canEditCourse",
    DeleteCourse => "canDeleteCourse",

    ViewDepartments => "canViewDepartments",
    ViewAllDepartments => "canViewAllDepartments",
    CreateDepartment => "canCreateDepartment",
    EditDepartment => "canEditDepartment",
    DeleteDepartment => "canDeleteDepartment",

    ViewGroups => "canViewGroups",
    ViewAllGroups => "canViewAllGroups",
    CreateGroup => "canCreateGroup",
    EditGroup => "canEditGroup",
    DeleteGroup => "canDeleteGroup",

    ViewGrades => "canViewGrades",
    ViewAllGrades => "canViewAllGrades",
    CreateGrades => "canCreateGrades",
    EditGrades => "canEditGrades",
    DeleteGrades => "canDeleteGrades",

    ViewSchedules => "canViewSchedules",
    ViewAllSchedules => "canViewAllSchedules",
    CreateSchedule => "canCreateSchedule",
    EditSchedule => "canEditSchedule",
    DeleteSchedule => "canDeleteSchedule",

    ViewAttendance => "canViewAttendance",
    ViewAllAttendance => "canViewAllAttendance",
    CreateAttendance => "canCreateAttendance",
    EditAttendance => "canEditAttendance",
    DeleteAttendance => "canDeleteAttendance",

    ViewNotifications => "canViewNotifications",
    ViewAllNotifications => "canViewAllNotifications",
    CreateNotification => "canCreateNotification",
    EditNotification => "canEditNotification",
    DeleteNotification => "canDeleteNotification",
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The grant table. Admin holds every capability; the other roles list
/// theirs explicitly and everything else is `false`.
fn role_grants(role: Role, capability: Capability) -> bool {
    use Capability::*;

    match role {
        Role::Admin => true,
        Role::Teacher => matches!(
            capability,
            ViewStudents
                | ViewAllStudents
                | ViewTeachers
                | ViewCourses
                | ViewAllCourses
                | ViewDepartments
                | ViewAllDepartments
                | ViewGroups
                | ViewAllGroups
                | ViewGrades
                | ViewAllGrades
                | CreateGrades
                | EditGrades
                | ViewSchedules
                | ViewAllSchedules
                | ViewAttendance
                | ViewAllAttendance
                | CreateAttendance
                | EditAttendance
                | ViewNotifications
                | CreateNotification
        ),
        Role::Student => matches!(
            capability,
            ViewStudents
                | ViewCourses
                | ViewDepartments
                | ViewGroups
                | ViewGrades
                | ViewSchedules
                | ViewAttendance
                | ViewNotifications
        ),
    }
}

/// Every capability mapped to a boolean for one role.
///
/// Serializes as `{"canViewStudents": true, ...}` with every key present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    grants: BTreeMap<Capability, bool>,
}

impl PermissionSet {
    fn for_role(role: Role) -> Self {
        let grants = Capability::ALL
            .iter()
            .map(|&capability| (capability, role_grants(role, capability)))
            .collect();
        Self { grants }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        self.grants.get(&capability).copied().unwrap_or(false)
    }

    /// Lookup by wire name; unknown names are `false`.
    pub fn get(&self, name: &str) -> bool {
        Capability::from_name(name).is_some_and(|capability| self.allows(capability))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.grants.iter().map(|(capability, granted)| (*capability, *granted))
    }

    pub fn granted(&self) -> impl Iterator<Item = Capability> + '_ {
        self.iter()
            .filter_map(|(capability, granted)| granted.then_some(capability))
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.grants.len()))?;
        for (capability, granted) in &self.grants {
            map.serialize_entry(capability.name(), granted)?;
        }
        map.end()
    }
}

static PERMISSION_MATRIX: LazyLock<[PermissionSet; 3]> =
    LazyLock::new(|| Role::ALL.map(PermissionSet::for_role));

/// The full permission set for `role`.
pub fn get_permissions(role: Role) -> &'static PermissionSet {
    &PERMISSION_MATRIX[role.index()]
}

/// `get_permissions(role)[name]`; unknown capability names are `false`.
pub fn has_permission(role: Role, name: &str) -> bool {
    get_permissions(role).get(name)
}

/// Combines the role-level grade edit grant with a teacher's own override.
///
/// The override can only add to the role grant, never take it away.
pub fn effective_grade_edit(role_grant: bool, teacher_override: bool) -> bool {
    role_grant || teacher_override
}

// =============================================================================
// Route access table
// =============================================================================

/// Public landing page and redirect target for denied navigations.
pub const LANDING_PATH: &str = "/";

/// Top-level page sections guarded by the route middleware. Paths outside
/// these sections are public.
pub const PROTECTED_SECTIONS: &[&str] = &[
    "/students",
    "/teachers",
    "/courses",
    "/departments",
    "/grades",
    "/groups",
    "/schedules",
    "/attendance",
    "/notifications",
];

const ADMIN_ROUTES: &[&str] = &[
    "/",
    "/students",
    "/teachers",
    "/courses",
    "/departments",
    "/grades",
    "/groups",
    "/schedules",
    "/attendance",
    "/notifications",
];

const TEACHER_ROUTES: &[&str] = &[
    "/",
    "/students",
    "/courses",
    "/departments",
    "/grades",
    "/groups",
    "/schedules",
    "/attendance",
    "/notifications",
];

const STUDENT_ROUTES: &[&str] = &[
    "/",
    "/courses",
    "/grades",
    "/schedules",
    "/attendance",
    "/notifications",
];

/// Path prefixes a role may navigate to.
pub fn allowed_routes(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => ADMIN_ROUTES,
        Role::Teacher => TEACHER_ROUTES,
        Role::Student => STUDENT_ROUTES,
    }
}

/// Segment-aware prefix match. The root prefix only matches the root itself,
/// otherwise it would admit every path.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn can_access_route(role: Role, path: &str) -> bool {
    allowed_routes(role)
        .iter()
        .any(|prefix| prefix_matches(prefix, path))
}

/// Whether `path` falls under one of the [`PROTECTED_SECTIONS`].
pub fn is_protected_path(path: &str) -> bool {
    PROTECTED_SECTIONS
        .iter()
        .any(|prefix| prefix_matches(prefix, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_capability() {
        for &capability in Capability::ALL {
            assert!(Role::Admin.can(capability), "{capability}");
        }
    }

    #[test]
    fn test_every_set_is_fully_populated() {
        for role in Role::ALL {
            let set = get_permissions(role);
            assert_eq!(set.len(), Capability::ALL.len());
            for &capability in Capability::ALL {
                assert!(set.iter().any(|(c, _)| c == capability));
            }
        }
    }

    #[test]
    fn test_get_permissions_is_deterministic() {
        for role in Role::ALL {
            assert_eq!(get_permissions(role), get_permissions(role));
            assert_eq!(get_permissions(role), &PermissionSet::for_role(role));
        }
    }

    #[test]
    fn test_ungranted_capabilities_are_false() {
        for role in Role::ALL {
            for &capability in Capability::ALL {
                if !role_grants(role, capability) {
                    assert!(!has_permission(role, capability.name()));
                }
            }
        }
    }

    #[test]
    fn test_unknown_capability_is_false() {
        for role in Role::ALL {
            assert!(!has_permission(role, "canLaunchRockets"));
            assert!(!has_permission(role, ""));
        }
    }

    #[test]
    fn test_capability_names_round_trip() {
        for &capability in Capability::ALL {
            assert_eq!(Capability::from_name(capability.name()), Some(capability));
        }
    }

    #[test]
    fn test_teacher_grants() {
        assert!(has_permission(Role::Teacher, "canEditGrades"));
        assert!(has_permission(Role::Teacher, "canCreateGrades"));
        assert!(has_permission(Role::Teacher, "canViewAllDepartments"));
        assert!(has_permission(Role::Teacher, "canViewAllStudents"));
        assert!(!has_permission(Role::Teacher, "canCreateStudent"));
        assert!(!has_permission(Role::Teacher, "canEditTeacher"));
        assert!(!has_permission(Role::Teacher, "canDeleteDepartment"));
        assert!(!has_permission(Role::Teacher, "canViewAllTeachers"));
    }

    #[test]
    fn test_student_only_has_self_scoped_views() {
        for (capability, granted) in get_permissions(Role::Student).iter() {
            if granted {
                let name = capability.name();
                assert!(name.starts_with("canView"), "{name}");
                assert!(!name.starts_with("canViewAll"), "{name}");
            }
        }
        assert!(!has_permission(Role::Student, "canEditGrades"));
    }

    #[test]
    fn test_role_from_claim_falls_back_to_student() {
        assert_eq!(Role::from_claim(Some("admin")), Role::Admin);
        assert_eq!(Role::from_claim(Some("teacher")), Role::Teacher);
        assert_eq!(Role::from_claim(None), Role::Student);
        assert_eq!(Role::from_claim(Some("superuser")), Role::Student);
        assert_eq!(Role::from_claim(Some("")), Role::Student);
    }

    #[test]
    fn test_permission_set_serializes_all_keys() {
        let value = serde_json::to_value(get_permissions(Role::Student)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), Capability::ALL.len());
        assert_eq!(object["canViewGrades"], true);
        assert_eq!(object["canCreateStudent"], false);
    }

    #[test]
    fn test_effective_grade_edit() {
        assert!(effective_grade_edit(true, false));
        assert!(effective_grade_edit(false, true));
        assert!(effective_grade_edit(true, true));
        assert!(!effective_grade_edit(false, false));
    }

    #[test]
    fn test_students_section_access() {
        assert!(!can_access_route(Role::Student, "/students/123"));
        assert!(can_access_route(Role::Admin, "/students/123"));
        assert!(can_access_route(Role::Teacher, "/students"));
    }

    #[test]
    fn test_root_prefix_only_matches_root() {
        assert!(can_access_route(Role::Student, "/"));
        assert!(!can_access_route(Role::Student, "/teachers"));
        assert!(!can_access_route(Role::Student, "/departments/abc"));
    }

    #[test]
    fn test_prefix_matching_is_segment_aware() {
        assert!(can_access_route(Role::Student, "/grades"));
        assert!(can_access_route(Role::Student, "/grades/"));
        assert!(can_access_route(Role::Student, "/grades/2024/spring"));
        assert!(!can_access_route(Role::Student, "/gradesheet"));
    }

    #[test]
    fn test_every_protected_section_maps_to_a_role() {
        for section in PROTECTED_SECTIONS {
            assert!(
                Role::ALL.iter().any(|role| can_access_route(*role, section)),
                "{section} is unreachable"
            );
        }
    }

    #[test]
    fn test_every_role_may_open_root() {
        for role in Role::ALL {
            assert!(can_access_route(role, LANDING_PATH));
        }
    }

    #[test]
    fn test_protected_path_detection() {
        assert!(is_protected_path("/courses"));
        assert!(is_protected_path("/courses/42/edit"));
        assert!(!is_protected_path("/"));
        assert!(!is_protected_path("/login"));
        assert!(!is_protected_path("/api/courses"));
        assert!(!is_protected_path("/coursework"));
    }
}
