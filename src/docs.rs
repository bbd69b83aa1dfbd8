use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::audit::model::{AuditEntry, AuditEntryResponse, AuditListResponse};
use crate::modules::auth::controller::MeResponse;
use crate::modules::commands::model::{
    Command, CommandListResponse, CommandResponse, CommandStatus, CreateCommandDto,
};
use crate::modules::lessons::model::{
    CreateLessonDto, Lesson, LessonListResponse, LessonResponse, LessonStatus, UpdateLessonDto,
};
use crate::modules::media::model::{
    CreateMediaDto, MediaAsset, MediaKind, MediaListResponse, MediaResponse, MediaStatus,
    UpdateMediaDto,
};
use crate::modules::onboarding::model::{
    CreateSurveyDto, Question, QuestionKind, Survey, SurveyListResponse, SurveyResponse,
    SurveyStatus, UpdateSurveyDto,
};
use crate::modules::programs::model::{
    CreateProgramDto, Program, ProgramListResponse, ProgramResponse, ProgramStatus,
    UpdateProgramDto,
};
use crate::modules::users::model::{
    CreateUserDto, SetRoleDto, UpdateUserDto, User, UserListResponse, UserResponse, UserRole,
};
use crate::utils::pagination::{PageMeta, PageParams};
use crate::utils::response::{DeletedResponse, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::me,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::set_user_role,
        crate::modules::users::controller::delete_user,
        crate::modules::programs::controller::list_programs,
        crate::modules::programs::controller::get_program,
        crate::modules::programs::controller::create_program,
        crate::modules::programs::controller::update_program,
        crate::modules::programs::controller::delete_program,
        crate::modules::lessons::controller::list_lessons,
        crate::modules::lessons::controller::get_lesson,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::media::controller::list_media,
        crate::modules::media::controller::get_media,
        crate::modules::media::controller::create_media,
        crate::modules::media::controller::update_media,
        crate::modules::media::controller::delete_media,
        crate::modules::onboarding::controller::list_surveys,
        crate::modules::onboarding::controller::get_survey,
        crate::modules::onboarding::controller::create_survey,
        crate::modules::onboarding::controller::update_survey,
        crate::modules::onboarding::controller::delete_survey,
        crate::modules::commands::controller::list_commands,
        crate::modules::commands::controller::get_command,
        crate::modules::commands::controller::create_command,
        crate::modules::audit::controller::list_audit_entries,
        crate::modules::audit::controller::get_audit_entry,
    ),
    components(
        schemas(
            MeResponse,
            User,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            SetRoleDto,
            UserResponse,
            UserListResponse,
            Program,
            ProgramStatus,
            CreateProgramDto,
            UpdateProgramDto,
            ProgramResponse,
            ProgramListResponse,
            Lesson,
            LessonStatus,
            CreateLessonDto,
            UpdateLessonDto,
            LessonResponse,
            LessonListResponse,
            MediaAsset,
            MediaKind,
            MediaStatus,
            CreateMediaDto,
            UpdateMediaDto,
            MediaResponse,
            MediaListResponse,
            Survey,
            SurveyStatus,
            Question,
            QuestionKind,
            CreateSurveyDto,
            UpdateSurveyDto,
            SurveyResponse,
            SurveyListResponse,
            Command,
            CommandStatus,
            CreateCommandDto,
            CommandResponse,
            CommandListResponse,
            AuditEntry,
            AuditEntryResponse,
            AuditListResponse,
            PageMeta,
            PageParams,
            ErrorResponse,
            DeletedResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Token introspection"),
        (name = "Users", description = "User account management"),
        (name = "Programs", description = "Learning program management"),
        (name = "Lessons", description = "Lesson management"),
        (name = "Media", description = "Media asset registry"),
        (name = "Onboarding", description = "Onboarding survey configuration"),
        (name = "Commands", description = "Remote command log"),
        (name = "Audit", description = "Audit log (read-only)")
    ),
    info(
        title = "CourseBase Admin API",
        version = "0.1.0",
        description = "Administrative backend for the CourseBase content platform: programs, lessons, media, users, onboarding surveys, and the remote command log, with role-gated and audit-logged mutations.",
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
            )
        }
    }
}
