//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "devfolio",
        description = "Developer profile directory REST API"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::users::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::me,
        crate::api::handlers::profile::my_profile,
        crate::api::handlers::profile::upsert_profile,
        crate::api::handlers::profile::all_profiles,
        crate::api::handlers::profile::profile_by_user,
        crate::api::handlers::profile::add_experience,
        crate::api::handlers::profile::remove_experience,
        crate::api::handlers::profile::add_education,
        crate::api::handlers::profile::remove_education,
        crate::api::handlers::profile::delete_profile,
    ),
    tags(
        (name = "users", description = "Registration"),
        (name = "auth", description = "Login and identity"),
        (name = "profile", description = "Profile directory"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/health",
            "/api/users",
            "/api/auth",
            "/api/profile",
            "/api/profile/me",
            "/api/profile/user/{user_id}",
            "/api/profile/experience",
            "/api/profile/experience/{exp_id}",
            "/api/profile/education",
            "/api/profile/education/{edu_id}",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }
}
