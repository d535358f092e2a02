//! OpenAPI documentation for the ticket API.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Bearer session token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token from `POST /login`. Include it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::users::get_current_user,
        api::handlers::tickets::create_ticket,
        api::handlers::tickets::list_tickets,
        api::handlers::tickets::get_ticket,
        api::handlers::tickets::update_ticket,
        api::handlers::tickets::delete_ticket,
    ),
    components(
        schemas(
            api::models::auth::RegisterRequest,
            api::models::auth::LoginRequest,
            api::models::auth::LoginResponse,
            api::models::auth::MessageResponse,
            api::models::users::Role,
            api::models::users::UserResponse,
            api::models::tickets::Priority,
            api::models::tickets::Status,
            api::models::tickets::TicketCreate,
            api::models::tickets::TicketUpdate,
            api::models::tickets::TicketResponse,
            api::models::tickets::TicketDeleteResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Account registration and login."),
        (name = "users", description = "The authenticated user."),
        (name = "tickets", description = "Support tickets. Clients see and edit their own tickets; admins see and manage all of them."),
    ),
    info(
        title = "Tickety API",
        description = "Multi-tenant support ticket service.",
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/register", "/login", "/me", "/tickets", "/tickets/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
