use inkwell_auth::Role;
use inkwell_core::ErrorResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::articles::model::{Article, ArticleDto, ArticleResponse, SearchArticlesDto};
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequestDto, RegisterResponse,
};
use crate::modules::comments::model::{Comment, CommentResponse, CreateCommentDto};
use crate::modules::users::model::{UpdateUserDto, User, UserResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::articles::controller::list_articles,
        crate::modules::articles::controller::search_articles,
        crate::modules::articles::controller::get_article,
        crate::modules::articles::controller::create_article,
        crate::modules::articles::controller::update_article,
        crate::modules::articles::controller::delete_article,
        crate::modules::comments::controller::list_article_comments,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::get_comment,
        crate::modules::comments::controller::delete_comment,
    ),
    components(
        schemas(
            Role,
            User,
            UpdateUserDto,
            UserResponse,
            RegisterRequestDto,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            Article,
            ArticleDto,
            ArticleResponse,
            SearchArticlesDto,
            Comment,
            CreateCommentDto,
            CommentResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "User management"),
        (name = "Articles", description = "Articles and article search"),
        (name = "Comments", description = "Comments on articles")
    ),
    info(
        title = "Inkwell API",
        version = "0.1.0",
        description = "Blogging REST API with JWT authentication, CSRF protection and rate limiting. State-changing requests must echo the `X-CSRF-Token` response header in an `x-csrf-token` request header.",
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
