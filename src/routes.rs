use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web::{self, Data},
};

use crate::{
    api::{departments, employees, roles, user_roles, users},
    auth::{handlers, jwt::TokenIssuer, middleware::auth_middleware, service::AuthService},
    config::Config,
    error::translator::{json_error_handler, path_error_handler},
    repository::{
        DepartmentRepository, EmployeeRepository, RoleRepository, UserRepository,
        UserRoleRepository,
    },
};

/// Everything the handlers receive through app data, built once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserRepository>,
    pub roles: Arc<RoleRepository>,
    pub user_roles: Arc<UserRoleRepository>,
    pub departments: Arc<DepartmentRepository>,
    pub employees: Arc<EmployeeRepository>,
    pub auth: Arc<AuthService>,
    pub issuer: TokenIssuer,
}

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = 60_000 / u64::from(requests_per_min.max(1));
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, services: AppServices) {
    let limited = config.rate_limit_enabled;

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(Data::new(services.issuer.clone()))
        .app_data(Data::from(services.auth.clone()))
        .app_data(Data::from(services.users.clone()))
        .app_data(Data::from(services.roles.clone()))
        .app_data(Data::from(services.user_roles.clone()))
        .app_data(Data::from(services.departments.clone()))
        .app_data(Data::from(services.employees.clone()));

    cfg.service(
        web::scope(&config.api_prefix)
            // Public routes
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            .wrap(Condition::new(limited, build_limiter(config.rate_login_per_min)))
                            .route(web::post().to(handlers::login)),
                    )
                    .service(
                        web::resource("/register")
                            .wrap(Condition::new(
                                limited,
                                build_limiter(config.rate_register_per_min),
                            ))
                            .route(web::post().to(handlers::register)),
                    )
                    .service(web::resource("/test").route(web::get().to(handlers::test))),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(from_fn(auth_middleware))
                    .wrap(Condition::new(
                        limited,
                        build_limiter(config.rate_protected_per_min),
                    ))
                    .service(
                        web::resource("/users")
                            .route(web::get().to(users::list_users))
                            .route(web::post().to(users::create_user)),
                    )
                    .service(
                        web::resource("/users/{id}")
                            .route(web::get().to(users::get_user))
                            .route(web::put().to(users::update_user))
                            .route(web::delete().to(users::delete_user)),
                    )
                    .service(
                        web::resource("/employees")
                            .route(web::get().to(employees::list_employees))
                            .route(web::post().to(employees::create_employee)),
                    )
                    .service(
                        web::resource("/employees/{id}")
                            .route(web::get().to(employees::get_employee))
                            .route(web::put().to(employees::update_employee))
                            .route(web::delete().to(employees::delete_employee)),
                    )
                    .service(
                        web::resource("/departments")
                            .route(web::get().to(departments::list_departments))
                            .route(web::post().to(departments::create_department)),
                    )
                    .service(
                        web::resource("/departments/{id}")
                            .route(web::get().to(departments::get_department))
                            .route(web::put().to(departments::update_department))
                            .route(web::delete().to(departments::delete_department)),
                    )
                    .service(
                        web::resource("/roles")
                            .route(web::get().to(roles::list_roles))
                            .route(web::post().to(roles::create_role)),
                    )
                    .service(
                        web::resource("/roles/{id}")
                            .route(web::get().to(roles::get_role))
                            .route(web::put().to(roles::update_role))
                            .route(web::delete().to(roles::delete_role)),
                    )
                    .service(
                        web::resource("/userrole")
                            .route(web::get().to(user_roles::list_user_roles))
                            .route(web::post().to(user_roles::create_user_role)),
                    )
                    .service(
                        web::resource("/userrole/{id}")
                            .route(web::get().to(user_roles::get_user_role))
                            .route(web::put().to(user_roles::update_user_role))
                            .route(web::delete().to(user_roles::delete_user_role)),
                    ),
            ),
    );
}

#[cfg(test)]
impl AppServices {
    pub const TEST_USER_ID: u64 = 1;

    /// In-memory wiring. The returned auth repository shares its user, role
    /// and user-role stores with the CRUD repositories and the employee store.
    pub fn in_memory() -> (Self, crate::repository::memory::MemoryAuthRepository) {
        use crate::repository::memory::{MemoryAuthRepository, MemoryEmployees, MemoryRepository};

        let config = Config::for_tests();
        let auth_repo = MemoryAuthRepository::new();
        let issuer = TokenIssuer::new(config.jwt);

        let services = AppServices {
            users: Arc::new(auth_repo.users.clone()),
            roles: Arc::new(auth_repo.roles.clone()),
            user_roles: Arc::new(auth_repo.user_roles.clone()),
            departments: Arc::new(MemoryRepository::new()),
            employees: Arc::new(MemoryEmployees::new(
                auth_repo.users.clone(),
                config.employee_email_domain,
            )),
            auth: Arc::new(AuthService::new(Arc::new(auth_repo.clone()), issuer.clone())),
            issuer,
        };
        (services, auth_repo)
    }

    /// `Authorization` header value for a signed-in test caller.
    pub fn test_token(&self) -> String {
        let token = self
            .issuer
            .issue(Self::TEST_USER_ID, "admin", &["Admin".to_string()])
            .expect("test issuer is fully configured");
        format!("Bearer {token}")
    }
}

/// Full application over `AppServices`, wrapped like the production app.
#[cfg(test)]
macro_rules! test_app {
    ($services:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::from_fn(
                    crate::error::translator::error_translator,
                ))
                .configure(|cfg| {
                    crate::routes::configure(
                        cfg,
                        &crate::config::Config::for_tests(),
                        $services.clone(),
                    )
                })
                .default_service(actix_web::web::to(crate::error::translator::route_not_found)),
        )
        .await
    };
}

#[cfg(test)]
pub(crate) use test_app;
