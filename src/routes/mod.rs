pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::RoleGuard;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::me),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task)
            .service(tasks::delete_task)
            .service(tasks::toggle_complete),
    )
    .service(
        web::scope("/admin")
            .wrap(RoleGuard::admin())
            .service(admin::list_users)
            .service(admin::user_stats)
            .service(admin::set_admin)
            .service(admin::set_status)
            .service(admin::delete_user)
            .service(admin::list_all_tasks),
    );
}
