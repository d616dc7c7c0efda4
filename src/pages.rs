use actix_web::web;

mod auth;
mod attendance;
mod schedules;
mod requests;
mod payroll;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/attendance")
            .configure(attendance::config))
        .service(web::scope("/schedules")
            .configure(schedules::config))
        .service(web::scope("/requests")
            .configure(requests::config))
        .service(web::scope("/payroll")
            .configure(payroll::config));
}
