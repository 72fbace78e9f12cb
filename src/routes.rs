use crate::actix_web::web::{delete, get, post, resource, ServiceConfig};
use crate::core::ports::repository::Manager;
use crate::handlers;

/// `/list/` and `/questions/` are registered ahead of the `/{question_id}/` family.
pub fn configure<M>(cfg: &mut ServiceConfig)
where
    M: Manager + 'static,
{
    cfg.service(resource("/").route(get().to(handlers::login_page)).route(post().to(handlers::login::<M>)))
        .service(resource("/signup/").route(post().to(handlers::signup::<M>)))
        .service(resource("/logout/").route(post().to(handlers::logout)))
        .service(resource("/account/").route(get().to(handlers::account::<M>)))
        .service(resource("/list/").route(get().to(handlers::question::index::<M>)))
        .service(resource("/questions/").route(post().to(handlers::question::create::<M>)))
        .service(resource("/questions/{question_id}/").route(delete().to(handlers::question::delete::<M>)))
        .service(resource("/{question_id}/").route(get().to(handlers::question::vote_for_poll::<M>)))
        .service(resource("/{question_id}/detail/").route(get().to(handlers::question::detail::<M>)))
        .service(resource("/{question_id}/results/").route(get().to(handlers::question::results::<M>)))
        .service(resource("/{question_id}/vote/").route(post().to(handlers::vote::vote::<M>)));
}
