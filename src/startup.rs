use crate::configuration::Settings;
use crate::helpers;
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub async fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let github_client = helpers::GithubClient::new(&settings.github)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let github_client = web::Data::new(github_client);
    let settings = web::Data::new(settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/editor")
                    .service(routes::editor::get::index)
                    .service(routes::editor::save::item),
            )
            .service(routes::editor::get::root)
            .app_data(settings.clone())
            .app_data(github_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
