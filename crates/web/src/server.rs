use crate::error::{ErrorKind, Result};
use crate::form::DownloadForm;
use crate::pages::{DOWNLOAD, INDEX, Pages};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, web};
use exn::ResultExt;
use mpdl_config::Config;
use mpdl_library::{Pipeline, RunReport};
use serde::Serialize;
use tracing::instrument;

/// Shared by every request handler.
pub struct AppState {
    pub config: Config,
    pub pages: Pages,
}

#[derive(Serialize)]
struct CompletedRow {
    chapter: String,
    pdf: String,
    pages: usize,
}

#[derive(Serialize)]
struct FailedRow {
    chapter: String,
    reason: String,
}

#[derive(Serialize, Default)]
struct DownloadContext {
    url: String,
    error: Option<String>,
    completed: Vec<CompletedRow>,
    failed: Vec<FailedRow>,
    archive: Option<String>,
}
impl DownloadContext {
    fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self { url: url.into(), error: Some(error.into()), ..Self::default() }
    }

    fn report(url: impl Into<String>, report: &RunReport) -> Self {
        Self {
            url: url.into(),
            error: None,
            completed: report
                .completed
                .iter()
                .map(|c| CompletedRow { chapter: c.chapter.to_string(), pdf: c.pdf.display().to_string(), pages: c.pages })
                .collect(),
            failed: report
                .failed
                .iter()
                .map(|f| FailedRow { chapter: f.chapter.to_string(), reason: f.reason.clone() })
                .collect(),
            archive: report.archive.as_ref().map(|p| p.display().to_string()),
        }
    }
}

fn page(state: &AppState, status: StatusCode, name: &str, context: impl Serialize) -> HttpResponse {
    match state.pages.render(name, context) {
        Ok(html) => HttpResponse::build(status).content_type("text/html; charset=utf-8").body(html),
        Err(e) => {
            tracing::error!(page = name, error = ?e, "Could not render page");
            HttpResponse::InternalServerError().finish()
        },
    }
}

#[get("/")]
async fn index(state: web::Data<AppState>) -> impl Responder {
    page(&state, StatusCode::OK, INDEX, upon::value! { base_url: state.config.site.base_url.as_str() })
}

#[post("/download-manga")]
#[instrument(skip_all, fields(url = %form.manga_url))]
async fn download(state: web::Data<AppState>, form: web::Form<DownloadForm>) -> impl Responder {
    let form = form.into_inner();
    let url = form.manga_url.trim().to_string();
    let request = match form.into_request() {
        Ok(request) => request,
        Err(e) => {
            let reason = (*e).to_string();
            tracing::warn!(reason = %reason, "Rejected download form");
            return page(&state, StatusCode::BAD_REQUEST, DOWNLOAD, DownloadContext::failure(url, reason));
        },
    };
    let config = state.config.clone();
    let outcome = web::block(move || {
        Pipeline::from_config(&config).and_then(|pipeline| pipeline.run(&request)).map_err(|e| {
            tracing::error!(error = ?e, "Download failed");
            (*e).to_string()
        })
    })
    .await;
    match outcome {
        Ok(Ok(report)) => page(&state, StatusCode::OK, DOWNLOAD, DownloadContext::report(url, &report)),
        Ok(Err(reason)) => page(&state, StatusCode::INTERNAL_SERVER_ERROR, DOWNLOAD, DownloadContext::failure(url, reason)),
        Err(e) => {
            tracing::error!(error = %e, "Download worker failed");
            page(&state, StatusCode::INTERNAL_SERVER_ERROR, DOWNLOAD, DownloadContext::failure(url, "internal error"))
        },
    }
}

/// Registers the form's routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(download);
}

/// Serves the form on `bind` until the process is stopped.
#[instrument(skip(config))]
pub fn serve(config: Config, bind: &str) -> Result<()> {
    let state = web::Data::new(AppState { config, pages: Pages::new()? });
    actix_web::rt::System::new().block_on(async move {
        let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
            .bind(bind)
            .or_raise(|| ErrorKind::Bind(bind.to_string()))?;
        tracing::info!(bind = bind, "Web form listening");
        server.run().await.or_raise(|| ErrorKind::Server)
    })
}
