use axum::routing::get;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use vid_core::VideoService;

use crate::rest;
use crate::VidAxumState;

/// HTTP front of a [`VideoService`].
///
/// Every response carries `x-request-id`: the caller's value when one was
/// sent, a fresh UUID otherwise.
#[derive(Clone)]
pub struct VidAxumApp {
    pub videos: VideoService,
    pub router: Router<()>,
}

impl VidAxumApp {
    pub fn new(videos: VideoService) -> Self {
        let state = VidAxumState::new(videos.clone());
        let router = Router::new()
            .nest("/video", rest::video_router(state))
            .route("/health", get(rest::health));

        Self {
            videos,
            router: with_layers(router),
        }
    }

    pub fn into_router(self) -> Router<()> {
        self.router
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

fn with_layers(router: Router<()>) -> Router<()> {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

pub fn axum(videos: VideoService) -> VidAxumApp {
    VidAxumApp::new(videos)
}
