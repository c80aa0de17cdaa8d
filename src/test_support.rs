//! Local upstream servers for exercising the HTTP clients in tests

use axum::Router;
use tokio::net::TcpListener;

/// Serve `router` on a random localhost port and return its base URL.
/// The server lives until the test runtime shuts down.
pub async fn spawn_mock(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener
        .local_addr()
        .expect("Failed to read mock server address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock server failed");
    });

    format!("http://{}", addr)
}
