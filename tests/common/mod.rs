use once_cell::sync::Lazy;
use roboaut_notify::{
    configuration::get_configuration,
    telemetry::{get_subscriber, init_subscriber},
    App,
};
use std::time::Duration;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("test".into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber("test".into(), std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    /// Stands in for the transactional-email provider.
    pub email_server: MockServer,
}

/// Spawn a instance of the app on a random port, pointed at a mock email
/// provider.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;
    let config = {
        let mut c = get_configuration().expect("Failed to read configuration");

        // Make OS choose random port
        c.application.port = 0;
        c.email_client.base_url = email_server.uri();

        c
    };

    let app = App::build(config)?;
    let address = format!("http://127.0.0.1:{}", app.port());

    // Start server
    let _ = tokio::spawn(app.run_until_stopped());

    Ok(TestApp {
        address,
        email_server,
    })
}

impl TestApp {
    /// Post a raw body to the webhook route.
    pub async fn post_webhook(&self, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/api/data", self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Wait until the mock provider has seen at least `expected` requests.
    /// Delivery runs in a background task, so tests have to poll.
    pub async fn wait_for_delivery_attempts(&self, expected: usize) -> Vec<wiremock::Request> {
        for _ in 0..100 {
            let requests = self
                .email_server
                .received_requests()
                .await
                .unwrap_or_default();
            if requests.len() >= expected {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("Timed out waiting for {expected} delivery attempt(s)");
    }
}
