//! The "http-server" challenge: build an HTTP server from scratch.

use crate::challenge::{Challenge, ChallengeKind, Stage};
use lc_attest::{Config, HttpPlan, Suite};
use std::sync::Arc;
use std::time::Duration;

/// Port the learner's server must listen on; `run.sh` is told the same via
/// its arguments.
const BASE_URL: &str = "http://localhost:4221";

pub fn challenge() -> Challenge {
    Challenge::new(
        "http-server",
        "Build an HTTP Server",
        "Implement an HTTP/1.1 server that answers health and echo requests.",
        ChallengeKind::HttpServer,
        vec![
            Stage {
                key: "bind-port",
                name: "Accept connections on port 4221",
                suite: bind_port,
            },
            Stage {
                key: "health-endpoint",
                name: "Serve GET /health with 200",
                suite: health_endpoint,
            },
            Stage {
                key: "echo-endpoint",
                name: "Echo request bodies back",
                suite: echo_endpoint,
            },
            Stage {
                key: "stays-healthy",
                name: "Stay healthy under repeated probing",
                suite: stays_healthy,
            },
        ],
    )
}

fn bind_port(config: Arc<Config>) -> Suite {
    let mut suite = Suite::new(config);
    let cfg = suite.config();
    suite.check("server answers GET /", move || async move {
        HttpPlan::get(cfg, format!("{BASE_URL}/"))
            .eventually()
            .into_assert()
            .responds()
            .await
    });
    suite
}

fn health_endpoint(config: Arc<Config>) -> Suite {
    let mut suite = Suite::new(config);

    let cfg = suite.config();
    suite.check("GET /health returns 200", move || async move {
        HttpPlan::get(cfg, format!("{BASE_URL}/health"))
            .eventually()
            .into_assert()
            .status(200)
            .await
    });

    let cfg = suite.config();
    suite.check("GET /health says ok", move || async move {
        HttpPlan::get(cfg, format!("{BASE_URL}/health"))
            .eventually()
            .within(Duration::from_secs(2))
            .into_assert()
            .body_contains("ok")
            .await
    });

    suite
}

fn echo_endpoint(config: Arc<Config>) -> Suite {
    let mut suite = Suite::new(config);

    let cfg = suite.config();
    suite.check("POST /echo returns the body", move || async move {
        HttpPlan::post(cfg, format!("{BASE_URL}/echo"))
            .header("content-type", "text/plain")
            .body("hello, challenge")
            .eventually()
            .into_assert()
            .body_equals("hello, challenge")
            .await
    });

    let cfg = suite.config();
    suite.check("POST /echo keeps the content type", move || async move {
        HttpPlan::post(cfg, format!("{BASE_URL}/echo"))
            .header("content-type", "text/plain")
            .body("hi")
            .eventually()
            .into_assert()
            .header("content-type", "text/plain")
            .await
    });

    suite
}

fn stays_healthy(config: Arc<Config>) -> Suite {
    let mut suite = Suite::new(config);

    let cfg = suite.config();
    suite.check("server comes up", move || async move {
        HttpPlan::get(cfg, format!("{BASE_URL}/health"))
            .eventually()
            .into_assert()
            .status(200)
            .await
    });

    let cfg = suite.config();
    suite.check("GET /health stays 200", move || async move {
        HttpPlan::get(cfg, format!("{BASE_URL}/health"))
            .consistently()
            .hold_for(Duration::from_secs(2))
            .into_assert()
            .status(200)
            .await
    });

    suite
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let challenge = challenge();
        let keys: Vec<&str> = challenge.stages().iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec!["bind-port", "health-endpoint", "echo-endpoint", "stays-healthy"]
        );
        assert_eq!(challenge.kind, ChallengeKind::HttpServer);
    }

    #[tokio::test]
    async fn test_suites_build_without_probing() {
        // Building a suite declares checks; nothing may execute until run().
        let config = Arc::new(Config::new());
        for stage in challenge().stages() {
            let suite = (stage.suite)(config.clone());
            drop(suite);
        }
    }
}
