#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

pub const PASSWORD: &str = "secret123";

/// The compiled binary running against the in-memory store.
/// Killed when dropped, so every test gets an empty store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    pub async fn start_with(envs: &[(&str, &str)]) -> Result<Self> {
        let server = Self::spawn(envs)?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    fn spawn(envs: &[(&str, &str)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_vet-clinic-api"));
        cmd.env("STORE_BACKEND", "memory")
            .env("HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("JWT_SECRET", "integration-secret")
            .env("RUST_LOG", "warn")
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let url = self.url("/health");
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Registers a veterinarian and logs in, returning `(token, id)`.
    pub async fn signup(&self, email: &str) -> Result<(String, String)> {
        let res = self
            .client
            .post(self.url("/api/registro"))
            .json(&json!({
                "nombre": "Ana",
                "apellido": "Torres",
                "email": email,
                "password": PASSWORD,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "registro failed: {}", res.status());

        let res = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body: Value = res.json().await?;
        let token = body["token"].as_str().context("token missing")?.to_string();
        let id = body["_id"].as_str().context("_id missing")?.to_string();
        Ok((token, id))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn patient(nombre: &str) -> Value {
    json!({
        "nombre": nombre,
        "propietario": "Juan Pérez",
        "email": "juan@example.com",
        "celular": "0987654321",
        "especie": "perro",
        "sintomas": "vomito",
    })
}
