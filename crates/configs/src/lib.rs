use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_WEB_PORT: u16 = 8080;
pub const DEFAULT_BUILD_NUMBER: &str = "dev";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// Backend (book API) bind settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: DEFAULT_SERVER_PORT, worker_threads: Some(4) }
    }
}

/// Front-end server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Base URL of the book API, e.g. `http://localhost:3000`.
    #[serde(default)]
    pub backend_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_WEB_PORT,
            static_dir: default_static_dir(),
            backend_url: String::new(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_build_number")]
    pub build_number: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { build_number: default_build_number() }
    }
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_server_port() -> u16 { DEFAULT_SERVER_PORT }
fn default_web_port() -> u16 { DEFAULT_WEB_PORT }
fn default_static_dir() -> String { "frontend".to_string() }
fn default_build_number() -> String { DEFAULT_BUILD_NUMBER.to_string() }
fn default_request_timeout_ms() -> u64 { DEFAULT_REQUEST_TIMEOUT_MS }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Environment overrides:
    /// `SERVER_HOST`, `PORT` (backend), `WEB_PORT`, `BACKEND_HOST`/`BACKEND_PORT`,
    /// `STATIC_DIR`, `BUILD_NUMBER`, `TOKIO_WORKER_THREADS`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host.clone();
            self.web.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(port) = lookup("WEB_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.web.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.web.static_dir = dir;
        }
        if let Some(build) = lookup("BUILD_NUMBER") {
            self.build.build_number = build;
        }

        let backend_host = lookup("BACKEND_HOST");
        let backend_port = lookup("BACKEND_PORT");
        if backend_host.is_some() || backend_port.is_some() || self.web.backend_url.trim().is_empty() {
            let host = backend_host.unwrap_or_else(|| "localhost".to_string());
            let port = backend_port.unwrap_or_else(|| DEFAULT_SERVER_PORT.to_string());
            self.web.backend_url = format!("http://{host}:{port}");
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.web.normalize()?;
        if self.build.build_number.trim().is_empty() {
            self.build.build_number = default_build_number();
        }
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl WebConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("web.port 必须在 1..=65535 范围内"));
        }
        if self.static_dir.trim().is_empty() {
            self.static_dir = default_static_dir();
        }
        let lower = self.backend_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("web.backend_url 必须以 http:// 或 https:// 开头"));
        }
        if self.request_timeout_ms == 0 {
            self.request_timeout_ms = DEFAULT_REQUEST_TIMEOUT_MS;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}
