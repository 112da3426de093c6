use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "web", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "web",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "web", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    // 前端服务只做静态文件与转发，默认多线程运行时即可
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "web", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "web", event = "start", %service_id, pid, version, "frontend starting");

    rt.block_on(async move {
        match web::run(cfg).await {
            Ok(()) => {
                info!(service = "web", event = "stop", %service_id, pid, "frontend stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "web", event = "run_failed", error = %e, "web::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
