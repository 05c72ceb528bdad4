use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use api_handler::config::Config;
use api_handler::error::{Error, Result};
use api_handler::handler::Dispatcher;
use api_handler::server::{self, ServerState};
use api_handler::{lambda, logger, store};

const DEFAULT_CONFIG_PATH: &str = "config";

/// Set by the Lambda execution environment
const RUNTIME_API_ENV_VAR: &str = "AWS_LAMBDA_RUNTIME_API";

/// How the process was asked to run
enum Mode {
    /// Local HTTP host
    Serve,
    /// Lambda Runtime API event loop
    Lambda,
    /// One proxy event on stdin, one envelope on stdout (local debugging)
    Invoke,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mode = match args.next().as_deref() {
        None if std::env::var_os(RUNTIME_API_ENV_VAR).is_some() => Mode::Lambda,
        None | Some("serve") => Mode::Serve,
        Some("lambda") => Mode::Lambda,
        Some("invoke") => Mode::Invoke,
        Some(other) => {
            eprintln!("Unknown mode '{other}'. Usage: api-handler [serve|lambda|invoke] [config]");
            std::process::exit(2);
        }
    };
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async {
        // Fail before serving anything if the table is not configured
        let user_store = store::build(&cfg.store).await?;
        let dispatcher = Dispatcher::new(user_store, &cfg.http);

        match mode {
            Mode::Serve => serve(cfg, dispatcher).await,
            Mode::Lambda => lambda::run(dispatcher).await,
            Mode::Invoke => invoke(&dispatcher).await,
        }
    })
}

async fn serve(cfg: Config, dispatcher: Dispatcher) -> Result<()> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(ServerState {
        config: cfg,
        dispatcher,
    });

    server::start_server_loop(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    })
    .await;

    Ok(())
}

async fn invoke(dispatcher: &Dispatcher) -> Result<()> {
    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;

    let response = dispatcher.handle_event(&raw).await?;
    let encoded = serde_json::to_string(&response).map_err(Error::Serialize)?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(encoded.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
