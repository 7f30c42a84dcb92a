use fixture_server::config::Config;
use fixture_server::logger;
use fixture_server::server::{ServeOptions, StaticServer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let exit_code = runtime.block_on(async_main(cfg))?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn async_main(cfg: Config) -> Result<i32, Box<dyn std::error::Error>> {
    let table = cfg.route_table()?;
    let route_count = table.len();

    let options = ServeOptions {
        access_log: cfg.logging.access_log,
        access_log_format: cfg.logging.access_log_format.clone(),
    };

    let mut server = StaticServer::bind(cfg.port, table, options)?;
    logger::log_server_start(&server.local_addr(), route_count);
    server.start()?;

    // With a command given, serve around it: the external test runner hits
    // the staged fixtures, then the server comes down and its exit status
    // becomes ours. Without one, serve until interrupted.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match args.split_first() {
        Some((program, rest)) => {
            logger::log_child_started(&args.join(" "));
            let status = tokio::process::Command::new(program)
                .args(rest)
                .status()
                .await?;
            logger::log_child_exit(&status);
            status.code().unwrap_or(1)
        }
        None => {
            tokio::signal::ctrl_c().await?;
            0
        }
    };

    server.stop().await?;
    Ok(code)
}
