use clap::Parser;
use log::{info, warn, Level, Metadata, Record};
use rconlink::client::Client;
use std::error::Error;
use tokio::signal;

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Run a single command on a Source RCON server.
#[derive(Parser, Debug)]
#[command(name = "rconlink", version, about)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value_t = 27015)]
    port: u16,

    #[arg(long, env = "RCON_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, default_value_t = rconlink::config::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The command to run, e.g. `status` or `say hello`
    #[arg(required = true, trailing_var_arg = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::Warn,
        1 => Level::Debug,
        _ => Level::Trace,
    };
    let _ = log::set_logger(&SimpleLogger).map(|()| log::set_max_level(level.to_level_filter()));

    let client = Client::builder()
        .host(cli.host)
        .port(cli.port)?
        .password(cli.password)
        .timeout_ms(cli.timeout_ms)?
        .build()?;

    client.connect().await?;

    let command = cli.command.join(" ");
    info!("running {:?}", command);

    // dropping the exchange on ctrl-c closes the connection rather than
    // leaving a response half read
    let result = tokio::select!(
        res = client.execute_command(&command) => res,
        _ = signal::ctrl_c() => {
            warn!("interrupted, closing connection");
            client.disconnect().await;
            return Err("interrupted".into());
        }
    );

    client.disconnect().await;

    let body = result?;
    println!("{}", body.trim_end());
    Ok(())
}
