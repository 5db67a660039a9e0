mod check_cmd;
mod cli;
mod compile_cmd;
mod config;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Compile(args) => {
            init_tracing(args.verbose);
            compile_cmd::run(args)
        }
        cli::Command::Check(args) => {
            init_tracing(args.verbose);
            check_cmd::run(args)
        }
    }
}

fn init_tracing(verbose: bool) {
    if !verbose {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("entsql.compile=debug"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
