use std::{env, io::Write, process::ExitCode};

use env_logger::{Builder, Env, Target};
use log::{error, LevelFilter};
use shelter::cli::{self, Command};

fn setup_logging(level: LevelFilter) {
    // RUST_LOG still wins over the command line
    Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} {} {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn main() -> ExitCode {
    let command = match cli::parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };

    let args = match command {
        Command::Help => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("{}", cli::version());
            return ExitCode::SUCCESS;
        }
        Command::Run(args) => args,
    };

    setup_logging(args.log_level);
    match args.into_shelter().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
