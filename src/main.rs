use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use emu::cpu::{arm7tdmi::Arm7tdmi, psr::Psr};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_NAME: &str = "armpipe.log";

/// Boots a BIOS image and steps the ARM7TDMI pipeline.
#[derive(Debug, Parser)]
#[command(version)]
struct Config {
    /// Raw image loaded at address 0.
    bios: PathBuf,

    /// Number of instructions to run after the pipeline is filled.
    #[arg(default_value_t = 16)]
    steps: usize,

    /// Also write the log to `<LOG_DIR>/armpipe.log`.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Console output always, plus a plain-text file when `log_dir` is given.
/// The returned guard flushes the file writer when dropped.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir.map(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(LOG_FILE_NAME)
            .build(dir)
    }) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        Some(Err(e)) => {
            eprintln!("cannot log to file: {e}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn main() -> ExitCode {
    println!("armpipe v0.1.0");

    let config = Config::parse();

    let _guard = init_logging(config.log_dir.as_deref());

    let bios = match fs::read(&config.bios) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("cannot read {}: {e}", config.bios.display());
            return ExitCode::from(1);
        }
    };
    tracing::info!("loaded {} bytes from {}", bios.len(), config.bios.display());

    let mut cpu: Arm7tdmi = Arm7tdmi::default();
    cpu.set_bios(&bios);

    if let Err(e) = cpu.boot_fill() {
        tracing::error!("boot failed: {e}");
        return ExitCode::from(3);
    }

    for n in 0..config.steps {
        if let Err(e) = cpu.step() {
            tracing::error!("step {n} failed: {e}");
            return ExitCode::from(3);
        }
    }

    for (reg, value) in cpu.registers() {
        println!("{reg:>3} = 0x{value:08X}");
    }
    println!("cpsr {}", Psr::from(cpu.cpsr()));
    if let Some(next) = cpu.decoded_instruction() {
        println!("next {next} ({:?})", cpu.pipeline_state());
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn bios_only() {
        let config = Config::try_parse_from(["armpipe", "gba_bios.bin"]).unwrap();

        assert_eq!(config.bios, PathBuf::from("gba_bios.bin"));
        assert_eq!(config.steps, 16);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn steps_and_log_dir() {
        let config =
            Config::try_parse_from(["armpipe", "--log-dir", "/tmp", "gba_bios.bin", "100"])
                .unwrap();

        assert_eq!(config.steps, 100);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(config.bios, PathBuf::from("gba_bios.bin"));
    }

    #[test]
    fn bad_arguments() {
        let kind = |args: &[&str]| Config::try_parse_from(args).unwrap_err().kind();

        assert_eq!(
            kind(&["armpipe"]),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(kind(&["armpipe", "bios", "many"]), ErrorKind::ValueValidation);
        assert_eq!(
            kind(&["armpipe", "bios", "--log-dir"]),
            ErrorKind::InvalidValue
        );
        assert_eq!(kind(&["armpipe", "bios", "1", "2"]), ErrorKind::UnknownArgument);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
