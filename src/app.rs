use crate::cli::{Cli, Commands};
use ffjob::{config, engine};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) {
    // init-config must work even when the current file is unreadable
    let command = match cli.command {
        Commands::InitConfig => return handle_init_config(cli.config.as_deref()),
        command => command,
    };

    let config = load_config(cli.config.as_deref());
    init_logging(&config.logging.filter);

    match command {
        Commands::DryRun { job, json } => handle_dry_run(&config, &job, json),
        Commands::Run {
            job,
            timeout,
            progress,
        } => handle_run(&config, &job, timeout, progress),
        Commands::Number { text } => handle_number(&text),
        Commands::CheckFfmpeg => handle_check_ffmpeg(&config),
        Commands::InitConfig => {}
    }
}

fn load_config(path: Option<&Path>) -> config::Config {
    let loaded = match path {
        Some(path) => config::Config::load_from(path),
        None => config::Config::load(),
    };
    match loaded {
        Ok(cfg) => cfg,
        Err(e) if path.is_some() => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Warning: {:#}", e);
            config::Config::default()
        }
    }
}

/// RUST_LOG wins over the config file's filter
fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_job_or_exit(path: &Path) -> engine::Job {
    match engine::load_job(path) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_dry_run(config: &config::Config, job_path: &Path, json: bool) {
    let job = load_job_or_exit(job_path);

    let args = match engine::build_args(&job) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(args.args()) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                process::exit(1);
            }
        }
        return;
    }

    for (key, value) in args.env_vars() {
        println!("# env {}={}", key, value);
    }
    let program = config.ffmpeg.binary_path.to_string_lossy();
    println!("{}", engine::format_ffmpeg_cmd(&program, &args));
}

fn handle_run(config: &config::Config, job_path: &Path, timeout: Option<u64>, progress: bool) {
    let job = load_job_or_exit(job_path);

    let ctx = match timeout
        .map(Duration::from_secs)
        .or_else(|| config.ffmpeg.timeout())
    {
        Some(limit) => engine::ExecContext::with_timeout(limit),
        None => engine::ExecContext::new(),
    };

    let mut ffmpeg = engine::Ffmpeg::new(config.ffmpeg.binary_path.clone());
    if progress {
        ffmpeg.set_observer(Box::new(engine::StderrProgress::new(
            config.ffmpeg.progress_period(),
            print_progress,
        )));
    }

    let result = ffmpeg.exec(&ctx, &job);
    if progress {
        println!();
    }

    match result {
        Ok(()) => println!("Done"),
        Err(e) => {
            let stderr = e.stderr().map(str::to_owned);
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            if let Some(stderr) = stderr.filter(|s| !s.trim().is_empty()) {
                eprintln!("--- ffmpeg stderr ---\n{}", stderr.trim_end());
            }
            process::exit(1);
        }
    }
}

fn print_progress(stats: &engine::Stats) {
    let mut line = String::from("\rProgress:");
    if let Some(time) = stats.out_time_s {
        line.push_str(&format!(" time {:.1}s", time));
    }
    if let Some(frame) = stats.frame {
        line.push_str(&format!(" | frame {}", frame));
    }
    if let Some(fps) = stats.fps {
        line.push_str(&format!(" | FPS: {:.1}", fps));
    }
    if let Some(speed) = stats.speed {
        line.push_str(&format!(" | Speed: {:.2}x", speed));
    }
    print!("{}", line);
    std::io::stdout().flush().ok();
}

fn handle_number(text: &str) {
    match text.parse::<engine::Number>() {
        Ok(number) => {
            println!("{}", number);
            println!("{}", number.to_absolute());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_check_ffmpeg(config: &config::Config) {
    match engine::ffmpeg_version(&config.ffmpeg.binary_path) {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_init_config(path: Option<&Path>) {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => match config::Config::config_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                process::exit(1);
            }
        },
    };

    match config::Config::ensure_default_at(&path) {
        Ok(true) => {
            println!("Default config saved to {}", path.display());
            return;
        }
        Ok(false) => {}
        Err(e) => {
            eprintln!("Failed to save default config: {:#}", e);
            process::exit(1);
        }
    }

    match config::Config::load_from(&path) {
        Ok(cfg) => {
            println!("Config loaded successfully from {}", path.display());
            println!("{:#?}", cfg);
        }
        Err(e) => {
            eprintln!("Config invalid: {:#}", e);
            process::exit(1);
        }
    }
}
