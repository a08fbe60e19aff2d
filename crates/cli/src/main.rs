use std::io::BufRead;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use folio_server::auth::hash_password;
use folio_server::ServerConfig;

const DEFAULT_CONFIG_PATH: &str = "crates/server/res/config.toml";

#[derive(Parser)]
#[command(author, version, about = "folio ops CLI")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate config.toml against its schema and semantic checks.
    Validate {
        /// Path to config.toml (defaults to SERVER_CONFIG_PATH or
        /// crates/server/res/config.toml).
        config_path: Option<PathBuf>,
    },
    /// Print an argon2 hash for ADMIN_PASSWORD_HASH.
    HashPassword {
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove the SQLite file and uploaded images.
    Clean {
        config_path: Option<PathBuf>,
        /// Required to perform destructive actions.
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    match args.command {
        Command::Validate { config_path } => {
            let cfg_path = pick_config_path(config_path);
            let config = ServerConfig::load(&cfg_path)
                .await
                .map_err(|e| e.to_string())?;

            println!(
                "ok: config validated at {} (mode {:?}, listening on {}:{})",
                cfg_path.display(),
                config.app.mode,
                config.http.host,
                config.http.port
            );
        }
        Command::HashPassword { password } => {
            let password = match password {
                Some(p) => p,
                None => read_stdin_line()?,
            };
            if password.is_empty() {
                return Err("password must not be empty".to_string());
            }
            println!("{}", hash_password(&password)?);
        }
        Command::Clean {
            config_path,
            confirm,
        } => {
            if !confirm {
                return Err("refusing to clean without --confirm".to_string());
            }

            let cfg_path = pick_config_path(config_path);
            let config = ServerConfig::load(&cfg_path)
                .await
                .map_err(|e| e.to_string())?;
            let base_dir = cfg_path
                .parent()
                .ok_or_else(|| "config path has no parent".to_string())?;

            if config.database.sqlite_path.trim() != ":memory:" {
                let db_path = config.sqlite_path(base_dir);
                remove_file(&db_path)?;
                for suffix in ["-wal", "-shm"] {
                    let mut sidecar = db_path.clone().into_os_string();
                    sidecar.push(suffix);
                    remove_file(Path::new(&sidecar))?;
                }
            }

            let uploads = config.uploads_dir(base_dir);
            if let Err(e) = std::fs::remove_dir_all(&uploads) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(format!("failed to remove uploads directory: {e}"));
                }
            }

            println!("ok: cleaned local artifacts");
        }
    }

    Ok(())
}

fn remove_file(path: &Path) -> Result<(), String> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("failed to remove {}: {e}", path.display())),
    }
}

fn read_stdin_line() -> Result<String, String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("failed to read password from stdin: {e}"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn pick_config_path(arg: Option<PathBuf>) -> PathBuf {
    if let Some(p) = arg {
        return p;
    }

    // Flags win, then SERVER_CONFIG_PATH, then the repo-local default.
    if let Ok(p) = std::env::var("SERVER_CONFIG_PATH") {
        if !p.trim().is_empty() {
            return PathBuf::from(p);
        }
    }

    PathBuf::from(DEFAULT_CONFIG_PATH)
}
