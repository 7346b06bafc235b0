//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pickrap_core` linkage and storage bootstrap.
//! - Offer a few read/write probes against the configured database.
//!
//! Usage: `pickrap_cli [register <email> | categories <email>]`

use log::error;
use pickrap_core::db::migrations::current_user_version;
use pickrap_core::db::open_db;
use pickrap_core::{init_logging, CategoryService, CoreConfig, MemberService, NoopLinkPreviewFetcher};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("pickrap_core ping={}", pickrap_core::ping());
    println!("pickrap_core version={}", pickrap_core::core_version());

    match run(&config, std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig, args: Vec<String>) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| format!("db open failed: {err}"))?;
    let schema = current_user_version(&conn).map_err(|err| err.to_string())?;
    println!("db path={} schema={schema}", config.db_path.display());

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => Ok(()),
        ["register", email] => {
            let service = MemberService::from_connection(&conn).map_err(|err| err.to_string())?;
            let member = service
                .register(email)
                .map_err(|err| format!("[{}] {err}", err.code()))?;
            println!("member id={} email={}", member.id, member.email);
            Ok(())
        }
        ["categories", email] => {
            let service = CategoryService::from_connection(&conn, NoopLinkPreviewFetcher)
                .map_err(|err| err.to_string())?;
            let previews = service
                .find_member_categories_scrap(email)
                .map_err(|err| format!("[{}] {err}", err.code()))?;
            for category in previews {
                let latest = category
                    .latest_scrap
                    .map(|scrap| scrap.kind.as_db_str())
                    .unwrap_or("-");
                println!("category id={} name={} latest={latest}", category.id, category.name);
            }
            Ok(())
        }
        _ => Err("usage: pickrap_cli [register <email> | categories <email>]".to_string()),
    }
}
