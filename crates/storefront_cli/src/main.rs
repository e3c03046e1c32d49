//! CLI smoke entry point.
//!
//! Opens the store described by `STOREFRONT_*` environment variables and
//! prints the enveloped listing for one entity family as JSON.
//!
//! Usage: `storefront_cli [users|products|companies|categories]`
//!
//! Without an entity argument it prints the core ping/version lines instead,
//! so stdout carries nothing but the JSON document when a listing is asked for.

use log::error;
use rusqlite::Connection;
use serde::Serialize;
use storefront_core::{
    init_logging, CategoryRepository, CompanyRepository, Envelope, ProductRepository, RepoResult,
    SqliteCategoryRepository, SqliteCompanyRepository, SqliteProductRepository,
    SqliteUserRepository, StoreConfig, UserRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = StoreConfig::from_env();
    match config.log_config() {
        Ok(Some(log_config)) => {
            if let Err(err) = init_logging(&log_config) {
                eprintln!("logging disabled: {err}");
            }
        }
        Ok(None) => {}
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let Some(entity) = std::env::args().nth(1) else {
        println!("storefront_core ping={}", storefront_core::ping());
        println!("storefront_core version={}", storefront_core::core_version());
        return ExitCode::SUCCESS;
    };

    let mut conn = match config.open_store() {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=cli_open module=cli status=error error={err}");
            eprintln!("failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let Some(rendered) = render_listing(&entity, &mut conn) else {
        eprintln!("unknown entity `{entity}`; expected users|products|companies|categories");
        return ExitCode::FAILURE;
    };

    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to render response: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Lists one entity family as an enveloped JSON document; `None` for an
/// unknown family name.
fn render_listing(entity: &str, conn: &mut Connection) -> Option<serde_json::Result<String>> {
    let rendered = match entity {
        "users" => render(SqliteUserRepository::try_new(conn).and_then(|r| r.list_users())),
        "products" => {
            render(SqliteProductRepository::try_new(conn).and_then(|r| r.list_products()))
        }
        "companies" => {
            render(SqliteCompanyRepository::try_new(conn).and_then(|r| r.list_companies()))
        }
        "categories" => {
            render(SqliteCategoryRepository::try_new(conn).and_then(|r| r.list_categories()))
        }
        _ => return None,
    };
    Some(rendered)
}

fn render<T: Serialize>(result: RepoResult<T>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope::from(result))
}
