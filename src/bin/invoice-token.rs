use chrono::Duration;
use clap::{Parser, ValueEnum};

use invoice_api_rust::auth::{generate_jwt, ClaimSet, Permission};
use invoice_api_rust::config;

/// Mint a signed bearer token for calling the invoice API by hand.
#[derive(Parser)]
#[command(name = "invoice-token")]
#[command(version)]
struct Cli {
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, help = "HMAC secret shared with the server")]
    secret: String,

    #[arg(long = "grant", value_enum, help = "Permission to grant (repeatable, default: all)")]
    grants: Vec<Grant>,

    #[arg(long, help = "Token lifetime in hours (default: SECURITY_JWT_EXPIRY_HOURS or 24)")]
    expiry_hours: Option<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Grant {
    #[value(name = "getInvoices")]
    GetInvoices,
    #[value(name = "getInvoice")]
    GetInvoice,
    #[value(name = "createInvoice")]
    CreateInvoice,
}

impl From<Grant> for Permission {
    fn from(grant: Grant) -> Self {
        match grant {
            Grant::GetInvoices => Permission::GetInvoices,
            Grant::GetInvoice => Permission::GetInvoice,
            Grant::CreateInvoice => Permission::CreateInvoice,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // .env has to be loaded before clap reads JWT_SECRET
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let claims = if cli.grants.is_empty() {
        ClaimSet::all()
    } else {
        cli.grants.iter().copied().map(Permission::from).collect()
    };

    let hours = cli
        .expiry_hours
        .unwrap_or(config::config().security.jwt_expiry_hours as i64);

    let token = generate_jwt(&cli.secret, &claims, Duration::hours(hours))?;
    println!("{}", token);

    Ok(())
}
