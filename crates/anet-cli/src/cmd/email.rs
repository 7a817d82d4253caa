use crate::output::print_json;
use anet_core::email::EmailPolicy;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum EmailSubcommand {
    /// Check a recipient list such as `a@nato.int, "B" <b@cmil.mil>`
    Check {
        /// Addresses; separate several with ',' or ';'
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

pub fn run(settings: Option<&Path>, subcmd: EmailSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        EmailSubcommand::Check { addresses } => check(settings, &addresses.join(", "), json),
    }
}

fn check(settings: Option<&Path>, addressees: &str, json: bool) -> anyhow::Result<()> {
    let settings = super::load_settings(settings)?;
    let policy = EmailPolicy::from_settings(&settings);

    match policy.parse_email_addresses(addressees) {
        Ok(addresses) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": true,
                    "addresses": addresses,
                }))?;
            } else {
                for address in &addresses {
                    println!("ok  {address}");
                }
            }
            Ok(())
        }
        Err(e) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": false,
                    "message": e.to_string(),
                }))?;
            }
            anyhow::bail!(e)
        }
    }
}
