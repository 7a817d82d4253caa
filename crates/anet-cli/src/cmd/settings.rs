use crate::output::{print_json, print_table};
use anet_core::settings::{Settings, WarnLevel};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Check the dictionary for problems
    Validate,

    /// Print the effective dictionary
    Show,

    /// Write the built-in dictionary to a file
    Init {
        /// Destination file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(settings: Option<&Path>, subcmd: SettingsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SettingsSubcommand::Validate => validate(settings, json),
        SettingsSubcommand::Show => show(settings, json),
        SettingsSubcommand::Init { path, force } => init(&path, force),
    }
}

fn validate(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let settings = super::load_settings(path)?;
    let warnings = settings.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Settings are valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "[warning]",
                WarnLevel::Error => "[error]",
            };
            println!("{prefix} {}", w.message);
        }
    }

    let errors = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("settings have {errors} error(s)");
    }
    Ok(())
}

fn show(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let settings = super::load_settings(path)?;
    if json {
        return print_json(&settings);
    }

    print_table(
        &["Allowed domain"],
        settings
            .domain_names
            .iter()
            .map(|d| vec![d.clone()])
            .collect(),
    );
    println!();
    println!(
        "support email: {}",
        settings.support_email_addr.as_deref().unwrap_or("-")
    );
    println!("advisor org:   {}", settings.fields.advisor.org.name);
    println!("principal org: {}", settings.fields.principal.org.name);
    Ok(())
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Settings::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
