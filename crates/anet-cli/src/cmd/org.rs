use crate::output::{print_fields, print_json, print_table};
use crate::Remote;
use anet_client::pages::OrganizationEditor;
use anet_client::Navigation;
use anet_core::form::Form;
use anet_core::models::{Model, Organization};
use anet_core::settings::Settings;
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Subcommand)]
pub enum OrgSubcommand {
    /// Show one organization
    Show { uuid: String },

    /// Create an organization
    Create {
        #[command(flatten)]
        fields: OrgFields,

        /// Add an approval step with this name (repeatable)
        #[arg(long = "step")]
        steps: Vec<String>,
    },

    /// Change fields of an existing organization
    Update {
        uuid: String,

        #[command(flatten)]
        fields: OrgFields,
    },
}

#[derive(Args)]
pub struct OrgFields {
    #[arg(long)]
    short_name: Option<String>,

    #[arg(long)]
    long_name: Option<String>,

    #[arg(long)]
    identification_code: Option<String>,

    /// ADVISOR_ORG or PRINCIPAL_ORG
    #[arg(long = "type")]
    org_type: Option<String>,

    /// ACTIVE or INACTIVE
    #[arg(long)]
    status: Option<String>,
}

impl OrgFields {
    fn apply(&self, form: &mut Form<Organization>) -> anyhow::Result<()> {
        let pairs = [
            ("shortName", &self.short_name),
            ("longName", &self.long_name),
            ("identificationCode", &self.identification_code),
            ("type", &self.org_type),
            ("status", &self.status),
        ];
        for (id, value) in pairs {
            if let Some(value) = value {
                form.set(id, value)?;
            }
        }
        Ok(())
    }
}

pub fn run(
    settings: Option<&Path>,
    remote: &Remote,
    subcmd: OrgSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let settings = super::load_settings(settings)?;
    let client = remote.client();
    let rt = super::runtime()?;

    match subcmd {
        OrgSubcommand::Show { uuid } => {
            let form = rt.block_on(OrganizationEditor::load(&client, &uuid))?;
            show(form.model(), &settings, json)
        }
        OrgSubcommand::Create { fields, steps } => {
            let mut form = OrganizationEditor::new_organization();
            fields.apply(&mut form)?;
            for name in steps {
                let org = form.model_mut();
                let index = org.add_approval_step();
                org.set_step_name(index, name)?;
            }
            let nav = rt.block_on(OrganizationEditor::submit(&client, &mut form, false));
            report(nav, json)
        }
        OrgSubcommand::Update { uuid, fields } => {
            let mut form = rt.block_on(OrganizationEditor::load(&client, &uuid))?;
            fields.apply(&mut form)?;
            let nav = rt.block_on(OrganizationEditor::submit(&client, &mut form, true));
            report(nav, json)
        }
    }
}

fn show(org: &Organization, settings: &Settings, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(org);
    }

    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    print_fields(&[
        ("uuid", org.uuid.clone().unwrap_or_default()),
        ("name", or_dash(&org.short_name)),
        ("description", or_dash(&org.long_name)),
        (
            "code",
            or_dash(org.identification_code.as_deref().unwrap_or_default()),
        ),
        ("type", org.type_name(settings).to_string()),
        ("status", org.status.label().to_string()),
        (
            "parent",
            org.parent_org
                .as_deref()
                .map(|p| p.display_name())
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("link", org.path_for().unwrap_or_default()),
    ]);

    if !org.approval_steps.is_empty() {
        println!();
        print_table(
            &["Step", "Approvers"],
            org.approval_steps
                .iter()
                .map(|step| {
                    let approvers: Vec<String> =
                        step.approvers.iter().map(|p| p.display_name()).collect();
                    vec![step.name.clone(), approvers.join(", ")]
                })
                .collect(),
        );
    }
    Ok(())
}

fn report(nav: anet_client::Result<Navigation>, json: bool) -> anyhow::Result<()> {
    match nav {
        Ok(nav) => {
            if json {
                print_json(&nav)?;
            } else {
                println!("{}", nav.success);
                println!("view: {}", nav.push);
                println!("edit: {}", nav.replace);
            }
            Ok(())
        }
        Err(e) => anyhow::bail!(e.display_message()),
    }
}
