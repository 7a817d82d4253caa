use crate::output::{print_json, print_table};
use crate::Remote;
use anet_client::pages::SubscriptionsPage;

pub fn run(remote: &Remote, page: i64, json: bool) -> anyhow::Result<()> {
    if page < 1 {
        anyhow::bail!("--page starts at 1");
    }
    let client = remote.client();
    let rt = super::runtime()?;
    let result = rt.block_on(SubscriptionsPage::fetch(&client, page - 1))?;
    let rows = SubscriptionsPage::rows(&result);

    if json {
        return print_json(&serde_json::json!({
            "pageNum": result.page_num,
            "pageSize": result.page_size,
            "totalCount": result.total_count,
            "subscriptions": rows,
        }));
    }

    if rows.is_empty() {
        println!("No subscriptions found.");
        return Ok(());
    }

    print_table(
        &["Updated", "Type", "Subscription", "Link"],
        rows.into_iter()
            .map(|r| {
                vec![
                    r.updated_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default(),
                    r.kind,
                    r.label,
                    r.link.unwrap_or_default(),
                ]
            })
            .collect(),
    );
    println!();
    println!("page {} of {}", result.display_page(), result.num_pages().max(1));
    Ok(())
}
