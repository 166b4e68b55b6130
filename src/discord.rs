use anyhow::Result;
use serde::Serialize;
use tracing::{error, info};

use crate::report::RunSummary;

const USERNAME: &str = "nabe";

#[derive(Serialize, Debug)]
struct DiscordField {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Serialize, Debug)]
struct DiscordEmbed {
    title: String,
    description: String,
    color: u32,
    timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<DiscordField>,
}

#[derive(Serialize, Debug)]
struct DiscordPayload {
    username: String,
    embeds: Vec<DiscordEmbed>,
}

/// Posts run notifications to a Discord webhook
pub struct DiscordWebhook {
    url: String,
    client: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Announce a finished neighborhood update with its tallies
    pub async fn send_summary(&self, source: &str, summary: &RunSummary, dry_run: bool) -> Result<()> {
        let title = if dry_run {
            "Neighborhood Update (dry run)"
        } else {
            "Neighborhood Update Complete"
        };
        let description = format!(
            "Processed **{}** restaurants from **{}**",
            summary.processed(),
            source
        );
        let success = summary.errors == 0;

        self.post(summary_embed(title, &description, summary, success)).await
    }

    async fn post(&self, embed: DiscordEmbed) -> Result<()> {
        let title = embed.title.clone();
        let payload = DiscordPayload {
            username: USERNAME.to_string(),
            embeds: vec![embed],
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            error!("Failed to send Discord notification: {}", error_text);
            anyhow::bail!("Discord notification failed: {}", error_text);
        }

        info!("Sent Discord notification: {}", title);
        Ok(())
    }
}

fn summary_embed(title: &str, description: &str, summary: &RunSummary, success: bool) -> DiscordEmbed {
    let field = |name: &str, value: usize| DiscordField {
        name: name.to_string(),
        value: value.to_string(),
        inline: true,
    };

    DiscordEmbed {
        title: title.to_string(),
        description: description.to_string(),
        color: if success { 0x00FF00 } else { 0xFF0000 },
        timestamp: chrono::Utc::now().to_rfc3339(),
        fields: vec![
            field("Updated", summary.updated),
            field("Not found", summary.not_found),
            field("Errors", summary.errors),
            field("Skipped", summary.skipped),
            field("Invalid coordinates", summary.invalid_coordinates),
            field("Outside area", summary.outside_area),
        ],
    }
}
