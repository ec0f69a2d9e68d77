//! contentdesk-cli: list, inspect, create and update content on a contentdesk
//! server over its HTTP API.
//!
//! ```bash
//! contentdesk-cli create --title "Launch" --description "Q3 launch" \
//!     --content "..." --category launch --platform LinkedIn
//! contentdesk-cli update 64b7f0c2a1b2c3d4e5f60718 --set engagementMetrics.views=120
//! ```

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde::de::DeserializeOwned;

use contentdesk::api::envelope::Envelope;
use contentdesk::models::catalog::Catalog;
use contentdesk::models::content::Content;
use contentdesk::models::draft::{patch_from_assignments, split_assignment, ContentDraft};
use contentdesk::models::validation::ValidationErrors;

#[derive(Parser, Debug)]
#[command(name = "contentdesk-cli", version, about = "Manage content on a contentdesk server")]
struct Cli {
    /// Base URL of the contentdesk server
    #[arg(
        long,
        env = "CONTENTDESK_URL",
        default_value = "http://127.0.0.1:3000",
        global = true
    )]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all content, newest first
    List {
        /// Print raw JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Show one content record
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a content record
    Create(CreateArgs),
    /// Update fields of an existing record
    Update(UpdateArgs),
    /// Print the allowed content types, formats, platforms and suggested patterns
    Options,
}

#[derive(Parser, Debug)]
struct CreateArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    /// Body text
    #[arg(long)]
    content: String,

    /// Category tag (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Marketing pattern (repeatable)
    #[arg(long = "pattern")]
    patterns: Vec<String>,

    #[arg(long)]
    content_type: Option<String>,

    #[arg(long)]
    format: Option<String>,

    #[arg(long)]
    platform: Option<String>,

    /// Extra `field=value` assignments, e.g. `engagementMetrics.views=10`
    #[arg(long = "set")]
    assignments: Vec<String>,
}

#[derive(Parser, Debug)]
struct UpdateArgs {
    id: String,

    /// `field=value` assignments (repeatable)
    #[arg(long = "set", required = true)]
    assignments: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    match cli.command {
        Command::List { json } => run_list(&client, &cli.url, json).await,
        Command::Show { id, json } => run_show(&client, &cli.url, &id, json).await,
        Command::Create(args) => run_create(&client, &cli.url, args).await,
        Command::Update(args) => run_update(&client, &cli.url, args).await,
        Command::Options => run_options(&client, &cli.url).await,
    }
}

async fn run_list(client: &Client, base: &str, json: bool) -> Result<()> {
    let response = client
        .get(endpoint(base, "/content"))
        .send()
        .await
        .context("Failed to reach contentdesk server")?;
    let contents: Vec<Content> = handle_response(response).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contents)?);
    } else if contents.is_empty() {
        println!("(no content)");
    } else {
        for content in &contents {
            println!("{}\n", render_card(content));
        }
    }
    Ok(())
}

async fn run_show(client: &Client, base: &str, id: &str, json: bool) -> Result<()> {
    let response = client
        .get(endpoint(base, &format!("/content/{id}")))
        .send()
        .await
        .context("Failed to reach contentdesk server")?;
    let content: Content = handle_response(response).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
    } else {
        println!("{}", render_card(&content));
    }
    Ok(())
}

async fn run_create(client: &Client, base: &str, args: CreateArgs) -> Result<()> {
    let draft = build_draft(&args)?;
    draft.validate().map_err(|e| invalid(&e))?;

    let response = client
        .post(endpoint(base, "/content"))
        .json(&draft.to_fields())
        .send()
        .await
        .context("Failed to reach contentdesk server")?;
    let created: Content = handle_response(response).await?;

    println!("✓ Created {} (id: {})", created.title, created.id);
    Ok(())
}

async fn run_update(client: &Client, base: &str, args: UpdateArgs) -> Result<()> {
    let patch = patch_from_assignments(args.assignments.iter().map(String::as_str))?;

    let response = client
        .put(endpoint(base, &format!("/content/{}", args.id)))
        .json(&patch)
        .send()
        .await
        .context("Failed to reach contentdesk server")?;
    let updated: Content = handle_response(response).await?;

    println!("✓ Updated {} (id: {})", updated.title, updated.id);
    Ok(())
}

async fn run_options(client: &Client, base: &str) -> Result<()> {
    let response = client
        .get(endpoint(base, "/content/options"))
        .send()
        .await
        .context("Failed to reach contentdesk server")?;
    let catalog: Catalog = handle_response(response).await?;

    println!("Content types:      {}", catalog.content_types.join(", "));
    println!("Formats:            {}", catalog.formats.join(", "));
    println!("Platforms:          {}", catalog.platforms.join(", "));
    println!("Marketing patterns: {}", catalog.marketing_patterns.join(", "));
    Ok(())
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Unwrap a `{success, data}` envelope, turning failures into errors that
/// carry the server's message.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await.context("Failed to read response")?;

    let envelope: Envelope<T> = match serde_json::from_str(&text) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => bail!("{}: {}", status, text),
        Err(e) => return Err(e).context("Failed to parse response"),
    };

    match envelope.data {
        Some(data) if envelope.success => Ok(data),
        _ => Err(anyhow!("{}: {}", status, describe_failure(&envelope))),
    }
}

fn describe_failure<T>(envelope: &Envelope<T>) -> String {
    if let Some(message) = &envelope.message {
        return message.clone();
    }
    match &envelope.error {
        Some(serde_json::Value::String(error)) => error.clone(),
        Some(error) => {
            let mut lines = vec![error["message"].as_str().unwrap_or("Request failed").to_string()];
            if let Some(violations) = error["errors"].as_array() {
                for violation in violations {
                    lines.push(format!(
                        "  - {}: {}",
                        violation["field"].as_str().unwrap_or("?"),
                        violation["message"].as_str().unwrap_or("invalid")
                    ));
                }
            }
            lines.join("\n")
        }
        None => "Request failed".to_string(),
    }
}

fn invalid(errors: &ValidationErrors) -> anyhow::Error {
    let lines: Vec<String> = errors
        .violations()
        .iter()
        .map(|v| format!("  - {}: {}", v.field(), v))
        .collect();
    anyhow!("Content is not valid:\n{}", lines.join("\n"))
}

fn build_draft(args: &CreateArgs) -> Result<ContentDraft> {
    let mut draft = ContentDraft::new();
    draft.set_field("title", &args.title)?;
    draft.set_field("description", &args.description)?;
    draft.set_field("content", &args.content)?;

    if let Some(content_type) = &args.content_type {
        draft.set_field("contentType", content_type)?;
    }
    if let Some(format) = &args.format {
        draft.set_field("format", format)?;
    }
    if let Some(platform) = &args.platform {
        draft.set_field("platform", platform)?;
    }

    for category in &args.categories {
        draft.add_category(category);
    }
    for pattern in &args.patterns {
        draft.add_pattern(pattern);
    }

    for assignment in &args.assignments {
        let (name, value) = split_assignment(assignment)?;
        draft.set_field(name, value)?;
    }

    Ok(draft)
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn render_card(content: &Content) -> String {
    let metrics = &content.engagement_metrics;
    [
        format!("┌─ {}", content.title),
        format!("│  {}", content.description),
        format!(
            "│  {} · {} · {}",
            content.content_type, content.format, content.platform
        ),
        format!("│  Created {}", format_date(&content.created_at)),
        format!(
            "│  Categories: {}",
            list_or(&content.categories, "No categories")
        ),
        format!(
            "│  Patterns: {}",
            list_or(&content.marketing_patterns, "No patterns")
        ),
        format!(
            "│  Views {} · Likes {} · Shares {} · Comments {} · Conversion {}%",
            metrics.views, metrics.likes, metrics.shares, metrics.comments, metrics.conversion_rate
        ),
        format!("└─ id: {}", content.id),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use contentdesk::models::catalog::{ContentType, Format, Platform};
    use contentdesk::models::content::EngagementMetrics;

    fn sample() -> Content {
        let created = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        Content {
            id: "64b7f0c2a1b2c3d4e5f60718".to_string(),
            title: "Spring launch".to_string(),
            description: "Teaser post".to_string(),
            content: "Body".to_string(),
            categories: vec![],
            content_type: ContentType::CaseStudy,
            format: Format::Pdf,
            platform: Platform::LinkedIn,
            marketing_patterns: vec!["Storytelling".to_string()],
            engagement_metrics: EngagementMetrics {
                views: 1200,
                likes: 40,
                shares: 7,
                comments: 3,
                conversion_rate: 2.5,
            },
            created_at: created,
            updated_at: created,
        }
    }

    fn create_args(extra: &[&str]) -> CreateArgs {
        let mut argv = vec![
            "contentdesk-cli",
            "create",
            "--title",
            "Launch",
            "--description",
            "Q3 launch",
            "--content",
            "Body",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Create(args) => args,
            other => panic!("Expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_card_rendering() {
        let card = render_card(&sample());
        assert!(card.contains("Case Study · PDF · LinkedIn"));
        assert!(card.contains("Created Mar 5, 2024"));
        assert!(card.contains("No categories"));
        assert!(card.contains("Patterns: Storytelling"));
        assert!(card.contains("Conversion 2.5%"));
    }

    #[test]
    fn test_card_without_patterns() {
        let mut content = sample();
        content.marketing_patterns.clear();
        content.categories = vec!["launch".to_string(), "q3".to_string()];

        let card = render_card(&content);
        assert!(card.contains("No patterns"));
        assert!(card.contains("Categories: launch, q3"));
    }

    #[test]
    fn test_url_defaults_and_override() {
        let command = <Cli as clap::CommandFactory>::command();
        let url = command
            .get_arguments()
            .find(|arg| arg.get_id() == "url")
            .unwrap();
        let defaults: Vec<_> = url
            .get_default_values()
            .iter()
            .map(|v| v.to_string_lossy())
            .collect();
        assert_eq!(defaults, ["http://127.0.0.1:3000"]);
        assert_eq!(url.get_env(), Some(std::ffi::OsStr::new("CONTENTDESK_URL")));

        let cli =
            Cli::try_parse_from(["contentdesk-cli", "list", "--url", "http://cms:8080/"]).unwrap();
        assert_eq!(cli.url, "http://cms:8080/");
        assert_eq!(endpoint(&cli.url, "/content"), "http://cms:8080/content");
    }

    #[test]
    fn test_no_delete_command() {
        assert!(Cli::try_parse_from(["contentdesk-cli", "delete", "abc"]).is_err());
    }

    #[test]
    fn test_update_requires_assignments() {
        assert!(Cli::try_parse_from(["contentdesk-cli", "update", "abc"]).is_err());
    }

    #[test]
    fn test_build_draft_applies_flags() {
        let args = create_args(&[
            "--category",
            "launch",
            "--category",
            "launch",
            "--pattern",
            "Seasonal",
            "--platform",
            "YouTube",
            "--format",
            "Video",
            "--set",
            "engagementMetrics.views=10",
        ]);
        let draft = build_draft(&args).unwrap();

        assert_eq!(draft.categories(), ["launch"]);
        assert_eq!(draft.marketing_patterns(), ["Seasonal"]);

        let valid = draft.validate().unwrap();
        assert_eq!(valid.platform, Platform::YouTube);
        assert_eq!(valid.format, Format::Video);
        assert_eq!(valid.content_type, ContentType::Blog);
        assert_eq!(valid.engagement_metrics.views, 10);
    }

    #[test]
    fn test_build_draft_rejects_unknown_field() {
        let args = create_args(&["--set", "author=me"]);
        assert!(build_draft(&args).is_err());
    }

    #[test]
    fn test_invalid_draft_lists_fields() {
        let args = create_args(&["--platform", "MySpace"]);
        let draft = build_draft(&args).unwrap();
        let err = invalid(&draft.validate().unwrap_err());
        assert!(err.to_string().contains("platform"));
    }

    #[test]
    fn test_describe_failures() {
        let not_found: Envelope<Content> =
            serde_json::from_str(r#"{"success": false, "message": "Content not found"}"#).unwrap();
        assert_eq!(describe_failure(&not_found), "Content not found");

        let db: Envelope<Content> =
            serde_json::from_str(r#"{"success": false, "error": "Error connecting to database"}"#)
                .unwrap();
        assert_eq!(describe_failure(&db), "Error connecting to database");

        let validation: Envelope<Content> = serde_json::from_str(
            r#"{"success": false, "error": {"name": "ValidationError", "message": "title is required",
                "errors": [{"field": "title", "message": "title is required"}]}}"#,
        )
        .unwrap();
        let text = describe_failure(&validation);
        assert!(text.starts_with("title is required"));
        assert!(text.contains("  - title: title is required"));
    }
}
