use anyhow::Context;
use gh_pr_projects::action::{self, ActionContext, PROJECTS_OUTPUT};
use gh_pr_projects::{logger, DesiredTitles, ProjectsAssigner, StatusDefaults};
use gh_projects_client::{build_client, RetryPolicy, TokenResolver};
use gh_projects_config::AppConfig;

#[tokio::main]
async fn main() {
    // Local runs: pick up GITHUB_TOKEN and friends from .env
    if std::env::var("GITHUB_TOKEN").is_err() {
        dotenvy::dotenv().ok();
    }

    logger::init();
    log::info!("Starting gh-pr-projects");

    if let Err(err) = run().await {
        log::error!("{:#}", err);
        println!("{}", action::error_annotation(&format!("{:#}", err)));
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let context = ActionContext::from_env()?;
    let config = match &context.config_path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    // Titles are validated before any remote call
    let desired = DesiredTitles::parse(&context.projects_input)?;

    log::info!(
        "Reconciling projects of {}/{} pull request {} ({}) against {} titles",
        context.owner,
        context.repository,
        context
            .pull_request_number
            .map(|n| format!("#{}", n))
            .unwrap_or_else(|| "?".to_string()),
        context.pull_request_id,
        desired.len()
    );
    if desired.is_empty() {
        log::warn!("No projects requested, the pull request will be removed from all projects");
    }

    let api_url = context.api_url.as_deref().or(config.api_url.as_deref());
    let policy = RetryPolicy {
        retries: config.read_retries,
        delay: config.retry_delay(),
    };
    let client = build_client(api_url, &TokenResolver::new(), policy)
        .await
        .context("Failed to create GitHub client")?;

    let assigner = ProjectsAssigner::new(client, &context.owner, &context.repository)
        .with_status(StatusDefaults {
            field: config.status_field.clone(),
            option: config.default_status.clone(),
        });

    let assigned = assigner.assign(&context.pull_request_id, &desired).await?;
    let titles = action::format_titles(&assigned);

    log::info!("Pull request is assigned to: {}", titles);
    action::set_output(context.output_path.as_deref(), PROJECTS_OUTPUT, &titles)?;

    log::info!("Exiting gh-pr-projects");
    Ok(())
}
