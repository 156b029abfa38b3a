use crate::{
    cli::args::{
        CleanupArgs, CreateArgs, DeleteArgs, DeployArgs, IdArgs, ListArgs, ListFormat,
        ResolveArgs, TestArgs, UpdateArgs,
    },
    cli::context::CommandContext,
    cli::GlobalArgs,
    core::manager::{
        CleanupOptions, Confirm, ConsoleConfirm, DeployAction, DeployOptions, FixedAnswer,
    },
    core::workflow::{load_workflow, prepare_submission, ResolveDiagnostic},
    core::ConfigLoader,
    utils::EnvManager,
    Result,
};
use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use n8n_workflow_types::WorkflowSummary;

pub async fn deploy(global: &GlobalArgs, args: DeployArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let file = ctx.workflow_file(args.file.as_deref());
    let options = DeployOptions {
        update_existing: args.update,
        activate: args.activate,
    };

    let outcome = ctx.manager()?.deploy(&file, options).await?;
    report_diagnostics(&outcome.diagnostics);

    let verb = match outcome.action {
        DeployAction::Created => "created",
        DeployAction::Updated => "updated",
    };
    println!("Workflow \"{}\" {} with ID: {}", outcome.name, verb, outcome.id);
    if outcome.activated {
        println!("Workflow {} activated.", outcome.id);
    }
    Ok(())
}

pub async fn create(global: &GlobalArgs, args: CreateArgs) -> Result<()> {
    deploy(
        global,
        DeployArgs {
            file: args.file,
            update: false,
            activate: args.activate,
        },
    )
    .await
}

pub async fn list(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let workflows = ctx.manager()?.list().await?;

    match args.format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&workflows)?),
        ListFormat::Text => print!("{}", render_workflow_table(&workflows)),
    }
    Ok(())
}

pub async fn update(global: &GlobalArgs, args: UpdateArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let file = ctx.workflow_file(args.file.as_deref());
    let outcome = ctx.manager()?.update(&args.id, &file).await?;
    report_diagnostics(&outcome.diagnostics);
    println!("Workflow \"{}\" updated (ID: {})", outcome.name, outcome.id);
    Ok(())
}

pub async fn delete(global: &GlobalArgs, args: DeleteArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let confirm = confirmation(args.force);

    let outcome = ctx.manager()?.delete(&args.id, confirm.as_ref()).await?;
    if outcome.cancelled {
        println!("Deletion cancelled.");
        return Ok(());
    }
    match outcome.name {
        Some(name) => println!("Workflow \"{}\" (ID: {}) deleted.", name, outcome.id),
        None => println!("Workflow {} deleted.", outcome.id),
    }
    Ok(())
}

pub async fn activate(global: &GlobalArgs, args: IdArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let outcome = ctx.manager()?.activate(&args.id).await?;
    println!("Workflow {} activated (active: {}).", outcome.id, outcome.active);
    Ok(())
}

pub async fn deactivate(global: &GlobalArgs, args: IdArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let outcome = ctx.manager()?.deactivate(&args.id).await?;
    println!("Workflow {} deactivated (active: {}).", outcome.id, outcome.active);
    Ok(())
}

pub async fn test(global: &GlobalArgs, args: TestArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let manager = ctx.manager()?;

    if let Some(id) = args.id {
        let outcome = manager.test(&id).await?;
        println!("Test execution of workflow {} finished:", outcome.id);
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
        return Ok(());
    }

    let path = args
        .webhook
        .ok_or_else(|| anyhow!("Either --id or --webhook is required"))?;
    let report = manager.run_test_cases(&path, &ctx.config.test_cases).await;

    for case in &report.cases {
        match (&case.detail, case.passed) {
            (_, true) => println!("PASS  {}", case.name),
            (Some(detail), false) => println!("FAIL  {}: {}", case.name, detail),
            (None, false) => println!("FAIL  {}", case.name),
        }
        if let Some(response) = &case.response {
            tracing::debug!(case = %case.name, %response, "webhook response");
        }
    }
    println!(
        "\n{} passed, {} failed ({} total)",
        report.passed(),
        report.failed(),
        report.cases.len()
    );

    if report.failed() > 0 {
        bail!("{} of {} test case(s) failed", report.failed(), report.cases.len());
    }
    Ok(())
}

pub async fn cleanup(global: &GlobalArgs, args: CleanupArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let pattern = args
        .pattern
        .or_else(|| ctx.config.default_workflow_pattern.clone())
        .ok_or_else(|| {
            anyhow!("No cleanup pattern given; pass --pattern or set default_workflow_pattern in config.yml")
        })?;

    let options = CleanupOptions {
        regex: args.regex,
        dry_run: args.dry_run,
        force: args.force,
    };
    let confirm = confirmation(args.force);

    let outcome = ctx
        .manager()?
        .cleanup(&pattern, options, confirm.as_ref())
        .await?;

    if outcome.matched.is_empty() {
        println!("No workflows match '{}'.", pattern);
        return Ok(());
    }

    println!("Workflows matching '{}':", pattern);
    for workflow in &outcome.matched {
        println!("  {} ({})", workflow.name, workflow.id);
    }

    if outcome.dry_run {
        println!("Dry run: {} workflow(s) would be deleted.", outcome.matched.len());
    } else if outcome.cancelled {
        println!("Cleanup cancelled.");
    } else {
        println!(
            "Deleted {} workflow(s), {} failed.",
            outcome.deleted,
            outcome.failed.len()
        );
        for (id, error) in &outcome.failed {
            eprintln!("  {}: {}", id, error);
        }
    }
    Ok(())
}

fn confirmation(force: bool) -> Box<dyn Confirm> {
    if force {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(ConsoleConfirm)
    }
}

/// Offline: reads no profile and needs no connection settings.
pub async fn resolve(global: &GlobalArgs, args: ResolveArgs) -> Result<()> {
    let file = match args.file {
        Some(file) => file,
        None => ConfigLoader::workflow_file(&global.config)?,
    };
    let document = load_workflow(&file)?;
    let prepared = prepare_submission(&document)?;

    let output = if args.payload {
        &prepared.payload
    } else {
        prepared
            .payload
            .get("connections")
            .ok_or_else(|| anyhow!("submission payload has no connections"))?
    };
    println!("{}", serde_json::to_string_pretty(output)?);
    report_diagnostics(&prepared.diagnostics);
    Ok(())
}

pub async fn env() -> Result<()> {
    let vars = EnvManager::relevant_vars();
    if vars.is_empty() {
        println!("No n8n environment variables are set.");
        return Ok(());
    }
    for (key, value) in vars {
        println!("{}={}", key, value);
    }
    Ok(())
}

fn report_diagnostics(diagnostics: &[ResolveDiagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
}

pub(crate) fn render_workflow_table(workflows: &[WorkflowSummary]) -> String {
    if workflows.is_empty() {
        return "No workflows found.\n".to_string();
    }

    let name_width = workflows
        .iter()
        .map(|w| w.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let id_width = workflows
        .iter()
        .map(|w| w.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = format!(
        "{:<name_width$}  {:<id_width$}  {:<6}  {:<16}  {:<16}\n",
        "NAME", "ID", "ACTIVE", "CREATED", "UPDATED"
    );
    for workflow in workflows {
        out.push_str(&format!(
            "{:<name_width$}  {:<id_width$}  {:<6}  {:<16}  {:<16}\n",
            workflow.name,
            workflow.id,
            if workflow.active { "yes" } else { "no" },
            format_timestamp(workflow.created_at),
            format_timestamp(workflow.updated_at),
        ));
    }
    out
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
