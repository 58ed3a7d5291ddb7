use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::calendar::{CalendarClient, EventWindowQuery};
use crate::command::{Command, USAGE};
use crate::config::AppConfig;
use crate::formatters::{JsonFormatter, SummaryFormatter};
use crate::transport::{create_transport, Transport, TransportMode};

/// Everything a command needs besides the transport
pub struct ExecutionContext {
    pub config: AppConfig,
    pub mode: TransportMode,
    pub summary: bool,
}

impl ExecutionContext {
    pub fn new(config: AppConfig, mode: TransportMode, summary: bool) -> Self {
        Self {
            config,
            mode,
            summary,
        }
    }
}

/// Run one command: obtain the transport for the context's mode, then execute.
/// `Unknown` prints usage without touching the transport.
pub async fn dispatch<W: Write>(command: Command, ctx: &ExecutionContext, out: &mut W) -> Result<()> {
    if command == Command::Unknown {
        return print_usage(out);
    }

    let transport = create_transport(ctx.mode, &ctx.config)
        .await
        .context("Failed to obtain a calendar transport")?;

    execute(command, &transport, ctx, out).await
}

/// Execute against an already constructed transport
pub async fn execute<T: Transport, W: Write>(
    command: Command,
    transport: &T,
    ctx: &ExecutionContext,
    out: &mut W,
) -> Result<()> {
    let client = CalendarClient::new(transport, ctx.config.api_base());

    match command {
        Command::ListCalendars => execute_list_calendars(&client, out).await,
        Command::ListEvents { calendar_id, days } => {
            execute_list_events(&client, &calendar_id, days, ctx.summary, out).await
        }
        Command::Unknown => print_usage(out),
    }
}

pub fn print_usage<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "{}", USAGE).context("Failed to write usage")?;
    Ok(())
}

async fn execute_list_calendars<T: Transport, W: Write>(
    client: &CalendarClient<'_, T>,
    out: &mut W,
) -> Result<()> {
    let calendars = client
        .list_calendars()
        .await
        .context("Failed to list calendars")?;

    JsonFormatter::write_to(&calendars, out).context("Failed to write output")?;
    Ok(())
}

async fn execute_list_events<T: Transport, W: Write>(
    client: &CalendarClient<'_, T>,
    calendar_id: &str,
    days: u32,
    summary: bool,
    out: &mut W,
) -> Result<()> {
    let query = EventWindowQuery::from_now(calendar_id, days).context("Invalid event window")?;
    info!(
        "Listing events in {} from {} to {}",
        calendar_id, query.window.min, query.window.max
    );

    let events = client
        .list_events(&query)
        .await
        .with_context(|| format!("Failed to list events for calendar {}", calendar_id))?;

    JsonFormatter::write_to(&events, out).context("Failed to write output")?;
    if summary {
        writeln!(out)?;
        write!(out, "{}", SummaryFormatter::render(&events))?;
    }
    Ok(())
}
