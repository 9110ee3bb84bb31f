use std::collections::HashMap;
use std::path::Path;

use futures::future::join_all;

use crate::app::{AppContext, CourtsideError, Result};
use crate::domain::{GameSnapshot, PageKind, PbpEvent};
use crate::poller::{spawn_poller, PollConfig, PollStatus, PollUpdate, PollerGroup};
use crate::store::SnapshotStore;

pub async fn watch(ctx: &AppContext, inputs: &[String], fresh: bool) -> Result<()> {
    let games = ctx.resolve_games(inputs)?;
    let mut last_sequences = HashMap::new();
    let mut handles = Vec::with_capacity(games.len());

    for game in games {
        let state = ctx.start_state(&game, fresh)?;
        last_sequences.insert(
            game.game_id.clone(),
            state
                .last_snapshot
                .as_ref()
                .map_or(0, GameSnapshot::last_sequence),
        );
        println!("Watching game {} at {}", game.game_id, game.base_url);
        handles.push(spawn_poller(ctx.pipeline(game)?, state));
    }

    let mut group = PollerGroup::new(handles);
    let tagged = group.len() > 1;
    println!(
        "Polling every {} (Ctrl-C to stop)",
        PollConfig::format_interval(ctx.config.poll.interval())
    );

    loop {
        tokio::select! {
            update = group.recv() => match update {
                Some(update) => {
                    let last_sequence = last_sequences.entry(update.game_id.clone()).or_default();
                    print_update(&update, last_sequence, tagged);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping...");
                break;
            }
        }
    }

    for (game_id, state) in group.shutdown().await {
        println!("Stopped game {} after {} poll cycles", game_id, state.iteration);
    }
    Ok(())
}

pub async fn snapshot(ctx: &AppContext, inputs: &[String], json: bool) -> Result<()> {
    let games = ctx.resolve_games(inputs)?;

    let polls = games.into_iter().map(|game| async move {
        let game_id = game.game_id.clone();
        let state = ctx.resume_state(&game)?;

        let pipeline = ctx.pipeline(game)?;
        let (state, status) = pipeline.poll_once(state).await;
        pipeline.close().await;

        Ok::<_, CourtsideError>(match (status, state.last_snapshot) {
            (PollStatus::Live { .. }, Some(snapshot)) => Ok(snapshot),
            _ => Err(game_id),
        })
    });

    let mut live = Vec::new();
    let mut missing = Vec::new();
    for result in join_all(polls).await {
        match result? {
            Ok(snapshot) => live.push(snapshot),
            Err(game_id) => missing.push(game_id),
        }
    }

    if json && live.len() > 1 {
        println!("{}", serde_json::to_string_pretty(&live)?);
    } else {
        for (i, snapshot) in live.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_snapshot(snapshot, json)?;
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CourtsideError::Other(format!(
            "No data for game {} this time, try again shortly",
            missing.join(", ")
        )))
    }
}

pub fn show(ctx: &AppContext, input: &str, json: bool) -> Result<()> {
    let game = ctx.resolve_game(input)?;
    let snapshot = ctx
        .store
        .load_snapshot(&game.game_id)?
        .ok_or_else(|| CourtsideError::GameNotFound(game.game_id.clone()))?;
    print_snapshot(&snapshot, json)
}

pub fn list_games(ctx: &AppContext) -> Result<()> {
    let games = ctx.store.list_games()?;

    if games.is_empty() {
        println!("No stored games");
        return Ok(());
    }

    for game in games {
        println!(
            "{:>10}  {} {} - {} {}  ({} events, {} polls, updated {})",
            game.game_id,
            game.home_team.as_deref().unwrap_or("Home"),
            game.score.home,
            game.score.away,
            game.away_team.as_deref().unwrap_or("Away"),
            game.event_count,
            game.iteration,
            game.updated_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

pub fn remove_game(ctx: &AppContext, input: &str) -> Result<()> {
    let game = ctx.resolve_game(input)?;
    ctx.store.delete_game(&game.game_id)?;
    println!("Removed game: {}", game.game_id);
    Ok(())
}

pub fn parse_file(ctx: &AppContext, path: &Path, kind: Option<&str>) -> Result<()> {
    let kind = match kind {
        Some(k) => k.parse::<PageKind>().map_err(CourtsideError::Other)?,
        None => PageKind::from_url(&path.to_string_lossy()),
    };
    if kind == PageKind::Unknown {
        return Err(CourtsideError::Other(format!(
            "Cannot tell the page kind of {}, pass --kind",
            path.display()
        )));
    }

    let markup = std::fs::read_to_string(path)?;
    let partial = ctx.parser.parse(&markup, kind);
    println!("{}", serde_json::to_string_pretty(&partial)?);
    Ok(())
}

fn print_update(update: &PollUpdate, last_sequence: &mut u32, tagged: bool) {
    let label = update_label(update, tagged);
    match (&update.status, &update.snapshot) {
        (PollStatus::Live { .. }, Some(snapshot)) => {
            println!("{} {} | {}", label, update.status, scoreline(snapshot));
            for event in snapshot.events.iter().filter(|e| e.sequence > *last_sequence) {
                println!("    {}", format_event(event));
            }
            *last_sequence = snapshot.last_sequence();
        }
        (status, _) => println!("{} {}", label, status),
    }
}

/// `[3]` for a single game, `[2799694 #3]` when several share the output
fn update_label(update: &PollUpdate, tagged: bool) -> String {
    if tagged {
        format!("[{} #{}]", update.game_id, update.iteration)
    } else {
        format!("[{}]", update.iteration)
    }
}

fn print_snapshot(snapshot: &GameSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    println!("{}", scoreline(snapshot));

    if !snapshot.periods.is_empty() {
        println!();
        for line in &snapshot.periods {
            println!("  {:<6} {:>4} {:>4}", line.label, line.home, line.away);
        }
    }

    for (category, entries) in &snapshot.leaders {
        println!();
        println!("  {}", category);
        for entry in entries {
            println!(
                "    {}. {:<24} #{:<3} {:>4}  ({})",
                entry.rank, entry.player, entry.number, entry.value, entry.team
            );
        }
    }

    if !snapshot.player_totals.is_empty() {
        println!();
        println!("  {:<24} {:>4} {:>4} {:>4} {:>4} {:>4}", "Player", "PTS", "REB", "AST", "STL", "BLK");
        for total in snapshot.player_totals.iter().take(10) {
            println!(
                "  {:<24} {:>4} {:>4} {:>4} {:>4} {:>4}",
                total.player, total.points, total.rebounds, total.assists, total.steals, total.blocks
            );
        }
    }

    println!();
    println!(
        "{} events, largest leads {}/{}, {} lead changes",
        snapshot.events.len(),
        snapshot.score_flow.largest_home_lead,
        snapshot.score_flow.largest_away_lead,
        snapshot.score_flow.lead_changes
    );
    Ok(())
}

fn scoreline(snapshot: &GameSnapshot) -> String {
    let mut line = format!(
        "{} {} - {} {}",
        snapshot.teams.home.as_deref().unwrap_or("Home"),
        snapshot.score.home,
        snapshot.score.away,
        snapshot.teams.away.as_deref().unwrap_or("Away")
    );
    if let Some(period) = snapshot.clock_state.period {
        line.push_str(&format!("  P{}", period));
    }
    if let Some(clock) = &snapshot.clock_state.clock {
        line.push_str(&format!(" {}", clock));
    }
    line
}

fn format_event(event: &PbpEvent) -> String {
    let period = event.period.map(|p| format!("P{}", p)).unwrap_or_default();
    format!(
        "#{:<4} {:<3} {:<5} {:>3}-{:<3} {}",
        event.sequence,
        period,
        event.clock.as_deref().unwrap_or(""),
        event.home_score,
        event.away_score,
        event.description
    )
}
