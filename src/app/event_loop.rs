//! Dashboard event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::{Stream, StreamExt};
use ratatui::{backend::Backend, Terminal};
use tracing::{info, warn};

use super::{fetch_headline_stats, App, AppMessage};
use crate::config::ClientConfig;
use crate::error::{CitrateError, CitrateResult};
use crate::terminal::{setup_panic_hook, TerminalManager};
use crate::traits::StatsStream;
use crate::ui;
use crate::websocket::StatsClient;

/// Upper bound between two redraws.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Run the dashboard until the user quits.
///
/// `input` is the terminal event stream; tests pass a scripted one.
/// The stats stream ending does not end the loop: the dashboard keeps
/// showing the last state until the user quits.
pub async fn run_app<B, S, I>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    stream: &mut S,
    mut input: I,
) -> CitrateResult<()>
where
    B: Backend,
    S: StatsStream + ?Sized,
    I: Stream<Item = io::Result<Event>> + Unpin,
{
    let mut message_rx = app.message_rx.take();
    let mut stream_open = true;
    let mut input_open = true;
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);

    loop {
        if app.needs_redraw {
            terminal
                .draw(|f| ui::render(f, &app.context()))
                .map_err(|e| CitrateError::Ui(e.to_string()))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            _ = redraw.tick() => {
                app.mark_dirty();
            }

            event = stream.next_event(), if stream_open => {
                match event {
                    Some(event) => app.handle_stream_event(event),
                    None => {
                        info!("Stats stream ended");
                        stream_open = false;
                    }
                }
            }

            input_event = input.next(), if input_open => {
                match input_event {
                    Some(Ok(Event::Key(key))) => {
                        app.handle_key(key);
                    }
                    Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => warn!("Terminal input error: {}", e),
                    None => input_open = false,
                }
            }

            msg = async {
                match message_rx.as_mut() {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            }, if message_rx.is_some() => {
                match msg {
                    Some(msg) => app.handle_message(msg),
                    None => message_rx = None,
                }
            }
        }

        if app.should_quit {
            stream.shutdown();
            return Ok(());
        }
    }
}

/// `citrate watch`: open the terminal, connect and run the dashboard.
pub async fn run_watch(config: ClientConfig) -> CitrateResult<()> {
    config.validate()?;

    let mut app = App::new(&config);

    let tx = app.message_sender();
    let api_base = config.api_base();
    tokio::spawn(async move {
        match fetch_headline_stats(&api_base).await {
            Ok(stats) => {
                let _ = tx.send(AppMessage::HeadlineLoaded(stats));
            }
            Err(e) => warn!("Headline figures unavailable: {}", e),
        }
    });

    info!("Connecting to {}", config.url);
    let mut client = StatsClient::spawn(config);

    setup_panic_hook();
    let mut term = TerminalManager::new()?;
    let result = run_app(term.terminal(), &mut app, &mut client, EventStream::new()).await;
    term.restore()?;
    result
}
